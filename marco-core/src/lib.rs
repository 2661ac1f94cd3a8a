//! Learning text generator.
//!
//! This crate provides a word-level Markov text model including:
//! - Reversible tokenization (capitalization markers, punctuation tokens)
//! - A trigram chain store supporting exact learn / unlearn
//! - Random walk sentence generation with an injected random source
//! - Versioned binary snapshots and parallel corpus ingestion
//!
//! The model is single-threaded and not internally synchronized.

/// Text model: encoder, chain store, sampler, decoder and the `Markov` facade.
pub mod model;

/// Error types.
pub mod error;

/// I/O utilities (corpus loading, snapshot files).
///
/// Not exposed
pub(crate) mod io;

pub use error::{MarkovError, StateLoadError};
pub use model::config::MarkovConfig;
pub use model::markov::Markov;
