//! Top-level module for the text model.
//!
//! Text flows through the model as follows:
//! - `encoder` turns raw text into tokens with capitalization markers
//! - `chain_store` records (and retracts) two-token context transitions
//! - `sampler` walks the store to produce a new token sequence
//! - `decoder` turns tokens back into readable text
//!
//! `Markov` ties them together behind learn / unlearn / generate /
//! snapshot / restore.

/// Model facade and snapshot handling.
pub mod markov;

/// Context to continuations multiset store.
pub mod chain_store;

/// Text to tokens.
pub mod encoder;

/// Tokens to text.
pub mod decoder;

/// Random walk generation.
pub mod sampler;

/// Model parameters (punctuation set, walk bound).
pub mod config;

/// Tokens, sentinels, markers and contexts.
pub mod token;
