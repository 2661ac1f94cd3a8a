use std::io;
use std::path::Path;
use std::thread;

use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chain_store::ChainStore;
use super::config::MarkovConfig;
use super::decoder::decode;
use super::encoder::encode;
use super::sampler::walk;
use super::token::Token;
use crate::error::{MarkovError, Result, StateLoadError};
use crate::io::{read_lines, write_replace};

/// Version written in front of every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A learning text model: encoder, chain store, sampler and decoder behind
/// one owned value.
///
/// The model has no internal locking. A host that learns while generating
/// or snapshotting from several threads must serialize access itself
/// (ex. wrap it in a `Mutex`).
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Markov {
	config: MarkovConfig,
	store: ChainStore,
}

impl Markov {
	/// Creates an empty model.
	pub fn new(config: MarkovConfig) -> Self {
		Self { config, store: ChainStore::new() }
	}

	/// Builds a model from a corpus file, one sentence per non-blank line.
	///
	/// # Behavior
	/// - Splits the lines into chunks (based on CPU cores * factor).
	/// - Learns each chunk into a partial store on its own thread.
	/// - Merges the partial stores in chunk order, so the result is the
	///   same as learning every line sequentially.
	///
	/// # Errors
	/// Returns `Io` if the file cannot be read or a worker thread panics.
	pub fn from_corpus<P: AsRef<Path>>(filepath: P, config: MarkovConfig) -> Result<Self> {
		let lines = read_lines(&filepath)?;
		let mut model = Self::new(config);
		if lines.is_empty() {
			warn!("Corpus {} has no sentence", filepath.as_ref().display());
			return Ok(model);
		}

		let factor = 8;
		let chunks = num_cpus::get() * factor;
		let chunk_size = lines.len().div_ceil(chunks);

		let config = &model.config;
		let partials: Vec<thread::Result<ChainStore>> = thread::scope(|scope| {
			let handles: Vec<_> = lines
				.chunks(chunk_size)
				.map(|chunk| {
					scope.spawn(move || {
						let mut partial = ChainStore::new();
						for sentence in chunk {
							partial.learn(&encode(sentence, config));
						}
						partial
					})
				})
				.collect();
			handles.into_iter().map(|handle| handle.join()).collect()
		});

		for partial in partials {
			let partial = partial.map_err(|_| io::Error::other("corpus worker panicked"))?;
			model.store.merge(&partial);
		}

		debug!(
			"Learned {} sentences from {} ({} contexts)",
			lines.len(),
			filepath.as_ref().display(),
			model.store.len()
		);
		Ok(model)
	}

	/// Returns the model configuration.
	pub fn config(&self) -> &MarkovConfig {
		&self.config
	}

	/// Changes the walk length bound of a model, ex. one restored from a snapshot.
	pub fn set_max_walk(&mut self, max_walk: usize) -> Result<()> {
		self.config.set_max_walk(max_walk)
	}

	/// Returns the underlying chain store.
	pub fn store(&self) -> &ChainStore {
		&self.store
	}

	/// Number of distinct contexts learned.
	pub fn context_count(&self) -> usize {
		self.store.len()
	}

	/// Number of recorded continuations, duplicates included.
	pub fn continuation_count(&self) -> usize {
		self.store.continuation_count()
	}

	pub fn is_empty(&self) -> bool {
		self.store.is_empty()
	}

	/// Encodes `text` and records its transitions.
	pub fn learn(&mut self, text: &str) {
		let tokens = encode(text, &self.config);
		self.store.learn(&tokens);
		debug!("Learned {} tokens", tokens.len() - 3);
	}

	/// Retracts the transitions `learn(text)` would have recorded.
	///
	/// Text that was never learned (or only partly) is not an error: the
	/// transitions that are not present are skipped.
	pub fn unlearn(&mut self, text: &str) {
		let tokens = encode(text, &self.config);
		self.store.unlearn(&tokens);
		debug!("Unlearned {} tokens", tokens.len() - 3);
	}

	/// Samples a sentence as a word sequence (punctuation already attached).
	///
	/// # Errors
	/// `EmptyModel`, `UnknownContext` or `RunawayGeneration`, see `sampler::walk`.
	pub fn generate_tokens<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Token>> {
		walk(&self.store, &self.config, rng).inspect_err(|e| match e {
			MarkovError::EmptyModel => debug!("Nothing to generate: {e}"),
			_ => warn!("Generation failed: {e}"),
		})
	}

	/// Samples a sentence and renders it as text.
	pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String> {
		let words = self.generate_tokens(rng)?;
		Ok(decode(&words, &self.config))
	}

	/// Merges another model into this one (multiset union of continuations).
	///
	/// # Errors
	/// Returns `InvalidConfig` if the punctuation sets differ, their tokens
	/// would not mean the same thing.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.config.punctuation() != other.config.punctuation() {
			return Err(MarkovError::InvalidConfig(format!(
				"Punctuation mismatch: self={:?}, other={:?}",
				self.config.punctuation(),
				other.config.punctuation()
			)));
		}
		self.store.merge(&other.store);
		Ok(())
	}

	/// Serializes the whole model (configuration and chain store) with `postcard`.
	pub fn snapshot(&self) -> Result<Vec<u8>> {
		let bytes = postcard::to_stdvec(&(SNAPSHOT_VERSION, self)).map_err(MarkovError::Snapshot)?;
		debug!("Snapshot of {} contexts ({} bytes)", self.store.len(), bytes.len());
		Ok(bytes)
	}

	/// Rebuilds a model from a `snapshot` blob.
	///
	/// # Errors
	/// Returns `StateLoad` if the blob is corrupt, was written by another
	/// snapshot version or decodes to a model breaking its invariants.
	pub fn restore(blob: &[u8]) -> Result<Self> {
		let (version, rest) = postcard::take_from_bytes::<u32>(blob).map_err(StateLoadError::Decode)?;
		if version != SNAPSHOT_VERSION {
			return Err(StateLoadError::Version { found: version, expected: SNAPSHOT_VERSION }.into());
		}
		let (model, rest) = postcard::take_from_bytes::<Self>(rest).map_err(StateLoadError::Decode)?;
		if !rest.is_empty() {
			return Err(StateLoadError::Invalid(format!("{} trailing bytes after snapshot", rest.len())).into());
		}

		model
			.config
			.validate()
			.map_err(|e| StateLoadError::Invalid(e.to_string()))?;
		model.store.check_invariants().map_err(StateLoadError::Invalid)?;
		Ok(model)
	}

	/// Writes a snapshot to `path`, replacing any previous file.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		write_replace(&path, &self.snapshot()?)?;
		debug!("Model saved to {}", path.as_ref().display());
		Ok(())
	}

	/// Restores a model from a snapshot file written by `save`.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let bytes = std::fs::read(&path).map_err(StateLoadError::Io)?;
		let model = Self::restore(&bytes)?;
		debug!("Model loaded from {} ({} contexts)", path.as_ref().display(), model.store.len());
		Ok(model)
	}
}
