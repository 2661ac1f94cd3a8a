use rand::Rng;

use super::chain_store::ChainStore;
use super::config::MarkovConfig;
use super::decoder::attach;
use super::token::{Context, Token, END, PRE_START, START};
use crate::error::{MarkovError, Result};

/// Random walk over the chain store, from the start context to the end sentinel.
///
/// # Returns
/// - `Ok(Vec<Token>)`: the generated words, sentinels excluded, with every
///   punctuation token already glued onto the word before it
/// - `Err(EmptyModel)` if nothing was learned from the start context
/// - `Err(UnknownContext)` if the walk reaches a context with no continuation
/// - `Err(RunawayGeneration)` if the end sentinel is not reached within
///   `config.max_walk()` steps
///
/// A punctuation token sampled before any word has nothing to attach to and
/// is kept as a word of its own instead of being dropped, so `". hi"` is
/// generated back as `". hi"`.
pub fn walk<R: Rng + ?Sized>(store: &ChainStore, config: &MarkovConfig, rng: &mut R) -> Result<Vec<Token>> {
	if !store.contains(&Context::start()) {
		return Err(MarkovError::EmptyModel);
	}

	let mut words: Vec<Token> = Vec::new();
	let mut prev: Token = PRE_START.to_owned();
	let mut cur: Token = START.to_owned();
	let mut steps = 0;

	while cur != END {
		if steps == config.max_walk() {
			return Err(MarkovError::RunawayGeneration { limit: config.max_walk() });
		}
		steps += 1;

		let next = store.sample(&Context::new(&prev, &cur), rng)?.clone();
		prev = std::mem::replace(&mut cur, next);
		if prev != START {
			attach(&mut words, prev.clone(), config);
		}
	}

	Ok(words)
}
