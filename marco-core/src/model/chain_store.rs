use std::collections::HashMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::token::{strip_markers, Context, Token};
use crate::error::{MarkovError, Result};

/// Mapping from a two-token context to every token observed after it.
///
/// Continuations are kept as a list in insertion order and duplicates are
/// preserved: a continuation seen N times appears N times, so a uniform pick
/// over the list is frequency-weighted.
///
/// ## Responsibilities:
/// - Record each consecutive triple of a learned token sequence
/// - Remove exactly one occurrence per triple when unlearning
/// - Sample a continuation for a context
/// - Merge with another store (ex. parallel learning support)
///
/// ## Invariants
/// - A context is present if and only if its continuation list is non-empty
/// - Context keys never carry capitalization markers, continuations keep them
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ChainStore {
	chains: HashMap<Context, Vec<Token>>,
}

impl ChainStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records every consecutive triple `(a, b, c)` of `tokens`: `c` is
	/// appended to the continuations of the context `(a, b)`.
	///
	/// Sequences shorter than 3 tokens are ignored.
	pub fn learn(&mut self, tokens: &[Token]) {
		for triple in tokens.windows(3) {
			let context = Context::new(&triple[0], &triple[1]);
			self.chains.entry(context).or_default().push(triple[2].clone());
		}
	}

	/// Removes one occurrence of `c` from the context `(a, b)` for every
	/// consecutive triple `(a, b, c)` of `tokens`.
	///
	/// A triple that was never learned is skipped. Contexts left without
	/// continuations are removed.
	pub fn unlearn(&mut self, tokens: &[Token]) {
		for triple in tokens.windows(3) {
			let context = Context::new(&triple[0], &triple[1]);
			let Some(continuations) = self.chains.get_mut(&context) else {
				continue;
			};
			if let Some(index) = continuations.iter().position(|token| *token == triple[2]) {
				continuations.remove(index);
			}
			if continuations.is_empty() {
				self.chains.remove(&context);
			}
		}
	}

	/// Picks a uniformly random continuation of `context`.
	///
	/// # Errors
	/// Returns `UnknownContext` if nothing was learned after `context`.
	pub fn sample<R: Rng + ?Sized>(&self, context: &Context, rng: &mut R) -> Result<&Token> {
		self.chains
			.get(context)
			.and_then(|continuations| continuations.choose(rng))
			.ok_or_else(|| MarkovError::UnknownContext {
				prev: context.prev().to_owned(),
				cur: context.cur().to_owned(),
			})
	}

	/// Returns the recorded continuations of `context`, in insertion order.
	pub fn continuations(&self, context: &Context) -> Option<&[Token]> {
		self.chains.get(context).map(Vec::as_slice)
	}

	/// `true` if `context` has at least one continuation.
	pub fn contains(&self, context: &Context) -> bool {
		self.chains.contains_key(context)
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.chains.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chains.is_empty()
	}

	/// Total number of recorded continuations, duplicates included.
	pub fn continuation_count(&self) -> usize {
		self.chains.values().map(Vec::len).sum()
	}

	/// Checks the store invariants, for data that did not go through `learn`.
	pub(crate) fn check_invariants(&self) -> std::result::Result<(), String> {
		for (context, continuations) in &self.chains {
			if continuations.is_empty() {
				return Err(format!("context {context:?} has no continuation"));
			}
			if strip_markers(context.prev()) != context.prev() || strip_markers(context.cur()) != context.cur() {
				return Err(format!("context {context:?} carries a marker"));
			}
		}
		Ok(())
	}

	/// Merges another store into this one.
	///
	/// Continuations of `other` are appended after the existing ones, so
	/// merging partial stores in order yields the same lists as learning
	/// their inputs sequentially.
	pub fn merge(&mut self, other: &Self) {
		for (context, continuations) in &other.chains {
			self.chains
				.entry(context.clone())
				.or_default()
				.extend(continuations.iter().cloned());
		}
	}
}
