use serde::{Deserialize, Serialize};

use super::token::CONTROL;
use crate::error::{MarkovError, Result};

/// Punctuation split off the end of words by default.
pub const DEFAULT_PUNCTUATION: [char; 6] = ['.', '!', '?', ',', ';', ':'];

/// Default upper bound on sampling steps for one generated sentence.
pub const DEFAULT_MAX_WALK: usize = 10_000;

/// Tunable parameters of a text model.
///
/// # Invariants
/// - `punctuation` is non-empty and contains no alphanumeric, whitespace
///   or reserved control character
/// - `max_walk` is at least 1
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MarkovConfig {
	/// Characters treated as trailing punctuation.
	punctuation: Vec<char>,

	/// Maximum number of tokens sampled before generation gives up.
	max_walk: usize,
}

impl Default for MarkovConfig {
	fn default() -> Self {
		Self { punctuation: DEFAULT_PUNCTUATION.to_vec(), max_walk: DEFAULT_MAX_WALK }
	}
}

impl MarkovConfig {
	/// Returns the punctuation set.
	pub fn punctuation(&self) -> &[char] {
		&self.punctuation
	}

	/// Returns the walk length bound.
	pub fn max_walk(&self) -> usize {
		self.max_walk
	}

	/// `true` if `c` is a punctuation character.
	pub fn is_punctuation(&self, c: char) -> bool {
		self.punctuation.contains(&c)
	}

	/// `true` if `token` consists only of punctuation characters.
	pub fn is_punctuation_token(&self, token: &str) -> bool {
		!token.is_empty() && token.chars().all(|c| self.is_punctuation(c))
	}

	/// Replaces the punctuation set.
	///
	/// # Errors
	/// Returns `InvalidConfig` if the set is empty or contains a letter,
	/// digit, whitespace or the reserved control character.
	pub fn set_punctuation(&mut self, punctuation: &[char]) -> Result<()> {
		check_punctuation(punctuation)?;
		let mut set: Vec<char> = Vec::with_capacity(punctuation.len());
		for c in punctuation {
			if !set.contains(c) {
				set.push(*c);
			}
		}
		self.punctuation = set;
		Ok(())
	}

	/// Sets the walk length bound.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `max_walk` is 0.
	pub fn set_max_walk(&mut self, max_walk: usize) -> Result<()> {
		check_max_walk(max_walk)?;
		self.max_walk = max_walk;
		Ok(())
	}

	/// Checks the invariants of a configuration built without the setters
	/// (ex. decoded from a snapshot).
	pub(crate) fn validate(&self) -> Result<()> {
		check_punctuation(&self.punctuation)?;
		check_max_walk(self.max_walk)
	}
}

fn check_punctuation(punctuation: &[char]) -> Result<()> {
	if punctuation.is_empty() {
		return Err(MarkovError::InvalidConfig("Punctuation set cannot be empty".to_owned()));
	}
	if let Some(c) = punctuation
		.iter()
		.find(|c| c.is_alphanumeric() || c.is_whitespace() || **c == CONTROL)
	{
		return Err(MarkovError::InvalidConfig(format!("{c:?} cannot be used as punctuation")));
	}
	Ok(())
}

fn check_max_walk(max_walk: usize) -> Result<()> {
	if max_walk == 0 {
		return Err(MarkovError::InvalidConfig("max_walk must be >= 1".to_owned()));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_punctuation() {
		let config = MarkovConfig::default();
		assert!(config.is_punctuation_token("."));
		assert!(config.is_punctuation_token("?!"));
		assert!(!config.is_punctuation_token(""));
		assert!(!config.is_punctuation_token("a."));
		assert_eq!(config.max_walk(), DEFAULT_MAX_WALK);
	}

	#[test]
	fn rejects_invalid_punctuation() {
		let mut config = MarkovConfig::default();
		assert!(config.set_punctuation(&[]).is_err());
		assert!(config.set_punctuation(&['.', 'a']).is_err());
		assert!(config.set_punctuation(&[' ']).is_err());
		assert!(config.set_punctuation(&[CONTROL]).is_err());
		assert_eq!(config.punctuation(), DEFAULT_PUNCTUATION);

		config.set_punctuation(&['~']).unwrap();
		assert!(config.is_punctuation('~'));
		assert!(!config.is_punctuation('.'));
	}

	#[test]
	fn rejects_zero_walk() {
		let mut config = MarkovConfig::default();
		assert!(matches!(config.set_max_walk(0), Err(MarkovError::InvalidConfig(_))));
		config.set_max_walk(5).unwrap();
		assert_eq!(config.max_walk(), 5);
	}
}
