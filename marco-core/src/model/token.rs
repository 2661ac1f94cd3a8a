use serde::{Deserialize, Serialize};

/// A token: either a (lowercased) word, a punctuation run, or a sentinel.
pub type Token = String;

/// Prefix shared by every sentinel and marker.
///
/// It is stripped from raw input words before encoding, so user text can
/// never produce a reserved token.
pub const CONTROL: char = '\u{E000}';

/// Sentinel preceding the start sentinel (first half of the initial context).
pub const PRE_START: &str = "\u{E000}psom";
/// Sentinel marking the start of a sentence.
pub const START: &str = "\u{E000}som";
/// Sentinel marking the end of a sentence.
pub const END: &str = "\u{E000}eom";

/// Inline capitalization signal embedded in a content token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
	/// Capitalize only the first letter of this word.
	Shift,
	/// Enter sustained uppercase mode.
	CapsOn,
	/// Leave sustained uppercase mode.
	CapsOff,
}

impl Marker {
	pub const ALL: [Marker; 3] = [Marker::Shift, Marker::CapsOn, Marker::CapsOff];

	pub const fn as_str(self) -> &'static str {
		match self {
			Marker::Shift => "\u{E000}shft",
			Marker::CapsOn => "\u{E000}caps",
			Marker::CapsOff => "\u{E000}cape",
		}
	}

	/// Byte position of this marker in `word`, if present.
	pub fn find_in(self, word: &str) -> Option<usize> {
		word.find(self.as_str())
	}

	/// Splits `word` around this marker, returning the text before and after it.
	pub fn split(self, word: &str) -> Option<(&str, &str)> {
		let pos = self.find_in(word)?;
		Some((&word[..pos], &word[pos + self.as_str().len()..]))
	}
}

/// Removes capitalization markers from a token.
pub fn strip_markers(token: &str) -> String {
	let mut word = token.to_owned();
	for marker in Marker::ALL {
		if let Some(pos) = marker.find_in(&word) {
			word.replace_range(pos..pos + marker.as_str().len(), "");
		}
	}
	word
}

/// Returns `true` for the three sentinel tokens.
pub fn is_sentinel(token: &str) -> bool {
	token == PRE_START || token == START || token == END
}

/// The two most recent tokens, markers stripped.
///
/// Two contexts compare equal regardless of how their words were capitalized
/// when they were learned.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Context {
	prev: String,
	cur: String,
}

impl Context {
	pub fn new(prev: &str, cur: &str) -> Self {
		Self { prev: strip_markers(prev), cur: strip_markers(cur) }
	}

	/// The context every generation starts from.
	pub fn start() -> Self {
		Self::new(PRE_START, START)
	}

	pub fn prev(&self) -> &str {
		&self.prev
	}

	pub fn cur(&self) -> &str {
		&self.cur
	}
}

/// `true` if `s` has at least one cased character and no lowercase one.
pub(crate) fn is_upper(s: &str) -> bool {
	let mut cased = false;
	for c in s.chars() {
		if c.is_lowercase() {
			return false;
		}
		cased |= c.is_uppercase();
	}
	cased
}

/// `true` if `s` has at least one cased character and no uppercase one.
pub(crate) fn is_lower(s: &str) -> bool {
	let mut cased = false;
	for c in s.chars() {
		if c.is_uppercase() {
			return false;
		}
		cased |= c.is_lowercase();
	}
	cased
}
