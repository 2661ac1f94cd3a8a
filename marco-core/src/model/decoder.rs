use super::config::MarkovConfig;
use super::token::{is_sentinel, Marker, Token};

/// Renders a token sequence as human-readable text.
///
/// Sentinels are dropped, punctuation tokens are glued onto the preceding
/// word and capitalization markers are replayed left to right. Sequences
/// already merged by the sampler pass through the merging step unchanged.
pub fn decode(tokens: &[Token], config: &MarkovConfig) -> String {
	let mut words: Vec<Token> = Vec::with_capacity(tokens.len());
	for token in tokens.iter().filter(|t| !is_sentinel(t)) {
		attach(&mut words, token.clone(), config);
	}

	let mut caps_active = false;
	words
		.iter()
		.map(|word| decode_word(word, &mut caps_active))
		.collect::<Vec<_>>()
		.join(" ")
}

/// Pushes `token` as a new word, or glues it onto the last word if it is a
/// punctuation token.
pub(crate) fn attach(words: &mut Vec<Token>, token: Token, config: &MarkovConfig) {
	if config.is_punctuation_token(&token) {
		if let Some(last) = words.last_mut() {
			last.push_str(&token);
			return;
		}
	}
	words.push(token);
}

/// Applies the markers carried by `word`, threading the caps-lock state.
fn decode_word(word: &str, caps_active: &mut bool) -> String {
	let mut next_caps = *caps_active;
	let mut word = word.to_owned();

	if let Some(rest) = word.strip_prefix(Marker::Shift.as_str()) {
		let decoded = if rest.chars().count() > 1 { capitalize(rest) } else { rest.to_uppercase() };
		word = decoded;
	}

	if let Some((pre, post)) = Marker::CapsOn.split(&word) {
		let decoded = if *caps_active {
			format!("{pre}{post}").to_uppercase()
		} else {
			next_caps = true;
			format!("{pre}{}", post.to_uppercase())
		};
		word = decoded;
	}

	if let Some((pre, post)) = Marker::CapsOff.split(&word) {
		let decoded = if *caps_active {
			next_caps = false;
			format!("{}{post}", pre.to_uppercase())
		} else {
			format!("{pre}{post}")
		};
		word = decoded;
	}

	if *caps_active && next_caps {
		word = word.to_uppercase();
	}
	*caps_active = next_caps;
	word
}

/// First character uppercase, the rest lowercase.
fn capitalize(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
		None => String::new(),
	}
}
