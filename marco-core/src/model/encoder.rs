use super::config::MarkovConfig;
use super::token::{is_lower, is_upper, Marker, Token, CONTROL, END, PRE_START, START};

/// Encodes raw text into a token sequence.
///
/// The sequence always starts with the pre-start and start sentinels and
/// ends with the end sentinel. Capitalization is turned into inline markers
/// and all words are lowercased, trailing punctuation runs become tokens of
/// their own.
///
/// Encoding is a pure function of `text` and `config`: unlearning relies on
/// producing exactly the tokens that were learned.
pub fn encode(text: &str, config: &MarkovConfig) -> Vec<Token> {
	let mut tokens: Vec<Token> = vec![PRE_START.to_owned(), START.to_owned()];
	let mut caps_active = false;

	for raw in text.split_whitespace() {
		let word: String = raw.chars().filter(|c| *c != CONTROL).collect();
		if word.is_empty() {
			continue;
		}

		let (word, punctuation) = encode_word(word, &mut caps_active, config);
		if !word.is_empty() {
			tokens.push(word);
		}
		if let Some(punctuation) = punctuation {
			tokens.push(punctuation);
		}
	}

	tokens.push(END.to_owned());
	tokens
}

/// Encodes a single word, threading the caps-lock state.
///
/// Returns the lowercased word (possibly carrying a marker) and the trailing
/// punctuation run split off it, if any.
fn encode_word(mut word: String, caps_active: &mut bool, config: &MarkovConfig) -> (Token, Option<Token>) {
	let mut punctuation = None;

	if word.chars().count() > 1 {
		if *caps_active && !is_upper(&word) {
			if is_lower(&word) {
				word.insert_str(0, Marker::CapsOff.as_str());
				*caps_active = false;
			} else if let Some((index, _)) = word.char_indices().find(|(_, c)| c.is_lowercase()) {
				// Mixed case: caps lock released inside the word
				word.insert_str(index, Marker::CapsOff.as_str());
				*caps_active = false;
			}
		} else if !*caps_active && !is_lower(&word) {
			let mut chars = word.chars();
			let first_upper = chars.next().is_some_and(char::is_uppercase);
			if first_upper && is_lower(chars.as_str()) {
				word.insert_str(0, Marker::Shift.as_str());
			} else if is_upper(&word) {
				word.insert_str(0, Marker::CapsOn.as_str());
				*caps_active = true;
			} else if let Some((index, _)) = word.char_indices().find(|(_, c)| c.is_uppercase()) {
				word.insert_str(index, Marker::CapsOn.as_str());
				*caps_active = true;
			}
		}

		let kept = word.trim_end_matches(|c: char| config.is_punctuation(c)).len();
		if kept < word.len() {
			punctuation = Some(word.split_off(kept));
		}
	} else if *caps_active && is_lower(&word) {
		word.insert_str(0, Marker::CapsOff.as_str());
		*caps_active = false;
	} else if !*caps_active && is_upper(&word) {
		word.insert_str(0, Marker::Shift.as_str());
	}

	(word.to_lowercase(), punctuation)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn enc(text: &str) -> Vec<Token> {
		encode(text, &MarkovConfig::default())
	}

	fn shift(word: &str) -> String {
		format!("{}{}", Marker::Shift.as_str(), word)
	}

	fn caps(word: &str) -> String {
		format!("{}{}", Marker::CapsOn.as_str(), word)
	}

	fn cape(word: &str) -> String {
		format!("{}{}", Marker::CapsOff.as_str(), word)
	}

	/// Encoded tokens without the sentinels.
	fn body(text: &str) -> Vec<Token> {
		let tokens = enc(text);
		tokens[2..tokens.len() - 1].to_vec()
	}

	#[test]
	fn wraps_with_sentinels() {
		assert_eq!(enc(""), vec![PRE_START, START, END]);
		let tokens = enc("hello");
		assert_eq!(tokens.first().map(String::as_str), Some(PRE_START));
		assert_eq!(tokens[1], START);
		assert_eq!(tokens.last().map(String::as_str), Some(END));
	}

	#[test]
	fn lowercase_words_are_unchanged() {
		assert_eq!(body("the cat sat"), vec!["the", "cat", "sat"]);
	}

	#[test]
	fn capitalized_word_gets_shift() {
		assert_eq!(body("Nice day"), vec![shift("nice"), "day".to_owned()]);
	}

	#[test]
	fn caps_run_is_opened_and_closed() {
		assert_eq!(
			body("HELLO BIG world"),
			vec![caps("hello"), "big".to_owned(), cape("world")]
		);
	}

	#[test]
	fn mixed_case_words_place_marker_at_transition() {
		assert_eq!(body("iPhone"), vec![format!("i{}phone", Marker::CapsOn.as_str())]);
		// caps still active, released mid-word
		assert_eq!(
			body("ABC DEfg"),
			vec![caps("abc"), format!("de{}fg", Marker::CapsOff.as_str())]
		);
	}

	#[test]
	fn single_characters() {
		assert_eq!(body("I a"), vec![shift("i"), "a".to_owned()]);
		assert_eq!(body("OK a"), vec![caps("ok"), cape("a")]);
	}

	#[test]
	fn trailing_punctuation_is_split() {
		assert_eq!(body("wait... what?!"), vec!["wait", "...", "what", "?!"]);
		assert_eq!(body("hi ."), vec!["hi", "."]);
		assert_eq!(body("..."), vec!["..."]);
	}

	#[test]
	fn punctuation_inside_word_is_kept() {
		assert_eq!(body("e.g. a,b"), vec!["e.g", ".", "a,b"]);
	}

	#[test]
	fn caps_run_then_shift_with_punctuation() {
		assert_eq!(
			body("HELLO world. Nice Day!"),
			vec![
				caps("hello"),
				cape("world"),
				".".to_owned(),
				shift("nice"),
				shift("day"),
				"!".to_owned(),
			]
		);
	}

	#[test]
	fn control_character_cannot_forge_sentinels() {
		let forged = format!("{} {}", END, Marker::Shift.as_str());
		let tokens = enc(&forged);
		assert_eq!(tokens, vec![PRE_START, START, "eom", "shft", END]);
	}

	#[test]
	fn custom_punctuation() {
		let mut config = MarkovConfig::default();
		config.set_punctuation(&['~']).unwrap();
		let tokens = encode("hey~~ you.", &config);
		assert_eq!(tokens[2..tokens.len() - 1], ["hey", "~~", "you."]);
	}

	#[test]
	fn encoding_is_deterministic() {
		let text = "Some MIXED text, With punctuation!";
		assert_eq!(enc(text), enc(text));
	}
}
