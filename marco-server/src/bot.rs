//! Chat behaviour around a text model: when to learn, when to talk.

use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, info};
use marco_core::{Markov, MarkovError};
use rand::Rng;
use rand::rngs::StdRng;

use crate::commands::{help_text, Command, CommandError};

/// Whether the bot may reply spontaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Silence {
	Off,
	Indefinite,
	Until(Instant),
}

/// A text model plus the policy deciding when to reply.
///
/// # Responsibilities
/// - Learn every ordinary message
/// - Reply with probability `chat_freq`, or always when mentioned, unless silenced
/// - Run chat commands
/// - Track whether the model changed since the last save
pub struct Bot {
	model: Markov,
	rng: StdRng,
	chat_freq: f64,
	silence: Silence,
	dirty: bool,
}

impl Bot {
	/// `chat_freq` is clamped to `[0, 1]`; a non-finite value disables spontaneous replies.
	pub fn new(model: Markov, chat_freq: f64, rng: StdRng) -> Self {
		let chat_freq = if chat_freq.is_finite() { chat_freq.clamp(0.0, 1.0) } else { 0.0 };
		Self { model, rng, chat_freq, silence: Silence::Off, dirty: false }
	}

	pub fn model(&self) -> &Markov {
		&self.model
	}

	pub fn is_silent(&self, now: Instant) -> bool {
		match self.silence {
			Silence::Off => false,
			Silence::Indefinite => true,
			Silence::Until(until) => now < until,
		}
	}

	/// `true` if the model changed since the last successful save.
	pub fn is_dirty(&self) -> bool {
		self.dirty
	}

	pub fn learn(&mut self, text: &str) {
		self.model.learn(text);
		self.dirty = true;
	}

	pub fn unlearn(&mut self, text: &str) {
		self.model.unlearn(text);
		self.dirty = true;
	}

	/// Generates one sentence, `None` when there is nothing to say.
	pub fn output(&mut self) -> Option<String> {
		match self.model.generate(&mut self.rng) {
			Ok(text) if !text.is_empty() => Some(text),
			Ok(_) => None,
			Err(e) => {
				debug!("No output: {e}");
				None
			}
		}
	}

	/// Handles an incoming chat message.
	///
	/// Commands are executed and answered. Any other message is learned and
	/// may trigger a generated reply.
	pub fn message(&mut self, text: &str, mentioned: bool, now: Instant) -> Option<String> {
		match Command::parse(text) {
			Some(Ok(command)) => self.command(command, now),
			Some(Err(CommandError::Unknown(name))) => {
				debug!("Ignoring unknown command !{name}");
				None
			}
			Some(Err(e)) => Some(e.to_string()),
			None => {
				self.learn(text);
				if self.is_silent(now) {
					return None;
				}
				if mentioned || self.rng.random_bool(self.chat_freq) {
					self.output()
				} else {
					None
				}
			}
		}
	}

	/// Runs a command and returns its reply.
	pub fn command(&mut self, command: Command, now: Instant) -> Option<String> {
		match command {
			Command::Ping => Some("pong!".to_owned()),
			Command::Help(topic) => Some(help_text(topic.as_deref()).to_owned()),
			Command::Off(None) => {
				self.silence = Silence::Indefinite;
				info!("Silenced indefinitely");
				Some("deactivating indefinitely (use !on to reactivate)".to_owned())
			}
			Command::Off(Some(minutes)) => {
				self.silence = minutes
					.checked_mul(60)
					.and_then(|secs| now.checked_add(Duration::from_secs(secs)))
					.map_or(Silence::Indefinite, Silence::Until);
				info!("Silenced for {minutes} minutes");
				Some(format!("deactivating for {minutes} minutes (use !on to reactivate immediately)"))
			}
			Command::On => {
				self.silence = Silence::Off;
				info!("Reactivated");
				Some("reactivating.".to_owned())
			}
			Command::Output => self.output(),
			Command::Unlearn(text) => {
				self.unlearn(&text);
				Some("Unlearned provided message.".to_owned())
			}
		}
	}

	/// Writes the model to `path` and clears the dirty flag.
	pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<(), MarkovError> {
		self.model.save(path)?;
		self.dirty = false;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;

	fn bot(chat_freq: f64) -> Bot {
		Bot::new(Markov::default(), chat_freq, StdRng::seed_from_u64(3))
	}

	#[test]
	fn learns_ordinary_messages() {
		let mut bot = bot(0.0);
		let now = Instant::now();
		assert_eq!(bot.message("the cat sat.", false, now), None);
		assert!(!bot.model().is_empty());
		assert!(bot.is_dirty());
	}

	#[test]
	fn replies_when_mentioned_or_always_chatty() {
		let now = Instant::now();
		let mut quiet = bot(0.0);
		assert_eq!(quiet.message("the cat sat.", true, now), Some("the cat sat.".into()));

		let mut chatty = bot(1.0);
		assert_eq!(chatty.message("Hello World", false, now), Some("Hello World".into()));
	}

	#[test]
	fn non_finite_chat_freq_never_replies_spontaneously() {
		let now = Instant::now();
		for chat_freq in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
			let mut bot = bot(chat_freq);
			assert_eq!(bot.message("the cat sat.", false, now), None);
			assert_eq!(bot.message("the cat sat.", true, now), Some("the cat sat.".into()));
		}
	}

	#[test]
	fn silence_blocks_replies_but_not_learning() {
		let now = Instant::now();
		let mut bot = bot(1.0);
		assert_eq!(bot.message("!off", false, now), Some("deactivating indefinitely (use !on to reactivate)".into()));
		assert_eq!(bot.message("hello there", true, now), None);
		assert!(!bot.model().is_empty());

		assert_eq!(bot.message("!on", false, now), Some("reactivating.".into()));
		assert_eq!(bot.message("hello there", false, now), Some("hello there".into()));
	}

	#[test]
	fn timed_silence_expires() {
		let now = Instant::now();
		let mut bot = bot(1.0);
		bot.message("!off 5", false, now);
		assert!(bot.is_silent(now));
		assert!(bot.is_silent(now + Duration::from_secs(4 * 60)));
		assert!(!bot.is_silent(now + Duration::from_secs(5 * 60)));
	}

	#[test]
	fn commands_answer() {
		let now = Instant::now();
		let mut bot = bot(0.0);
		assert_eq!(bot.message("!ping", false, now), Some("pong!".into()));
		assert_eq!(bot.message("!output", false, now), None);
		assert_eq!(bot.message("!dance", false, now), None);
		assert_eq!(
			bot.message("!off later", false, now),
			Some(CommandError::InvalidDuration.to_string())
		);
		assert!(!bot.is_silent(now));
		// commands are never learned
		assert!(bot.model().is_empty());
	}

	#[test]
	fn unlearn_command_forgets() {
		let now = Instant::now();
		let mut bot = bot(0.0);
		bot.message("Forget Me", false, now);
		assert_eq!(bot.message("!unlearn Forget Me", false, now), Some("Unlearned provided message.".into()));
		assert!(bot.model().is_empty());
		assert_eq!(bot.message("!output", false, now), None);
	}

	#[test]
	fn save_clears_dirty_flag() {
		let dir = std::env::temp_dir().join(format!("marco-bot-{}", std::process::id()));
		let path = dir.join("bot.bin");
		let mut bot = bot(0.0);
		bot.learn("something to keep");
		bot.save(&path).unwrap();
		assert!(!bot.is_dirty());
		assert_eq!(&Markov::load(&path).unwrap(), bot.model());
		std::fs::remove_dir_all(&dir).unwrap();
	}
}
