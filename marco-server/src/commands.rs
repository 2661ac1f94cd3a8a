//! Chat commands (`!name args`).

use thiserror::Error;

/// Every command the bot understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	Ping,
	/// General help, or help about one command.
	Help(Option<String>),
	/// Silence the bot, indefinitely or for a number of minutes.
	Off(Option<u64>),
	On,
	Output,
	Unlearn(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
	#[error("unknown command !{0}")]
	Unknown(String),

	#[error("!off only takes a positive integer as an argument. (no action taken)")]
	InvalidDuration,

	#[error("!unlearn needs the message to forget. (no action taken)")]
	MissingText,
}

impl Command {
	/// Parses a chat message as a command.
	///
	/// Returns `None` if the message is not a command (does not start with `!`).
	pub fn parse(message: &str) -> Option<Result<Self, CommandError>> {
		let message = message.trim_start().strip_prefix('!')?;
		let mut words = message.split_whitespace();
		let name = words.next().unwrap_or_default().to_lowercase();
		let args = words.collect::<Vec<_>>().join(" ");

		let command = match name.as_str() {
			"ping" => Ok(Command::Ping),
			"help" => Ok(Command::Help((!args.is_empty()).then_some(args))),
			"off" if args.is_empty() => Ok(Command::Off(None)),
			"off" => match args.parse::<u64>() {
				Ok(minutes) if minutes > 0 => Ok(Command::Off(Some(minutes))),
				_ => Err(CommandError::InvalidDuration),
			},
			"on" => Ok(Command::On),
			"output" => Ok(Command::Output),
			"unlearn" if args.is_empty() => Err(CommandError::MissingText),
			"unlearn" => Ok(Command::Unlearn(args)),
			_ => Err(CommandError::Unknown(name)),
		};
		Some(command)
	}
}

/// Help text, general or about `topic` (with or without the leading `!`).
pub fn help_text(topic: Option<&str>) -> &'static str {
	let topic = topic.map(|t| t.trim().trim_start_matches('!').to_lowercase());
	match topic.as_deref() {
		Some("ping") => "!ping responds \"pong!\"",
		Some("help") => "!help provides help messages. use !help commandname for more information about a command.",
		Some("off") => "!off silences the bot indefinitely. provide a number to silence the bot for that many minutes instead.",
		Some("on") => "!on unsilences the bot immediately.",
		Some("output") => "!output immediately produces a line of output from the bot.",
		Some("unlearn") => "!unlearn forgets the provided message, as if it had never been said.",
		_ => {
			"I am a markov chain bot. I understand the following commands: !ping !help !off !on !output !unlearn. \
			 Use !help commandname for more information about a command."
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(message: &str) -> Result<Command, CommandError> {
		Command::parse(message).expect("should be a command")
	}

	#[test]
	fn plain_text_is_not_a_command() {
		assert_eq!(Command::parse("hello there"), None);
		assert_eq!(Command::parse("wow!"), None);
	}

	#[test]
	fn parses_simple_commands() {
		assert_eq!(parse("!ping"), Ok(Command::Ping));
		assert_eq!(parse("!PING"), Ok(Command::Ping));
		assert_eq!(parse("  !on"), Ok(Command::On));
		assert_eq!(parse("!output now please"), Ok(Command::Output));
		assert_eq!(parse("!help"), Ok(Command::Help(None)));
		assert_eq!(parse("!help off"), Ok(Command::Help(Some("off".into()))));
	}

	#[test]
	fn off_takes_positive_minutes() {
		assert_eq!(parse("!off"), Ok(Command::Off(None)));
		assert_eq!(parse("!off 10"), Ok(Command::Off(Some(10))));
		assert_eq!(parse("!off 0"), Err(CommandError::InvalidDuration));
		assert_eq!(parse("!off -3"), Err(CommandError::InvalidDuration));
		assert_eq!(parse("!off soon"), Err(CommandError::InvalidDuration));
	}

	#[test]
	fn unlearn_keeps_text() {
		assert_eq!(
			parse("!unlearn The   cat sat."),
			Ok(Command::Unlearn("The cat sat.".into()))
		);
		assert_eq!(parse("!unlearn"), Err(CommandError::MissingText));
	}

	#[test]
	fn unknown_command() {
		assert_eq!(parse("!dance"), Err(CommandError::Unknown("dance".into())));
		assert_eq!(parse("!"), Err(CommandError::Unknown(String::new())));
	}

	#[test]
	fn help_topics() {
		assert_eq!(help_text(Some("!ping")), help_text(Some("ping")));
		assert!(help_text(Some("unlearn")).starts_with("!unlearn"));
		assert!(help_text(Some("nope")).contains("!help commandname"));
		assert!(help_text(None).contains("!unlearn"));
	}
}
