//! Server configuration read from environment variables.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::warn;
use marco_core::model::config::DEFAULT_MAX_WALK;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
	/// Snapshot file loaded at startup and written by autosave.
	pub db_path: PathBuf,
	/// Chance of replying to an ordinary message.
	pub chat_freq: f64,
	/// Autosave period, `None` when disabled.
	pub autosave: Option<Duration>,
	pub max_walk: usize,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".into(),
			port: 5000,
			db_path: PathBuf::from("./data/marco.bin"),
			chat_freq: 0.15,
			autosave: Some(Duration::from_secs(5 * 60)),
			max_walk: DEFAULT_MAX_WALK,
		}
	}
}

impl ServerConfig {
	pub fn from_env() -> Self {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Builds the configuration from a key lookup.
	///
	/// Missing keys use the default value; unparseable or out of range
	/// values are reported and replaced by the default too.
	pub fn from_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let default = Self::default();

		let autosave_secs = parse_or(&lookup, "MARCO_AUTOSAVE_SECS", 5 * 60u64, |_| true);

		Self {
			host: lookup("MARCO_HOST").unwrap_or(default.host),
			port: parse_or(&lookup, "MARCO_PORT", default.port, |_| true),
			db_path: lookup("MARCO_DB").map(PathBuf::from).unwrap_or(default.db_path),
			chat_freq: parse_or(&lookup, "MARCO_CHAT_FREQ", default.chat_freq, |f| (0.0..=1.0).contains(f)),
			autosave: (autosave_secs > 0).then(|| Duration::from_secs(autosave_secs)),
			max_walk: parse_or(&lookup, "MARCO_MAX_WALK", default.max_walk, |n| *n > 0),
		}
	}
}

fn parse_or<F, T, V>(lookup: &F, key: &str, default: T, valid: V) -> T
where
	F: Fn(&str) -> Option<String>,
	T: FromStr + Display,
	V: Fn(&T) -> bool,
{
	let Some(raw) = lookup(key) else {
		return default;
	};
	match raw.trim().parse::<T>() {
		Ok(value) if valid(&value) => value,
		_ => {
			warn!("Ignoring invalid {key}={raw:?}, using {default}");
			default
		}
	}
}
