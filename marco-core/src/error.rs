use thiserror::Error;

/// Errors returned by the text model.
///
/// Generation faults (`EmptyModel`, `UnknownContext`, `RunawayGeneration`)
/// only abort the current generation attempt, the model itself is left
/// untouched and stays usable.
#[derive(Debug, Error)]
pub enum MarkovError {
	/// Nothing has been learned from the start context yet.
	#[error("Model is empty: no continuation from the start context")]
	EmptyModel,

	/// The random walk reached a context without recorded continuations.
	#[error("Unknown context ({prev:?}, {cur:?})")]
	UnknownContext { prev: String, cur: String },

	/// The random walk did not reach the end sentinel within `limit` steps.
	#[error("Generation did not terminate within {limit} steps")]
	RunawayGeneration { limit: usize },

	#[error("Failed to load model state: {0}")]
	StateLoad(#[from] StateLoadError),

	#[error("Failed to serialize model state: {0}")]
	Snapshot(#[source] postcard::Error),

	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Reasons a snapshot could not be restored.
#[derive(Debug, Error)]
pub enum StateLoadError {
	#[error("corrupt snapshot: {0}")]
	Decode(#[from] postcard::Error),

	#[error("incompatible snapshot version {found} (expected {expected})")]
	Version { found: u32, expected: u32 },

	#[error("inconsistent snapshot: {0}")]
	Invalid(String),

	#[error("cannot read snapshot: {0}")]
	Io(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MarkovError>;
