use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the chain engine.
///
/// Usage errors (missing arguments) belong to the command surface and are
/// never produced here.
#[derive(Debug, Error)]
pub enum ChainError {
	/// The model order is below 2.
	#[error("n must be >= 2, got {0}")]
	InvalidOrder(usize),

	/// Generation was requested on a table with no prefixes.
	#[error("no trained data available for generation")]
	NoData,

	/// The sampler was given a distribution with no entries or no weight.
	#[error("next-word distribution is empty")]
	EmptyDistribution,

	/// A next-word total would no longer fit in a `u64`.
	#[error("occurrence count overflow")]
	CountOverflow,

	/// The table could not be serialized.
	#[error("cannot encode model: {0}")]
	Encode(String),

	/// A persisted model did not decode into the expected shape.
	#[error("model is corrupt: {0}")]
	ModelCorrupt(String),

	/// The underlying storage could not be read or written.
	#[error("storage error on {}: {source}", .path.display())]
	Storage {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// A training worker thread died before reporting its partial table.
	#[error("training worker failed: {0}")]
	Training(String),
}

pub type Result<T> = std::result::Result<T, ChainError>;
