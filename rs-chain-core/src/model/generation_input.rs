/// Number of words generated after the seed when no length is given.
pub const DEFAULT_LENGTH: usize = 100;

/// Strategy used to select the starting prefix of a generation.
///
/// # Variants
/// - `Random`: pick a prefix uniformly among the trained prefixes.
/// - `Custom(String)`: start from the given prefix. If the table does not
///   know it, generation falls back to `Random`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum StartSeed {
	#[default]
	Random,
	Custom(String),
}

impl StartSeed {
	/// Returns the requested prefix, if any.
	pub fn as_custom(&self) -> Option<&str> {
		match self {
			StartSeed::Random => None,
			StartSeed::Custom(s) => Some(s.as_str()),
		}
	}
}

impl From<Option<&str>> for StartSeed {
	fn from(start: Option<&str>) -> Self {
		match start {
			Some(s) => StartSeed::Custom(s.to_owned()),
			None => StartSeed::Random,
		}
	}
}

/// Input parameters for a single generation.
///
/// # Invariants
/// - `length` counts the words drawn after the seed; the seed itself is
///   always emitted and is not part of `length`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationInput {
	/// Maximum number of words drawn after the seed.
	pub length: usize,

	/// How the initial prefix is chosen.
	pub start_seed: StartSeed,
}

impl GenerationInput {
	pub fn new(length: usize, start_seed: StartSeed) -> Self {
		Self { length, start_seed }
	}
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self::new(DEFAULT_LENGTH, StartSeed::Random)
	}
}
