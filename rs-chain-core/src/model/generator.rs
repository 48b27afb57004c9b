use log::debug;
use rand::Rng;

use super::chain_table::ChainTable;
use super::generation_input::{GenerationInput, StartSeed};
use super::sampler;
use crate::error::{ChainError, Result};

/// Lifecycle of a [`Generator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeneratorState {
	/// No seed chosen yet.
	Uninitialized,
	/// Walking; holds the prefix the next word is drawn from.
	Active(String),
	/// Length reached or dead end hit. No further output.
	Terminated,
}

/// Sliding-window walk over a [`ChainTable`].
///
/// # Responsibilities
/// - Choose the seed prefix (requested one if known, uniform otherwise)
/// - Draw one word per step from the current prefix's distribution
/// - Slide the prefix window over the drawn word
///
/// # Notes
/// - A dead end (prefix absent from the table) ends the walk normally.
/// - All randomness comes from the caller's `rng`.
pub struct Generator<'a, R: Rng> {
	table: &'a ChainTable,
	rng: &'a mut R,
	state: GeneratorState,
	remaining: usize,
	words: Vec<String>,
}

impl<'a, R: Rng> Generator<'a, R> {
	pub fn new(table: &'a ChainTable, rng: &'a mut R) -> Self {
		Self {
			table,
			rng,
			state: GeneratorState::Uninitialized,
			remaining: 0,
			words: Vec::new(),
		}
	}

	pub fn state(&self) -> &GeneratorState {
		&self.state
	}

	/// Words emitted so far, seed included.
	pub fn words(&self) -> &[String] {
		&self.words
	}

	/// Chooses the seed and emits its words.
	///
	/// A `Custom` seed is used as-is when it is a key of the table; otherwise,
	/// or for `Random`, the seed is drawn uniformly among the prefixes.
	///
	/// # Errors
	/// Returns [`ChainError::NoData`] if the table is empty. The generator
	/// stays `Uninitialized`.
	pub fn start(&mut self, start_seed: &StartSeed, length: usize) -> Result<()> {
		let table = self.table;
		let prefix = match start_seed.as_custom() {
			Some(start) if table.contains(start) => start.to_owned(),
			requested => {
				let prefix = table.random_prefix(self.rng).ok_or(ChainError::NoData)?;
				if let Some(start) = requested {
					debug!("start '{start}' is not a known prefix, using '{prefix}'");
				}
				prefix.to_owned()
			}
		};

		self.words = prefix.split(' ').map(str::to_owned).collect();
		self.remaining = length;
		self.state = if length == 0 { GeneratorState::Terminated } else { GeneratorState::Active(prefix) };
		Ok(())
	}

	/// Draws the next word.
	///
	/// Returns `Ok(None)` once the walk is over (or was never started).
	///
	/// # Errors
	/// Propagates [`ChainError::EmptyDistribution`] from the sampler.
	pub fn step(&mut self) -> Result<Option<&str>> {
		let table = self.table;
		let GeneratorState::Active(prefix) = &self.state else {
			return Ok(None);
		};
		let Some(distribution) = table.get(prefix) else {
			debug!("dead end at '{prefix}' after {} words", self.words.len());
			self.state = GeneratorState::Terminated;
			return Ok(None);
		};

		let next_word = sampler::sample(distribution, self.rng)?.to_owned();
		let next_prefix = slide(prefix, &next_word);

		self.remaining -= 1;
		self.state = if self.remaining == 0 { GeneratorState::Terminated } else { GeneratorState::Active(next_prefix) };
		self.words.push(next_word);
		Ok(self.words.last().map(String::as_str))
	}

	/// Runs the walk to completion and returns the formatted text.
	pub fn run(mut self) -> Result<String> {
		while self.step()?.is_some() {}
		Ok(format_output(&self.words))
	}
}

/// Drops the first word of `prefix` and appends `next_word`.
///
/// For a single-word prefix (bigram chain) this is just `next_word`.
pub fn slide(prefix: &str, next_word: &str) -> String {
	match prefix.split_once(' ') {
		Some((_, rest)) => format!("{rest} {next_word}"),
		None => next_word.to_owned(),
	}
}

/// Joins words with single spaces and capitalizes the very first character.
pub fn format_output(words: &[String]) -> String {
	let joined = words.join(" ");
	let trimmed = joined.trim();
	let mut chars = trimmed.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Generates text from `table` in one call.
///
/// # Errors
/// Returns [`ChainError::NoData`] on an empty table.
pub fn generate<R: Rng>(table: &ChainTable, input: &GenerationInput, rng: &mut R) -> Result<String> {
	let mut generator = Generator::new(table, rng);
	generator.start(&input.start_seed, input.length)?;
	generator.run()
}
