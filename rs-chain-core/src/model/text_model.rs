use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::chain_table::ChainTable;
use super::generation_input::{GenerationInput, StartSeed};
use super::generator;
use super::normalizer::normalize;
use crate::error::{ChainError, Result};
use crate::io::read_file;
use crate::store;

/// Below this many tokens, file training stays on the calling thread.
const PARALLEL_THRESHOLD: usize = 50_000;

/// Number of chunks per CPU when training in parallel.
const CHUNK_FACTOR: usize = 8;

/// A trainable word chain of fixed order `n`, with its random source.
///
/// # Responsibilities
/// - Normalize and fold training text into the chain table
/// - Generate text from the learned table
/// - Save and load the table
///
/// # Notes
/// - Training is cumulative; only `load` replaces the table.
/// - The order is not persisted: a loaded table keeps whatever prefix width
///   it was trained with.
#[derive(Debug)]
pub struct TextModel<R: Rng = StdRng> {
	n: usize,
	chain: ChainTable,
	rng: R,
}

impl TextModel<StdRng> {
	/// Creates an empty model seeded from OS entropy.
	///
	/// # Errors
	/// Returns an error if `n < 2`.
	pub fn with_entropy(n: usize) -> Result<Self> {
		Self::new(n, StdRng::from_os_rng())
	}

	/// Creates an empty model with a reproducible random source.
	pub fn with_seed(n: usize, seed: u64) -> Result<Self> {
		Self::new(n, StdRng::seed_from_u64(seed))
	}
}

impl<R: Rng> TextModel<R> {
	/// Creates an empty model of order `n` drawing randomness from `rng`.
	///
	/// # Errors
	/// Returns [`ChainError::InvalidOrder`] if `n < 2`.
	pub fn new(n: usize, rng: R) -> Result<Self> {
		if n < 2 {
			return Err(ChainError::InvalidOrder(n));
		}
		Ok(Self { n, chain: ChainTable::new(), rng })
	}

	pub fn order(&self) -> usize {
		self.n
	}

	/// Read-only view of the learned table.
	pub fn trained_data(&self) -> &ChainTable {
		&self.chain
	}

	/// Trains on `text`, adding to what was already learned.
	///
	/// Returns the number of n-grams added. Input shorter than `n` words
	/// adds nothing and is not an error.
	pub fn train(&mut self, text: &str) -> Result<usize> {
		let tokens = normalize(text);
		let added = self.chain.train_tokens(&tokens, self.n)?;
		debug!("trained on {} tokens, {} n-grams, {} prefixes total", tokens.len(), added, self.chain.len());
		Ok(added)
	}

	/// Trains on the whole content of a text file.
	///
	/// The file is normalized as a single text. Large inputs are split into
	/// overlapping chunks built on worker threads, then merged in file order,
	/// which gives the same table as [`train`](Self::train) on the content.
	///
	/// # Errors
	/// - [`ChainError::Storage`] if the file cannot be read.
	/// - [`ChainError::Training`] if a worker thread fails.
	/// - [`ChainError::CountOverflow`] if a count would exceed `u64::MAX`.
	pub fn train_file<P: AsRef<Path>>(&mut self, filepath: P) -> Result<usize> {
		let tokens = normalize(&read_file(&filepath)?);
		if tokens.len() < PARALLEL_THRESHOLD {
			return self.chain.train_tokens(&tokens, self.n);
		}

		let partial = build_parallel(&tokens, self.n, num_cpus::get() * CHUNK_FACTOR)?;
		let added = partial.total_observations() as usize;
		self.chain.merge(&partial)?;
		Ok(added)
	}

	/// Generates up to `length` words after the seed.
	///
	/// The seed is `start` when it is a known prefix, a uniformly random
	/// prefix otherwise.
	///
	/// # Errors
	/// Returns [`ChainError::NoData`] if nothing was trained.
	pub fn generate(&mut self, length: usize, start: Option<&str>) -> Result<String> {
		self.generate_with(&GenerationInput::new(length, StartSeed::from(start)))
	}

	pub fn generate_with(&mut self, input: &GenerationInput) -> Result<String> {
		generator::generate(&self.chain, input, &mut self.rng)
	}

	/// Saves the table to `destination`, overwriting it.
	pub fn save<P: AsRef<Path>>(&self, destination: P) -> Result<()> {
		store::save(&self.chain, destination)
	}

	/// Replaces the table with the one stored at `source`.
	///
	/// On error the current table is left unchanged.
	pub fn load<P: AsRef<Path>>(&mut self, source: P) -> Result<()> {
		let chain = store::load(&source)?;
		if let Some(width) = chain.prefixes().next().map(|p| p.split(' ').count()) {
			if width != self.n - 1 {
				warn!(
					"{} holds {}-word prefixes but the model order is {}",
					source.as_ref().display(),
					width,
					self.n
				);
			}
		}
		self.chain = chain;
		Ok(())
	}
}

/// Builds the table for `tokens` on worker threads.
///
/// Windows are split into `chunks` contiguous ranges; each worker receives its
/// range plus the `n - 1` following tokens so no window is lost at a boundary.
/// Partial tables are merged by chunk index to keep first-seen order.
fn build_parallel(tokens: &[String], n: usize, chunks: usize) -> Result<ChainTable> {
	let windows = match tokens.len().checked_sub(n - 1) {
		Some(w) if w > 0 => w,
		_ => return Ok(ChainTable::new()),
	};
	let chunk_size = windows.div_ceil(chunks.max(1));

	let (tx, rx) = mpsc::channel();
	let mut spawned = 0;
	for (id, start) in (0..windows).step_by(chunk_size).enumerate() {
		let end = (start + chunk_size).min(windows) + n - 1;
		let chunk: Vec<String> = tokens[start..end].to_vec();
		let tx = tx.clone();

		thread::spawn(move || {
			let mut partial = ChainTable::new();
			let result = partial.train_tokens(&chunk, n).map(|_| partial);
			// The receiver outlives every worker
			let _ = tx.send((id, result));
		});
		spawned += 1;
	}
	drop(tx);
	info!("training {} tokens on {} chunks", tokens.len(), spawned);

	let mut partials: Vec<(usize, Result<ChainTable>)> = rx.iter().collect();
	if partials.len() != spawned {
		return Err(ChainError::Training(format!("{} of {} workers reported", partials.len(), spawned)));
	}
	partials.sort_by_key(|(id, _)| *id);

	let mut table = ChainTable::new();
	for (_, partial) in partials {
		table.merge(&partial?)?;
	}
	Ok(table)
}
