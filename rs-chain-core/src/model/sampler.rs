//! Count-weighted choice over a next-word distribution.

use rand::Rng;

use super::distribution::NextWordDistribution;
use crate::error::{ChainError, Result};

/// Draws one word from `distribution` with probability proportional to its count.
///
/// A draw `r` is taken uniformly in `[1, total]` from `rng`, then resolved by
/// [`select`]. Passing a seeded generator makes the choice reproducible.
///
/// # Errors
/// Returns [`ChainError::EmptyDistribution`] if the distribution has no
/// entries or a total weight of zero.
pub fn sample<'a, R: Rng>(distribution: &'a NextWordDistribution, rng: &mut R) -> Result<&'a str> {
	let total = distribution.total();
	if total == 0 {
		return Err(ChainError::EmptyDistribution);
	}
	select(distribution, rng.random_range(1..=total))
}

/// Resolves a draw value against the distribution.
///
/// Entries are visited in first-seen order and each count is subtracted from
/// `draw`; the first entry that brings it to zero or below wins. For a fixed
/// draw, equal counts therefore resolve to the earliest-seen word.
///
/// # Errors
/// Returns [`ChainError::EmptyDistribution`] if the draw is still positive
/// once every entry has been visited (empty distribution, or `draw > total`).
pub fn select(distribution: &NextWordDistribution, draw: u64) -> Result<&str> {
	let mut remaining = draw;
	for (word, count) in distribution.iter() {
		if remaining <= count {
			return Ok(word);
		}
		remaining -= count;
	}
	Err(ChainError::EmptyDistribution)
}
