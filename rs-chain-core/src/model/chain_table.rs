use std::collections::HashMap;
use std::slice::Windows;

use rand::Rng;
use rand::prelude::IteratorRandom;

use super::distribution::NextWordDistribution;
use crate::error::{ChainError, Result};

/// Slides a window of `n` tokens over `tokens`, one position at a time.
///
/// Yields `tokens.len() - n + 1` windows, or none at all when the sequence
/// is shorter than `n`.
///
/// # Errors
/// Returns [`ChainError::InvalidOrder`] if `n < 2`.
pub fn ngrams(tokens: &[String], n: usize) -> Result<Windows<'_, String>> {
	if n < 2 {
		return Err(ChainError::InvalidOrder(n));
	}
	Ok(tokens.windows(n))
}

/// Word-level chain: maps a prefix (n-1 words joined by a space) to the
/// distribution of words observed right after it.
///
/// # Responsibilities
/// - Fold n-grams into per-prefix next-word counts
/// - Merge with another table, e.g. a partial table built on another thread
/// - Pick a uniformly random prefix to seed a generation
///
/// # Invariants
/// - Each prefix appears once, in first-seen order
/// - The total of a prefix's distribution equals the number of n-grams
///   observed with that prefix since the table was created or loaded
#[derive(Clone, Debug, Default)]
pub struct ChainTable {
	entries: Vec<(String, NextWordDistribution)>,
	index: HashMap<String, usize>,
}

impl ChainTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records a single n-gram.
	///
	/// The last token is the next word, the others form the prefix.
	/// Windows shorter than two tokens carry no transition and are ignored.
	///
	/// # Errors
	/// Returns [`ChainError::CountOverflow`] if the prefix total is already
	/// `u64::MAX`.
	pub fn add_ngram(&mut self, ngram: &[String]) -> Result<()> {
		let Some((next_word, prefix)) = ngram.split_last() else {
			return Ok(());
		};
		if prefix.is_empty() {
			return Ok(());
		}
		self.distribution_mut(&prefix.join(" ")).add_word(next_word)
	}

	/// Records every n-gram of `tokens`.
	///
	/// Returns the number of n-grams added; zero when there are fewer than
	/// `n` tokens.
	///
	/// # Errors
	/// - [`ChainError::InvalidOrder`] if `n < 2`.
	/// - [`ChainError::CountOverflow`] if a prefix total would exceed
	///   `u64::MAX`; the n-grams before it stay recorded.
	pub fn train_tokens(&mut self, tokens: &[String], n: usize) -> Result<usize> {
		let mut added = 0;
		for ngram in ngrams(tokens, n)? {
			self.add_ngram(ngram)?;
			added += 1;
		}
		Ok(added)
	}

	/// Returns the distribution following `prefix`, if the prefix was observed.
	pub fn get(&self, prefix: &str) -> Option<&NextWordDistribution> {
		self.index.get(prefix).map(|&position| &self.entries[position].1)
	}

	pub fn contains(&self, prefix: &str) -> bool {
		self.index.contains_key(prefix)
	}

	/// Number of distinct prefixes.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Prefixes in first-seen order.
	pub fn prefixes(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(prefix, _)| prefix.as_str())
	}

	/// `(prefix, distribution)` pairs in first-seen order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &NextWordDistribution)> {
		self.entries.iter().map(|(prefix, distribution)| (prefix.as_str(), distribution))
	}

	/// Sum of every count in the table, i.e. the number of n-grams learned.
	///
	/// Saturates at `u64::MAX`.
	pub fn total_observations(&self) -> u64 {
		self.entries
			.iter()
			.fold(0u64, |sum, (_, distribution)| sum.saturating_add(distribution.total()))
	}

	/// Returns a prefix chosen uniformly among the distinct prefixes.
	///
	/// Frequency of a prefix plays no role. Returns `None` on an empty table.
	pub fn random_prefix<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		self.prefixes().choose(rng)
	}

	/// Merges another table into this one.
	///
	/// Counts for shared prefixes and words are summed. Unseen prefixes and
	/// words are appended in `other`'s order, so merging partial tables in
	/// corpus order yields the same table as training on the whole corpus.
	///
	/// # Errors
	/// Returns [`ChainError::CountOverflow`], leaving `self` untouched, if a
	/// shared prefix's total would exceed `u64::MAX`.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		for (prefix, distribution) in other.iter() {
			if let Some(existing) = self.get(prefix) {
				existing.total().checked_add(distribution.total()).ok_or(ChainError::CountOverflow)?;
			}
		}
		for (prefix, distribution) in other.iter() {
			self.distribution_mut(prefix).merge(distribution)?;
		}
		Ok(())
	}

	/// Inserts a full distribution for a new prefix.
	///
	/// Returns `false` and leaves the table untouched if the prefix exists.
	pub(crate) fn insert(&mut self, prefix: String, distribution: NextWordDistribution) -> bool {
		if self.index.contains_key(&prefix) {
			return false;
		}
		self.index.insert(prefix.clone(), self.entries.len());
		self.entries.push((prefix, distribution));
		true
	}

	/// Get or create the distribution for this prefix
	fn distribution_mut(&mut self, prefix: &str) -> &mut NextWordDistribution {
		let position = match self.index.get(prefix) {
			Some(&position) => position,
			None => {
				self.index.insert(prefix.to_owned(), self.entries.len());
				self.entries.push((prefix.to_owned(), NextWordDistribution::new()));
				self.entries.len() - 1
			}
		};
		&mut self.entries[position].1
	}
}

impl PartialEq for ChainTable {
	fn eq(&self, other: &Self) -> bool {
		self.entries == other.entries
	}
}

impl Eq for ChainTable {}
