use std::collections::HashMap;

use crate::error::{ChainError, Result};

/// Observed next words for a single prefix, with their occurrence counts.
///
/// Conceptually this is the set of outgoing edges of one node of the chain,
/// weighted by how many times each edge was seen during training.
///
/// ## Responsibilities:
/// - Accumulate word occurrences during training
/// - Preserve the order in which words were first observed
/// - Merge with another distribution of the same prefix
///
/// ## Invariants
/// - `entries` holds each word exactly once, in first-seen order
/// - `index[word]` is the position of `word` in `entries`
/// - Every count built through `add_word` / `merge` is strictly positive
/// - `total` is the sum of all counts and never exceeds `u64::MAX`
#[derive(Clone, Debug, Default)]
pub struct NextWordDistribution {
	/// Words and counts, in first-seen order.
	/// Example: [("the", 42), ("a", 3)]
	entries: Vec<(String, u64)>,
	/// Position of each word inside `entries`.
	index: HashMap<String, usize>,
	/// Sum of the counts in `entries`.
	total: u64,
}

impl NextWordDistribution {
	/// Creates an empty distribution.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `word`.
	///
	/// - If the word is already known, its count is increased.
	/// - Otherwise it is appended with a count of 1.
	///
	/// # Errors
	/// Returns [`ChainError::CountOverflow`] if the total would exceed `u64::MAX`.
	pub fn add_word(&mut self, word: &str) -> Result<()> {
		self.add_count(word, 1)
	}

	/// Adds `count` occurrences of `word`, appending it if unseen.
	///
	/// Nothing changes when the new total would overflow.
	pub(crate) fn add_count(&mut self, word: &str, count: u64) -> Result<()> {
		self.total = self.total.checked_add(count).ok_or(ChainError::CountOverflow)?;
		match self.index.get(word) {
			Some(&position) => self.entries[position].1 += count,
			None => {
				self.index.insert(word.to_owned(), self.entries.len());
				self.entries.push((word.to_owned(), count));
			}
		}
		Ok(())
	}

	/// Returns the count recorded for `word`, if any.
	pub fn count(&self, word: &str) -> Option<u64> {
		self.index.get(word).map(|&position| self.entries[position].1)
	}

	/// Sum of all counts.
	pub fn total(&self) -> u64 {
		self.total
	}

	/// Number of distinct words.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates `(word, count)` pairs in first-seen order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
		self.entries.iter().map(|(word, count)| (word.as_str(), *count))
	}

	/// Merges another distribution into this one.
	///
	/// Counts of shared words are summed; words only present in `other`
	/// are appended in `other`'s order.
	///
	/// # Errors
	/// Returns [`ChainError::CountOverflow`], leaving `self` untouched, if the
	/// merged total would exceed `u64::MAX`.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		self.total.checked_add(other.total).ok_or(ChainError::CountOverflow)?;
		for (word, count) in other.iter() {
			self.add_count(word, count)?;
		}
		Ok(())
	}
}

impl PartialEq for NextWordDistribution {
	/// Two distributions are equal when they hold the same words with the
	/// same counts in the same order.
	fn eq(&self, other: &Self) -> bool {
		self.entries == other.entries
	}
}

impl Eq for NextWordDistribution {}

#[cfg(test)]
mod tests {
	use super::*;

	fn words(distribution: &NextWordDistribution) -> Vec<(&str, u64)> {
		distribution.iter().collect()
	}

	#[test]
	fn add_word_counts_and_keeps_first_seen_order() {
		let mut distribution = NextWordDistribution::new();
		for word in ["fox", "dog", "fox", "cat", "dog", "fox"] {
			distribution.add_word(word).unwrap();
		}
		assert_eq!(words(&distribution), vec![("fox", 3), ("dog", 2), ("cat", 1)]);
		assert_eq!(distribution.total(), 6);
		assert_eq!(distribution.count("dog"), Some(2));
		assert_eq!(distribution.count("owl"), None);
	}

	#[test]
	fn merge_sums_and_appends() {
		let mut left = NextWordDistribution::new();
		left.add_word("a").unwrap();
		left.add_word("b").unwrap();

		let mut right = NextWordDistribution::new();
		right.add_word("c").unwrap();
		right.add_word("a").unwrap();
		right.add_word("a").unwrap();

		left.merge(&right).unwrap();
		assert_eq!(words(&left), vec![("a", 3), ("b", 1), ("c", 1)]);
	}

	#[test]
	fn equality_is_order_sensitive() {
		let mut left = NextWordDistribution::new();
		left.add_word("x").unwrap();
		left.add_word("y").unwrap();

		let mut right = NextWordDistribution::new();
		right.add_word("y").unwrap();
		right.add_word("x").unwrap();

		assert_ne!(left, right);
	}

	#[test]
	fn overflowing_count_is_refused() {
		let mut distribution = NextWordDistribution::new();
		distribution.add_count("b", u64::MAX).unwrap();
		assert!(matches!(distribution.add_word("c"), Err(ChainError::CountOverflow)));
		assert!(matches!(distribution.add_word("b"), Err(ChainError::CountOverflow)));
		assert_eq!(words(&distribution), vec![("b", u64::MAX)]);
		assert_eq!(distribution.total(), u64::MAX);
	}

	#[test]
	fn overflowing_merge_leaves_distribution_untouched() {
		let mut loaded = NextWordDistribution::new();
		loaded.add_count("b", u64::MAX - 1).unwrap();

		let mut more = NextWordDistribution::new();
		more.add_word("c").unwrap();
		more.add_word("b").unwrap();

		assert!(matches!(loaded.merge(&more), Err(ChainError::CountOverflow)));
		assert_eq!(words(&loaded), vec![("b", u64::MAX - 1)]);
	}
}
