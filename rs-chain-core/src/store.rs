//! Persistence of a [`ChainTable`].
//!
//! The table is written with `postcard` as a versioned record:
//! a magic tag, a format version, then every prefix with its ordered
//! `(word, count)` list. Decoding validates the whole record before building
//! the table, so a bad stream never yields a partially filled one.

use std::collections::HashSet;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ChainError, Result};
use crate::io::{read_bytes, write_file};
use crate::model::chain_table::ChainTable;
use crate::model::distribution::NextWordDistribution;

/// Tag identifying a persisted chain.
pub const MAGIC: [u8; 4] = *b"RSCH";

/// Current format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ModelFile {
	magic: [u8; 4],
	version: u32,
	entries: Vec<PrefixRecord>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct PrefixRecord {
	prefix: String,
	next: Vec<WordCount>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct WordCount {
	word: String,
	count: u64,
}

/// Serializes `table` into bytes.
///
/// Prefix order and per-prefix word order are kept as in memory.
///
/// # Errors
/// Returns [`ChainError::Encode`] if `postcard` rejects the record.
pub fn encode(table: &ChainTable) -> Result<Vec<u8>> {
	let file = ModelFile {
		magic: MAGIC,
		version: FORMAT_VERSION,
		entries: table
			.iter()
			.map(|(prefix, distribution)| PrefixRecord {
				prefix: prefix.to_owned(),
				next: distribution
					.iter()
					.map(|(word, count)| WordCount { word: word.to_owned(), count })
					.collect(),
			})
			.collect(),
	};
	postcard::to_stdvec(&file).map_err(|e| ChainError::Encode(e.to_string()))
}

/// Rebuilds a table from bytes produced by [`encode`].
///
/// # Errors
/// Returns [`ChainError::ModelCorrupt`] when the bytes do not decode, carry
/// the wrong tag or version, have trailing data, or describe an impossible
/// table (empty or duplicate prefix, prefix with an empty word, empty
/// distribution, empty or duplicate word, zero count, counts whose sum
/// overflows `u64`).
pub fn decode(bytes: &[u8]) -> Result<ChainTable> {
	let (file, rest): (ModelFile, &[u8]) =
		postcard::take_from_bytes(bytes).map_err(|e| ChainError::ModelCorrupt(e.to_string()))?;

	if file.magic != MAGIC {
		return Err(ChainError::ModelCorrupt("not a chain model".to_owned()));
	}
	if file.version != FORMAT_VERSION {
		return Err(ChainError::ModelCorrupt(format!("unsupported format version {}", file.version)));
	}
	if !rest.is_empty() {
		return Err(ChainError::ModelCorrupt(format!("{} trailing bytes", rest.len())));
	}

	let mut table = ChainTable::new();
	for record in file.entries {
		let distribution = build_distribution(&record)?;
		// Covers "", " a", "a  b" and "a "
		if record.prefix.split(' ').any(str::is_empty) {
			return Err(ChainError::ModelCorrupt(format!("malformed prefix '{}'", record.prefix)));
		}
		if !table.insert(record.prefix.clone(), distribution) {
			return Err(ChainError::ModelCorrupt(format!("duplicate prefix '{}'", record.prefix)));
		}
	}
	Ok(table)
}

fn build_distribution(record: &PrefixRecord) -> Result<NextWordDistribution> {
	if record.next.is_empty() {
		return Err(ChainError::ModelCorrupt(format!("prefix '{}' has no next word", record.prefix)));
	}

	let mut seen = HashSet::new();
	let mut distribution = NextWordDistribution::new();
	for WordCount { word, count } in &record.next {
		if word.is_empty() || *count == 0 {
			return Err(ChainError::ModelCorrupt(format!("bad entry under prefix '{}'", record.prefix)));
		}
		if !seen.insert(word.as_str()) {
			return Err(ChainError::ModelCorrupt(format!("duplicate word '{word}' under prefix '{}'", record.prefix)));
		}
		distribution
			.add_count(word, *count)
			.map_err(|_| ChainError::ModelCorrupt(format!("counts under prefix '{}' overflow", record.prefix)))?;
	}
	Ok(distribution)
}

/// Writes `table` to `destination`, replacing whatever was there.
pub fn save<P: AsRef<Path>>(table: &ChainTable, destination: P) -> Result<()> {
	let bytes = encode(table)?;
	write_file(&destination, &bytes)?;
	debug!("saved {} prefixes ({} bytes) to {}", table.len(), bytes.len(), destination.as_ref().display());
	Ok(())
}

/// Reads and decodes the table stored at `source`.
///
/// # Errors
/// - [`ChainError::Storage`] if the file cannot be read.
/// - [`ChainError::ModelCorrupt`] if its content is not a valid model.
pub fn load<P: AsRef<Path>>(source: P) -> Result<ChainTable> {
	let bytes = read_bytes(&source)?;
	let table = decode(&bytes)?;
	debug!("loaded {} prefixes from {}", table.len(), source.as_ref().display());
	Ok(table)
}
