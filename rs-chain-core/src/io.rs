use std::fs;
use std::path::Path;

use crate::error::{ChainError, Result};

/// Reads a whole text file into memory.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> Result<String> {
	let path = filename.as_ref();
	fs::read_to_string(path).map_err(|source| ChainError::Storage { path: path.to_path_buf(), source })
}

/// Reads a whole file as raw bytes.
pub(crate) fn read_bytes<P: AsRef<Path>>(filename: P) -> Result<Vec<u8>> {
	let path = filename.as_ref();
	fs::read(path).map_err(|source| ChainError::Storage { path: path.to_path_buf(), source })
}

/// Writes `bytes` to `filename`, replacing any previous content.
pub(crate) fn write_file<P: AsRef<Path>>(filename: P, bytes: &[u8]) -> Result<()> {
	let path = filename.as_ref();
	fs::write(path, bytes).map_err(|source| ChainError::Storage { path: path.to_path_buf(), source })
}
