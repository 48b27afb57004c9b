//! Word-level n-gram chain library.
//!
//! This crate builds a statistical next-word predictor from a corpus and
//! uses it to synthesize text by weighted random walk:
//! - Corpus normalization and n-gram extraction
//! - Prefix → next-word frequency tables, cumulative across training calls
//! - Count-weighted sampling with a caller-supplied random source
//! - Sliding-window generation of bounded length
//! - Validated, order-preserving binary persistence
//!
//! ```no_run
//! use rs_chain_core::TextModel;
//!
//! let mut model = TextModel::with_seed(2, 42)?;
//! model.train("the cat sat on the mat")?;
//! println!("{}", model.generate(10, Some("the"))?);
//! model.save("trained_model.txt")?;
//! # Ok::<(), rs_chain_core::ChainError>(())
//! ```

/// Chain table, sampling and generation.
pub mod model;

/// Persistence of chain tables.
pub mod store;

/// Error type shared by the whole crate.
pub mod error;

/// File read/write helpers.
///
/// Not exposed
pub(crate) mod io;

pub use error::{ChainError, Result};
pub use model::chain_table::ChainTable;
pub use model::distribution::NextWordDistribution;
pub use model::generation_input::{GenerationInput, StartSeed};
pub use model::text_model::TextModel;
