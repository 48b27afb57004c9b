//! Top-level module for the word chain engine.
//!
//! This module provides:
//! - Text normalization into lowercase words (`normalizer`)
//! - The prefix → next-word table and n-gram windows (`chain_table`)
//! - Ordered next-word counts (`distribution`)
//! - Count-weighted word choice (`sampler`)
//! - The sliding-window walk (`generator`) and its input (`generation_input`)
//! - A high-level trainable model (`text_model`)

/// Raw text to lowercase alphabetic tokens.
pub mod normalizer;

/// N-gram windows and the prefix table they are folded into.
///
/// Handles training, merging, and uniform prefix selection.
pub mod chain_table;

/// Ordered mapping from next word to occurrence count.
pub mod distribution;

/// Weighted random selection with first-seen tie-break.
pub mod sampler;

/// Generation state machine over a chain table.
pub mod generator;

/// Generation parameters: length and start seed.
pub mod generation_input;

/// Trainable model owning a table and a random source.
///
/// Exposes `train`, `generate`, `save`, `load` and `trained_data`.
pub mod text_model;
