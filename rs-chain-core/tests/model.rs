//! End-to-end behaviour of `TextModel`: training, generation, persistence.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rs_chain_core::model::normalizer::normalize;
use rs_chain_core::{ChainError, ChainTable, GenerationInput, StartSeed, TextModel, store};

const FABLE: &str = "The quick brown fox jumps over the lazy dog.
A quick brown fox jumps over the lazy dog in the park.
In a faraway land, there lived a princess.
Once upon a time, in a kingdom far far away, there was a brave knight.
The knight fought against the dragon and saved the kingdom.";

fn trained(n: usize, seed: u64) -> TextModel {
	let mut model = TextModel::with_seed(n, seed).unwrap();
	model.train(FABLE).unwrap();
	model
}

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

#[test]
fn counts_are_conserved_per_prefix() {
	let tokens = normalize(FABLE);
	for n in 2..=4 {
		let model = trained(n, 0);
		for (prefix, distribution) in model.trained_data().iter() {
			let observed = tokens.windows(n).filter(|w| w[..n - 1].join(" ") == prefix).count() as u64;
			assert_eq!(distribution.total(), observed, "n={n} prefix={prefix}");
		}
	}
}

#[test]
fn repeated_training_doubles_counts() {
	let once = trained(2, 0);
	let mut twice = trained(2, 0);
	twice.train(FABLE).unwrap();

	for (prefix, distribution) in once.trained_data().iter() {
		let doubled = twice.trained_data().get(prefix).unwrap();
		for (word, count) in distribution.iter() {
			assert_eq!(doubled.count(word), Some(count * 2));
		}
	}
}

#[test]
fn alternating_corpus_table() {
	let mut model = TextModel::with_seed(2, 0).unwrap();
	model.train("a b a b a b").unwrap();
	let table = model.trained_data();
	assert_eq!(table.len(), 2);
	assert_eq!(table.get("a").unwrap().iter().collect::<Vec<_>>(), vec![("b", 3)]);
	assert_eq!(table.get("b").unwrap().iter().collect::<Vec<_>>(), vec![("a", 2)]);
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[test]
fn single_path_corpus_is_fully_determined() {
	let mut model = TextModel::with_seed(2, 1234).unwrap();
	model.train("a b a b a b").unwrap();
	assert_eq!(model.generate(4, Some("a")).unwrap(), "A b a b a");
}

#[test]
fn generation_respects_length_and_dead_ends() {
	let mut model = trained(2, 8);
	for length in [0, 1, 5, 40] {
		let text = model.generate(length, Some("the")).unwrap();
		let words: Vec<String> = normalize(&text);
		assert!(words.len() <= length + 1);
		assert_eq!(words[0], "the");

		// Stopping early means the last word has no continuation.
		if words.len() < length + 1 {
			assert!(!model.trained_data().contains(words.last().unwrap()));
		}
	}
}

#[test]
fn seeded_models_reproduce_text() {
	let input = GenerationInput::new(50, StartSeed::Random);
	let first = trained(3, 77).generate_with(&input).unwrap();
	let second = trained(3, 77).generate_with(&input).unwrap();
	assert_eq!(first, second);
}

#[test]
fn generation_uses_only_observed_transitions() {
	let mut model = trained(2, 3);
	let text = model.generate(200, None).unwrap();
	let words = normalize(&text);
	for pair in words.windows(2) {
		let distribution = model.trained_data().get(&pair[0]).unwrap();
		assert!(distribution.count(&pair[1]).is_some(), "{} -> {}", pair[0], pair[1]);
	}
}

#[test]
fn untrained_model_has_no_data() {
	let mut model = TextModel::with_seed(2, 0).unwrap();
	assert!(matches!(model.generate(4, Some("a")), Err(ChainError::NoData)));
}

#[test]
fn free_function_generation_with_injected_rng() {
	let model = trained(2, 0);
	let mut rng = StdRng::seed_from_u64(5);
	let input = GenerationInput::new(10, StartSeed::Custom("knight".to_owned()));
	let text = rs_chain_core::model::generator::generate(model.trained_data(), &input, &mut rng).unwrap();
	assert!(text.starts_with("Knight"));
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn save_load_round_trip_keeps_insertion_order() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("trained_model.txt");

	let model = trained(3, 0);
	model.save(&path).unwrap();

	let mut restored = TextModel::with_seed(3, 0).unwrap();
	restored.load(&path).unwrap();
	assert_eq!(restored.trained_data(), model.trained_data());

	let saved: Vec<Vec<(&str, u64)>> = model.trained_data().iter().map(|(_, d)| d.iter().collect()).collect();
	let reloaded: Vec<Vec<(&str, u64)>> = restored.trained_data().iter().map(|(_, d)| d.iter().collect()).collect();
	assert_eq!(saved, reloaded);
}

#[test]
fn loaded_model_keeps_training() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("model.bin");
	trained(2, 0).save(&path).unwrap();

	let mut model = TextModel::with_seed(2, 0).unwrap();
	model.load(&path).unwrap();
	let before = model.trained_data().total_observations();
	model.train("the dragon slept").unwrap();
	assert_eq!(model.trained_data().total_observations(), before + 2);
}

#[test]
fn scalar_file_is_corrupt_and_keeps_table() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("scalar.bin");
	std::fs::write(&path, postcard::to_stdvec(&12345u64).unwrap()).unwrap();

	let mut model = trained(2, 0);
	let before: ChainTable = model.trained_data().clone();
	assert!(matches!(model.load(&path), Err(ChainError::ModelCorrupt(_))));
	assert_eq!(model.trained_data(), &before);
	assert!(matches!(store::load(&path), Err(ChainError::ModelCorrupt(_))));
}

#[test]
fn save_to_unwritable_destination_is_storage_error() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("missing").join("model.bin");
	assert!(matches!(trained(2, 0).save(&path), Err(ChainError::Storage { .. })));
}
