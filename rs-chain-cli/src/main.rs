//! Command-line front end for `rs-chain-core`.
//!
//! Trains a word chain from text, saves and loads it, and generates text
//! from a saved model.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use log::{LevelFilter, debug};
use rs_chain_core::model::generation_input::DEFAULT_LENGTH;
use rs_chain_core::{ChainTable, Result, TextModel};

/// File used as the working model when `--model` is not given.
const DEFAULT_MODEL: &str = "trained_model.txt";

/// Train a word chain on text and generate new text from it.
#[derive(Parser, Debug)]
#[command(name = "rs-chain", version, about)]
struct Cli {
	/// Chain order: number of words in an n-gram (prefix is n-1 words).
	#[arg(long, global = true, default_value_t = 2)]
	order: usize,

	/// Working model file read by `train`/`save` and written by `train`.
	#[arg(long, global = true, default_value = DEFAULT_MODEL)]
	model: PathBuf,

	/// PRNG seed for reproducible output.
	#[arg(long, global = true)]
	seed: Option<u64>,

	/// Log debug information on stderr.
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Train on the given words and save the working model.
	Train {
		#[arg(required = true, num_args = 1..)]
		text: Vec<String>,
	},

	/// Train on the content of a text file and save the working model.
	TrainFile { path: PathBuf },

	/// Load a model and generate text from a start word.
	Generate {
		model_source: PathBuf,
		start: String,
		#[arg(default_value_t = DEFAULT_LENGTH)]
		length: usize,
	},

	/// Write the working model to another file.
	Save { destination: PathBuf },

	/// Load a model and print its content.
	Load { source: PathBuf },
}

fn main() -> ExitCode {
	let cli = match Cli::try_parse() {
		Ok(cli) => cli,
		Err(e) => {
			let _ = e.print();
			return match e.kind() {
				ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
				_ => ExitCode::from(1),
			};
		}
	};

	init_logger(cli.verbose);

	match run(cli) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("Error: {e}");
			ExitCode::from(1)
		}
	}
}

fn init_logger(verbose: bool) {
	let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
	if verbose {
		builder.filter_level(LevelFilter::Debug);
	}
	builder.init();
}

fn run(cli: Cli) -> Result<()> {
	let mut model = match cli.seed {
		Some(seed) => TextModel::with_seed(cli.order, seed)?,
		None => TextModel::with_entropy(cli.order)?,
	};
	let stdout = io::stdout();
	let mut out = stdout.lock();

	match cli.command {
		Command::Train { text } => {
			load_if_present(&mut model, &cli.model)?;
			model.train(&text.join(" "))?;
			model.save(&cli.model)?;
			print_line(&mut out, &format!("Model trained and saved to {}.", cli.model.display()));
		}
		Command::TrainFile { path } => {
			load_if_present(&mut model, &cli.model)?;
			let added = model.train_file(&path)?;
			model.save(&cli.model)?;
			print_line(&mut out, &format!("Learned {added} n-grams from {}, saved to {}.", path.display(), cli.model.display()));
		}
		Command::Generate { model_source, start, length } => {
			model.load(&model_source)?;
			print_line(&mut out, &model.generate(length, Some(start.as_str()))?);
		}
		Command::Save { destination } => {
			load_if_present(&mut model, &cli.model)?;
			model.save(&destination)?;
			print_line(&mut out, &format!("Model saved to {}.", destination.display()));
		}
		Command::Load { source } => {
			model.load(&source)?;
			print_line(&mut out, &format!("Model loaded from {}.", source.display()));
			print_line(&mut out, dump(model.trained_data()).trim_end());
		}
	}
	Ok(())
}

/// Continues from the working model when it already exists.
fn load_if_present<P: AsRef<Path>>(model: &mut TextModel, path: P) -> Result<()> {
	let path = path.as_ref();
	if path.exists() {
		debug!("continuing from {}", path.display());
		model.load(path)?;
	}
	Ok(())
}

/// Human-readable listing: one prefix per line with its next words in
/// first-seen order.
fn dump(table: &ChainTable) -> String {
	let mut listing = format!("{} prefixes, {} n-grams\n", table.len(), table.total_observations());
	for (prefix, distribution) in table.iter() {
		let next: Vec<String> = distribution.iter().map(|(word, count)| format!("{word} ({count})")).collect();
		listing.push_str(&format!("{prefix} -> {}\n", next.join(", ")));
	}
	listing
}

// Closed pipes are not worth an error exit
fn print_line(out: &mut impl Write, line: &str) {
	let _ = writeln!(out, "{line}");
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dump_lists_prefixes_in_order() {
		let mut model = TextModel::with_seed(2, 0).unwrap();
		model.train("a b a c").unwrap();
		assert_eq!(dump(model.trained_data()), "2 prefixes, 3 n-grams\na -> b (1), c (1)\nb -> a (1)\n");
	}

	#[test]
	fn generate_length_defaults() {
		let cli = Cli::try_parse_from(["rs-chain", "generate", "model.bin", "the"]).unwrap();
		match cli.command {
			Command::Generate { length, .. } => assert_eq!(length, DEFAULT_LENGTH),
			other => panic!("unexpected {other:?}"),
		}
	}

	#[test]
	fn global_flags_after_subcommand() {
		let cli = Cli::try_parse_from(["rs-chain", "train", "hello", "world", "--order", "3", "--seed", "4"]).unwrap();
		assert_eq!(cli.order, 3);
		assert_eq!(cli.seed, Some(4));
	}

	#[test]
	fn missing_arguments_are_rejected() {
		assert!(Cli::try_parse_from(["rs-chain", "train"]).is_err());
		assert!(Cli::try_parse_from(["rs-chain", "generate", "model.bin"]).is_err());
		assert!(Cli::try_parse_from(["rs-chain", "save"]).is_err());
		assert!(Cli::try_parse_from(["rs-chain"]).is_err());
	}
}
