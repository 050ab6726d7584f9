use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::{debug, info, warn};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::{PoemError, Result};
use crate::io::{build_output_path, get_filename, is_up_to_date, read_binary, read_text, write_binary};

/// Word assumed to precede the first word of every corpus.
pub const SEED_WORD: &str = "the";

/// Extension of the cached binary form written next to a corpus.
pub const CACHE_EXTENSION: &str = "chain";

/// Successors of a single word, keyed by the next word.
///
/// The value is how many times that pair was observed. Ordered so that a
/// seeded generator walks the chain the same way on every run.
pub type SuccessorWeights = BTreeMap<String, u32>;

/// Word-adjacency statistics learned from a sample text.
///
/// Conceptually, this is a Markov chain over words where outgoing edges are
/// weighted by their number of observations.
///
/// ## Invariants
/// - Every key was seen as a "previous word" and has at least one successor
/// - Every count is strictly positive
/// - Words are stored lowercased
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SuccessorTable {
	successors: HashMap<String, SuccessorWeights>,
}

impl SuccessorTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a table from an in-memory text.
	///
	/// Words are split on whitespace and lowercased; line breaks do not break
	/// the chain. The first word is recorded as a successor of `SEED_WORD`.
	///
	/// # Errors
	/// Returns `EmptyCorpus` if the text contains no words.
	pub fn from_text(text: &str) -> Result<Self> {
		let words: Vec<String> = normalize_words(text.split_whitespace());
		if words.is_empty() {
			return Err(PoemError::EmptyCorpus);
		}

		let mut table = Self::new();
		table.add_words(SEED_WORD, &words);
		Ok(table)
	}

	/// Builds a table from a corpus file, splitting the work across threads.
	///
	/// The word list is cut into chunks (CPU cores * factor). Each chunk is
	/// counted on its own thread, seeded with the last word of the chunk
	/// before it, and the partial tables are merged. The result is the same
	/// as a single sequential pass.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let text = read_text(&path)?;
		let words: Vec<String> = normalize_words(text.split_whitespace());
		if words.is_empty() {
			return Err(PoemError::EmptyCorpus);
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = words.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		for (index, chunk) in words.chunks(chunk_size).enumerate() {
			let tx = tx.clone();
			let seed = if index == 0 {
				SEED_WORD.to_owned()
			} else {
				words[index * chunk_size - 1].clone()
			};
			let chunk: Vec<String> = chunk.to_vec();

			thread::spawn(move || {
				let mut partial = SuccessorTable::new();
				partial.add_words(&seed, &chunk);
				// The receiver outlives every sender
				let _ = tx.send(partial);
			});
		}
		drop(tx);

		let mut table = SuccessorTable::new();
		for partial in rx.iter() {
			table.merge(&partial);
		}

		info!(
			"learned {} words ({} distinct predecessors) from {}",
			words.len(),
			table.len(),
			path.as_ref().display()
		);
		Ok(table)
	}

	/// Loads a corpus, reusing the cached binary table next to it when present.
	///
	/// `data/shakespeare.txt` is cached as `data/shakespeare.chain`. The cache
	/// is used only when it is newer than the corpus; otherwise the table is
	/// built with `from_file` and the cache rewritten. A corpus whose own
	/// extension is the cache extension is never cached. Failing to read or
	/// write the cache only costs a rebuild.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let cache_path = build_output_path(path, CACHE_EXTENSION)?;
		if cache_path == path {
			debug!("{} has the cache extension, building without cache", path.display());
			return Self::from_file(path);
		}

		if is_up_to_date(path, &cache_path) {
			match read_binary(&cache_path) {
				Ok(table) => {
					debug!("using cached chain {}", cache_path.display());
					return Ok(table);
				}
				Err(e) => warn!("ignoring unreadable cache {}: {e}", cache_path.display()),
			}
		}

		let table = Self::from_file(path)?;
		match write_binary(&table, &cache_path) {
			Ok(()) => debug!("cached chain for '{}' at {}", get_filename(path)?, cache_path.display()),
			Err(e) => warn!("could not write cache {}: {e}", cache_path.display()),
		}
		Ok(table)
	}

	/// Records one occurrence of `next` following `previous`.
	pub fn add_transition(&mut self, previous: &str, next: &str) {
		self.add_transitions(previous, next, 1);
	}

	/// Records `count` occurrences of `next` following `previous`.
	///
	/// A count of zero is ignored so the table never holds empty weights.
	pub fn add_transitions(&mut self, previous: &str, next: &str, count: u32) {
		if count == 0 {
			return;
		}
		*self
			.successors
			.entry(previous.to_owned())
			.or_default()
			.entry(next.to_owned())
			.or_insert(0) += count;
	}

	/// Walks `words` in order, starting after `previous`.
	fn add_words(&mut self, previous: &str, words: &[String]) {
		let mut previous = previous;
		for word in words {
			self.add_transition(previous, word);
			previous = word;
		}
	}

	/// Merges another table into this one by summing counts.
	pub fn merge(&mut self, other: &Self) {
		for (previous, weights) in &other.successors {
			let entry = self.successors.entry(previous.clone()).or_default();
			for (next, count) in weights {
				*entry.entry(next.clone()).or_insert(0) += *count;
			}
		}
	}

	/// Returns the successors of `word`, if it was ever followed by anything.
	pub fn successors(&self, word: &str) -> Option<&SuccessorWeights> {
		self.successors.get(word)
	}

	/// Whether `word` has at least one recorded successor.
	pub fn contains(&self, word: &str) -> bool {
		self.successors.contains_key(word)
	}

	/// Number of distinct predecessor words.
	pub fn len(&self) -> usize {
		self.successors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.successors.is_empty()
	}

	/// Returns a random word that has successors.
	///
	/// Useful for suggesting a start word. Returns `None` if the table is empty.
	pub fn random_word<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		let mut words: Vec<&str> = self.successors.keys().map(String::as_str).collect();
		words.sort_unstable();
		words.choose(rng).copied()
	}
}

fn normalize_words<'a, I>(words: I) -> Vec<String>
where
	I: IntoIterator<Item = &'a str>,
{
	words.into_iter().map(str::to_lowercase).collect()
}
