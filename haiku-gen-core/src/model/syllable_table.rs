use std::collections::HashMap;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io::{read_binary, read_text, write_binary};

/// Word → syllable count lookup.
///
/// Loaded once and shared read-only by every line builder. Keys are
/// lowercase. A missing word is reported as `None`, never as a count of 0.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SyllableTable {
	counts: HashMap<String, u32>,
}

impl SyllableTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads a table from its binary form.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let table: Self = read_binary(&path)?;
		info!("loaded {} syllable counts from {}", table.len(), path.as_ref().display());
		Ok(table)
	}

	/// Writes the table in its binary form.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		write_binary(self, path)
	}

	/// Parses the CMU pronouncing dictionary.
	///
	/// Each line is `WORD  PH0 NE1 MES`; a syllable is a phoneme carrying a
	/// stress digit. `;;;` comment lines are skipped and alternate
	/// pronunciations (`WORD(1)`) never override the first one.
	pub fn from_cmudict(text: &str) -> Self {
		let mut table = Self::new();
		for line in text.lines() {
			if line.starts_with(";;;") {
				continue;
			}
			let mut fields = line.split_whitespace();
			let Some(word) = fields.next() else { continue };
			let word = match word.find('(') {
				Some(index) if word.ends_with(')') && index > 0 => &word[..index],
				_ => word,
			};

			let syllables = fields
				.filter(|phoneme| phoneme.ends_with(|c: char| c.is_ascii_digit()))
				.count() as u32;
			table.counts.entry(word.to_lowercase()).or_insert(syllables);
		}
		table
	}

	/// Parses a CMU pronouncing dictionary file.
	pub fn from_cmudict_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		Ok(Self::from_cmudict(&read_text(path)?))
	}

	/// Sets the syllable count of `word`.
	pub fn insert(&mut self, word: &str, syllables: u32) {
		self.counts.insert(word.to_lowercase(), syllables);
	}

	/// Returns the syllable count of `word`, or `None` if the word is unknown.
	pub fn get(&self, word: &str) -> Option<u32> {
		self.counts.get(word).copied()
	}

	pub fn contains(&self, word: &str) -> bool {
		self.counts.contains_key(word)
	}

	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}
}

impl<S: AsRef<str>> FromIterator<(S, u32)> for SyllableTable {
	fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
		let mut table = Self::new();
		for (word, syllables) in iter {
			table.insert(word.as_ref(), syllables);
		}
		table
	}
}
