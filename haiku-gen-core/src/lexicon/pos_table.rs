use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io::{read_binary, read_text, write_binary};

/// Separators found between a word and its tags in the Moby list.
const MOBY_SEPARATORS: [char; 3] = ['×', '\\', '\t'];

/// Part-of-speech tag → candidate words.
///
/// Tags are single characters (`A` adjective, `v` adverb, `i` intransitive
/// verb, ...). Word lists keep their insertion order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PosTable {
	words: BTreeMap<char, Vec<String>>,
}

impl PosTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads a table from its binary form.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let table: Self = read_binary(&path)?;
		info!("loaded {} part-of-speech tags from {}", table.words.len(), path.as_ref().display());
		Ok(table)
	}

	/// Writes the table in its binary form.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		write_binary(self, path)
	}

	/// Parses the Moby part-of-speech list.
	///
	/// Each line is a word, a separator (`×`, `\` or a tab) and a run of tag
	/// characters; the word is filed under every tag. Phrases containing
	/// spaces are skipped and a word is listed at most once per tag. The
	/// original distribution ends lines with a bare `\r`.
	pub fn from_moby(text: &str) -> Self {
		let mut table = Self::new();
		let mut seen: HashSet<(char, String)> = HashSet::new();

		for line in text.split(['\n', '\r']) {
			let Some((word, tags)) = line.split_once(MOBY_SEPARATORS) else { continue };
			let word = word.trim();
			if word.is_empty() || word.contains(' ') {
				continue;
			}
			for tag in tags.trim().chars() {
				if seen.insert((tag, word.to_owned())) {
					table.insert(tag, word);
				}
			}
		}
		table
	}

	/// Parses a Moby part-of-speech file (UTF-8 or Latin-1).
	pub fn from_moby_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		Ok(Self::from_moby(&read_text(path)?))
	}

	/// Appends `word` to the candidates of `tag`.
	pub fn insert(&mut self, tag: char, word: &str) {
		self.words.entry(tag).or_default().push(word.to_owned());
	}

	/// Candidates for `tag`, or `None` if the tag is unknown.
	pub fn get(&self, tag: char) -> Option<&[String]> {
		self.words.get(&tag).map(Vec::as_slice)
	}

	/// Known tags, in sorted order.
	pub fn tags(&self) -> impl Iterator<Item = char> + '_ {
		self.words.keys().copied()
	}
}

impl<S: AsRef<str>> FromIterator<(char, Vec<S>)> for PosTable {
	fn from_iter<I: IntoIterator<Item = (char, Vec<S>)>>(iter: I) -> Self {
		let mut table = Self::new();
		for (tag, words) in iter {
			// Keep explicitly empty lists so lookups can tell them from unknown tags
			let entry = table.words.entry(tag).or_default();
			entry.extend(words.iter().map(|word| word.as_ref().to_owned()));
		}
		table
	}
}
