use std::collections::BTreeMap;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io::{read_binary, read_text, write_binary};

/// Theme name → concrete nouns for that theme.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ThemeTable {
	themes: BTreeMap<String, Vec<String>>,
}

impl ThemeTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads a table from its binary form.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let table: Self = read_binary(&path)?;
		info!("loaded {} themes from {}", table.len(), path.as_ref().display());
		Ok(table)
	}

	/// Writes the table in its binary form.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		write_binary(self, path)
	}

	/// Parses a theme list, one `theme: noun, noun, ...` per line.
	///
	/// Blank lines and `#` comments are ignored. A theme named twice
	/// accumulates both lists.
	pub fn from_text(text: &str) -> Self {
		let mut table = Self::new();
		for (number, line) in text.lines().enumerate() {
			let line = line.trim();
			if line.is_empty() || line.starts_with('#') {
				continue;
			}
			let Some((theme, nouns)) = line.split_once(':') else {
				warn!("theme list line {} has no ':' separator, skipped", number + 1);
				continue;
			};

			let entry = table.themes.entry(theme.trim().to_owned()).or_default();
			entry.extend(
				nouns
					.split(',')
					.map(str::trim)
					.filter(|noun| !noun.is_empty())
					.map(str::to_owned),
			);
		}
		table
	}

	/// Parses a theme list file.
	pub fn from_text_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		Ok(Self::from_text(&read_text(path)?))
	}

	/// Nouns of `theme`, or `None` if the theme is unknown.
	pub fn get(&self, theme: &str) -> Option<&[String]> {
		self.themes.get(theme).map(Vec::as_slice)
	}

	pub fn contains(&self, theme: &str) -> bool {
		self.themes.contains_key(theme)
	}

	/// Theme names, in sorted order.
	pub fn themes(&self) -> impl Iterator<Item = &str> {
		self.themes.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.themes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.themes.is_empty()
	}
}

impl<T: Into<String>, S: AsRef<str>> FromIterator<(T, Vec<S>)> for ThemeTable {
	fn from_iter<I: IntoIterator<Item = (T, Vec<S>)>>(iter: I) -> Self {
		let mut table = Self::new();
		for (theme, nouns) in iter {
			let entry = table.themes.entry(theme.into()).or_default();
			entry.extend(nouns.iter().map(|noun| noun.as_ref().to_owned()));
		}
		table
	}
}
