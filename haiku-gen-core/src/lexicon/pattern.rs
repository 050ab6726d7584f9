use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::{info, warn};

use crate::error::{PoemError, Result};
use crate::io::read_file;

/// Tag of the placeholder filled from the theme table instead of the
/// part-of-speech table.
pub const THEME_TAG: char = 'N';

/// One piece of a sentence pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
	/// Text copied to the output as-is.
	Literal(String),
	/// A `[x]` placeholder with its one-character tag.
	Placeholder(char),
}

/// A fill-in-the-blank sentence skeleton such as `The [A] [N] [i].`
///
/// Parsed once into literal and placeholder segments. Placeholders are
/// exactly three characters: `[`, one tag character, `]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentencePattern {
	source: String,
	segments: Vec<Segment>,
}

impl SentencePattern {
	/// Tokenizes `source` into segments.
	///
	/// # Errors
	/// Returns `MalformedPlaceholder` for a `[` that is not followed by a
	/// single non-bracket, non-whitespace tag and a closing `]`.
	pub fn parse(source: &str) -> Result<Self> {
		let malformed = |position: usize| PoemError::MalformedPlaceholder { pattern: source.to_owned(), position };

		let mut segments = Vec::new();
		let mut literal = String::new();
		let mut chars = source.char_indices();

		while let Some((position, c)) = chars.next() {
			if c != '[' {
				literal.push(c);
				continue;
			}

			let tag = match chars.next() {
				Some((_, tag)) if tag != '[' && tag != ']' && !tag.is_whitespace() => tag,
				_ => return Err(malformed(position)),
			};
			match chars.next() {
				Some((_, ']')) => (),
				_ => return Err(malformed(position)),
			}

			if !literal.is_empty() {
				segments.push(Segment::Literal(std::mem::take(&mut literal)));
			}
			segments.push(Segment::Placeholder(tag));
		}

		if !literal.is_empty() {
			segments.push(Segment::Literal(literal));
		}

		Ok(Self { source: source.to_owned(), segments })
	}

	/// The text the pattern was parsed from.
	pub fn source(&self) -> &str {
		&self.source
	}

	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	/// Placeholder tags, left to right.
	pub fn tags(&self) -> impl Iterator<Item = char> + '_ {
		self.segments.iter().filter_map(|segment| match segment {
			Segment::Placeholder(tag) => Some(*tag),
			Segment::Literal(_) => None,
		})
	}

	/// Whether any placeholder asks for a theme noun.
	pub fn uses_theme(&self) -> bool {
		self.tags().any(|tag| tag == THEME_TAG)
	}
}

impl FromStr for SentencePattern {
	type Err = PoemError;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

impl fmt::Display for SentencePattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.source)
	}
}

/// Reads one sentence pattern per line.
///
/// Blank lines are skipped with a warning. A malformed placeholder fails the
/// whole load so a broken file is noticed at startup, not mid-poem.
pub fn load_patterns<P: AsRef<Path>>(path: P) -> Result<Vec<SentencePattern>> {
	let mut patterns = Vec::new();
	for (number, line) in read_file(&path)?.iter().enumerate() {
		if line.trim().is_empty() {
			warn!("{}:{} is blank, skipped", path.as_ref().display(), number + 1);
			continue;
		}
		patterns.push(SentencePattern::parse(line)?);
	}

	info!("loaded {} sentence patterns from {}", patterns.len(), path.as_ref().display());
	Ok(patterns)
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::*;

	#[test]
	fn splits_literals_and_placeholders() {
		let pattern = SentencePattern::parse("The [A] [N] [i].\n").unwrap();
		assert_eq!(
			pattern.segments(),
			&[
				Segment::Literal("The ".to_owned()),
				Segment::Placeholder('A'),
				Segment::Literal(" ".to_owned()),
				Segment::Placeholder('N'),
				Segment::Literal(" ".to_owned()),
				Segment::Placeholder('i'),
				Segment::Literal(".\n".to_owned()),
			]
		);
		assert_eq!(pattern.tags().collect::<String>(), "ANi");
		assert!(pattern.uses_theme());
	}

	#[test]
	fn adjacent_placeholders_and_punctuation_tags() {
		let pattern = SentencePattern::parse("[!][!], [r]").unwrap();
		assert_eq!(pattern.tags().collect::<String>(), "!!r");
		assert!(!pattern.uses_theme());
	}

	#[test]
	fn no_placeholders_is_one_literal() {
		let pattern: SentencePattern = "Silence.".parse().unwrap();
		assert_eq!(pattern.segments(), &[Segment::Literal("Silence.".to_owned())]);
	}

	#[test]
	fn malformed_placeholders_are_rejected() {
		for (source, expected) in [("The [A", 4), ("The [AB] sea", 4), ("[] sea", 0), ("a [ ] b", 2), ("x [[A]]", 2), ("[", 0)] {
			match SentencePattern::parse(source) {
				Err(PoemError::MalformedPlaceholder { position, .. }) => assert_eq!(position, expected, "{source:?}"),
				other => panic!("{source:?} should be malformed, got {other:?}"),
			}
		}
	}

	#[test]
	fn stray_closing_bracket_is_literal() {
		let pattern = SentencePattern::parse("a] [v]").unwrap();
		assert_eq!(pattern.segments()[0], Segment::Literal("a] ".to_owned()));
	}

	#[test]
	fn loads_patterns_and_skips_blank_lines() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("sentence_patterns.txt");
		fs::write(&path, "The [A] [N] [i].\n\n[D] [N] [t] [D] [a].\n").unwrap();

		let patterns = load_patterns(&path).unwrap();
		assert_eq!(patterns.len(), 2);
		assert_eq!(patterns[1].source(), "[D] [N] [t] [D] [a].");
	}

	#[test]
	fn malformed_line_fails_the_load() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("sentence_patterns.txt");
		fs::write(&path, "The [A] [N] [i].\nA [broken line\n").unwrap();

		assert!(matches!(load_patterns(&path), Err(PoemError::MalformedPlaceholder { .. })));
	}
}
