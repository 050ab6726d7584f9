use rand::Rng;
use rand::seq::IndexedRandom;

use super::pattern::{Segment, SentencePattern, THEME_TAG};
use super::pos_table::PosTable;
use super::theme_table::ThemeTable;
use crate::error::{PoemError, Result};
use crate::model::line_builder::capitalize;

/// Fills sentence patterns with words from the lexicon.
///
/// Each placeholder gets one word drawn uniformly from its candidate list:
/// the theme's nouns for `[N]`, the part-of-speech list otherwise.
#[derive(Clone, Copy, Debug)]
pub struct TemplateBuilder<'a> {
	parts_of_speech: &'a PosTable,
	themes: &'a ThemeTable,
}

impl<'a> TemplateBuilder<'a> {
	pub fn new(parts_of_speech: &'a PosTable, themes: &'a ThemeTable) -> Self {
		Self { parts_of_speech, themes }
	}

	pub fn has_theme(&self, theme: &str) -> bool {
		self.themes.contains(theme)
	}

	/// Candidate list behind `tag` for the given theme.
	fn candidates(&self, tag: char, theme: &str) -> Result<&'a [String]> {
		let candidates = if tag == THEME_TAG {
			self.themes.get(theme).ok_or_else(|| PoemError::UnknownTheme(theme.to_owned()))?
		} else {
			self.parts_of_speech.get(tag).ok_or(PoemError::UnknownTag(tag))?
		};

		if candidates.is_empty() {
			return Err(PoemError::EmptyCandidateList(tag));
		}
		Ok(candidates)
	}

	/// Rewrites `pattern` into a line of verse.
	///
	/// Every placeholder is resolved before anything is substituted, so an
	/// unknown tag or an empty list fails the whole line. The result is
	/// trimmed and its first character uppercased.
	///
	/// # Errors
	/// `UnknownTheme`, `UnknownTag` or `EmptyCandidateList`.
	pub fn build_line<R: Rng + ?Sized>(&self, pattern: &SentencePattern, theme: &str, rng: &mut R) -> Result<String> {
		for tag in pattern.tags() {
			self.candidates(tag, theme)?;
		}

		let mut line = String::with_capacity(pattern.source().len() * 2);
		for segment in pattern.segments() {
			match segment {
				Segment::Literal(text) => line.push_str(text),
				Segment::Placeholder(tag) => {
					let words = self.candidates(*tag, theme)?;
					let word = words.choose(rng).ok_or(PoemError::EmptyCandidateList(*tag))?;
					line.push_str(word);
				}
			}
		}

		Ok(capitalize(line.trim()))
	}
}
