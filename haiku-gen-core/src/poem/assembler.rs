use std::fmt;

use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::{PoemError, Result};
use crate::lexicon::pattern::SentencePattern;
use crate::lexicon::template_builder::TemplateBuilder;
use crate::model::line_builder::{Line, LineBuilder};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoemKind {
	Haiku,
	Freeform,
}

/// A generated poem, one rendered string per line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poem {
	kind: PoemKind,
	lines: Vec<String>,
}

impl Poem {
	pub fn kind(&self) -> PoemKind {
		self.kind
	}

	pub fn lines(&self) -> &[String] {
		&self.lines
	}
}

impl fmt::Display for Poem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.lines.join("\n"))
	}
}

/// Writes a haiku whose lines follow `form` (usually 5-7-5).
///
/// The start word opens the first line and its syllables count against the
/// first budget. Each following line continues the chain from the last word
/// of the line before it, so the poem reads as one walk cut at syllable
/// checkpoints.
///
/// # Errors
/// - `UnknownStartWord` if the word is missing from either table
/// - `InvalidStartWord` if the word alone fills the first line
/// - `GenerationExhausted` if a line cannot be completed
pub fn write_haiku<R: Rng + ?Sized>(builder: &LineBuilder<'_>, start_word: &str, form: &[u32], rng: &mut R) -> Result<Poem> {
	let start = start_word.trim().to_lowercase();
	let (&first_budget, rest) = form
		.split_first()
		.ok_or_else(|| PoemError::InvalidConfig("haiku_form needs at least one line".to_owned()))?;

	let start_syllables = match builder.syllables().get(&start) {
		Some(syllables) if builder.successors().contains(&start) => syllables,
		_ => return Err(PoemError::UnknownStartWord(start)),
	};
	if start_syllables >= first_budget {
		return Err(PoemError::InvalidStartWord { word: start, syllables: start_syllables, budget: first_budget });
	}

	let mut first = Line::new();
	first.push(&start, start_syllables);
	first.extend(builder.write_line(&start, first_budget - start_syllables, rng)?);
	debug!("haiku line 1 from '{start}': {} syllables", first.syllables());

	let mut previous = first.last_word().unwrap_or(&start).to_owned();
	let mut lines = vec![first.to_string()];
	for &budget in rest {
		let line = builder.write_line(&previous, budget, rng)?;
		if let Some(word) = line.last_word() {
			previous = word.to_owned();
		}
		lines.push(line.to_string());
	}

	Ok(Poem { kind: PoemKind::Haiku, lines })
}

/// Writes `num_lines` independent lines, each from a randomly drawn pattern.
///
/// # Errors
/// - `InvalidLineCount` if `num_lines` is 0 or above `max_lines`
/// - `NoTemplates` if `patterns` is empty
/// - `UnknownTheme` if the theme is not in the theme table
/// - any template error from `TemplateBuilder::build_line`
pub fn write_freeform<R: Rng + ?Sized>(
	builder: &TemplateBuilder<'_>,
	patterns: &[SentencePattern],
	theme: &str,
	num_lines: usize,
	max_lines: usize,
	rng: &mut R,
) -> Result<Poem> {
	if num_lines == 0 || num_lines > max_lines {
		return Err(PoemError::InvalidLineCount(num_lines));
	}
	if !builder.has_theme(theme) {
		return Err(PoemError::UnknownTheme(theme.to_owned()));
	}

	let mut lines = Vec::new();
	for _ in 0..num_lines {
		let pattern = patterns.choose(rng).ok_or(PoemError::NoTemplates)?;
		lines.push(builder.build_line(pattern, theme, rng)?);
	}

	Ok(Poem { kind: PoemKind::Freeform, lines })
}
