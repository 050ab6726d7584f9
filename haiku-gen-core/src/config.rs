use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PoemError, Result};

/// Default ceiling on whole-line restarts before giving up.
pub const DEFAULT_MAX_LINE_ATTEMPTS: usize = 1000;

/// Default ceiling on the number of lines of a freeform poem.
pub const DEFAULT_MAX_LINE_COUNT: usize = 100;

/// Syllable budgets of a classic haiku.
pub const HAIKU_FORM: [u32; 3] = [5, 7, 5];

/// What happens to a successor that was drawn but did not fit the line.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RejectionPolicy {
	/// The candidate leaves the pool for the rest of the step.
	#[default]
	Eliminate,
	/// One occurrence is removed per rejection, so a frequent successor can
	/// be drawn and rejected several times before it disappears.
	DecayOccurrence,
}

/// Generation parameters shared by the assemblers.
///
/// # Invariants
/// - `max_line_attempts >= 1`
/// - `haiku_form` is non-empty and every budget is >= 1
/// - `1 <= default_line_count <= max_line_count`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationConfig {
	/// How many times a line is restarted from its start word.
	max_line_attempts: usize,

	/// Rejection behavior of the syllable-budgeted search.
	pub rejection: RejectionPolicy,

	/// Syllable budget of each haiku line.
	haiku_form: Vec<u32>,

	/// Number of freeform lines when the caller does not ask for a count.
	default_line_count: usize,

	/// Largest freeform line count a caller may ask for.
	max_line_count: usize,
}

impl Default for GenerationConfig {
	fn default() -> Self {
		Self {
			max_line_attempts: DEFAULT_MAX_LINE_ATTEMPTS,
			rejection: RejectionPolicy::default(),
			haiku_form: HAIKU_FORM.to_vec(),
			default_line_count: 4,
			max_line_count: DEFAULT_MAX_LINE_COUNT,
		}
	}
}

impl GenerationConfig {
	pub fn max_line_attempts(&self) -> usize {
		self.max_line_attempts
	}

	pub fn haiku_form(&self) -> &[u32] {
		&self.haiku_form
	}

	pub fn default_line_count(&self) -> usize {
		self.default_line_count
	}

	pub fn max_line_count(&self) -> usize {
		self.max_line_count
	}

	/// Sets the restart ceiling.
	///
	/// # Errors
	/// Returns an error if `attempts` is 0.
	pub fn set_max_line_attempts(&mut self, attempts: usize) -> Result<()> {
		if attempts == 0 {
			return Err(PoemError::InvalidConfig("max_line_attempts must be at least 1".to_owned()));
		}
		self.max_line_attempts = attempts;
		Ok(())
	}

	/// Sets the syllable budget of each haiku line.
	///
	/// # Errors
	/// Returns an error if the form is empty or contains a zero budget.
	pub fn set_haiku_form(&mut self, form: Vec<u32>) -> Result<()> {
		if form.is_empty() {
			return Err(PoemError::InvalidConfig("haiku_form needs at least one line".to_owned()));
		}
		if form.contains(&0) {
			return Err(PoemError::InvalidConfig(format!("haiku_form budgets must be positive, got {form:?}")));
		}
		self.haiku_form = form;
		Ok(())
	}

	/// Sets the default freeform line count.
	///
	/// # Errors
	/// Returns an error if `count` is 0 or above `max_line_count`.
	pub fn set_default_line_count(&mut self, count: usize) -> Result<()> {
		if count == 0 {
			return Err(PoemError::InvalidConfig("default_line_count must be at least 1".to_owned()));
		}
		if count > self.max_line_count {
			return Err(PoemError::InvalidConfig(format!(
				"default_line_count {count} exceeds max_line_count {}",
				self.max_line_count
			)));
		}
		self.default_line_count = count;
		Ok(())
	}

	/// Sets the largest freeform line count accepted from a caller.
	///
	/// # Errors
	/// Returns an error if `count` is below `default_line_count`.
	pub fn set_max_line_count(&mut self, count: usize) -> Result<()> {
		if count == 0 || count < self.default_line_count {
			return Err(PoemError::InvalidConfig(format!(
				"max_line_count must be at least default_line_count ({}), got {count}",
				self.default_line_count
			)));
		}
		self.max_line_count = count;
		Ok(())
	}
}

/// File names of the precomputed tables inside a data directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourcePaths {
	pub syllables: PathBuf,
	pub parts_of_speech: PathBuf,
	pub themes: PathBuf,
	pub sentence_patterns: PathBuf,
	/// Corpus used when the user does not name one.
	pub default_corpus: PathBuf,
}

impl Default for ResourcePaths {
	fn default() -> Self {
		Self {
			syllables: PathBuf::from("syllables.bin"),
			parts_of_speech: PathBuf::from("parts_of_speech.bin"),
			themes: PathBuf::from("themes.bin"),
			sentence_patterns: PathBuf::from("sentence_patterns.txt"),
			default_corpus: PathBuf::from("shakespeare.txt"),
		}
	}
}

impl ResourcePaths {
	/// Resolves every relative path against `data_dir`.
	pub fn resolve<P: AsRef<Path>>(&self, data_dir: P) -> Self {
		let dir = data_dir.as_ref();
		Self {
			syllables: dir.join(&self.syllables),
			parts_of_speech: dir.join(&self.parts_of_speech),
			themes: dir.join(&self.themes),
			sentence_patterns: dir.join(&self.sentence_patterns),
			default_corpus: dir.join(&self.default_corpus),
		}
	}
}
