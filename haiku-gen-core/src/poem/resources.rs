use std::path::{Path, PathBuf};

use rand::Rng;

use super::assembler::{Poem, write_freeform, write_haiku};
use crate::config::{GenerationConfig, ResourcePaths};
use crate::error::{PoemError, Result};
use crate::io;
use crate::lexicon::pattern::{SentencePattern, load_patterns};
use crate::lexicon::pos_table::PosTable;
use crate::lexicon::template_builder::TemplateBuilder;
use crate::lexicon::theme_table::ThemeTable;
use crate::model::line_builder::LineBuilder;
use crate::model::successor_table::SuccessorTable;
use crate::model::syllable_table::SyllableTable;

/// The read-only tables every poem needs, loaded once at startup.
///
/// The corpus chain is not part of the bundle: it depends on the author the
/// user wants to imitate and is passed to `write_haiku` per call.
#[derive(Clone, Debug)]
pub struct Resources {
	syllables: SyllableTable,
	parts_of_speech: PosTable,
	themes: ThemeTable,
	patterns: Vec<SentencePattern>,
}

impl Resources {
	pub fn new(
		syllables: SyllableTable,
		parts_of_speech: PosTable,
		themes: ThemeTable,
		patterns: Vec<SentencePattern>,
	) -> Self {
		Self { syllables, parts_of_speech, themes, patterns }
	}

	/// Loads every table from a data directory.
	///
	/// # Parameters
	/// - `data_dir`: directory holding the files; `"."` and `"./"` resolve to
	///   the current working directory.
	/// - `paths`: file names relative to `data_dir`.
	///
	/// # Errors
	/// Returns an error if `data_dir` is not a directory or a file fails to
	/// load.
	pub fn load<P: AsRef<Path>>(data_dir: P, paths: &ResourcePaths) -> Result<Self> {
		let folder = io::normalize_folder(data_dir);
		if !folder.is_dir() {
			return Err(PoemError::InvalidConfig(format!("expected a directory, got: {}", folder.display())));
		}

		let paths = paths.resolve(&folder);
		Ok(Self {
			syllables: SyllableTable::load(&paths.syllables)?,
			parts_of_speech: PosTable::load(&paths.parts_of_speech)?,
			themes: ThemeTable::load(&paths.themes)?,
			patterns: load_patterns(&paths.sentence_patterns)?,
		})
	}

	pub fn syllables(&self) -> &SyllableTable {
		&self.syllables
	}

	pub fn parts_of_speech(&self) -> &PosTable {
		&self.parts_of_speech
	}

	pub fn themes(&self) -> &ThemeTable {
		&self.themes
	}

	pub fn patterns(&self) -> &[SentencePattern] {
		&self.patterns
	}

	/// Line builder over `successors` and the bundled syllable table.
	pub fn line_builder<'a>(&'a self, successors: &'a SuccessorTable, config: &GenerationConfig) -> LineBuilder<'a> {
		LineBuilder::new(successors, &self.syllables, config)
	}

	pub fn template_builder(&self) -> TemplateBuilder<'_> {
		TemplateBuilder::new(&self.parts_of_speech, &self.themes)
	}

	/// Writes a haiku in the configured form, imitating `successors`.
	pub fn haiku<R: Rng + ?Sized>(
		&self,
		successors: &SuccessorTable,
		start_word: &str,
		config: &GenerationConfig,
		rng: &mut R,
	) -> Result<Poem> {
		write_haiku(&self.line_builder(successors, config), start_word, config.haiku_form(), rng)
	}

	/// Writes a freeform poem of `num_lines` lines on `theme`, at most
	/// `config.max_line_count()`.
	pub fn freeform<R: Rng + ?Sized>(
		&self,
		theme: &str,
		num_lines: usize,
		config: &GenerationConfig,
		rng: &mut R,
	) -> Result<Poem> {
		write_freeform(&self.template_builder(), &self.patterns, theme, num_lines, config.max_line_count(), rng)
	}
}

/// Lists the corpus files (`.txt`) available in a data directory.
///
/// The sentence pattern file is not a corpus and is left out.
pub fn list_corpora<P: AsRef<Path>>(data_dir: P, paths: &ResourcePaths) -> Result<Vec<PathBuf>> {
	let folder = io::normalize_folder(data_dir);
	let patterns = paths.sentence_patterns.file_name();
	Ok(io::list_files(&folder, "txt")?
		.into_iter()
		.filter(|name| patterns != Some(std::ffi::OsStr::new(name)))
		.map(|name| folder.join(name))
		.collect())
}
