use std::io;

/// Errors raised while loading tables or generating poems.
///
/// `NoFittingExtension` is the only recoverable kind: `write_line` restarts
/// the line when it sees it. Every other variant describes bad input or bad
/// data and is returned to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum PoemError {
	#[error("weighted choice over an empty candidate set")]
	EmptyDomain,

	#[error("candidate '{candidate}' has an invalid weight of 0")]
	InvalidWeight { candidate: String },

	#[error("no successor of '{word}' fits in the remaining {remaining} syllable(s)")]
	NoFittingExtension { word: String, remaining: u32 },

	#[error("gave up on a {target}-syllable line from '{word}' after {attempts} attempt(s)")]
	GenerationExhausted { word: String, target: u32, attempts: usize },

	#[error("start word '{word}' has {syllables} syllable(s), the first line only allows {budget}")]
	InvalidStartWord { word: String, syllables: u32, budget: u32 },

	#[error("start word '{0}' is missing from the corpus or the syllable table")]
	UnknownStartWord(String),

	#[error("placeholder tag '{0}' has no candidate list")]
	UnknownTag(char),

	#[error("placeholder tag '{0}' resolves to an empty candidate list")]
	EmptyCandidateList(char),

	#[error("malformed placeholder at byte {position} in pattern {pattern:?}")]
	MalformedPlaceholder { pattern: String, position: usize },

	#[error("unknown theme '{0}'")]
	UnknownTheme(String),

	#[error("line count must be between 1 and the configured maximum, got {0}")]
	InvalidLineCount(usize),

	#[error("no sentence patterns are loaded")]
	NoTemplates,

	#[error("corpus contains no words")]
	EmptyCorpus,

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("IO error: {0}")]
	Io(#[from] io::Error),

	#[error("deserialization error: {0}")]
	Decode(#[source] postcard::Error),

	#[error("serialization error: {0}")]
	Encode(#[source] postcard::Error),
}

pub type Result<T> = std::result::Result<T, PoemError>;
