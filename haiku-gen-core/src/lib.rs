//! Haiku and freeform poem generation library.
//!
//! This crate provides two generation engines:
//! - A word-level Markov chain learned from a sample text, walked under an
//!   exact syllable budget to write haiku
//! - Fill-in-the-blank sentence patterns filled from part-of-speech and
//!   theme word lists to write freeform verse
//!
//! Tables are plain immutable values loaded once and passed by reference;
//! every generation call takes its own random generator.

/// Generation parameters and data file layout.
pub mod config;

/// Error type shared by the whole crate.
pub mod error;

/// Part-of-speech and theme lexicon, sentence patterns and the template
/// line builder.
pub mod lexicon;

/// Word chain, syllable counts and the syllable-budgeted line builder.
pub mod model;

/// Haiku and freeform assemblers, and the resource bundle.
pub mod poem;

/// I/O utilities (file loading, binary tables, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use config::{GenerationConfig, RejectionPolicy, ResourcePaths};
pub use error::{PoemError, Result};
pub use poem::assembler::{Poem, PoemKind};
pub use poem::resources::Resources;
