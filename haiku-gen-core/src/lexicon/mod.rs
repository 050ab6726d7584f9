//! Template side of the generator: part-of-speech and theme word lists,
//! sentence patterns and the template line builder.

/// Tokenized `[x]` sentence patterns and the pattern file loader.
pub mod pattern;

/// Part-of-speech tag → candidate words.
pub mod pos_table;

/// Uniform placeholder substitution.
pub mod template_builder;

/// Theme name → concrete nouns.
pub mod theme_table;
