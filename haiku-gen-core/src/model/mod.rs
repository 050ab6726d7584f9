//! Markov side of the generator: the word chain, syllable counts and the
//! syllable-budgeted line builder.
//!
//! - `SuccessorTable`: word → weighted next words, learned from a corpus
//! - `SyllableTable`: word → syllable count
//! - `weighted`: proportional random choice over positive integer weights
//! - `LineBuilder`: walks the chain until a line hits an exact syllable count

/// Syllable-budgeted line construction with bounded restarts.
pub mod line_builder;

/// Word-adjacency statistics learned from a sample text.
///
/// Supports sequential and multithreaded ingestion, merging and a postcard
/// cache next to the corpus file.
pub mod successor_table;

/// Word → syllable count lookup, loaded from its binary form or parsed from
/// the CMU pronouncing dictionary.
pub mod syllable_table;

/// Weighted random choice and the shrinking pool used by the line builder.
pub mod weighted;
