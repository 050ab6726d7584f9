//! Poem assembly on top of the two line builders.
//!
//! - `write_haiku`: causally chained syllable-budgeted lines
//! - `write_freeform`: independent template lines on a theme
//! - `Resources`: the read-only tables, loaded once from a data directory

/// Haiku and freeform assemblers.
pub mod assembler;

/// Bundle of the process-wide tables.
pub mod resources;
