//! Delimiter-based slide markup.

/// Parsed slide records.
pub mod model;
/// Markup tokenizer.
pub mod parser;
