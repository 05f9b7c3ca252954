//! User input handling.
//!
//! Field parsing and transcript loading. Values are validated here so
//! that the aggregator only receives well-formed numbers.

pub mod parser;
pub mod transcript;

pub use parser::{FieldParser, GradeScale, ParsePolicy};
pub use transcript::load_transcript;
