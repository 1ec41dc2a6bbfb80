//! Mapping evaluation: document tree to raw records plus diagnostics.

mod extractor;
mod flat;

pub use extractor::{ExtractionResult, Extractor, convert};
pub use flat::{FlatRecord, absolute_key, field_paths};
