//! Engine tests
//!
//! End-to-end import, export and archive handling over fixture documents.

pub mod tests_batch;
pub mod tests_export;
pub mod tests_import;
