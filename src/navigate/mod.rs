//! Locating and materializing elements by [`Path`](crate::path::Path).
//!
//! ```text
//! navigator ──► builder ──► value_writer
//!   (read)      (create)     (write text / attribute)
//! ```

mod builder;
mod navigator;
mod value_writer;

pub use builder::TreeBuilder;
pub use navigator::{NavigateResult, find_all, navigate, step_matches};
pub use value_writer::ValueWriter;
