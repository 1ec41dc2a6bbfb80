//! Minimal mutable XML tree over quick-xml.
//!
//! The import side only reads, but export has to create elements in place
//! and write them back out, so the tree is an owned arena rather than a
//! borrowed read-only view.
//!
//! ```text
//! bytes ──parse──▶ XmlTree ──serialize──▶ bytes
//!                   ▲    │
//!                   └────┘  insert_child / set_text / set_attribute
//! ```

mod reader;
mod tree;
mod writer;

pub use reader::parse;
pub use tree::{Descendants, Element, NodeId, XmlTree, local_name};
pub use writer::{serialize, to_string};
