//! # bsync
//!
//! Import and export engine for BuildingSync energy audit documents.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! engine       → import / export / batch orchestration, config
//!   ↓
//! restructure  → measures, scenarios, meters, readings
//!   ↓
//! extract      → mapping evaluation into raw records
//!   ↓
//! mapping      → override-aware path rules, bundled base mapping
//!   ↓
//! document     → version resolution, namespace repair
//!   ↓
//! navigate     → path walking, ordered element creation, value writes
//!   ↓
//! schema       → XSD element sequences, sibling ordering, version cache
//!   ↓
//! xml, path    → arena DOM over quick-xml, typed path expressions
//!   ↓
//! base         → format constants, supported versions
//! ```
//!
//! ## Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use bsync::engine::BuildingSync;
//! use bsync::schema::SchemaCatalog;
//!
//! let mut engine = BuildingSync::new(Arc::new(SchemaCatalog::embedded()));
//! engine.import_file("audit.xml".as_ref())?;
//! let result = engine.process(None, None)?;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! ```

// ============================================================================
// MODULES (dependency order: base → xml/path → schema → navigate → document
//          → mapping → extract → restructure → engine)
// ============================================================================

/// Format constants: root element, namespaces, supported versions
pub mod base;

/// Document-level error type
pub mod error;

/// Record-level warnings and errors
pub mod diagnostics;

/// Mutable XML tree, parser and serializer
pub mod xml;

/// Typed path expressions
pub mod path;

/// Scalar and record values
pub mod value;

/// Schema loading, element ordering, version cache
pub mod schema;

/// Navigator, builder and value writer
pub mod navigate;

/// Parsed documents with resolved versions
pub mod document;

/// Field mappings
pub mod mapping;

/// Mapping evaluation
pub mod extract;

/// Domain records from raw extraction
pub mod restructure;

/// Import, export and batch processing
pub mod engine;

/// Engine configuration
pub mod config;

// Re-export commonly needed items
pub use config::EngineConfig;
pub use diagnostics::Messages;
pub use document::InterchangeDocument;
pub use engine::{BuildingSync, ImportResult, PropertyRecord};
pub use error::ParsingError;
pub use mapping::Mapping;
pub use path::{Path, Step};
pub use schema::SchemaCatalog;
