//! Orchestration of import, export and batch processing.
//!
//! ```text
//! import:  bytes ─► InterchangeDocument ─► Mapping (base + custom)
//!                                          │
//!                                          ▼
//!                 Extractor ─► Restructurer ─► assets ─► ImportResult
//!
//! export:  record ─► ValueWriter (TreeBuilder + OrderResolver) ─► serialize
//!                                                              ─► reparse
//!                                                              ─► serialize
//! ```
//!
//! A [`BuildingSync`] session holds at most one document. Operations that
//! need a document fail with [`ParsingError::OutOfSequence`] until one has
//! been imported or initialized.

mod assets;
mod batch;
mod export;
mod import;

pub use assets::{AssetExtractor, AssetPair};
pub use batch::{BatchImporter, BatchMember, PathCachePolicy, PreviewRow, TabularPreview};
pub use export::{ExportLookup, ExportSource, PropertyRecord};
pub use import::ImportResult;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::document::InterchangeDocument;
use crate::error::ParsingError;
use crate::schema::SchemaCatalog;

/// Stateful import/export session for a single document.
#[derive(Debug)]
pub struct BuildingSync {
    catalog: Arc<SchemaCatalog>,
    document: Option<InterchangeDocument>,
    source_path: Option<PathBuf>,
}

impl BuildingSync {
    pub fn new(catalog: Arc<SchemaCatalog>) -> Self {
        Self {
            catalog,
            document: None,
            source_path: None,
        }
    }

    /// Session using the schema source named by `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(Arc::new(config.catalog()))
    }

    pub fn catalog(&self) -> &Arc<SchemaCatalog> {
        &self.catalog
    }

    /// Parse `bytes` as the session's document, replacing any previous one.
    pub fn import_bytes(&mut self, bytes: &[u8]) -> Result<(), ParsingError> {
        let document = InterchangeDocument::parse(bytes)?;
        tracing::debug!("Loaded BuildingSync {} document", document.version());
        self.document = Some(document);
        self.source_path = None;
        Ok(())
    }

    pub fn import_file(&mut self, path: &Path) -> Result<(), ParsingError> {
        self.document = Some(InterchangeDocument::from_path(path)?);
        self.source_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Start from an empty document holding only the declared root.
    pub fn init_tree(&mut self, version: &str) -> Result<(), ParsingError> {
        self.document = Some(InterchangeDocument::init_tree(version)?);
        self.source_path = None;
        Ok(())
    }

    pub fn document(&self) -> Option<&InterchangeDocument> {
        self.document.as_ref()
    }

    /// Version of the loaded document.
    pub fn version(&self) -> Result<&str, ParsingError> {
        Ok(self.document_or_err("version")?.version())
    }

    /// File the document was imported from, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    fn document_or_err(&self, operation: &str) -> Result<&InterchangeDocument, ParsingError> {
        self.document.as_ref().ok_or_else(|| not_loaded(operation))
    }

    fn document_mut(&mut self, operation: &str) -> Result<&mut InterchangeDocument, ParsingError> {
        self.document.as_mut().ok_or_else(|| not_loaded(operation))
    }
}

fn not_loaded(operation: &str) -> ParsingError {
    ParsingError::OutOfSequence(format!(
        "{operation} called before a document was imported or initialized"
    ))
}
