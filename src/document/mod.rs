//! A parsed BuildingSync document with its resolved version.

mod namespace;
mod version;

pub use namespace::{fresh_root, needs_reconcile, reconcile};
pub use version::{is_audit_template, resolve_version, version_from_schema_location};

use crate::base::is_supported_version;
use crate::error::ParsingError;
use crate::xml::{self, XmlTree};

/// Parsed tree plus the version it was resolved against.
///
/// The version is fixed once resolved; the tree stays mutable for export.
#[derive(Clone, Debug, PartialEq)]
pub struct InterchangeDocument {
    tree: XmlTree,
    version: String,
}

impl InterchangeDocument {
    /// Parse bytes, resolve the version and repair missing prefixes.
    pub fn parse(input: &[u8]) -> Result<Self, ParsingError> {
        let tree = xml::parse(input)?;
        let version = resolve_version(&tree)?;
        let tree = if needs_reconcile(&tree) {
            reconcile(&tree, &version)
        } else {
            tree
        };
        Ok(Self { tree, version })
    }

    pub fn from_path(path: &std::path::Path) -> Result<Self, ParsingError> {
        let bytes = std::fs::read(path)?;
        tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
        Self::parse(&bytes)
    }

    /// A document holding only the declared root for `version`.
    pub fn init_tree(version: &str) -> Result<Self, ParsingError> {
        if !is_supported_version(version) {
            return Err(ParsingError::unsupported_version(version));
        }
        Ok(Self {
            tree: fresh_root(version),
            version: version.to_string(),
        })
    }

    pub fn tree(&self) -> &XmlTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut XmlTree {
        &mut self.tree
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn is_audit_template(&self) -> bool {
        is_audit_template(&self.tree)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ParsingError> {
        xml::serialize(&self.tree)
    }

    pub fn to_xml_string(&self) -> Result<String, ParsingError> {
        xml::to_string(&self.tree)
    }
}
