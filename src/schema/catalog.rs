//! Read-through cache of loaded schemas, keyed by version.
//!
//! The catalog is injected wherever ordering is needed instead of living in
//! a process-wide static, so tests can hand it fixture schemas.
//!
//! # Usage
//!
//! ```ignore
//! use bsync::schema::SchemaCatalog;
//!
//! let catalog = SchemaCatalog::embedded();
//! let schema = catalog.get("2.0")?; // parsed on first access, shared afterwards
//! ```

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::Schema;
use crate::base::is_supported_version;
use crate::error::ParsingError;

/// Where schema text comes from.
pub trait SchemaSource: Send + Sync {
    /// Return the XSD source for `version`. Only called for supported versions.
    fn load(&self, version: &str) -> Result<String, ParsingError>;
}

/// Schemas compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSchemas;

impl EmbeddedSchemas {
    /// Structural subset shared by every supported version.
    pub const XSD: &'static str = include_str!("../../schemas/BuildingSync.xsd");
}

impl SchemaSource for EmbeddedSchemas {
    fn load(&self, _version: &str) -> Result<String, ParsingError> {
        Ok(Self::XSD.to_string())
    }
}

/// Schemas read from `<root>/<version>/BuildingSync.xsd`.
#[derive(Debug, Clone)]
pub struct DirectorySchemas {
    root: PathBuf,
}

impl DirectorySchemas {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, version: &str) -> PathBuf {
        self.root.join(version).join("BuildingSync.xsd")
    }
}

impl SchemaSource for DirectorySchemas {
    fn load(&self, version: &str) -> Result<String, ParsingError> {
        let path = self.path_for(version);
        std::fs::read_to_string(&path).map_err(|e| {
            ParsingError::schema(format!("failed to read {}: {e}", path.display()))
        })
    }
}

/// Lazily-populated schema cache. Entries are never invalidated.
pub struct SchemaCatalog {
    source: Box<dyn SchemaSource>,
    cache: RwLock<FxHashMap<String, Arc<Schema>>>,
}

impl SchemaCatalog {
    pub fn new(source: impl SchemaSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    /// Catalog backed by the bundled schemas.
    pub fn embedded() -> Self {
        Self::new(EmbeddedSchemas)
    }

    /// Fetch (loading on first use) the schema for `version`.
    pub fn get(&self, version: &str) -> Result<Arc<Schema>, ParsingError> {
        if !is_supported_version(version) {
            return Err(ParsingError::unsupported_version(version));
        }
        if let Some(schema) = self.cache.read().get(version) {
            return Ok(Arc::clone(schema));
        }

        let xsd = self.source.load(version)?;
        let schema = Arc::new(Schema::from_xsd(version, &xsd)?);
        tracing::debug!("Cached schema for version {version}");

        let mut cache = self.cache.write();
        let entry = cache
            .entry(version.to_string())
            .or_insert_with(|| Arc::clone(&schema));
        Ok(Arc::clone(entry))
    }

    /// Number of versions loaded so far.
    pub fn loaded(&self) -> usize {
        self.cache.read().len()
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::embedded()
    }
}

impl std::fmt::Debug for SchemaCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaCatalog")
            .field("loaded", &self.loaded())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource(Arc<AtomicUsize>);

    impl SchemaSource for CountingSource {
        fn load(&self, _version: &str) -> Result<String, ParsingError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(EmbeddedSchemas::XSD.to_string())
        }
    }

    #[test]
    fn test_catalog_loads_once_per_version() {
        let loads = Arc::new(AtomicUsize::new(0));
        let catalog = SchemaCatalog::new(CountingSource(Arc::clone(&loads)));

        let first = catalog.get("2.0").unwrap();
        let second = catalog.get("2.0").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        catalog.get("2.4.0").unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
        assert_eq!(catalog.loaded(), 2);
    }

    #[test]
    fn test_catalog_rejects_unknown_version() {
        let catalog = SchemaCatalog::embedded();
        let err = catalog.get("1.0").unwrap_err();
        assert!(matches!(err, ParsingError::UnsupportedVersion { .. }));
        assert!(err.to_string().contains("2.4.0"));
    }

    #[test]
    fn test_directory_source_reads_versioned_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySchemas::new(dir.path());
        std::fs::create_dir_all(dir.path().join("2.2.0")).unwrap();
        std::fs::write(source.path_for("2.2.0"), EmbeddedSchemas::XSD).unwrap();

        let catalog = SchemaCatalog::new(source);
        let schema = catalog.get("2.2.0").unwrap();
        assert_eq!(schema.version(), "2.2.0");
        assert!(schema.has_element("BuildingSync"));

        assert!(matches!(catalog.get("2.0"), Err(ParsingError::Schema(_))));
    }

    #[test]
    fn test_catalog_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemaCatalog>();
    }
}
