//! Engine configuration.
//!
//! ```yaml
//! schema_dir: /opt/buildingsync/schemas   # <dir>/<version>/BuildingSync.xsd
//! path_cache: per_file                    # or first_file (default)
//! custom_mapping: mappings/site.yaml
//! ```
//!
//! Every key is optional; an empty document yields the defaults (bundled
//! schemas, first-file path cache, no custom mapping).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::engine::{BatchImporter, PathCachePolicy};
use crate::error::ParsingError;
use crate::mapping::Mapping;
use crate::schema::{DirectorySchemas, SchemaCatalog};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Root of per-version schema files; bundled schemas when unset.
    pub schema_dir: Option<PathBuf>,
    pub path_cache: PathCachePolicy,
    /// YAML or JSON mapping laid over the base mapping.
    pub custom_mapping: Option<PathBuf>,
}

impl EngineConfig {
    pub fn from_yaml_str(input: &str) -> Result<Self, ParsingError> {
        serde_yaml::from_str::<Option<Self>>(input)
            .map(Option::unwrap_or_default)
            .map_err(|e| ParsingError::config(format!("invalid config YAML: {e}")))
    }

    pub fn from_json_str(input: &str) -> Result<Self, ParsingError> {
        serde_json::from_str(input)
            .map_err(|e| ParsingError::config(format!("invalid config JSON: {e}")))
    }

    /// Load a config file. Relative paths inside it resolve against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, ParsingError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            _ => Self::from_yaml_str(&content)?,
        };
        if let Some(base) = path.parent() {
            config.schema_dir = config.schema_dir.map(|dir| base.join(dir));
            config.custom_mapping = config.custom_mapping.map(|file| base.join(file));
        }
        tracing::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Schema catalog for the configured source.
    pub fn catalog(&self) -> SchemaCatalog {
        match &self.schema_dir {
            Some(dir) => SchemaCatalog::new(DirectorySchemas::new(dir)),
            None => SchemaCatalog::embedded(),
        }
    }

    /// The configured custom mapping, if any.
    pub fn custom_mapping(&self) -> Result<Option<Mapping>, ParsingError> {
        self.custom_mapping
            .as_deref()
            .map(Mapping::from_path)
            .transpose()
    }

    /// Batch importer honoring the path-cache policy and custom mapping.
    pub fn batch_importer(&self, catalog: Arc<SchemaCatalog>) -> Result<BatchImporter, ParsingError> {
        let importer = BatchImporter::new(catalog).with_policy(self.path_cache);
        Ok(match self.custom_mapping()? {
            Some(custom) => importer.with_custom_mapping(custom),
            None => importer,
        })
    }
}
