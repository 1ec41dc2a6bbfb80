//! ZIP archives of BuildingSync documents.
//!
//! Members ending in `.xml` are processed one after another, each in its
//! own [`BuildingSync`] session. Other members are ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read};
use std::sync::Arc;
use zip::ZipArchive;

use super::{BuildingSync, ImportResult};
use crate::diagnostics::Messages;
use crate::document::InterchangeDocument;
use crate::error::ParsingError;
use crate::extract::{Extractor, field_paths};
use crate::mapping::{Mapping, base_mapping};
use crate::schema::SchemaCatalog;
use crate::value::Value;

/// When the field-to-path map of a tabular preview is computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathCachePolicy {
    /// Derive the map from the first member and reuse it for the rest.
    #[default]
    FirstFile,
    /// Derive the map from each member's own version.
    PerFile,
}

/// Outcome for one archive member.
#[derive(Debug)]
pub struct BatchMember {
    pub name: String,
    pub result: Result<ImportResult, ParsingError>,
}

/// One preview row: target field to value.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PreviewRow {
    pub member: String,
    pub values: IndexMap<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TabularPreview {
    /// Field to absolute path, from the last map computed.
    pub field_paths: IndexMap<String, String>,
    pub rows: Vec<PreviewRow>,
    pub messages: Messages,
}

pub struct BatchImporter {
    catalog: Arc<SchemaCatalog>,
    policy: PathCachePolicy,
    custom: Option<Mapping>,
}

impl BatchImporter {
    pub fn new(catalog: Arc<SchemaCatalog>) -> Self {
        Self {
            catalog,
            policy: PathCachePolicy::default(),
            custom: None,
        }
    }

    pub fn with_policy(mut self, policy: PathCachePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_custom_mapping(mut self, custom: Mapping) -> Self {
        self.custom = Some(custom);
        self
    }

    /// Full import of every XML member. Failures are reported per member.
    pub fn import_archive(&self, bytes: &[u8]) -> Result<Vec<BatchMember>, ParsingError> {
        let members = read_members(bytes)?;
        tracing::info!("Importing {} document(s) from archive", members.len());

        Ok(members
            .into_iter()
            .map(|(name, content)| {
                let mut session = BuildingSync::new(Arc::clone(&self.catalog));
                let result = session
                    .import_bytes(&content)
                    .and_then(|()| session.process(self.custom.as_ref(), None));
                if let Err(e) = &result {
                    tracing::warn!("Failed to import {name}: {e}");
                }
                BatchMember { name, result }
            })
            .collect())
    }

    /// Primary-group values for every XML member, keyed by target field.
    pub fn preview_archive(&self, bytes: &[u8]) -> Result<TabularPreview, ParsingError> {
        let mut preview = TabularPreview::default();
        let mut cached: Option<Mapping> = None;

        for (name, content) in read_members(bytes)? {
            let document = match InterchangeDocument::parse(&content) {
                Ok(document) => document,
                Err(e) => {
                    preview.messages.error(format!("{name}: {e}"));
                    continue;
                }
            };

            let reusable = match self.policy {
                PathCachePolicy::FirstFile => cached.clone(),
                PathCachePolicy::PerFile => None,
            };
            let mapping = match reusable {
                Some(mapping) => mapping,
                None => {
                    let mapping = self.mapping_for(document.version())?;
                    preview.field_paths = field_paths(&mapping);
                    cached = Some(mapping.clone());
                    mapping
                }
            };

            let (flat, messages) = Extractor::new(&mapping).extract_flat(document.tree());
            let values = preview
                .field_paths
                .iter()
                .filter_map(|(field, key)| Some((field.clone(), flat.get(key)?.clone())))
                .collect();
            preview.messages.extend(messages);
            preview.rows.push(PreviewRow {
                member: name,
                values,
            });
        }
        Ok(preview)
    }

    fn mapping_for(&self, version: &str) -> Result<Mapping, ParsingError> {
        let base = base_mapping(version)?;
        let mapping = match &self.custom {
            Some(custom) => base.merged(custom),
            None => base,
        };
        mapping.validate()?;
        Ok(mapping)
    }
}

/// `(name, bytes)` of every XML member, in archive order.
fn read_members(bytes: &[u8]) -> Result<Vec<(String, Vec<u8>)>, ParsingError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ParsingError::archive(format!("Failed to open archive: {e}")))?;

    let mut members = Vec::new();
    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|e| ParsingError::archive(format!("Failed to read entry {index}: {e}")))?;
        let name = file.name().to_string();
        if file.is_dir() || !name.to_ascii_lowercase().ends_with(".xml") {
            tracing::debug!("Ignoring archive member {name}");
            continue;
        }
        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|e| ParsingError::archive(format!("Failed to read {name}: {e}")))?;
        members.push((name, content));
    }
    Ok(members)
}
