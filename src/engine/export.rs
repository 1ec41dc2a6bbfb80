//! Export: application record merged back into the document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::BuildingSync;
use crate::error::ParsingError;
use crate::mapping::{Mapping, RuleGroup, ValueMode};
use crate::navigate::{TreeBuilder, ValueWriter};
use crate::path::{Path, Step};
use crate::schema::OrderResolver;
use crate::value::{ExportValue, Value};
use crate::xml;

/// How a record answers for one mapped field.
#[derive(Clone, Debug, PartialEq)]
pub enum ExportLookup {
    /// A first-class field; `None` is a null and is not written.
    Direct(Option<ExportValue>),
    /// Present only in the record's extra-data map; never written.
    Extra,
    /// Unknown to the record.
    Unknown,
}

/// Application data that can be written into a document.
pub trait ExportSource {
    fn lookup(&self, field: &str) -> ExportLookup;
}

/// A plain record: typed fields plus free-form extra data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(default)]
    pub fields: IndexMap<String, Option<ExportValue>>,
    #[serde(default)]
    pub extra_data: IndexMap<String, Value>,
}

impl PropertyRecord {
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<ExportValue>) -> Self {
        self.fields.insert(field.into(), Some(value.into()));
        self
    }

    pub fn with_null(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into(), None);
        self
    }

    pub fn with_extra(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_data.insert(field.into(), value.into());
        self
    }
}

impl ExportSource for PropertyRecord {
    fn lookup(&self, field: &str) -> ExportLookup {
        if let Some(value) = self.fields.get(field) {
            ExportLookup::Direct(value.clone())
        } else if self.extra_data.contains_key(field) {
            ExportLookup::Extra
        } else {
            ExportLookup::Unknown
        }
    }
}

impl BuildingSync {
    /// Write `record` into the loaded document and return the normalized XML.
    ///
    /// Only the primary group's scalar rules are exported. Without a record
    /// the document is only re-serialized.
    pub fn export(
        &mut self,
        record: Option<&dyn ExportSource>,
        custom: Option<&Mapping>,
    ) -> Result<String, ParsingError> {
        self.document_or_err("export")?;

        if let Some(record) = record {
            let mapping = self.mapping(custom)?;
            let schema = self.catalog.get(self.version()?)?;
            let writer = ValueWriter::new(TreeBuilder::new(OrderResolver::new(&schema)));
            let group = mapping
                .primary_group()
                .ok_or_else(|| ParsingError::config("mapping has no primary group"))?;

            let writes = planned_writes(record, group)?;

            let document = self.document_mut("export")?;
            let tree = document.tree_mut();
            let root = tree.root();
            let mut written = 0usize;
            for (path, mode, value) in &writes {
                if writer.write(tree, root, path, mode, Some(value))? {
                    written += 1;
                }
            }
            tracing::debug!("Exported {written} field(s)");
        }

        let document = self.document_or_err("export")?;
        let reparsed = xml::parse(&document.to_bytes()?)?;
        xml::to_string(&reparsed)
    }
}

/// Resolve every field `record` will write before the tree is touched, so a
/// rule that cannot be written fails the export with the document unchanged.
fn planned_writes<'m>(
    record: &dyn ExportSource,
    group: &'m RuleGroup,
) -> Result<Vec<(Path, &'m ValueMode, ExportValue)>, ParsingError> {
    let mut writes = Vec::new();
    for (field, rule) in group.value_rules() {
        match record.lookup(field) {
            ExportLookup::Direct(Some(value)) => {
                let path = group.path.join(&rule.path);
                if rule.mode != ValueMode::Tag && path.steps().contains(&Step::Any) {
                    return Err(ParsingError::invalid_path(
                        path.to_string(),
                        format!("field '{field}' cannot be exported through a wildcard step"),
                    ));
                }
                writes.push((path, &rule.mode, value));
            }
            ExportLookup::Direct(None) | ExportLookup::Unknown => {}
            ExportLookup::Extra => {
                tracing::debug!("Field '{field}' is extra data, not exported");
            }
        }
    }
    Ok(writes)
}
