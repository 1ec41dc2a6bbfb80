//! Import: document to normalized record.

use indexmap::IndexMap;
use serde::Serialize;

use super::BuildingSync;
use super::assets::AssetExtractor;
use crate::diagnostics::Messages;
use crate::error::ParsingError;
use crate::extract::Extractor;
use crate::mapping::{Mapping, base_mapping};
use crate::restructure::{DomainMeasure, DomainScenario, Restructurer};
use crate::value::Value;

/// Normalized output of one document.
///
/// Serializes as `{ <property fields>, measures, scenarios, messages }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ImportResult {
    #[serde(flatten)]
    pub property: IndexMap<String, Value>,
    pub measures: Vec<DomainMeasure>,
    pub scenarios: Vec<DomainScenario>,
    pub messages: Messages,
}

impl BuildingSync {
    /// The base mapping for the loaded version with `custom` laid over it.
    pub fn mapping(&self, custom: Option<&Mapping>) -> Result<Mapping, ParsingError> {
        let base = base_mapping(self.version()?)?;
        let mapping = match custom {
            Some(custom) => base.merged(custom),
            None => base,
        };
        mapping.validate()?;
        Ok(mapping)
    }

    /// Run extraction and restructuring over the loaded document.
    pub fn process(
        &self,
        custom: Option<&Mapping>,
        assets: Option<&dyn AssetExtractor>,
    ) -> Result<ImportResult, ParsingError> {
        let document = self.document_or_err("process")?;
        let mapping = self.mapping(custom)?;

        let extraction = Extractor::new(&mapping).extract(document.tree());
        let restructured =
            Restructurer::new(document.is_audit_template()).run(extraction, &mapping.primary);

        let mut property = restructured.property;
        if let Some(assets) = assets {
            match self.source_path() {
                Some(path) => {
                    for pair in assets.extract(path) {
                        property.insert(pair.name, pair.value);
                    }
                }
                None => tracing::debug!("No source file, skipping asset extraction"),
            }
        }

        tracing::info!(
            "Imported BuildingSync {}: {} measure(s), {} scenario(s), {} warning(s)",
            document.version(),
            restructured.measures.len(),
            restructured.scenarios.len(),
            restructured.messages.warnings.len()
        );
        Ok(ImportResult {
            property,
            measures: restructured.measures,
            scenarios: restructured.scenarios,
            messages: restructured.messages,
        })
    }
}
