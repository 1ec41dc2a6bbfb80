//! Domain records produced by restructuring.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::diagnostics::Messages;
use crate::value::Value;

/// An energy conservation measure.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainMeasure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// Local name of the technology category element, e.g. `LightingImprovements`.
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Remaining mapped fields (costs, status, useful life, ...).
    #[serde(flatten)]
    pub details: IndexMap<String, Value>,
}

/// One interval reading on a meter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    /// Id of the time series element the reading came from; `None` for
    /// readings synthesized from resource totals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub reading: f64,
    pub source_unit: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainMeter {
    pub source_id: String,
    #[serde(rename = "type")]
    pub meter_type: String,
    pub units: String,
    pub is_virtual: bool,
    pub readings: Vec<MeterReading>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainScenario {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_case: Option<String>,
    /// Savings and energy metrics.
    #[serde(flatten)]
    pub metrics: IndexMap<String, Value>,
    /// Referenced measure ids.
    pub measures: Vec<String>,
    pub meters: Vec<DomainMeter>,
}

impl DomainScenario {
    /// Label used in diagnostics.
    pub fn label(&self) -> &str {
        self.id.as_deref().or(self.name.as_deref()).unwrap_or("<unnamed>")
    }
}

/// Everything restructuring produces for one document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Restructured {
    /// Scalar property fields, including `audit_date` and `audit_date_type`
    /// when an audit date was found.
    pub property: IndexMap<String, Value>,
    pub measures: Vec<DomainMeasure>,
    pub scenarios: Vec<DomainScenario>,
    pub messages: Messages,
}
