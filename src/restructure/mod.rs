//! Turning raw extraction output into domain records.
//!
//! ```text
//! ExtractionResult ─┬─ property    ──► scalar property fields (+ audit_date)
//!                   ├─ measures    ──► DomainMeasure     (needs a category)
//!                   ├─ scenarios   ──► DomainScenario ─► DomainMeter ─► MeterReading
//!                   └─ audit_dates ──► latest date
//! ```
//!
//! Anomalies never abort the run; each one becomes a warning in
//! [`Messages`](crate::diagnostics::Messages).

mod audit;
mod measures;
mod model;
mod scenarios;

pub use model::{DomainMeasure, DomainMeter, DomainScenario, MeterReading, Restructured};
pub use scenarios::site_energy_meter_id;

use indexmap::IndexMap;

use crate::extract::ExtractionResult;
use crate::value::{RawRecord, RawValue, Value};

pub const MEASURES_GROUP: &str = "measures";
pub const SCENARIOS_GROUP: &str = "scenarios";
pub const AUDIT_DATES_GROUP: &str = "audit_dates";

#[derive(Clone, Copy, Debug, Default)]
pub struct Restructurer {
    audit_template: bool,
}

impl Restructurer {
    /// `audit_template` enables dropping scenarios with neither measures
    /// nor meters.
    pub fn new(audit_template: bool) -> Self {
        Self { audit_template }
    }

    pub fn run(&self, extraction: ExtractionResult, primary: &str) -> Restructured {
        let ExtractionResult { groups, mut messages } = extraction;

        let mut property = groups
            .get(primary)
            .and_then(RawValue::as_record)
            .map(|record| scalars(record, &[]))
            .unwrap_or_default();

        let measures = measures::measures(list(&groups, MEASURES_GROUP), &mut messages);
        let scenarios =
            scenarios::scenarios(list(&groups, SCENARIOS_GROUP), self.audit_template, &mut messages);

        if let Some((date, date_type)) =
            audit::latest_audit_date(list(&groups, AUDIT_DATES_GROUP), &mut messages)
        {
            property.insert("audit_date".to_string(), Value::Text(date.to_string()));
            if let Some(date_type) = date_type {
                property.insert("audit_date_type".to_string(), Value::Text(date_type));
            }
        }

        tracing::debug!(
            "Restructured {} measure(s), {} scenario(s)",
            measures.len(),
            scenarios.len()
        );
        Restructured {
            property,
            measures,
            scenarios,
            messages,
        }
    }
}

/// Trimmed, non-empty text of a scalar field.
fn text(record: &RawRecord, key: &str) -> Option<String> {
    let value = record.get(key)?.as_scalar()?.to_text();
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn number(record: &RawRecord, key: &str) -> Option<f64> {
    record.get(key)?.as_scalar()?.as_f64()
}

fn list<'r>(record: &'r RawRecord, key: &str) -> &'r [RawRecord] {
    record
        .get(key)
        .and_then(RawValue::as_list)
        .unwrap_or_default()
}

/// Scalar fields of `record`, skipping `exclude`.
fn scalars(record: &RawRecord, exclude: &[&str]) -> IndexMap<String, Value> {
    record
        .iter()
        .filter(|(key, _)| !exclude.contains(&key.as_str()))
        .filter_map(|(key, value)| Some((key.clone(), value.as_scalar()?.clone())))
        .collect()
}
