use super::model::DomainMeasure;
use super::{scalars, text};
use crate::diagnostics::Messages;
use crate::value::RawRecord;

const KNOWN: &[&str] = &["source_id", "category", "name"];

/// Measures with a category; the rest are dropped with a warning.
pub(super) fn measures(records: &[RawRecord], messages: &mut Messages) -> Vec<DomainMeasure> {
    records
        .iter()
        .filter_map(|record| {
            let source_id = text(record, "source_id");
            let Some(category) = text(record, "category") else {
                messages.warn(format!(
                    "Skipping measure {} due to missing category",
                    source_id.as_deref().unwrap_or("<unnamed>")
                ));
                return None;
            };
            Some(DomainMeasure {
                source_id,
                category,
                name: text(record, "name"),
                details: scalars(record, KNOWN),
            })
        })
        .collect()
}
