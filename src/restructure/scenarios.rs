//! Scenarios, their meters and readings.

use indexmap::IndexMap;

use super::model::{DomainMeter, DomainScenario, MeterReading};
use super::{list, number, scalars, text};
use crate::diagnostics::Messages;
use crate::value::RawRecord;

const KNOWN: &[&str] = &["id", "name", "temporal_status", "reference_case"];

/// Units of `AllResourceTotal/SiteEnergyUse`.
const SITE_ENERGY_UNITS: &str = "kBtu";

/// Id of the virtual meter carrying linked resource totals for `owner`.
pub fn site_energy_meter_id(owner: &str) -> String {
    format!("Site Energy Use {owner}")
}

pub(super) fn scenarios(
    records: &[RawRecord],
    audit_template: bool,
    messages: &mut Messages,
) -> Vec<DomainScenario> {
    let mut result = Vec::with_capacity(records.len());
    for record in records {
        let mut scenario = DomainScenario {
            id: text(record, "id"),
            name: text(record, "name"),
            temporal_status: text(record, "temporal_status"),
            reference_case: text(record, "reference_case"),
            metrics: scalars(record, KNOWN),
            measures: list(record, "measures")
                .iter()
                .filter_map(|m| text(m, "measure_id"))
                .collect(),
            meters: Vec::new(),
        };
        scenario.meters = meters(record, scenario.label(), messages);

        if audit_template && scenario.measures.is_empty() && scenario.meters.is_empty() {
            messages.warn(format!(
                "Skipping scenario {} because it has no measures or meter data",
                scenario.label()
            ));
            continue;
        }
        result.push(scenario);
    }
    result
}

fn meters(record: &RawRecord, scenario: &str, messages: &mut Messages) -> Vec<DomainMeter> {
    let mut meters: IndexMap<String, DomainMeter> = IndexMap::new();

    for resource_use in list(record, "resource_uses") {
        let Some(source_id) = text(resource_use, "source_id") else {
            messages.warn(format!("Skipping resource use without an ID in scenario {scenario}"));
            continue;
        };
        let (Some(meter_type), Some(units)) = (text(resource_use, "type"), text(resource_use, "units"))
        else {
            messages.warn(format!(
                "Skipping meter {source_id} in scenario {scenario} due to missing type or units"
            ));
            continue;
        };
        meters.insert(
            source_id.clone(),
            DomainMeter {
                source_id,
                meter_type,
                units,
                is_virtual: false,
                readings: Vec::new(),
            },
        );
    }

    for series in list(record, "time_series") {
        let series_id = text(series, "id");
        let label = series_id.as_deref().unwrap_or("<unnamed>");
        let Some(meter_id) = text(series, "resource_use_id") else {
            messages.warn(format!("Skipping time series {label}: no resource use reference"));
            continue;
        };
        let Some(meter) = meters.get_mut(&meter_id) else {
            messages.warn(format!(
                "Skipping time series {label}: meter {meter_id} not found in scenario {scenario}"
            ));
            continue;
        };
        let (Some(start_time), Some(end_time), Some(reading)) = (
            text(series, "start_time"),
            text(series, "end_time"),
            number(series, "reading"),
        ) else {
            messages.warn(format!("Skipping time series {label}: incomplete reading"));
            continue;
        };
        meter.readings.push(MeterReading {
            source_id: series_id,
            start_time,
            end_time,
            reading,
            source_unit: meter.units.clone(),
        });
    }

    let clones = linked_totals(record, &meters, scenario, messages);

    meters
        .into_values()
        .chain(clones.into_values())
        .filter(|meter| {
            let keep = !meter.readings.is_empty();
            if !keep {
                messages.warn(format!(
                    "Skipping meter {} in scenario {scenario} because it has no readings",
                    meter.source_id
                ));
            }
            keep
        })
        .collect()
}

/// Resource totals whose linked time series id names an existing reading.
///
/// Each owning meter gets one virtual clone, created on first link, and each
/// link adds a reading spanning the referenced reading's interval. Original
/// meters and readings are left as they are.
fn linked_totals(
    record: &RawRecord,
    meters: &IndexMap<String, DomainMeter>,
    scenario: &str,
    messages: &mut Messages,
) -> IndexMap<String, DomainMeter> {
    let mut clones: IndexMap<String, DomainMeter> = IndexMap::new();

    for total in list(record, "resource_totals") {
        let Some(linked) = text(total, "linked_time_series_id") else {
            continue;
        };
        let owner = meters.values().find_map(|meter| {
            meter
                .readings
                .iter()
                .find(|reading| reading.source_id.as_deref() == Some(linked.as_str()))
                .map(|reading| (meter, reading))
        });
        let Some((meter, reading)) = owner else {
            messages.warn(format!(
                "Linked time series {linked} not found in scenario {scenario}"
            ));
            continue;
        };
        let Some(site_energy) = number(total, "site_energy_use") else {
            messages.warn(format!(
                "Resource total linked to {linked} in scenario {scenario} has no site energy use"
            ));
            continue;
        };

        let clone_id = site_energy_meter_id(&meter.source_id);
        let clone = clones.entry(clone_id.clone()).or_insert_with(|| DomainMeter {
            source_id: clone_id,
            meter_type: meter.meter_type.clone(),
            units: SITE_ENERGY_UNITS.to_string(),
            is_virtual: true,
            readings: Vec::new(),
        });
        clone.readings.push(MeterReading {
            source_id: None,
            start_time: reading.start_time.clone(),
            end_time: reading.end_time.clone(),
            reading: site_energy,
            source_unit: SITE_ENERGY_UNITS.to_string(),
        });
    }
    clones
}
