//! End-to-end import of BuildingSync fixtures.

use bsync::engine::AssetPair;
use bsync::{Mapping, ParsingError};
use bsync::restructure::site_energy_meter_id;
use bsync::value::Value;
use crate::helpers::engine_helpers::{engine, fixture, imported};

#[test]
fn test_audit_template_document_resolves_default_version() {
    let engine = imported("audit_template_office.xml");
    let document = engine.document().unwrap();
    assert_eq!(document.version(), "2.0");
    assert!(document.is_audit_template());
}

#[test]
fn test_property_fields_and_latest_audit_date() {
    let result = imported("audit_template_office.xml").process(None, None).unwrap();
    let property = &result.property;

    assert_eq!(property["property_name"], Value::from("Civic Center Office"));
    assert_eq!(property["building_id"], Value::from("Building-1"));
    assert_eq!(property["address_line_1"], Value::from("123 Main St"));
    assert_eq!(property["city"], Value::from("Golden"));
    assert_eq!(property["postal_code"], Value::from("80401"));
    assert_eq!(property["gross_floor_area"], Value::Number(45000.0));
    assert_eq!(property["year_built"], Value::Integer(1985));
    assert_eq!(property["property_type"], Value::from("Commercial"));
    assert_eq!(property["audit_date"], Value::from("2019-07-01"));
    assert_eq!(property["audit_date_type"], Value::from("Level 1: Walk-through"));
}

#[test]
fn test_measures_without_category_are_dropped() {
    let result = imported("audit_template_office.xml").process(None, None).unwrap();

    assert_eq!(result.measures.len(), 1);
    let measure = &result.measures[0];
    assert_eq!(measure.source_id.as_deref(), Some("Measure-1"));
    assert_eq!(measure.category, "LightingImprovements");
    assert_eq!(
        measure.name.as_deref(),
        Some("Retrofit with light emitting diode technologies")
    );
    assert_eq!(measure.details["cost_total_first"], Value::Number(25000.0));
    assert!(
        result
            .messages
            .warnings
            .contains(&"Skipping measure Measure-2 due to missing category".to_string())
    );
}

#[test]
fn test_degenerate_scenario_dropped_with_tool_marker() {
    let result = imported("audit_template_office.xml").process(None, None).unwrap();

    let ids: Vec<_> = result
        .scenarios
        .iter()
        .map(|s| s.id.as_deref().unwrap())
        .collect();
    assert_eq!(ids, vec!["Scenario-Baseline", "Scenario-LED"]);
    assert_eq!(
        result.messages.warnings,
        vec![
            "Skipping measure Measure-2 due to missing category",
            "Skipping scenario Scenario-Target because it has no measures or meter data",
        ]
    );
    assert!(result.messages.errors.is_empty());
}

#[test]
fn test_degenerate_scenario_kept_without_tool_marker() {
    let mut engine = engine();
    engine.import_bytes(&fixture("default_namespace.xml")).unwrap();
    let result = engine.process(None, None).unwrap();

    assert_eq!(result.scenarios.len(), 1);
    assert_eq!(result.scenarios[0].name.as_deref(), Some("Placeholder"));
    assert!(result.scenarios[0].meters.is_empty());
    assert!(result.messages.warnings.is_empty());
}

#[test]
fn test_linked_resource_totals_clone_meter() {
    let result = imported("audit_template_office.xml").process(None, None).unwrap();
    let baseline = &result.scenarios[0];

    assert_eq!(baseline.metrics["annual_site_energy"], Value::Number(750.6));
    assert_eq!(baseline.meters.len(), 2);

    let original = &baseline.meters[0];
    assert_eq!(original.source_id, "ResourceUse-Electricity");
    assert!(!original.is_virtual);
    let readings: Vec<_> = original.readings.iter().map(|r| r.reading).collect();
    assert_eq!(readings, vec![100.0, 120.0]);
    assert!(original.readings.iter().all(|r| r.source_unit == "kWh"));

    let clone = &baseline.meters[1];
    assert_eq!(clone.source_id, site_energy_meter_id("ResourceUse-Electricity"));
    assert_eq!(clone.source_id, "Site Energy Use ResourceUse-Electricity");
    assert!(clone.is_virtual);
    assert_eq!(clone.readings.len(), 2);
    assert_eq!(clone.readings[0].start_time, "2019-01-01T00:00:00");
    assert_eq!(clone.readings[0].end_time, "2019-01-31T23:59:59");
    assert_eq!(clone.readings[0].reading, 341.2);
    assert_eq!(clone.readings[1].start_time, "2019-02-01T00:00:00");
    assert_eq!(clone.readings[1].reading, 409.4);
}

#[test]
fn test_package_scenario_references_measures() {
    let result = imported("audit_template_office.xml").process(None, None).unwrap();
    let package = &result.scenarios[1];

    assert_eq!(package.measures, vec!["Measure-1"]);
    assert_eq!(package.reference_case.as_deref(), Some("Scenario-Baseline"));
    assert_eq!(package.metrics["annual_site_energy_savings"], Value::Number(120.5));
    assert_eq!(package.metrics["simple_payback"], Value::Number(7.4));
}

#[test]
fn test_premises_notes_without_name() {
    let result = imported("premises_notes.xml").process(None, None).unwrap();

    assert_eq!(result.property["property_notes"], Value::from("Test"));
    assert!(!result.property.contains_key("property_name"));
    assert_eq!(result.messages.warnings.len(), 1);
    assert!(result.messages.warnings[0].contains("PremisesName"));
}

#[test]
fn test_default_namespace_document_is_reconciled() {
    let mut engine = engine();
    engine.import_bytes(&fixture("default_namespace.xml")).unwrap();
    assert_eq!(engine.version().unwrap(), "2.4.0");

    let result = engine.process(None, None).unwrap();
    assert_eq!(result.property["property_name"], Value::from("Warehouse & Depot"));
    assert_eq!(result.property["year_built"], Value::Integer(1972));

    let xml = engine.export(None, None).unwrap();
    assert!(xml.contains("<auc:PremisesName>Warehouse &amp; Depot</auc:PremisesName>"));
}

#[test]
fn test_result_json_shape() {
    let result = imported("audit_template_office.xml").process(None, None).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["property_name"], "Civic Center Office");
    assert_eq!(json["measures"][0]["category"], "LightingImprovements");
    assert_eq!(json["scenarios"][0]["meters"][1]["type"], "Electricity");
    assert_eq!(json["scenarios"][0]["meters"][1]["is_virtual"], true);
    assert!(json["messages"]["warnings"].is_array());
}

#[test]
fn test_unsupported_version_is_fatal() {
    let mut engine = engine();
    let err = engine
        .import_bytes(br#"<auc:BuildingSync xmlns:auc="x" version="3.1"/>"#)
        .unwrap_err();
    assert!(matches!(err, ParsingError::UnsupportedVersion { .. }));
    assert!(err.to_string().contains("2.0, 2.2.0, 2.3.0, 2.4.0"));
}

#[test]
fn test_assets_merge_into_property_fields() {
    let engine = imported("premises_notes.xml");
    let assets = |path: &std::path::Path| {
        vec![
            AssetPair::new("source_file", path.file_name().unwrap().to_str().unwrap()),
            AssetPair::new("property_notes", "from assets"),
        ]
    };
    let result = engine.process(None, Some(&assets)).unwrap();

    assert_eq!(result.property["source_file"], Value::from("premises_notes.xml"));
    assert_eq!(result.property["property_notes"], Value::from("from assets"));
}

#[test]
fn test_assets_skipped_without_source_file() {
    let mut engine = engine();
    engine.import_bytes(&fixture("premises_notes.xml")).unwrap();
    let assets = |_: &std::path::Path| vec![AssetPair::new("source_file", "unused")];
    let result = engine.process(None, Some(&assets)).unwrap();

    assert!(!result.property.contains_key("source_file"));
}

#[test]
fn test_custom_mapping_overrides_field() {
    let engine = imported("audit_template_office.xml");
    let custom = Mapping::from_yaml_str(
        r#"
groups:
  property:
    rules:
      property_name: { path: PremisesNotes }
      building_id: { path: "@ID" }
"#,
    );
    // Attributes are selected through the value mode.
    assert!(custom.is_err());

    let custom = Mapping::from_yaml_str(
        "groups:\n  property:\n    rules:\n      property_name: { path: PremisesNotes }\n",
    )
    .unwrap();
    let result = engine.process(Some(&custom), None).unwrap();
    assert_eq!(
        result.property["property_name"],
        Value::from("Audit performed with the Audit Template tool")
    );
    assert_eq!(result.property["city"], Value::from("Golden"));
}
