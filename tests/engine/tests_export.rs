//! Export of application records into BuildingSync documents.

use bsync::PropertyRecord;
use bsync::value::{ExportValue, Value};
use crate::helpers::engine_helpers::{engine, fixture, imported};

fn position(xml: &str, needle: &str) -> usize {
    xml.find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not found in:\n{xml}"))
}

#[test]
fn test_empty_document_export_is_stable() {
    let mut engine = engine();
    engine.init_tree("2.0").unwrap();
    let first = engine.export(None, None).unwrap();

    assert!(first.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(first.contains("xmlns:auc=\"http://buildingsync.net/schemas/bedes-auc/2019\""));
    assert!(first.contains("version=\"2.0\""));
    assert!(first.trim_end().ends_with("/>"));

    engine.import_bytes(first.as_bytes()).unwrap();
    assert_eq!(engine.version().unwrap(), "2.0");
    let second = engine.export(None, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_null_record_leaves_document_unchanged() {
    let mut engine = imported("audit_template_office.xml");
    let untouched = engine.export(None, None).unwrap();

    let empty = engine.export(Some(&PropertyRecord::default()), None).unwrap();
    assert_eq!(untouched, empty);

    let nulls = PropertyRecord::default()
        .with_null("property_name")
        .with_null("city")
        .with_null("gross_floor_area")
        .with_null("year_of_last_major_remodel");
    let exported = engine.export(Some(&nulls), None).unwrap();
    assert_eq!(untouched, exported);
}

#[test]
fn test_export_is_idempotent_for_a_record() {
    let record = PropertyRecord::default()
        .with_field("property_name", "Civic Center Annex")
        .with_field("year_of_last_major_remodel", ExportValue::from(Value::Integer(2010)));

    let mut engine = imported("audit_template_office.xml");
    let once = engine.export(Some(&record), None).unwrap();
    let twice = engine.export(Some(&record), None).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_exported_fields_read_back_on_import() {
    let mut engine = engine();
    engine.init_tree("2.2.0").unwrap();
    let record = PropertyRecord::default()
        .with_field("property_name", "Round Trip Tower")
        .with_field("building_id", "Building-42")
        .with_field("city", "Boulder")
        .with_field("state", "CO")
        .with_field(
            "gross_floor_area",
            ExportValue::Quantity {
                magnitude: 1500.0,
                unit: "ft**2".to_string(),
            },
        )
        .with_field("year_built", ExportValue::from(Value::Integer(2001)))
        .with_extra("notes", "kept out of the document");
    let xml = engine.export(Some(&record), None).unwrap();
    assert!(!xml.contains("kept out of the document"));

    let mut reader = crate::helpers::engine_helpers::engine();
    reader.import_bytes(xml.as_bytes()).unwrap();
    assert_eq!(reader.version().unwrap(), "2.2.0");
    let result = reader.process(None, None).unwrap();

    assert_eq!(result.property["property_name"], Value::from("Round Trip Tower"));
    assert_eq!(result.property["building_id"], Value::from("Building-42"));
    assert_eq!(result.property["city"], Value::from("Boulder"));
    assert_eq!(result.property["state"], Value::from("CO"));
    assert_eq!(result.property["gross_floor_area"], Value::Number(1500.0));
    assert_eq!(result.property["year_built"], Value::Integer(2001));
    assert!(result.messages.warnings.is_empty());
}

#[test]
fn test_created_elements_follow_schema_order() {
    let mut engine = engine();
    engine.init_tree("2.0").unwrap();
    // Written in reverse of the declared sequence.
    let record = PropertyRecord::default()
        .with_field("year_built", ExportValue::from(Value::Integer(1999)))
        .with_field("gross_floor_area", 1200.0)
        .with_field("property_type", "Commercial")
        .with_field("city", "Denver")
        .with_field("property_notes", "Second")
        .with_field("property_name", "First");
    let xml = engine.export(Some(&record), None).unwrap();

    let order = [
        "<auc:PremisesName>",
        "<auc:PremisesNotes>",
        "<auc:Address>",
        "<auc:BuildingClassification>",
        "<auc:FloorAreas>",
        "<auc:YearOfConstruction>",
    ];
    let positions: Vec<_> = order.iter().map(|tag| position(&xml, tag)).collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{xml}");
    assert!(
        position(&xml, "<auc:FloorAreaType>Gross</auc:FloorAreaType>")
            < position(&xml, "<auc:FloorAreaValue>1200</auc:FloorAreaValue>")
    );
}

#[test]
fn test_insert_into_existing_building_keeps_siblings() {
    let mut engine = imported("premises_notes.xml");
    let record = PropertyRecord::default().with_field("property_name", "Named Later");
    let xml = engine.export(Some(&record), None).unwrap();

    assert!(
        position(&xml, "<auc:PremisesName>Named Later</auc:PremisesName>")
            < position(&xml, "<auc:PremisesNotes>Test</auc:PremisesNotes>")
    );
    assert_eq!(xml.matches("<auc:Building ").count(), 1);

    let result = engine.process(None, None).unwrap();
    assert_eq!(result.property["property_name"], Value::from("Named Later"));
    assert!(result.messages.warnings.is_empty());
}

#[test]
fn test_existing_values_are_overwritten_in_place() {
    let mut engine = imported("audit_template_office.xml");
    let record = PropertyRecord::default()
        .with_field("property_type", "Mixed use commercial")
        .with_field("latitude", 39.75);
    let xml = engine.export(Some(&record), None).unwrap();

    assert_eq!(xml.matches("<auc:BuildingClassification>").count(), 1);
    assert!(xml.contains("<auc:BuildingClassification>Mixed use commercial</auc:BuildingClassification>"));
    assert!(position(&xml, "</auc:Address>") < position(&xml, "<auc:Latitude>39.75</auc:Latitude>"));
    assert!(
        position(&xml, "<auc:Latitude>") < position(&xml, "<auc:BuildingClassification>")
    );
}

#[test]
fn test_default_namespace_document_exports_prefixed() {
    let mut engine = engine();
    engine.import_bytes(&fixture("default_namespace.xml")).unwrap();
    let record = PropertyRecord::default().with_field("property_notes", "Reconciled");
    let xml = engine.export(Some(&record), None).unwrap();

    assert!(xml.contains("<auc:BuildingSync"));
    assert!(xml.contains("xmlns:auc=\"http://buildingsync.net/schemas/bedes-auc/2019\""));
    assert!(!xml.contains("<Building "));
    assert!(
        position(&xml, "<auc:PremisesName>")
            < position(&xml, "<auc:PremisesNotes>Reconciled</auc:PremisesNotes>")
    );
    assert!(
        position(&xml, "<auc:PremisesNotes>") < position(&xml, "<auc:YearOfConstruction>")
    );
}

#[test]
fn test_imported_property_exports_back_unchanged() {
    let mut engine = imported("textual_values.xml");
    let untouched = engine.export(None, None).unwrap();
    let result = engine.process(None, None).unwrap();
    assert!(result.messages.warnings.is_empty(), "{:?}", result.messages.warnings);
    assert_eq!(result.property["gross_floor_area"], Value::Number(1500.5));
    assert_eq!(result.property["year_built"], Value::Integer(1967));

    let mapping = engine.mapping(None).unwrap();
    let primary = mapping.primary_group().unwrap();
    let record = primary
        .value_rules()
        .fold(PropertyRecord::default(), |record, (field, _)| {
            let value = result
                .property
                .get(field)
                .unwrap_or_else(|| panic!("field '{field}' was not imported"));
            record.with_field(field, ExportValue::from(value.clone()))
        });
    let exported = engine.export(Some(&record), None).unwrap();

    for text in [
        "<auc:FloorAreaValue>1500.50</auc:FloorAreaValue>",
        "<auc:FloorAreaValue>1.2e3</auc:FloorAreaValue>",
        "<auc:YearOfConstruction>1967.0</auc:YearOfConstruction>",
        "<auc:YearOfLastMajorRemodel>+2005</auc:YearOfLastMajorRemodel>",
        "<auc:Latitude>39.97800</auc:Latitude>",
        "<auc:IdentifierValue>00123</auc:IdentifierValue>",
    ] {
        assert!(exported.contains(text), "{text} missing from:\n{exported}");
    }
    assert_eq!(untouched, exported);
}

#[test]
fn test_deeply_nested_document_exports_on_a_small_stack() {
    const DEPTH: usize = 3_000;
    let xml = format!(
        r#"<auc:BuildingSync xmlns:auc="http://buildingsync.net/schemas/bedes-auc/2019" version="2.0"><auc:Facilities><auc:Facility>{}{}</auc:Facility></auc:Facilities></auc:BuildingSync>"#,
        "<auc:UserDefinedFields>".repeat(DEPTH),
        "</auc:UserDefinedFields>".repeat(DEPTH),
    );
    let mut engine = engine();
    engine.import_bytes(xml.as_bytes()).unwrap();
    engine.catalog().get("2.0").unwrap();

    let exported = std::thread::Builder::new()
        .stack_size(256 * 1024)
        .spawn(move || {
            let record = PropertyRecord::default().with_field("property_name", "Deep");
            engine.export(Some(&record), None)
        })
        .unwrap()
        .join()
        .unwrap()
        .unwrap();

    assert!(exported.contains("<auc:PremisesName>Deep</auc:PremisesName>"));
    assert_eq!(exported.matches("<auc:UserDefinedFields>").count(), DEPTH - 1);
    assert_eq!(exported.matches("<auc:UserDefinedFields/>").count(), 1);
}
