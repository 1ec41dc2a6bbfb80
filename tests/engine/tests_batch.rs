//! Archive imports and config-driven batch processing.

use std::io::Write;
use std::sync::Arc;

use bsync::EngineConfig;
use bsync::engine::{BatchImporter, PathCachePolicy};
use bsync::schema::SchemaCatalog;
use bsync::value::Value;
use crate::helpers::engine_helpers::fixture;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Zip the named fixtures into a temporary file and read it back.
fn fixture_archive(names: &[&str]) -> Vec<u8> {
    let file = tempfile::NamedTempFile::new().unwrap();
    {
        let mut zip = ZipWriter::new(file.reopen().unwrap());
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        zip.add_directory("audits/", options).unwrap();
        for name in names {
            zip.start_file(format!("audits/{name}"), options).unwrap();
            zip.write_all(&fixture(name)).unwrap();
        }
        zip.start_file("README.txt", options).unwrap();
        zip.write_all(b"fixtures").unwrap();
        zip.finish().unwrap();
    }
    std::fs::read(file.path()).unwrap()
}

fn importer() -> BatchImporter {
    BatchImporter::new(Arc::new(SchemaCatalog::embedded()))
}

#[test]
fn test_archive_members_import_independently() {
    let bytes = fixture_archive(&[
        "audit_template_office.xml",
        "premises_notes.xml",
        "default_namespace.xml",
    ]);
    let members = importer().import_archive(&bytes).unwrap();

    let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "audits/audit_template_office.xml",
            "audits/premises_notes.xml",
            "audits/default_namespace.xml",
        ]
    );

    let office = members[0].result.as_ref().unwrap();
    assert_eq!(office.scenarios.len(), 2);
    let notes = members[1].result.as_ref().unwrap();
    assert_eq!(notes.property["property_notes"], Value::from("Test"));
    // The marker in the first member does not leak into the third.
    let warehouse = members[2].result.as_ref().unwrap();
    assert_eq!(warehouse.scenarios.len(), 1);
}

#[test]
fn test_preview_keys_fields_by_absolute_path() {
    let bytes = fixture_archive(&["audit_template_office.xml", "premises_notes.xml"]);
    let preview = importer().preview_archive(&bytes).unwrap();

    assert_eq!(
        preview.field_paths["property_name"],
        "Facilities/Facility/Sites/Site/Buildings/Building/PremisesName"
    );
    assert_eq!(
        preview.field_paths["building_id"],
        "Facilities/Facility/Sites/Site/Buildings/Building/@ID"
    );
    assert_eq!(preview.rows.len(), 2);
    assert_eq!(
        preview.rows[0].values["property_name"],
        Value::from("Civic Center Office")
    );
    assert_eq!(preview.rows[0].values["gross_floor_area"], Value::Number(45000.0));
    assert!(!preview.rows[1].values.contains_key("property_name"));
    assert_eq!(preview.messages.warnings.len(), 1);
    assert!(preview.messages.warnings[0].contains("PremisesName"));
}

#[test]
fn test_config_drives_batch_importer() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("mappings")).unwrap();
    std::fs::write(
        dir.path().join("mappings").join("notes.json"),
        r#"{"groups": {"property": {"rules": {"summary": {"path": "PremisesNotes"}}}}}"#,
    )
    .unwrap();
    let config_path = dir.path().join("bsync.yaml");
    std::fs::write(
        &config_path,
        "path_cache: per_file\ncustom_mapping: mappings/notes.json\n",
    )
    .unwrap();

    let config = EngineConfig::load(&config_path).unwrap();
    assert_eq!(config.path_cache, PathCachePolicy::PerFile);
    let importer = config
        .batch_importer(Arc::new(config.catalog()))
        .unwrap();

    let bytes = fixture_archive(&["premises_notes.xml", "default_namespace.xml"]);
    let preview = importer.preview_archive(&bytes).unwrap();
    assert_eq!(preview.rows[0].values["summary"], Value::from("Test"));
    assert!(!preview.rows[1].values.contains_key("summary"));
    assert_eq!(
        preview.rows[1].values["property_name"],
        Value::from("Warehouse & Depot")
    );

    let members = importer.import_archive(&bytes).unwrap();
    let notes = members[0].result.as_ref().unwrap();
    assert_eq!(notes.property["summary"], Value::from("Test"));
}

#[test]
fn test_missing_custom_mapping_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("bsync.yaml");
    std::fs::write(&config_path, "custom_mapping: absent.yaml\n").unwrap();

    let config = EngineConfig::load(&config_path).unwrap();
    assert!(config.batch_importer(Arc::new(config.catalog())).is_err());
}
