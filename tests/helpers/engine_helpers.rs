//! Shared engine fixtures for integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use bsync::engine::BuildingSync;
use bsync::schema::SchemaCatalog;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name)).unwrap_or_else(|e| panic!("missing fixture {name}: {e}"))
}

pub fn engine() -> BuildingSync {
    BuildingSync::new(Arc::new(SchemaCatalog::embedded()))
}

/// A session with `name` imported from disk.
pub fn imported(name: &str) -> BuildingSync {
    let mut engine = engine();
    engine.import_file(&fixture_path(name)).unwrap();
    engine
}
