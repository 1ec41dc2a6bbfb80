//! Version resolution for BuildingSync documents.
//!
//! Attempts, in order:
//!
//! 1. the root `version` attribute;
//! 2. the Audit Template tool marker, which implies a fixed default version;
//! 3. the version token embedded in `xsi:schemaLocation`.

use regex::Regex;
use std::sync::LazyLock;

use crate::base::{
    AUDIT_TEMPLATE_DEFAULT_VERSION, AUDIT_TEMPLATE_MARKER, ROOT_ELEMENT, is_supported_version,
};
use crate::error::ParsingError;
use crate::navigate::find_all;
use crate::path::{Path, Step};
use crate::xml::XmlTree;

static SCHEMA_LOCATION_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/v?(\d+\.\d+(?:\.\d+)?(?:-pr\d+)?)/BuildingSync\.xsd").expect("static regex")
});

fn marker_path() -> Path {
    let literal = |tag: &str| Step::Literal(tag.to_string());
    Path::from_steps(vec![
        literal("Facilities"),
        literal("Facility"),
        literal("Reports"),
        literal("Report"),
        literal("UserDefinedFields"),
        Step::Predicated {
            tag: "UserDefinedField".to_string(),
            child: "FieldName".to_string(),
            expected: AUDIT_TEMPLATE_MARKER.to_string(),
        },
    ])
}

/// Whether the document was produced by the Audit Template tool.
pub fn is_audit_template(tree: &XmlTree) -> bool {
    !find_all(tree, tree.root(), &marker_path()).is_empty()
}

/// Version token found in a `schemaLocation` value, if any.
pub fn version_from_schema_location(location: &str) -> Option<&str> {
    SCHEMA_LOCATION_VERSION
        .captures(location)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Resolve the document's schema version.
pub fn resolve_version(tree: &XmlTree) -> Result<String, ParsingError> {
    let root = tree.root();
    let found = tree.local_name(root);
    if found != ROOT_ELEMENT {
        return Err(ParsingError::RootMismatch {
            expected: ROOT_ELEMENT,
            found: found.to_string(),
        });
    }

    if let Some(version) = tree.attribute(root, "version") {
        let version = version.trim();
        if !is_supported_version(version) {
            return Err(ParsingError::unsupported_version(version));
        }
        tracing::debug!("Version {version} from root attribute");
        return Ok(version.to_string());
    }

    if is_audit_template(tree) {
        tracing::debug!(
            "Audit Template marker present, assuming version {AUDIT_TEMPLATE_DEFAULT_VERSION}"
        );
        return Ok(AUDIT_TEMPLATE_DEFAULT_VERSION.to_string());
    }

    let Some(location) = tree.attribute(root, "schemaLocation") else {
        return Err(ParsingError::UnresolvedVersion(
            "no version attribute, tool marker or schemaLocation".to_string(),
        ));
    };
    match version_from_schema_location(location) {
        Some(version) if is_supported_version(version) => {
            tracing::debug!("Version {version} from schemaLocation");
            Ok(version.to_string())
        }
        Some(version) => Err(ParsingError::unsupported_version(version)),
        None => Err(ParsingError::UnresolvedVersion(format!(
            "no version token in schemaLocation '{location}'"
        ))),
    }
}
