//! Format constants for BuildingSync.
//!
//! This module has NO dependencies on other bsync modules.

/// Local name of the document root element.
pub const ROOT_ELEMENT: &str = "BuildingSync";

/// Prefix BuildingSync documents conventionally bind to [`namespace::AUC`].
pub const AUC_PREFIX: &str = "auc";

/// Versions we ship schemas and mappings for.
pub const SUPPORTED_VERSIONS: &[&str] = &["2.0", "2.2.0", "2.3.0", "2.4.0"];

/// Version implied by the Audit Template tool marker when nothing else says.
pub const AUDIT_TEMPLATE_DEFAULT_VERSION: &str = "2.0";

/// `FieldName` of the user-defined field Audit Template stamps into its reports.
pub const AUDIT_TEMPLATE_MARKER: &str = "Audit Template Tool";

/// Namespace URIs.
pub mod namespace {
    /// BuildingSync (BEDES-AUC) namespace.
    pub const AUC: &str = "http://buildingsync.net/schemas/bedes-auc/2019";
    /// XSI namespace for schemaLocation.
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
}

pub fn is_supported_version(version: &str) -> bool {
    SUPPORTED_VERSIONS.contains(&version)
}

/// Canonical `xsi:schemaLocation` value for a version.
pub fn schema_location(version: &str) -> String {
    let tag = if version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{version}")
    };
    format!(
        "{} https://raw.githubusercontent.com/BuildingSync/schema/{tag}/BuildingSync.xsd",
        namespace::AUC
    )
}
