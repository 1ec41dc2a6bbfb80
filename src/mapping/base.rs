//! The bundled mapping.

use super::Mapping;
use crate::base::is_supported_version;
use crate::error::ParsingError;

const BASE_MAPPING: &str = include_str!("base_mapping.yaml");

/// Base mapping for `version`.
///
/// Every supported version currently shares one mapping; the version is
/// still checked so callers get the same error as schema lookup.
pub fn base_mapping(version: &str) -> Result<Mapping, ParsingError> {
    if !is_supported_version(version) {
        return Err(ParsingError::unsupported_version(version));
    }
    let mapping = Mapping::from_yaml_str(BASE_MAPPING)?;
    mapping.validate()?;
    Ok(mapping)
}
