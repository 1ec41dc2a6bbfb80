//! Declarative path rules mapping document content to record fields.
//!
//! A [`Mapping`] is a set of named [`RuleGroup`]s. Each group has a boundary
//! path (absolute from the root for top-level groups, relative to the
//! enclosing instance for nested ones) and a set of rules keyed by target
//! field. Repeatable groups yield one record per boundary match.
//!
//! ```yaml
//! primary: property
//! groups:
//!   property:
//!     path: Facilities/Facility/Sites/Site/Buildings/Building
//!     rules:
//!       property_name: { path: PremisesName }
//!       building_id: { value: "@ID" }
//!       gross_floor_area:
//!         path: FloorAreas/FloorArea[FloorAreaType="Gross"]/FloorAreaValue
//!         type: decimal
//!   scenarios:
//!     path: Facilities/Facility/Reports/Report/Scenarios/Scenario
//!     repeat: true
//!     rules:
//!       resource_uses:
//!         group: { path: ResourceUses/ResourceUse, repeat: true, rules: { ... } }
//! ```

mod base;

pub use base::base_mapping;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ParsingError;
use crate::path::Path;

/// Where a rule's value lives on the located element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValueMode {
    /// Element text.
    #[default]
    Text,
    /// Named attribute (`@name`).
    Attribute(String),
    /// Local name of the element itself. Read-only.
    Tag,
}

impl fmt::Display for ValueMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueMode::Text => f.write_str("text"),
            ValueMode::Attribute(name) => write!(f, "@{name}"),
            ValueMode::Tag => f.write_str("tag"),
        }
    }
}

impl TryFrom<String> for ValueMode {
    type Error = ParsingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "text" => Ok(ValueMode::Text),
            "tag" => Ok(ValueMode::Tag),
            other => match other.strip_prefix('@') {
                Some(name) if !name.is_empty() => Ok(ValueMode::Attribute(name.to_string())),
                _ => Err(ParsingError::config(format!(
                    "unknown value mode '{other}' (expected 'text', 'tag' or '@attribute')"
                ))),
            },
        }
    }
}

impl From<ValueMode> for String {
    fn from(mode: ValueMode) -> Self {
        mode.to_string()
    }
}

/// How raw text is converted into a [`Value`](crate::value::Value).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    Text,
    Decimal,
    Integer,
    Boolean,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueType::Text => "text",
            ValueType::Decimal => "decimal",
            ValueType::Integer => "integer",
            ValueType::Boolean => "boolean",
        })
    }
}

/// A single field rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathRule {
    /// Path from the group instance; empty means the instance itself.
    #[serde(default)]
    pub path: Path,
    #[serde(default, rename = "value")]
    pub mode: ValueMode,
    #[serde(default, rename = "type")]
    pub value_type: ValueType,
    /// Unresolved required rules produce a warning; optional ones only log.
    #[serde(default)]
    pub required: bool,
}

impl PathRule {
    pub fn text(path: &str) -> Result<Self, ParsingError> {
        Ok(Self {
            path: Path::parse(path)?,
            mode: ValueMode::Text,
            value_type: ValueType::Text,
            required: false,
        })
    }

    pub fn with_mode(mut self, mode: ValueMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A rule is either a scalar field or a nested group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rule {
    Group { group: RuleGroup },
    Value(PathRule),
}

/// A boundary path plus the rules applied at each boundary match.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleGroup {
    #[serde(default)]
    pub path: Path,
    #[serde(default)]
    pub repeat: bool,
    #[serde(default)]
    pub rules: IndexMap<String, Rule>,
}

impl RuleGroup {
    /// Scalar rules only, in declaration order.
    pub fn value_rules(&self) -> impl Iterator<Item = (&str, &PathRule)> {
        self.rules.iter().filter_map(|(field, rule)| match rule {
            Rule::Value(rule) => Some((field.as_str(), rule)),
            Rule::Group { .. } => None,
        })
    }
}

fn default_primary() -> String {
    "property".to_string()
}

/// An override-aware set of rule groups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    /// The single-record group whose fields become top-level properties.
    #[serde(default = "default_primary")]
    pub primary: String,
    #[serde(default)]
    pub groups: IndexMap<String, RuleGroup>,
}

impl Default for Mapping {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            groups: IndexMap::new(),
        }
    }
}

impl Mapping {
    pub fn from_yaml_str(input: &str) -> Result<Self, ParsingError> {
        serde_yaml::from_str(input)
            .map_err(|e| ParsingError::config(format!("invalid mapping YAML: {e}")))
    }

    pub fn from_json_str(input: &str) -> Result<Self, ParsingError> {
        serde_json::from_str(input)
            .map_err(|e| ParsingError::config(format!("invalid mapping JSON: {e}")))
    }

    /// Load a mapping file; `.json` is read as JSON, anything else as YAML.
    pub fn from_path(path: &std::path::Path) -> Result<Self, ParsingError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    pub fn primary_group(&self) -> Option<&RuleGroup> {
        self.groups.get(&self.primary)
    }

    /// Check the structural requirements extraction relies on.
    pub fn validate(&self) -> Result<(), ParsingError> {
        match self.primary_group() {
            None => Err(ParsingError::config(format!(
                "primary group '{}' is not defined",
                self.primary
            ))),
            Some(group) if group.repeat => Err(ParsingError::config(format!(
                "primary group '{}' must not repeat",
                self.primary
            ))),
            Some(_) => Ok(()),
        }
    }

    /// Overlay `custom` onto `self`.
    ///
    /// Rules in `custom` replace same-named rules of the same group outright,
    /// nested groups included. Groups missing from `self` are added whole. A
    /// non-empty custom group path replaces the boundary path.
    pub fn merged(&self, custom: &Mapping) -> Mapping {
        let mut result = self.clone();
        for (name, custom_group) in &custom.groups {
            match result.groups.get_mut(name) {
                Some(group) => {
                    if !custom_group.path.is_empty() {
                        group.path = custom_group.path.clone();
                    }
                    for (field, rule) in &custom_group.rules {
                        group.rules.insert(field.clone(), rule.clone());
                    }
                }
                None => {
                    result.groups.insert(name.clone(), custom_group.clone());
                }
            }
        }
        result
    }
}
