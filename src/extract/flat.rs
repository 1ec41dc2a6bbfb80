//! Absolute-path-as-key extraction of the primary group.
//!
//! Used for tabular previews where each column is identified by the
//! document path it was read from, e.g.
//! `Facilities/Facility/Sites/Site/Buildings/Building/@ID`.

use indexmap::IndexMap;

use super::extractor::{Extractor, read_value};
use crate::diagnostics::Messages;
use crate::mapping::{Mapping, PathRule, ValueMode};
use crate::navigate::find_all;
use crate::value::Value;
use crate::xml::XmlTree;

/// Values keyed by absolute path.
pub type FlatRecord = IndexMap<String, Value>;

/// Absolute key for a primary-group rule.
pub fn absolute_key(group_path: &crate::path::Path, rule: &PathRule) -> String {
    let mut key = group_path.join(&rule.path).to_string();
    if let ValueMode::Attribute(name) = &rule.mode {
        if !key.is_empty() {
            key.push('/');
        }
        key.push('@');
        key.push_str(name);
    }
    key
}

/// Target field to absolute key, for the primary group's scalar rules.
pub fn field_paths(mapping: &Mapping) -> IndexMap<String, String> {
    let Some(group) = mapping.primary_group() else {
        return IndexMap::new();
    };
    group
        .value_rules()
        .map(|(field, rule)| (field.to_string(), absolute_key(&group.path, rule)))
        .collect()
}

impl Extractor<'_> {
    /// Extract only the primary group, keyed by absolute path.
    pub fn extract_flat(&self, tree: &XmlTree) -> (FlatRecord, Messages) {
        let mut messages = Messages::new();
        let mut record = FlatRecord::new();
        let Some(group) = self.mapping().primary_group() else {
            return (record, messages);
        };
        let Some(&instance) = find_all(tree, tree.root(), &group.path).first() else {
            messages.warn(format!("Could not find '{}'", group.path));
            return (record, messages);
        };

        for (field, rule) in group.value_rules() {
            if let Some(value) = read_value(tree, instance, field, rule, &mut messages) {
                record.insert(absolute_key(&group.path, rule), value);
            }
        }
        (record, messages)
    }
}
