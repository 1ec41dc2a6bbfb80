//! Applying a [`Mapping`] to a document tree.

use crate::diagnostics::Messages;
use crate::mapping::{Mapping, PathRule, Rule, RuleGroup, ValueMode, ValueType};
use crate::navigate::{find_all, navigate};
use crate::path::Path;
use crate::value::{RawRecord, RawValue, Value};
use crate::xml::{NodeId, XmlTree};

/// Raw extraction output: group name to record (single groups) or list of
/// records (repeatable groups).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractionResult {
    pub groups: RawRecord,
    pub messages: Messages,
}

impl ExtractionResult {
    pub fn record(&self, group: &str) -> Option<&RawRecord> {
        self.groups.get(group).and_then(RawValue::as_record)
    }

    pub fn list(&self, group: &str) -> &[RawRecord] {
        self.groups
            .get(group)
            .and_then(RawValue::as_list)
            .unwrap_or_default()
    }
}

/// Read-only evaluator for a mapping. Never creates elements.
#[derive(Clone, Copy, Debug)]
pub struct Extractor<'m> {
    mapping: &'m Mapping,
}

impl<'m> Extractor<'m> {
    pub fn new(mapping: &'m Mapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &'m Mapping {
        self.mapping
    }

    /// Evaluate every group from the document root.
    pub fn extract(&self, tree: &XmlTree) -> ExtractionResult {
        let mut messages = Messages::new();
        let mut groups = RawRecord::new();
        for (name, group) in &self.mapping.groups {
            let value = self.extract_group(tree, tree.root(), group, &mut messages);
            groups.insert(name.clone(), value);
        }
        ExtractionResult { groups, messages }
    }

    fn extract_group(
        &self,
        tree: &XmlTree,
        start: NodeId,
        group: &RuleGroup,
        messages: &mut Messages,
    ) -> RawValue {
        let instances = find_all(tree, start, &group.path);
        tracing::trace!("{} instance(s) of '{}'", instances.len(), group.path);

        if group.repeat {
            return RawValue::List(
                instances
                    .into_iter()
                    .map(|instance| self.extract_instance(tree, instance, group, messages))
                    .collect(),
            );
        }

        match instances.first() {
            Some(&instance) => RawValue::Record(self.extract_instance(tree, instance, group, messages)),
            None => {
                let base = absolute(tree, start, &group.path);
                for (_, rule) in group.value_rules().filter(|(_, rule)| rule.required) {
                    messages.warn(format!("Could not find '{}'", describe(&base, rule)));
                }
                RawValue::Record(RawRecord::new())
            }
        }
    }

    fn extract_instance(
        &self,
        tree: &XmlTree,
        instance: NodeId,
        group: &RuleGroup,
        messages: &mut Messages,
    ) -> RawRecord {
        let mut record = RawRecord::new();
        for (field, rule) in &group.rules {
            match rule {
                Rule::Value(rule) => {
                    if let Some(value) = read_value(tree, instance, field, rule, messages) {
                        record.insert(field.clone(), RawValue::Scalar(value));
                    }
                }
                Rule::Group { group: nested } => {
                    let value = self.extract_group(tree, instance, nested, messages);
                    record.insert(field.clone(), value);
                }
            }
        }
        record
    }
}

/// Resolve one rule relative to `instance`.
pub(super) fn read_value(
    tree: &XmlTree,
    instance: NodeId,
    field: &str,
    rule: &PathRule,
    messages: &mut Messages,
) -> Option<Value> {
    let result = navigate(tree, instance, &rule.path);
    let raw = result.found().and_then(|element| match &rule.mode {
        ValueMode::Text => tree.text(element).map(str::trim),
        ValueMode::Attribute(name) => tree.attribute(element, name).map(str::trim),
        ValueMode::Tag => Some(tree.local_name(element)),
    });

    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        let location = describe(&tree.path_from_root(instance).join("/"), rule);
        if rule.required {
            messages.warn(format!("Could not find '{location}' for field '{field}'"));
        } else {
            tracing::debug!("No value at '{location}' for field '{field}'");
        }
        return None;
    };

    match convert(raw, rule.value_type) {
        Some(value) => Some(value),
        None => {
            messages.warn(format!(
                "Could not convert '{raw}' for field '{field}' to {}",
                rule.value_type
            ));
            None
        }
    }
}

/// Convert trimmed element text into a typed value that remembers `raw`.
pub fn convert(raw: &str, value_type: ValueType) -> Option<Value> {
    let typed = match value_type {
        ValueType::Text => return Some(Value::Text(raw.to_string())),
        ValueType::Decimal => raw.parse::<f64>().ok().map(Value::Number),
        ValueType::Integer => raw.parse::<i64>().ok().map(Value::Integer).or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|n| n.fract() == 0.0)
                .map(|n| Value::Integer(n as i64))
        }),
        ValueType::Boolean => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(Value::Boolean(true)),
            "false" | "0" => Some(Value::Boolean(false)),
            _ => None,
        },
    };
    typed.map(|typed| Value::sourced(raw, typed))
}

fn absolute(tree: &XmlTree, start: NodeId, path: &Path) -> String {
    let mut location = tree.path_from_root(start).join("/");
    if !path.is_empty() {
        location.push('/');
        location.push_str(&path.to_string());
    }
    location
}

/// `base/rule-path[/@attribute]` for messages.
fn describe(base: &str, rule: &PathRule) -> String {
    let mut location = base.to_string();
    if !rule.path.is_empty() {
        location.push('/');
        location.push_str(&rule.path.to_string());
    }
    if let ValueMode::Attribute(name) = &rule.mode {
        location.push_str("/@");
        location.push_str(name);
    }
    location
}
