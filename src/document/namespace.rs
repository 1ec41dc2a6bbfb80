//! Rebuilding documents that lack the `auc` prefix binding.
//!
//! Documents written against the default namespace (`<BuildingSync xmlns=…>`)
//! or with a different prefix are copied into a fresh root so every element
//! is `auc:`-qualified, which is what element creation assumes.

use crate::base::{AUC_PREFIX, ROOT_ELEMENT, namespace, schema_location};
use crate::xml::{NodeId, XmlTree};

/// Whether the root does not declare the `auc` prefix.
pub fn needs_reconcile(tree: &XmlTree) -> bool {
    !tree.namespaces(tree.root()).contains_key(AUC_PREFIX)
}

/// A root element with the canonical declarations for `version`.
pub fn fresh_root(version: &str) -> XmlTree {
    let mut tree = XmlTree::new(format!("{AUC_PREFIX}:{ROOT_ELEMENT}"));
    let root = tree.root();
    tree.set_attribute(root, format!("xmlns:{AUC_PREFIX}"), namespace::AUC);
    tree.set_attribute(root, "xmlns:xsi", namespace::XSI);
    tree.set_attribute(root, "xsi:schemaLocation", schema_location(version));
    tree.set_attribute(root, "version", version);
    tree
}

/// Copy `source` under a fresh root, re-prefixing every element with `auc:`.
///
/// Attributes and text are carried over unchanged, in original order. The
/// walk uses an explicit stack so document depth is not bounded by the call
/// stack.
pub fn reconcile(source: &XmlTree, version: &str) -> XmlTree {
    let mut target = fresh_root(version);
    let mut stack: Vec<(NodeId, NodeId)> = source
        .children(source.root())
        .iter()
        .rev()
        .map(|&child| (child, target.root()))
        .collect();

    if let Some(text) = source.text(source.root()) {
        let root = target.root();
        target.set_text(root, text);
    }

    while let Some((node, parent)) = stack.pop() {
        let element = source.element(node);
        let copy = target.append_child(parent, format!("{AUC_PREFIX}:{}", element.local_name()));
        for (name, value) in &element.attributes {
            target.set_attribute(copy, name.as_str(), value.as_str());
        }
        if let Some(text) = &element.text {
            target.set_text(copy, text.as_str());
        }
        stack.extend(source.children(node).iter().rev().map(|&child| (child, copy)));
    }

    tracing::info!(
        "Rebuilt document under the '{AUC_PREFIX}' prefix ({} elements)",
        target.len()
    );
    target
}
