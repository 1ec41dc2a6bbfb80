//! Sibling ordering from the schema's declared element sequences.

use super::Schema;
use crate::xml::{NodeId, XmlTree};

/// Ranks child tags by their position in the parent type's sequence.
#[derive(Clone, Copy, Debug)]
pub struct OrderResolver<'a> {
    schema: &'a Schema,
}

impl<'a> OrderResolver<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Declared child sequence of `parent`, looked up by its path from the root.
    pub fn sequence(&self, tree: &XmlTree, parent: NodeId) -> Option<Vec<&'a str>> {
        self.schema.child_sequence(&tree.path_from_root(parent))
    }

    /// Rank of `tag` under `parent`; `None` when the schema does not declare it.
    pub fn rank(&self, tree: &XmlTree, parent: NodeId, tag: &str) -> Option<usize> {
        self.sequence(tree, parent)?
            .iter()
            .position(|name| *name == tag)
    }

    /// Index at which a new `tag` child keeps the siblings ordered by rank.
    ///
    /// The new element lands after every sibling of lower or equal rank, so
    /// repeated tags keep their insertion order and unranked tags go last.
    pub fn insertion_index(&self, tree: &XmlTree, parent: NodeId, tag: &str) -> usize {
        let sequence = self.sequence(tree, parent);
        let sort_key = |name: &str| {
            sequence
                .as_ref()
                .and_then(|sequence| sequence.iter().position(|n| *n == name))
                .unwrap_or(usize::MAX)
        };

        let new_key = sort_key(tag);
        tree.children(parent)
            .iter()
            .rposition(|&child| sort_key(tree.local_name(child)) <= new_key)
            .map_or(0, |index| index + 1)
    }
}
