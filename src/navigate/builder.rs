//! Materializing missing path steps at schema-ranked positions.

use super::navigator::navigate;
use crate::error::ParsingError;
use crate::path::{Path, Step};
use crate::schema::OrderResolver;
use crate::xml::{NodeId, XmlTree};

/// Creates elements for unmatched path steps.
///
/// New siblings are placed by [`OrderResolver::insertion_index`], so an
/// element is never inserted before a lower-ranked sibling or after a
/// higher-ranked one.
#[derive(Clone, Copy, Debug)]
pub struct TreeBuilder<'a> {
    order: OrderResolver<'a>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(order: OrderResolver<'a>) -> Self {
        Self { order }
    }

    /// Locate `path` from `start`, creating whatever is missing.
    pub fn ensure(&self, tree: &mut XmlTree, start: NodeId, path: &Path) -> Result<NodeId, ParsingError> {
        let result = navigate(tree, start, path);
        let mut current = result.element;
        for step in result.remainder.steps() {
            current = self.materialize(tree, current, step, path)?;
        }
        Ok(current)
    }

    fn materialize(
        &self,
        tree: &mut XmlTree,
        parent: NodeId,
        step: &Step,
        path: &Path,
    ) -> Result<NodeId, ParsingError> {
        match step {
            Step::Literal(tag) => Ok(self.insert(tree, parent, tag)),
            Step::Predicated {
                tag,
                child,
                expected,
            } => {
                let element = self.insert(tree, parent, tag);
                let predicate = self.insert(tree, element, child);
                tree.set_text(predicate, expected.as_str());
                Ok(element)
            }
            Step::Any => Err(ParsingError::invalid_path(
                path.to_string(),
                "wildcard steps cannot be materialized",
            )),
        }
    }

    /// Insert a `tag` child under `parent`, sharing the parent's prefix.
    pub fn insert(&self, tree: &mut XmlTree, parent: NodeId, tag: &str) -> NodeId {
        let index = self.order.insertion_index(tree, parent, tag);
        let name = match tree.element(parent).prefix() {
            Some(prefix) => format!("{prefix}:{tag}"),
            None => tag.to_string(),
        };
        tracing::trace!("Inserting <{name}> at index {index}");
        tree.insert_child(parent, index, name)
    }
}
