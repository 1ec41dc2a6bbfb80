//! Read-only path walking.

use crate::path::{Path, Step};
use crate::xml::{NodeId, XmlTree};

/// Outcome of walking a path from a start element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigateResult {
    /// Deepest element matched (the start element when nothing matched).
    pub element: NodeId,
    /// Steps that could not be matched; empty on a full match.
    pub remainder: Path,
}

impl NavigateResult {
    pub fn is_complete(&self) -> bool {
        self.remainder.is_empty()
    }

    /// The matched element, only when the whole path resolved.
    pub fn found(&self) -> Option<NodeId> {
        self.is_complete().then_some(self.element)
    }
}

/// Whether `child` satisfies a single step.
pub fn step_matches(tree: &XmlTree, child: NodeId, step: &Step) -> bool {
    match step {
        Step::Any => true,
        Step::Literal(tag) => tree.local_name(child) == tag,
        Step::Predicated {
            tag,
            child: predicate,
            expected,
        } => {
            tree.local_name(child) == tag
                && tree
                    .children_named(child, predicate)
                    .any(|candidate| tree.text(candidate).map(str::trim) == Some(expected.as_str()))
        }
    }
}

/// Walk `path` from `start`.
///
/// Returns the first full match in document order. When there is none, the
/// deepest partial match is returned along with the steps it failed on.
pub fn navigate(tree: &XmlTree, start: NodeId, path: &Path) -> NavigateResult {
    let steps = path.steps();
    let mut deepest = (start, 0usize);
    let mut stack = vec![(start, 0usize)];

    while let Some((node, depth)) = stack.pop() {
        if depth > deepest.1 {
            deepest = (node, depth);
        }
        let Some(step) = steps.get(depth) else {
            return NavigateResult {
                element: node,
                remainder: Path::default(),
            };
        };
        for &child in tree.children(node).iter().rev() {
            if step_matches(tree, child, step) {
                stack.push((child, depth + 1));
            }
        }
    }

    NavigateResult {
        element: deepest.0,
        remainder: path.suffix(deepest.1),
    }
}

/// Every element reachable from `start` through `path`, in document order.
pub fn find_all(tree: &XmlTree, start: NodeId, path: &Path) -> Vec<NodeId> {
    let mut frontier = vec![start];
    for step in path.steps() {
        frontier = frontier
            .into_iter()
            .flat_map(|node| {
                tree.children(node)
                    .iter()
                    .copied()
                    .filter(|&child| step_matches(tree, child, step))
                    .collect::<Vec<_>>()
            })
            .collect();
        if frontier.is_empty() {
            break;
        }
    }
    frontier
}
