//! Writing export values into located-or-created elements.

use super::builder::TreeBuilder;
use crate::error::ParsingError;
use crate::mapping::ValueMode;
use crate::path::Path;
use crate::value::ExportValue;
use crate::xml::{NodeId, XmlTree};

#[derive(Clone, Copy, Debug)]
pub struct ValueWriter<'a> {
    builder: TreeBuilder<'a>,
}

impl<'a> ValueWriter<'a> {
    pub fn new(builder: TreeBuilder<'a>) -> Self {
        Self { builder }
    }

    /// Write `value` at `path` under `start`.
    ///
    /// Returns `Ok(false)` without touching the tree when there is nothing to
    /// write: a missing value, or a [`ValueMode::Tag`] rule.
    pub fn write(
        &self,
        tree: &mut XmlTree,
        start: NodeId,
        path: &Path,
        mode: &ValueMode,
        value: Option<&ExportValue>,
    ) -> Result<bool, ParsingError> {
        let Some(value) = value else {
            return Ok(false);
        };
        let attribute = match mode {
            ValueMode::Tag => {
                tracing::debug!("Skipping tag-valued rule at '{path}' on export");
                return Ok(false);
            }
            ValueMode::Text => None,
            ValueMode::Attribute(name) => Some(name.as_str()),
        };

        let element = self.builder.ensure(tree, start, path)?;
        let text = value.to_text();
        match attribute {
            Some(name) => tree.set_attribute(element, name, text),
            None => tree.set_text(element, text),
        }
        Ok(true)
    }
}
