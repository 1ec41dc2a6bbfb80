//! Pluggable asset extraction merged into import results.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::value::Value;

/// A named value contributed by an [`AssetExtractor`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetPair {
    pub name: String,
    pub value: Value,
}

impl AssetPair {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Derives extra property fields from the imported file.
///
/// Pairs are merged into the top-level fields verbatim, overwriting any
/// field of the same name.
pub trait AssetExtractor {
    fn extract(&self, path: &Path) -> Vec<AssetPair>;
}

impl<F> AssetExtractor for F
where
    F: Fn(&Path) -> Vec<AssetPair>,
{
    fn extract(&self, path: &Path) -> Vec<AssetPair> {
        self(path)
    }
}
