//! Schema type definitions, reduced to what ordering needs.
//!
//! Only the element structure of an XSD is kept: global elements, named
//! complex types, named model groups, and for every complex type the
//! flattened list of child element particles in declaration order.
//!
//! ```text
//! Schema
//! ├── elements:      name → TypeRef       (global <xs:element>)
//! ├── complex_types: name → ComplexType   (named <xs:complexType>)
//! └── groups:        name → [Particle]    (named <xs:group>)
//! ```
//!
//! Child lookup goes through the parent's path from the document root, so
//! two elements sharing a tag in different contexts resolve to their own
//! declarations.

mod catalog;
mod order;
mod xsd;

pub use catalog::{DirectorySchemas, EmbeddedSchemas, SchemaCatalog, SchemaSource};
pub use order::OrderResolver;

use rustc_hash::FxHashMap;

use crate::error::ParsingError;

/// Bound on type indirections (base types, refs, groups) followed per lookup.
const MAX_TYPE_DEPTH: usize = 32;

/// How an element declaration gets its content model.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TypeRef {
    /// Simple or unspecified content; no child elements.
    #[default]
    Simple,
    /// `type="prefix:Name"`.
    Named(String),
    /// Anonymous `<xs:complexType>` inside the element.
    Inline(Box<ComplexType>),
    /// `ref="prefix:Name"` to a global element.
    Global(String),
}

/// One entry of a content model.
#[derive(Clone, Debug, PartialEq)]
pub enum Particle {
    Element { name: String, ty: TypeRef },
    Group(String),
}

/// Element-bearing content of a complex type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComplexType {
    /// `complexContent/extension/@base`, whose particles come first.
    pub base: Option<String>,
    pub particles: Vec<Particle>,
}

/// A loaded schema for one format version. Immutable once built.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    version: String,
    elements: FxHashMap<String, TypeRef>,
    complex_types: FxHashMap<String, ComplexType>,
    groups: FxHashMap<String, Vec<Particle>>,
}

impl Schema {
    /// Build a schema from XSD source text.
    pub fn from_xsd(version: impl Into<String>, xsd: &str) -> Result<Self, ParsingError> {
        xsd::load(version.into(), xsd)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn has_element(&self, name: &str) -> bool {
        self.elements.contains_key(name)
    }

    /// Declared child element names of the element at `path` (local names,
    /// root first), in sequence order.
    pub fn child_sequence(&self, path: &[&str]) -> Option<Vec<&str>> {
        let (first, rest) = path.split_first()?;
        let mut current = self.resolve(self.elements.get(*first)?, 0)?;
        for name in rest {
            let children = self.expanded(current);
            let (_, ty) = children.into_iter().find(|(child, _)| child == name)?;
            current = self.resolve(ty, 0)?;
        }
        Some(
            self.expanded(current)
                .into_iter()
                .map(|(name, _)| name)
                .collect(),
        )
    }

    fn resolve<'a>(&'a self, ty: &'a TypeRef, depth: usize) -> Option<&'a ComplexType> {
        match ty {
            TypeRef::Simple => None,
            TypeRef::Named(name) => self.complex_types.get(name),
            TypeRef::Inline(complex) => Some(&**complex),
            TypeRef::Global(name) if depth < MAX_TYPE_DEPTH => {
                self.resolve(self.elements.get(name)?, depth + 1)
            }
            TypeRef::Global(_) => None,
        }
    }

    fn expanded<'a>(&'a self, complex: &'a ComplexType) -> Vec<(&'a str, &'a TypeRef)> {
        let mut out = Vec::new();
        self.expand_type(complex, &mut out, 0);
        out
    }

    fn expand_type<'a>(
        &'a self,
        complex: &'a ComplexType,
        out: &mut Vec<(&'a str, &'a TypeRef)>,
        depth: usize,
    ) {
        if depth >= MAX_TYPE_DEPTH {
            return;
        }
        if let Some(base) = complex
            .base
            .as_deref()
            .and_then(|base| self.complex_types.get(base))
        {
            self.expand_type(base, out, depth + 1);
        }
        self.expand_particles(&complex.particles, out, depth);
    }

    fn expand_particles<'a>(
        &'a self,
        particles: &'a [Particle],
        out: &mut Vec<(&'a str, &'a TypeRef)>,
        depth: usize,
    ) {
        for particle in particles {
            match particle {
                Particle::Element { name, ty } => out.push((name.as_str(), ty)),
                Particle::Group(group) if depth < MAX_TYPE_DEPTH => {
                    if let Some(inner) = self.groups.get(group) {
                        self.expand_particles(inner, out, depth + 1);
                    }
                }
                Particle::Group(_) => {}
            }
        }
    }
}
