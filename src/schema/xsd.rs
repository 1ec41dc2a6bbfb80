//! Read the element structure out of an XSD document.

use rustc_hash::FxHashMap;

use super::{ComplexType, Particle, Schema, TypeRef};
use crate::error::ParsingError;
use crate::xml::{self, NodeId, XmlTree, local_name};

pub(super) fn load(version: String, xsd: &str) -> Result<Schema, ParsingError> {
    let tree = xml::parse(xsd.as_bytes())
        .map_err(|e| ParsingError::schema(format!("schema for version {version}: {e}")))?;
    let root = tree.root();
    if tree.local_name(root) != "schema" {
        return Err(ParsingError::schema(format!(
            "schema for version {version} has root '{}', expected 'schema'",
            tree.name(root)
        )));
    }

    let mut elements = FxHashMap::default();
    let mut complex_types = FxHashMap::default();
    let mut groups = FxHashMap::default();

    for &child in tree.children(root) {
        let Some(name) = tree.attribute(child, "name") else {
            continue;
        };
        let name = name.to_string();
        match tree.local_name(child) {
            "element" => {
                elements.insert(name, element_type(&tree, child));
            }
            "complexType" => {
                complex_types.insert(name, complex_type(&tree, child));
            }
            "group" => {
                let mut particles = Vec::new();
                collect_particles(&tree, child, &mut particles);
                groups.insert(name, particles);
            }
            _ => {}
        }
    }

    tracing::debug!(
        "Loaded schema {version}: {} elements, {} complex types, {} groups",
        elements.len(),
        complex_types.len(),
        groups.len()
    );

    Ok(Schema {
        version,
        elements,
        complex_types,
        groups,
    })
}

fn element_type(tree: &XmlTree, node: NodeId) -> TypeRef {
    if let Some(ty) = tree.attribute(node, "type") {
        return TypeRef::Named(local_name(ty).to_string());
    }
    tree.children(node)
        .iter()
        .find(|&&child| tree.local_name(child) == "complexType")
        .map(|&child| TypeRef::Inline(Box::new(complex_type(tree, child))))
        .unwrap_or_default()
}

fn complex_type(tree: &XmlTree, node: NodeId) -> ComplexType {
    let mut complex = ComplexType::default();
    for &child in tree.children(node) {
        match tree.local_name(child) {
            "sequence" | "choice" | "all" => {
                collect_particles(tree, child, &mut complex.particles);
            }
            "group" => {
                if let Some(reference) = tree.attribute(child, "ref") {
                    complex
                        .particles
                        .push(Particle::Group(local_name(reference).to_string()));
                }
            }
            "complexContent" => {
                for &derivation in tree.children(child) {
                    if !matches!(tree.local_name(derivation), "extension" | "restriction") {
                        continue;
                    }
                    complex.base = tree
                        .attribute(derivation, "base")
                        .map(|base| local_name(base).to_string());
                    collect_particles(tree, derivation, &mut complex.particles);
                }
            }
            _ => {}
        }
    }
    complex
}

fn collect_particles(tree: &XmlTree, container: NodeId, out: &mut Vec<Particle>) {
    for &child in tree.children(container) {
        match tree.local_name(child) {
            "element" => {
                if let Some(reference) = tree.attribute(child, "ref") {
                    let name = local_name(reference).to_string();
                    out.push(Particle::Element {
                        ty: TypeRef::Global(name.clone()),
                        name,
                    });
                } else if let Some(name) = tree.attribute(child, "name") {
                    out.push(Particle::Element {
                        name: name.to_string(),
                        ty: element_type(tree, child),
                    });
                }
            }
            "sequence" | "choice" | "all" => collect_particles(tree, child, out),
            "group" => {
                if let Some(reference) = tree.attribute(child, "ref") {
                    out.push(Particle::Group(local_name(reference).to_string()));
                }
            }
            _ => {}
        }
    }
}
