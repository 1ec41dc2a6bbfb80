//! Event-driven parse of XML bytes into an [`XmlTree`].

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::tree::{NodeId, XmlTree};
use crate::error::ParsingError;

/// Parse a complete XML document.
///
/// Whitespace-only text is trimmed; comments, processing instructions and
/// the declaration are dropped.
pub fn parse(input: &[u8]) -> Result<XmlTree, ParsingError> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut tree: Option<XmlTree> = None;
    let mut stack: Vec<NodeId> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let id = open_element(&mut tree, &stack, e)?;
                stack.push(id);
            }
            Ok(Event::Empty(ref e)) => {
                open_element(&mut tree, &stack, e)?;
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| ParsingError::xml(format!("Text error: {e}")))?;
                if let (Some(tree), Some(&top)) = (tree.as_mut(), stack.last()) {
                    tree.push_text(top, &text);
                }
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                if let (Some(tree), Some(&top)) = (tree.as_mut(), stack.last()) {
                    tree.push_text(top, &text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParsingError::xml(format!(
                    "XML parse error at position {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ParsingError::xml("Unexpected end of document: unclosed element"));
    }
    tree.ok_or_else(|| ParsingError::xml("Document has no root element"))
}

fn open_element(
    tree: &mut Option<XmlTree>,
    stack: &[NodeId],
    e: &BytesStart<'_>,
) -> Result<NodeId, ParsingError> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|e| ParsingError::xml(format!("Invalid tag name: {e}")))?
        .to_string();
    let attributes = read_attributes(e)?;

    match tree.as_mut() {
        Some(existing) => {
            let Some(&parent) = stack.last() else {
                return Err(ParsingError::xml("Multiple root elements"));
            };
            let id = existing.append_child(parent, name);
            for (key, value) in attributes {
                existing.set_attribute(id, key, value);
            }
            Ok(id)
        }
        None => {
            let mut new_tree = XmlTree::new(name);
            let root = new_tree.root();
            for (key, value) in attributes {
                new_tree.set_attribute(root, key, value);
            }
            *tree = Some(new_tree);
            Ok(root)
        }
    }
}

fn read_attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, ParsingError> {
    let mut attributes = Vec::new();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| ParsingError::xml(format!("Attribute error: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| ParsingError::xml(format!("Attribute key error: {e}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| ParsingError::xml(format!("Attribute value error: {e}")))?
            .to_string();
        attributes.push((key, value));
    }
    Ok(attributes)
}
