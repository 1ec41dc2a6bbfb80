//! Serialize an [`XmlTree`] back to indented XML bytes.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

use super::tree::{NodeId, XmlTree};
use crate::error::ParsingError;

/// Write the whole tree with an XML declaration and two-space indentation.
pub fn serialize(tree: &XmlTree) -> Result<Vec<u8>, ParsingError> {
    let mut buffer = Cursor::new(Vec::new());
    let mut writer = Writer::new_with_indent(&mut buffer, b' ', 2);

    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    write_element(&mut writer, tree, tree.root())?;

    let mut output = buffer.into_inner();
    output.push(b'\n');
    Ok(output)
}

/// Serialize to a `String`.
pub fn to_string(tree: &XmlTree) -> Result<String, ParsingError> {
    let bytes = serialize(tree)?;
    String::from_utf8(bytes).map_err(|e| ParsingError::xml(format!("Invalid UTF-8: {e}")))
}

enum Frame {
    Enter(NodeId),
    Exit(NodeId),
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    tree: &XmlTree,
    root: NodeId,
) -> Result<(), ParsingError> {
    let mut stack = vec![Frame::Enter(root)];

    while let Some(frame) = stack.pop() {
        let id = match frame {
            Frame::Enter(id) => id,
            Frame::Exit(id) => {
                let end = BytesEnd::new(tree.name(id));
                write_event(writer, Event::End(end))?;
                continue;
            }
        };

        let element = tree.element(id);
        let mut start = BytesStart::new(element.name.as_str());
        for (key, value) in &element.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        let children = tree.children(id);
        let text = element.text.as_deref().filter(|t| !t.is_empty());

        if children.is_empty() && text.is_none() {
            write_event(writer, Event::Empty(start))?;
            continue;
        }

        write_event(writer, Event::Start(start))?;
        if let Some(text) = text {
            write_event(writer, Event::Text(BytesText::new(text)))?;
        }

        stack.push(Frame::Exit(id));
        stack.extend(children.iter().rev().map(|&child| Frame::Enter(child)));
    }
    Ok(())
}

fn write_event<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), ParsingError> {
    writer
        .write_event(event)
        .map_err(|e| ParsingError::xml(format!("Write error: {e}")))
}
