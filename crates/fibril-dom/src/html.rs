use std::fmt::Write;

use fibril_core::PropValue;

use crate::{Document, NodeId, NodeKind};

pub(crate) fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let Some(node) = doc.node(id) else { return };
    match &node.kind {
        NodeKind::Text => {
            if let Some(text) = node.text() {
                escape_into(&text, out);
            }
        }
        NodeKind::Element(tag) => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in &node.properties {
                match value {
                    PropValue::Bool(false) | PropValue::Listener(_) => {}
                    PropValue::Bool(true) => {
                        let _ = write!(out, " {name}");
                    }
                    _ => {
                        let _ = write!(out, " {name}=\"");
                        escape_into(&value.to_string(), out);
                        out.push('"');
                    }
                }
            }
            out.push('>');
            for &child in &node.children {
                write_node(doc, child, out);
            }
            let _ = write!(out, "</{tag}>");
        }
    }
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
