//! HTML serialization for debugging and dumps.

use crate::node::{NodeData, NodeId};
use crate::tree::DomTree;

const VOID_ELEMENTS: &[&str] = &["source", "track", "img", "br", "hr", "input", "meta", "link"];

/// Serialize the outer HTML of a node on one line.
pub fn serialize_node(tree: &DomTree, node: NodeId) -> String {
    let mut output = String::new();
    write_node(tree, node, &mut output, None, 0);
    output
}

/// Serialize the outer HTML of a node with two-space indentation.
pub fn serialize_pretty(tree: &DomTree, node: NodeId) -> String {
    let mut output = String::new();
    write_node(tree, node, &mut output, Some("  "), 0);
    output
}

fn write_node(tree: &DomTree, node: NodeId, out: &mut String, indent: Option<&str>, depth: usize) {
    let Some(node_data) = tree.get(node) else {
        return;
    };

    match &node_data.data {
        NodeData::Document => {
            for child in tree.children(node) {
                write_node(tree, child, out, indent, depth);
            }
        }
        NodeData::Element(elem) => {
            pad(out, indent, depth);
            out.push('<');
            out.push_str(elem.tag_name.as_str());
            if !elem.attributes.is_empty() {
                out.push(' ');
                out.push_str(&elem.attributes.to_html());
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&elem.tag_name.as_str()) {
                newline(out, indent);
                return;
            }

            let has_children = node_data.child_count() > 0;
            if has_children {
                newline(out, indent);
                for child in tree.children(node) {
                    write_node(tree, child, out, indent, depth + 1);
                }
                pad(out, indent, depth);
            }
            out.push_str("</");
            out.push_str(elem.tag_name.as_str());
            out.push('>');
            newline(out, indent);
        }
        NodeData::Text { content } => {
            pad(out, indent, depth);
            out.push_str(&escape_text(content));
            newline(out, indent);
        }
    }
}

fn pad(out: &mut String, indent: Option<&str>, depth: usize) {
    if let Some(indent) = indent {
        out.push_str(&indent.repeat(depth));
    }
}

fn newline(out: &mut String, indent: Option<&str>) {
    if indent.is_some() {
        out.push('\n');
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
