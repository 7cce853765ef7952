//! Annotation tree value types.
//!
//! A tree is an [`Element`] whose children are [`Node`]s: text leaves
//! carrying plain-text runs, and nested elements carrying a [`Tag`]. Tags are
//! immutable snapshots taken at tree-construction time (name plus ordered
//! attribute pairs), so nothing in the merge pipeline depends on a live
//! document surviving past extraction.

use crate::escape::escape_html;
use serde::{Deserialize, Serialize};

/// Tag names that never receive a matching close event.
///
/// Matching is by exact (case-insensitive) name; a custom tag whose name
/// merely contains one of these is not void.
pub const VOID_TAG_NAMES: [&str; 4] = ["br", "hr", "img", "input"];

/// Whether `name` is in the fixed void-tag set.
pub fn is_void_tag(name: &str) -> bool {
    VOID_TAG_NAMES.iter().any(|void| name.eq_ignore_ascii_case(void))
}

/// An immutable tag snapshot: name plus attributes in insertion order.
///
/// Attribute names are not uniqueness-checked; they serialize in the order
/// they were stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl Tag {
    /// Create a tag with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Create a tag with the given attribute pairs.
    pub fn with_attributes(
        name: impl Into<String>,
        attributes: Vec<(String, String)>,
    ) -> Self {
        Tag {
            name: name.into(),
            attributes,
        }
    }

    /// Whether this tag is in the void set (no close event).
    pub fn is_void(&self) -> bool {
        is_void_tag(&self.name)
    }

    /// Append this tag's opening form (`<name a="v">`) to `out`.
    ///
    /// The name renders lowercased; attribute values are escaped.
    pub fn write_open(&self, out: &mut String) {
        out.push('<');
        push_lowercase(out, &self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
        out.push('>');
    }

    /// Append this tag's closing form (`</name>`) to `out`.
    pub fn write_close(&self, out: &mut String) {
        out.push_str("</");
        push_lowercase(out, &self.name);
        out.push('>');
    }
}

fn push_lowercase(out: &mut String, name: &str) {
    for ch in name.chars() {
        out.extend(ch.to_lowercase());
    }
}

/// One node of an annotation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// A run of plain text.
    Text(String),
    /// A tagged element with children.
    Element(Element),
}

impl Node {
    /// Convenience constructor for a text leaf.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// Convenience constructor for an element node.
    pub fn element(tag: Tag, children: Vec<Node>) -> Self {
        Node::Element(Element { tag, children })
    }
}

/// A tagged element and its children.
///
/// Also serves as the synthetic root container for a parsed fragment; the
/// root's own tag is never emitted by extraction or serialization helpers
/// that operate on children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: Tag,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with the given tag and children.
    pub fn new(tag: Tag, children: Vec<Node>) -> Self {
        Element { tag, children }
    }

    /// Create a synthetic root container around a parsed fragment.
    pub fn root(children: Vec<Node>) -> Self {
        Element::new(Tag::new("root"), children)
    }

    /// Flatten this element's subtree into its plain text.
    ///
    /// Void elements contribute their descendant text too; voidness only
    /// affects close-event emission, not offset accounting.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        collect_text(&self.children, &mut text);
        text
    }

    /// Serialize this element's children back to escaped markup.
    ///
    /// The element's own tag is not rendered; this is the inner-markup view
    /// of the container.
    pub fn inner_markup(&self) -> String {
        let mut out = String::new();
        write_nodes(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(value) => out.push_str(value),
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(value) => out.push_str(&escape_html(value)),
            Node::Element(element) => {
                element.tag.write_open(out);
                write_nodes(&element.children, out);
                if !element.tag.is_void() {
                    element.tag.write_close(out);
                }
            }
        }
    }
}
