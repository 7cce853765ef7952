//! Stream extraction: linearizing an annotation tree into boundary events.
//!
//! [`extract`] walks a tree depth-first and records, for every element, an
//! `Open` event at the byte offset where its span starts in the flattened
//! plain text and a `Close` event where it ends. Text nodes only advance the
//! running offset. The resulting [`EventSequence`] is non-decreasing in
//! offset and well-nested by construction, which is the precondition the
//! merger relies on.

use crate::tree::{Element, Node, Tag};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Whether an event marks the start or the end of a tag's span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Open,
    Close,
}

/// One tag-boundary record: a tag opening or closing at a text offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationEvent {
    /// Byte offset into the flattened plain text.
    pub offset: usize,
    pub kind: EventKind,
    /// Snapshot of the tag this boundary belongs to. Close events carry the
    /// same snapshot as their Open so either can be serialized alone.
    pub tag: Tag,
}

impl AnnotationEvent {
    pub fn open(offset: usize, tag: Tag) -> Self {
        AnnotationEvent {
            offset,
            kind: EventKind::Open,
            tag,
        }
    }

    pub fn close(offset: usize, tag: Tag) -> Self {
        AnnotationEvent {
            offset,
            kind: EventKind::Close,
            tag,
        }
    }
}

/// An ordered queue of annotation events, consumed strictly from the front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSequence {
    events: VecDeque<AnnotationEvent>,
}

impl EventSequence {
    pub fn new() -> Self {
        EventSequence::default()
    }

    /// The event that would be consumed next, if any.
    pub fn front(&self) -> Option<&AnnotationEvent> {
        self.events.front()
    }

    /// Consume and return the front event.
    pub fn pop_front(&mut self) -> Option<AnnotationEvent> {
        self.events.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Iterate the remaining events front to back without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &AnnotationEvent> {
        self.events.iter()
    }
}

impl From<Vec<AnnotationEvent>> for EventSequence {
    fn from(events: Vec<AnnotationEvent>) -> Self {
        EventSequence {
            events: events.into(),
        }
    }
}

impl FromIterator<AnnotationEvent> for EventSequence {
    fn from_iter<I: IntoIterator<Item = AnnotationEvent>>(iter: I) -> Self {
        EventSequence {
            events: iter.into_iter().collect(),
        }
    }
}

/// Linearize `root`'s children into an event sequence.
///
/// The root element itself emits no events; it is the container whose inner
/// content the offsets describe. Void elements emit only an Open — their
/// children are still walked so the running offset stays consistent with
/// [`Element::plain_text`].
pub fn extract(root: &Element) -> EventSequence {
    let mut events = Vec::new();
    walk(&root.children, 0, &mut events);
    events.into()
}

fn walk(nodes: &[Node], mut offset: usize, events: &mut Vec<AnnotationEvent>) -> usize {
    for node in nodes {
        match node {
            Node::Text(value) => offset += value.len(),
            Node::Element(element) => {
                events.push(AnnotationEvent::open(offset, element.tag.clone()));
                offset = walk(&element.children, offset, events);
                if !element.tag.is_void() {
                    events.push(AnnotationEvent::close(offset, element.tag.clone()));
                }
            }
        }
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tag;

    fn kinds_and_offsets(seq: &EventSequence) -> Vec<(EventKind, usize, &str)> {
        seq.iter()
            .map(|e| (e.kind, e.offset, e.tag.name.as_str()))
            .collect()
    }

    #[test]
    fn test_extract_empty_root() {
        let root = Element::root(vec![]);
        assert!(extract(&root).is_empty());
    }

    #[test]
    fn test_extract_text_only_emits_nothing() {
        let root = Element::root(vec![Node::text("just text")]);
        assert!(extract(&root).is_empty());
    }

    #[test]
    fn test_extract_single_element() {
        let root = Element::root(vec![
            Node::text("ab"),
            Node::element(Tag::new("em"), vec![Node::text("cde")]),
            Node::text("f"),
        ]);
        let seq = extract(&root);
        assert_eq!(
            kinds_and_offsets(&seq),
            vec![(EventKind::Open, 2, "em"), (EventKind::Close, 5, "em")]
        );
    }

    #[test]
    fn test_extract_nested_elements() {
        let root = Element::root(vec![Node::element(
            Tag::new("span"),
            vec![
                Node::text("a"),
                Node::element(Tag::new("strong"), vec![Node::text("bb")]),
            ],
        )]);
        let seq = extract(&root);
        assert_eq!(
            kinds_and_offsets(&seq),
            vec![
                (EventKind::Open, 0, "span"),
                (EventKind::Open, 1, "strong"),
                (EventKind::Close, 3, "strong"),
                (EventKind::Close, 3, "span"),
            ]
        );
    }

    #[test]
    fn test_void_element_emits_no_close() {
        let root = Element::root(vec![
            Node::text("a"),
            Node::element(Tag::new("br"), vec![]),
            Node::text("b"),
        ]);
        let seq = extract(&root);
        assert_eq!(kinds_and_offsets(&seq), vec![(EventKind::Open, 1, "br")]);
    }

    #[test]
    fn test_void_element_children_still_advance_offset() {
        // Voidness suppresses the close event, not offset accounting.
        let root = Element::root(vec![
            Node::element(Tag::new("img"), vec![Node::text("alt")]),
            Node::element(Tag::new("em"), vec![Node::text("x")]),
        ]);
        let seq = extract(&root);
        assert_eq!(
            kinds_and_offsets(&seq),
            vec![
                (EventKind::Open, 0, "img"),
                (EventKind::Open, 3, "em"),
                (EventKind::Close, 4, "em"),
            ]
        );
    }

    #[test]
    fn test_offsets_are_byte_offsets() {
        let root = Element::root(vec![
            Node::text("λλ"),
            Node::element(Tag::new("em"), vec![Node::text("x")]),
        ]);
        let seq = extract(&root);
        // Two two-byte characters precede the element.
        assert_eq!(seq.front().unwrap().offset, 4);
    }
}
