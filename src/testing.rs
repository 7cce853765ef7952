//! Testing utilities for building trees and checking merged markup.
//!
//! The factories keep test trees short to write; the checkers verify the two
//! output invariants every merge must satisfy — the literal text survives
//! (escaped) once tags are stripped, and a tag-stack parse of the output
//! never underflows and ends empty. Both the crate's own tests and the
//! integration suites under `tests/` use these.

use crate::reader::lexer::{tokenize, Token};
use crate::tree::{is_void_tag, Element, Node, Tag};

/// Build a text leaf.
pub fn text(value: &str) -> Node {
    Node::text(value)
}

/// Build an element node with the given attribute pairs and children.
pub fn el(name: &str, attributes: &[(&str, &str)], children: Vec<Node>) -> Node {
    let attributes = attributes
        .iter()
        .map(|(attr_name, value)| (attr_name.to_string(), value.to_string()))
        .collect();
    Node::Element(Element::new(Tag::with_attributes(name, attributes), children))
}

/// Build a synthetic root container around a fragment.
pub fn root(children: Vec<Node>) -> Element {
    Element::root(children)
}

/// Remove every tag from merged markup, keeping the (still escaped) text.
///
/// Panics on markup the lexer cannot tokenize; merged output is always
/// tokenizable.
pub fn strip_tags(markup: &str) -> String {
    let tokens = tokenize(markup).expect("merged markup must tokenize");
    let mut out = String::new();
    for (token, span) in tokens {
        if !matches!(token, Token::Tag) {
            out.push_str(&markup[span]);
        }
    }
    out
}

/// Assert that `markup` has balanced, correctly nested tags.
///
/// Runs a tag-stack parse over the output: every close must match the
/// innermost open, void tags take no close, and nothing may remain open.
pub fn assert_well_nested(markup: &str) {
    let tokens = tokenize(markup).expect("merged markup must tokenize");
    let mut stack: Vec<String> = Vec::new();

    for (token, span) in tokens {
        if !matches!(token, Token::Tag) {
            continue;
        }
        let raw = &markup[span];
        let inner = &raw[1..raw.len() - 1];
        if let Some(close_name) = inner.strip_prefix('/') {
            let open_name = stack
                .pop()
                .unwrap_or_else(|| panic!("close </{}> underflows the tag stack in {}", close_name, markup));
            assert!(
                open_name.eq_ignore_ascii_case(close_name.trim()),
                "close </{}> does not match open <{}> in {}",
                close_name,
                open_name,
                markup
            );
        } else {
            let name: String = inner
                .chars()
                .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '-')
                .collect();
            if !is_void_tag(&name) {
                stack.push(name);
            }
        }
    }

    assert!(
        stack.is_empty(),
        "unclosed tags {:?} in {}",
        stack,
        markup
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags_keeps_escaped_text() {
        assert_eq!(strip_tags("<em>a &amp; b</em><br>c"), "a &amp; bc");
    }

    #[test]
    fn test_assert_well_nested_accepts_balanced_markup() {
        assert_well_nested("<em><span class=\"x\">a</span></em><br>");
    }

    #[test]
    #[should_panic(expected = "underflows")]
    fn test_assert_well_nested_rejects_underflow() {
        assert_well_nested("a</em>");
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn test_assert_well_nested_rejects_crossed_tags() {
        assert_well_nested("<em><span>a</em></span>");
    }

    #[test]
    #[should_panic(expected = "unclosed")]
    fn test_assert_well_nested_rejects_unclosed_tag() {
        assert_well_nested("<em>a");
    }
}
