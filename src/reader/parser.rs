//! Tag classification and tree construction for the markup reader.
//!
//! Consumes the raw token stream from [`lexer`](crate::reader::lexer),
//! decodes character entities into plain text, extracts tag names and
//! attributes, and folds everything into an [`Element`] tree rooted in a
//! synthetic container. Void tags and self-closing syntax both produce leaf
//! elements; an explicit close for a void tag is an error.

use crate::reader::lexer::{tokenize, Token};
use crate::reader::ParseError;
use crate::tree::{is_void_tag, Element, Node, Tag};
use once_cell::sync::Lazy;
use regex::Regex;

/// Tag name: letter first, then letters/digits/dashes.
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9-]*").unwrap());

/// One attribute: `name`, `name="value"`, `name='value'`, or `name=bare`.
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([a-zA-Z_:][a-zA-Z0-9_:.-]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .unwrap()
});

/// A classified tag token.
enum TagForm {
    Open { tag: Tag, self_closing: bool },
    Close { name: String },
}

/// Parse a serialized markup fragment into a tree under a synthetic root.
///
/// The returned element's own tag is the container; callers interested in
/// the fragment itself use its children, its
/// [`plain_text`](Element::plain_text), or hand it to
/// [`extract`](crate::stream::extract) directly.
pub fn parse_markup(source: &str) -> Result<Element, ParseError> {
    let tokens = tokenize(source)?;

    let mut root = Element::root(Vec::new());
    let mut open: Vec<Element> = Vec::new();

    for (token, span) in tokens {
        let raw = &source[span.clone()];
        match token {
            Token::Text => push_text(&mut root, &mut open, raw),
            Token::Ampersand => push_text(&mut root, &mut open, "&"),
            Token::Entity => {
                let decoded = decode_entity(raw);
                push_text(&mut root, &mut open, &decoded);
            }
            Token::Tag => match classify_tag(raw, span.start)? {
                TagForm::Open { tag, self_closing } => {
                    if self_closing || tag.is_void() {
                        let leaf = Node::Element(Element::new(tag, Vec::new()));
                        target(&mut root, &mut open).children.push(leaf);
                    } else {
                        open.push(Element::new(tag, Vec::new()));
                    }
                }
                TagForm::Close { name } => {
                    if is_void_tag(&name) {
                        return Err(ParseError::CloseForVoidTag {
                            name,
                            at: span.start,
                        });
                    }
                    let element = match open.pop() {
                        Some(element) => element,
                        None => {
                            return Err(ParseError::UnexpectedClose {
                                name,
                                at: span.start,
                            })
                        }
                    };
                    if !element.tag.name.eq_ignore_ascii_case(&name) {
                        return Err(ParseError::MismatchedClose {
                            expected: element.tag.name,
                            found: name,
                            at: span.start,
                        });
                    }
                    target(&mut root, &mut open)
                        .children
                        .push(Node::Element(element));
                }
            },
        }
    }

    if let Some(element) = open.pop() {
        return Err(ParseError::UnclosedTag {
            name: element.tag.name,
        });
    }
    Ok(root)
}

/// The element new children currently attach to.
fn target<'a>(root: &'a mut Element, open: &'a mut Vec<Element>) -> &'a mut Element {
    match open.last_mut() {
        Some(element) => element,
        None => root,
    }
}

/// Append text, coalescing with a trailing text leaf so entity-split runs
/// come out as one node.
fn push_text(root: &mut Element, open: &mut Vec<Element>, text: &str) {
    let children = &mut target(root, open).children;
    if let Some(Node::Text(existing)) = children.last_mut() {
        existing.push_str(text);
    } else {
        children.push(Node::Text(text.to_string()));
    }
}

/// Classify the inside of a `<...>` token and extract name plus attributes.
fn classify_tag(raw: &str, at: usize) -> Result<TagForm, ParseError> {
    let bad = || ParseError::BadTag {
        raw: raw.to_string(),
        at,
    };

    // Strip the angle brackets; the lexer guarantees they are present.
    let inner = raw
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .ok_or_else(bad)?;

    if let Some(close_inner) = inner.strip_prefix('/') {
        let name = close_inner.trim();
        if !NAME_RE.is_match(name) || NAME_RE.find(name).map(|m| m.end()) != Some(name.len()) {
            return Err(bad());
        }
        return Ok(TagForm::Close {
            name: name.to_string(),
        });
    }

    let (inner, self_closing) = match inner.strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };

    let name_match = NAME_RE.find(inner).ok_or_else(bad)?;
    if name_match.start() != 0 {
        return Err(bad());
    }
    let name = name_match.as_str().to_string();

    let mut attributes = Vec::new();
    for capture in ATTR_RE.captures_iter(&inner[name_match.end()..]) {
        let attr_name = match capture.get(1) {
            Some(m) => m.as_str().to_string(),
            None => continue,
        };
        let value = capture
            .get(2)
            .or_else(|| capture.get(3))
            .or_else(|| capture.get(4))
            .map(|m| m.as_str())
            .unwrap_or("");
        attributes.push((attr_name, decode_text(value)));
    }

    Ok(TagForm::Open {
        tag: Tag::with_attributes(name, attributes),
        self_closing,
    })
}

/// Decode one character reference; unknown named entities stay literal.
fn decode_entity(raw: &str) -> String {
    let body = &raw[1..raw.len() - 1]; // strip '&' and ';'
    let decoded = match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => body
            .strip_prefix("#x")
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .or_else(|| body.strip_prefix('#').and_then(|dec| dec.parse().ok()))
            .and_then(char::from_u32),
    };
    match decoded {
        Some(ch) => ch.to_string(),
        None => raw.to_string(),
    }
}

/// Decode the entities inside an attribute value.
fn decode_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tail.find(';') {
            Some(end) => {
                out.push_str(&decode_entity(&tail[..=end]));
                rest = &tail[end + 1..];
            }
            None => {
                out.push_str(tail);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Element, Node, Tag};

    #[test]
    fn test_parse_flat_fragment() {
        let root = parse_markup("a<em>b</em>c").unwrap();
        assert_eq!(
            root.children,
            vec![
                Node::text("a"),
                Node::element(Tag::new("em"), vec![Node::text("b")]),
                Node::text("c"),
            ]
        );
    }

    #[test]
    fn test_parse_attributes_in_order() {
        let root = parse_markup(r#"<span class="hljs" data-x='1' checked>x</span>"#).unwrap();
        let Node::Element(element) = &root.children[0] else {
            panic!("expected element");
        };
        assert_eq!(
            element.tag.attributes,
            vec![
                ("class".to_string(), "hljs".to_string()),
                ("data-x".to_string(), "1".to_string()),
                ("checked".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_entities_decode_and_coalesce() {
        let root = parse_markup("a &amp; b &lt;ok&gt; &#x27;q&#39;").unwrap();
        assert_eq!(root.children, vec![Node::text("a & b <ok> 'q'")]);
    }

    #[test]
    fn test_unknown_entity_stays_literal() {
        let root = parse_markup("&bogus; &amp;").unwrap();
        assert_eq!(root.children, vec![Node::text("&bogus; &")]);
    }

    #[test]
    fn test_attribute_values_decode_entities() {
        let root = parse_markup(r#"<a title="x &amp; y"></a>"#).unwrap();
        let Node::Element(element) = &root.children[0] else {
            panic!("expected element");
        };
        assert_eq!(element.tag.attributes[0].1, "x & y");
    }

    #[test]
    fn test_void_tag_needs_no_close() {
        let root = parse_markup("a<br>b<img src='x'>c").unwrap();
        assert_eq!(root.children.len(), 5);
        assert!(matches!(&root.children[1], Node::Element(e) if e.tag.name == "br"));
        assert!(matches!(&root.children[3], Node::Element(e) if e.tag.name == "img"));
    }

    #[test]
    fn test_self_closing_syntax_makes_a_leaf() {
        let root = parse_markup("<x/><y />").unwrap();
        assert_eq!(root.children.len(), 2);
        assert!(matches!(&root.children[0], Node::Element(e) if e.children.is_empty()));
    }

    #[test]
    fn test_close_for_void_tag_is_an_error() {
        let err = parse_markup("<br></br>").unwrap_err();
        assert!(matches!(err, ParseError::CloseForVoidTag { .. }));
    }

    #[test]
    fn test_mismatched_close_is_an_error() {
        let err = parse_markup("<em>x</strong>").unwrap_err();
        assert_eq!(
            err,
            ParseError::MismatchedClose {
                expected: "em".to_string(),
                found: "strong".to_string(),
                at: 5,
            }
        );
    }

    #[test]
    fn test_unexpected_close_is_an_error() {
        let err = parse_markup("x</em>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedClose { .. }));
    }

    #[test]
    fn test_unclosed_tag_is_an_error() {
        let err = parse_markup("<em>x").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnclosedTag {
                name: "em".to_string()
            }
        );
    }

    #[test]
    fn test_round_trip_through_inner_markup() {
        let source = r#"<span class="add">a &amp; b</span><br>tail"#;
        let root = parse_markup(source).unwrap();
        assert_eq!(root.inner_markup(), source);
    }

    #[test]
    fn test_nested_structure() {
        let root = parse_markup("<div><em>a<strong>b</strong></em></div>").unwrap();
        let expected = Element::root(vec![Node::element(
            Tag::new("div"),
            vec![Node::element(
                Tag::new("em"),
                vec![
                    Node::text("a"),
                    Node::element(Tag::new("strong"), vec![Node::text("b")]),
                ],
            )],
        )]);
        assert_eq!(root, expected);
    }
}
