//! HTML escaping for literal text and attribute values.
//!
//! Every literal slice of plain text that reaches the merged output, and
//! every attribute value in a serialized tag, goes through [`escape_html`].
//! The escaped set is the five characters that are unsafe in either text or
//! attribute position: `&`, `<`, `>`, `"`, `'`.

use std::borrow::Cow;

/// Escape the HTML-special characters of `value`.
///
/// Returns a borrowed slice when nothing needs escaping, which is the common
/// case for code text.
pub fn escape_html(value: &str) -> Cow<'_, str> {
    let first = match value.find(['&', '<', '>', '"', '\'']) {
        Some(idx) => idx,
        None => return Cow::Borrowed(value),
    };

    let mut escaped = String::with_capacity(value.len() + 8);
    escaped.push_str(&value[..first]);
    for ch in value[first..].chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
