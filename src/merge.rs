//! Stream merging: interleaving two annotation event sequences over one text.
//!
//! [`merge`] consumes an *original* and a *secondary* event sequence (both
//! produced by [`extract`](crate::stream::extract) over trees that flatten to
//! the same plain text) and renders a single well-nested markup string that
//! preserves both annotations. The secondary annotation knows nothing about
//! the original's tag boundaries, so secondary spans may start or end
//! strictly inside an original span; the merger splits the open secondary
//! tags around each run of original events and reopens them afterwards, the
//! "structural interruption" that keeps the output well-nested.
//!
//! Inputs are validated up front; a malformed sequence yields a
//! [`MergeError`] instead of corrupted output.

use crate::escape::escape_html;
use crate::stream::{AnnotationEvent, EventKind, EventSequence};
use crate::tree::{is_void_tag, Tag};
use std::fmt;

/// Which input sequence an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamId {
    Original,
    Secondary,
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamId::Original => write!(f, "original"),
            StreamId::Secondary => write!(f, "secondary"),
        }
    }
}

/// Errors raised when an input sequence violates the merge preconditions.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeError {
    /// The sequence is not a well-nested event stream (non-monotonic
    /// offsets, an unmatched or mismatched close, a close for a void tag,
    /// or a tag left open at the end).
    MalformedSequence { stream: StreamId, detail: String },
    /// An event offset lies beyond the plain text or inside a multi-byte
    /// character.
    OffsetOutOfRange {
        stream: StreamId,
        offset: usize,
        len: usize,
    },
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::MalformedSequence { stream, detail } => {
                write!(f, "malformed {} sequence: {}", stream, detail)
            }
            MergeError::OffsetOutOfRange {
                stream,
                offset,
                len,
            } => write!(
                f,
                "offset {} in {} sequence is not a valid position in text of length {}",
                offset, stream, len
            ),
        }
    }
}

impl std::error::Error for MergeError {}

/// Which sequence the selection rule picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamPick {
    Original,
    Secondary,
}

/// The selection rule: earliest front offset wins; on a tie, the original
/// stream is picked exactly when the secondary front is an `Open`, so that a
/// close at a shared boundary is flushed before a new tag opens there.
fn select_stream(
    original: Option<&AnnotationEvent>,
    secondary: Option<&AnnotationEvent>,
) -> Option<StreamPick> {
    match (original, secondary) {
        (None, None) => None,
        (Some(_), None) => Some(StreamPick::Original),
        (None, Some(_)) => Some(StreamPick::Secondary),
        (Some(orig), Some(sec)) => {
            if orig.offset != sec.offset {
                if orig.offset < sec.offset {
                    Some(StreamPick::Original)
                } else {
                    Some(StreamPick::Secondary)
                }
            } else if sec.kind == EventKind::Open {
                Some(StreamPick::Original)
            } else {
                Some(StreamPick::Secondary)
            }
        }
    }
}

/// Check that `seq` is a valid, well-nested event stream over `text`.
fn validate_sequence(
    seq: &EventSequence,
    stream: StreamId,
    text: &str,
) -> Result<(), MergeError> {
    let mut last_offset = 0;
    let mut open_names: Vec<&str> = Vec::new();

    for event in seq.iter() {
        if event.offset > text.len() || !text.is_char_boundary(event.offset) {
            return Err(MergeError::OffsetOutOfRange {
                stream,
                offset: event.offset,
                len: text.len(),
            });
        }
        if event.offset < last_offset {
            return Err(MergeError::MalformedSequence {
                stream,
                detail: format!(
                    "offset {} goes backwards from {}",
                    event.offset, last_offset
                ),
            });
        }
        last_offset = event.offset;

        match event.kind {
            EventKind::Open => {
                // Void tags never close, so they never go on the stack.
                if !event.tag.is_void() {
                    open_names.push(&event.tag.name);
                }
            }
            EventKind::Close => {
                if is_void_tag(&event.tag.name) {
                    return Err(MergeError::MalformedSequence {
                        stream,
                        detail: format!("close event for void tag <{}>", event.tag.name),
                    });
                }
                match open_names.pop() {
                    Some(open_name) if open_name.eq_ignore_ascii_case(&event.tag.name) => {}
                    Some(open_name) => {
                        return Err(MergeError::MalformedSequence {
                            stream,
                            detail: format!(
                                "close </{}> does not match open <{}>",
                                event.tag.name, open_name
                            ),
                        })
                    }
                    None => {
                        return Err(MergeError::MalformedSequence {
                            stream,
                            detail: format!("close </{}> with no matching open", event.tag.name),
                        })
                    }
                }
            }
        }
    }

    if let Some(open_name) = open_names.last() {
        return Err(MergeError::MalformedSequence {
            stream,
            detail: format!("<{}> is never closed", open_name),
        });
    }
    Ok(())
}

fn render_event(event: &AnnotationEvent, out: &mut String) {
    match event.kind {
        EventKind::Open => event.tag.write_open(out),
        EventKind::Close => event.tag.write_close(out),
    }
}

/// Merge two annotation event sequences over `text` into one markup string.
///
/// Both sequences must describe well-nested annotations of `text` (the
/// extractor produces such sequences by construction); offsets are byte
/// offsets into `text`. Stripping every tag from the output yields exactly
/// the HTML-escaped form of `text`, and the output's tags are balanced and
/// correctly nested.
pub fn merge(
    mut original: EventSequence,
    mut secondary: EventSequence,
    text: &str,
) -> Result<String, MergeError> {
    validate_sequence(&original, StreamId::Original, text)?;
    validate_sequence(&secondary, StreamId::Secondary, text)?;

    let mut processed = 0;
    let mut result = String::with_capacity(text.len() * 2);
    // Secondary tags currently open in the output. These are the spans that
    // get split and rejoined around runs of original events.
    let mut open_stack: Vec<Tag> = Vec::new();

    while let Some(pick) = select_stream(original.front(), secondary.front()) {
        match pick {
            StreamPick::Original => {
                let event = match original.pop_front() {
                    Some(event) => event,
                    None => break,
                };
                result.push_str(&escape_html(&text[processed..event.offset]));
                processed = event.offset;

                // Structural interruption: suspend the open secondary tags,
                // apply the whole run of original events at this offset,
                // then resume the secondary tags in their original order.
                for tag in open_stack.iter().rev() {
                    tag.write_close(&mut result);
                }
                render_event(&event, &mut result);
                while matches!(
                    select_stream(original.front(), secondary.front()),
                    Some(StreamPick::Original)
                ) && original.front().is_some_and(|next| next.offset == processed)
                {
                    if let Some(next) = original.pop_front() {
                        render_event(&next, &mut result);
                    }
                }
                for tag in &open_stack {
                    tag.write_open(&mut result);
                }
            }
            StreamPick::Secondary => {
                let event = match secondary.pop_front() {
                    Some(event) => event,
                    None => break,
                };
                result.push_str(&escape_html(&text[processed..event.offset]));
                processed = event.offset;

                match event.kind {
                    EventKind::Open => {
                        event.tag.write_open(&mut result);
                        if !event.tag.is_void() {
                            open_stack.push(event.tag);
                        }
                    }
                    EventKind::Close => {
                        if open_stack.pop().is_none() {
                            // Unreachable for validated input; refuse to emit
                            // an unbalanced close.
                            return Err(MergeError::MalformedSequence {
                                stream: StreamId::Secondary,
                                detail: format!(
                                    "close </{}> with no open secondary tag",
                                    event.tag.name
                                ),
                            });
                        }
                        event.tag.write_close(&mut result);
                    }
                }
            }
        }
    }

    result.push_str(&escape_html(&text[processed..]));
    Ok(result)
}
