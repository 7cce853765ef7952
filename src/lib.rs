//! # markweave
//!
//! Merge two independently computed annotation markups over the same plain
//! text into a single well-nested markup string.
//!
//! The problem: an *original* annotation (say, inline diff markers already
//! present as nested tags) and a *secondary* annotation (say, syntax
//! highlighting computed fresh from the plain text) are layered over the
//! same text, but the secondary one was produced with no knowledge of the
//! original's tag boundaries. Naively nesting one inside the other loses
//! data or produces invalid markup; markweave splits and rejoins spans at
//! the boundaries instead.
//!
//! The pipeline:
//!
//! ```text
//! original tree ──► extract ──► original events ─┐
//!                                                ├─► merge ──► markup string
//! secondary tree ─► extract ──► secondary events ┘
//!                              (plain text feeds the literal segments)
//! ```
//!
//! - [`stream::extract`] linearizes a tree into `(offset, Open/Close, tag)`
//!   events over the flattened plain text.
//! - [`merge::merge`] interleaves the two event sequences, temporarily
//!   closing and reopening open secondary tags wherever an original tag
//!   boundary lands inside a secondary span.
//! - [`reader::parse_markup`] turns serialized markup back into a tree for
//!   the CLI and tests; [`pipeline::MergePipeline`] drives the whole flow
//!   against an external [`pipeline::Annotator`].

pub mod escape;
pub mod merge;
pub mod pipeline;
pub mod reader;
pub mod stream;
pub mod testing;
pub mod tree;

pub use escape::escape_html;
pub use merge::{merge, MergeError, StreamId};
pub use pipeline::{AnnotateError, Annotator, MergePipeline, PipelineError};
pub use reader::{parse_markup, ParseError};
pub use stream::{extract, AnnotationEvent, EventKind, EventSequence};
pub use tree::{is_void_tag, Element, Node, Tag, VOID_TAG_NAMES};
