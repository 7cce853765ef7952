//! High-level merge pipeline.
//!
//! [`MergePipeline`] ties the pieces together the way the surrounding system
//! uses them: take an already-annotated tree, flatten its plain text, hand
//! the text to an external [`Annotator`] for a fresh secondary annotation,
//! extract both trees into event sequences, and merge. The annotator is an
//! opaque collaborator; the pipeline assumes its output tree covers the same
//! text and lets [`merge`] reject anything inconsistent.
//!
//! The pipeline holds no mutable state, so one instance can serve any number
//! of independent runs.

use crate::merge::{merge, MergeError};
use crate::stream::extract;
use crate::tree::Element;
use std::fmt;

/// Failure from the external annotator collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotateError {
    pub message: String,
}

impl AnnotateError {
    pub fn new(message: impl Into<String>) -> Self {
        AnnotateError {
            message: message.into(),
        }
    }
}

impl fmt::Display for AnnotateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "annotator failed: {}", self.message)
    }
}

impl std::error::Error for AnnotateError {}

/// Errors that can occur during a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Annotator(AnnotateError),
    Merge(MergeError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Annotator(err) => write!(f, "annotation error: {}", err),
            PipelineError::Merge(err) => write!(f, "merge error: {}", err),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<AnnotateError> for PipelineError {
    fn from(err: AnnotateError) -> Self {
        PipelineError::Annotator(err)
    }
}

impl From<MergeError> for PipelineError {
    fn from(err: MergeError) -> Self {
        PipelineError::Merge(err)
    }
}

/// An external annotator: plain text in, freshly annotated tree out.
///
/// The returned tree must flatten back to the given text; the pipeline
/// treats the annotation decisions themselves as a black box.
pub trait Annotator {
    fn annotate(&self, text: &str) -> Result<Element, AnnotateError>;
}

impl<F> Annotator for F
where
    F: Fn(&str) -> Result<Element, AnnotateError>,
{
    fn annotate(&self, text: &str) -> Result<Element, AnnotateError> {
        self(text)
    }
}

/// Drives extract × 2 → merge over an original tree and an annotator.
pub struct MergePipeline<A> {
    annotator: A,
}

impl<A: Annotator> MergePipeline<A> {
    pub fn new(annotator: A) -> Self {
        MergePipeline { annotator }
    }

    /// Re-annotate `original`'s plain text and merge both annotations into
    /// one markup string.
    pub fn run(&self, original: &Element) -> Result<String, PipelineError> {
        let text = original.plain_text();
        let secondary = self.annotator.annotate(&text)?;
        let merged = merge(extract(original), extract(&secondary), &text)?;
        Ok(merged)
    }
}
