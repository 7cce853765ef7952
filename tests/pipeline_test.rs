//! Integration tests for the merge pipeline against a toy annotator.

use markweave::testing::assert_well_nested;
use markweave::tree::{Element, Node, Tag};
use markweave::{parse_markup, AnnotateError, Annotator, MergePipeline, PipelineError};

/// A miniature highlighter: wraps every occurrence of its keyword in a
/// `<span class="kw">` over the plain text it is given.
struct KeywordHighlighter {
    keyword: &'static str,
}

impl Annotator for KeywordHighlighter {
    fn annotate(&self, text: &str) -> Result<Element, AnnotateError> {
        if self.keyword.is_empty() {
            return Err(AnnotateError::new("empty keyword"));
        }
        let mut children = Vec::new();
        let mut rest = text;
        while let Some(found) = rest.find(self.keyword) {
            if found > 0 {
                children.push(Node::text(&rest[..found]));
            }
            children.push(Node::element(
                Tag::with_attributes("span", vec![("class".to_string(), "kw".to_string())]),
                vec![Node::text(self.keyword)],
            ));
            rest = &rest[found + self.keyword.len()..];
        }
        if !rest.is_empty() {
            children.push(Node::text(rest));
        }
        Ok(Element::root(children))
    }
}

#[test]
fn test_pipeline_highlights_inside_diff_markup() {
    let original = parse_markup("<ins>return x;</ins> return y;").unwrap();
    let pipeline = MergePipeline::new(KeywordHighlighter { keyword: "return" });

    let merged = pipeline.run(&original).unwrap();

    assert_eq!(
        merged,
        r#"<ins><span class="kw">return</span> x;</ins> <span class="kw">return</span> y;"#
    );
    assert_well_nested(&merged);
}

#[test]
fn test_pipeline_with_keyword_crossing_diff_boundary() {
    // The diff boundary lands mid-keyword; the highlight span must split.
    let original = parse_markup("<del>ret</del>urn;").unwrap();
    let pipeline = MergePipeline::new(KeywordHighlighter { keyword: "return" });

    let merged = pipeline.run(&original).unwrap();

    assert_eq!(
        merged,
        r#"<del><span class="kw">ret</span></del><span class="kw">urn</span>;"#
    );
    assert_well_nested(&merged);
}

#[test]
fn test_pipeline_surfaces_annotator_errors() {
    let original = parse_markup("x").unwrap();
    let pipeline = MergePipeline::new(KeywordHighlighter { keyword: "" });

    let err = pipeline.run(&original).unwrap_err();

    assert!(matches!(err, PipelineError::Annotator(_)));
}

#[test]
fn test_pipeline_is_reusable_across_runs() {
    let pipeline = MergePipeline::new(KeywordHighlighter { keyword: "if" });

    let first = parse_markup("<ins>if a</ins>").unwrap();
    let second = parse_markup("no keyword here").unwrap();

    assert_eq!(
        pipeline.run(&first).unwrap(),
        r#"<ins><span class="kw">if</span> a</ins>"#
    );
    assert_eq!(pipeline.run(&second).unwrap(), "no keyword here");
}
