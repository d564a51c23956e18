//! Result types returned by the locator and the cross-check.

use crate::document::BoundingBox;
use serde::{Deserialize, Serialize};

/// A bounding box tagged with the page it lies on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageBox {
    pub page_no: u32,
    pub bbox: BoundingBox,
    /// Box width, `r - l`.
    pub width: f64,
    /// Box height, `t - b`.
    pub height: f64,
}

impl PageBox {
    pub fn new(page_no: u32, bbox: BoundingBox) -> Self {
        Self {
            page_no,
            bbox,
            width: bbox.width(),
            height: bbox.height(),
        }
    }
}

/// Provenance of one query fragment.
///
/// An unmatched fragment still gets a `MatchResult`: every collection is
/// empty and `score` is `0.0`. Use [`MatchResult::is_match`] to tell the two
/// apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The fragment exactly as the caller supplied it.
    pub fragment: String,

    /// Source text covered by the match, trimmed. Empty when unmatched.
    pub matched_text: String,

    /// Pages touched, ascending and deduplicated.
    pub pages: Vec<u32>,

    /// One box per involved element, in document order.
    pub boxes: Vec<PageBox>,

    /// Distinct section headers whose scope contains an involved element.
    pub sections: Vec<String>,

    /// Zero-based indices of the involved elements, ascending.
    pub elements: Vec<usize>,

    /// 1.0 for an exact flattened match, the overlap ratio for a
    /// containment match, 0.0 when unmatched.
    pub score: f64,
}

impl MatchResult {
    /// The explicit "not found" result for `fragment`.
    pub fn empty(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            matched_text: String::new(),
            pages: Vec::new(),
            boxes: Vec::new(),
            sections: Vec::new(),
            elements: Vec::new(),
            score: 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        !self.elements.is_empty()
    }
}

/// Summary of one locate batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocateStats {
    pub fragments: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub elements: usize,
    pub duration_ms: u64,
}

impl LocateStats {
    pub fn from_results(results: &[MatchResult], elements: usize, duration_ms: u64) -> Self {
        let matched = results.iter().filter(|r| r.is_match()).count();
        Self {
            fragments: results.len(),
            matched,
            unmatched: results.len() - matched,
            elements,
            duration_ms,
        }
    }
}

/// Everything [`crate::locate::locate_file`] returns for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocateOutput {
    /// Document name from the export, when present.
    pub document: Option<String>,
    /// One result per fragment, in input order.
    pub results: Vec<MatchResult>,
    pub stats: LocateStats,
}

/// A rendered-Markdown line paired with its closest DocTags line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineMatch {
    /// 1-based line number in the Markdown input.
    pub markdown_line: usize,
    /// 1-based line number in the DocTags input.
    pub doctags_line: usize,
    pub markdown: String,
    pub doctags: String,
    /// Similarity ratio in `[0, 1]`, rounded to three decimals.
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_is_not_a_match() {
        let r = MatchResult::empty("missing");
        assert!(!r.is_match());
        assert_eq!(r.fragment, "missing");
        assert!(r.pages.is_empty() && r.boxes.is_empty() && r.sections.is_empty());
    }

    #[test]
    fn stats_count_matches() {
        let mut hit = MatchResult::empty("a");
        hit.elements = vec![0];
        let miss = MatchResult::empty("b");
        let stats = LocateStats::from_results(&[hit, miss.clone(), miss], 7, 3);
        assert_eq!(stats.fragments, 3);
        assert_eq!(stats.matched, 1);
        assert_eq!(stats.unmatched, 2);
        assert_eq!(stats.elements, 7);
    }

    #[test]
    fn page_box_carries_dimensions() {
        let b = PageBox::new(9, BoundingBox::new(300.0, 40.0, 310.0, 30.0));
        assert_eq!((b.width, b.height), (10.0, 10.0));

        let json = serde_json::to_value(b).unwrap();
        assert_eq!(json["page_no"], 9);
        assert_eq!(json["width"], 10.0);
        assert_eq!(json["height"], 10.0);
    }
}
