//! Flattened character-offset matching, the primary strategy.
//!
//! Every element's text is concatenated (one separator between elements)
//! and normalized in a single sweep. Alongside the normalized text we keep a
//! back-map with one entry per normalized byte, recording which element the
//! byte came from and where its source character sits in the raw flattened
//! text. A substring hit is then a byte range whose back-map entries name the
//! touched elements, so one fragment can cover several consecutive elements
//! and cross page boundaries.
//!
//! Whitespace and separator bytes belong to no element: a fragment that only
//! brushes an element boundary does not pull in the neighbour.

use crate::document::DocumentElement;
use crate::pipeline::matcher::{FragmentMatcher, Hit};
use crate::pipeline::normalize::Normalizer;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy)]
struct Origin {
    element: Option<usize>,
    raw_start: usize,
    raw_end: usize,
}

/// The whole document as one searchable string.
#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    raw: String,
    normalized: String,
    origins: Vec<Origin>,
}

impl FlatIndex {
    pub fn build(elements: &[DocumentElement], separator: char) -> Self {
        let mut raw = String::new();
        let mut normalizer = Normalizer::new();
        let mut origins = Vec::new();

        let mut feed = |c: char, element: Option<usize>| {
            let raw_start = raw.len();
            raw.push(c);
            let raw_end = raw.len();
            normalizer.push(c, |len, is_space| {
                let owner = if is_space { None } else { element };
                origins.extend(std::iter::repeat_n(
                    Origin {
                        element: owner,
                        raw_start,
                        raw_end,
                    },
                    len,
                ));
            });
        };

        for (idx, element) in elements.iter().enumerate() {
            if idx > 0 {
                feed(separator, None);
            }
            for c in element.text.chars() {
                feed(c, Some(idx));
            }
        }

        let normalized = normalizer.finish();
        debug_assert_eq!(normalized.len(), origins.len());
        Self {
            raw,
            normalized,
            origins,
        }
    }

    /// Normalized flattened text.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

impl FragmentMatcher for FlatIndex {
    fn name(&self) -> &'static str {
        "flattened"
    }

    fn find(&self, needle: &str) -> Option<Hit> {
        if needle.is_empty() {
            return None;
        }
        let start = self.normalized.find(needle)?;
        let span = &self.origins[start..start + needle.len()];

        let elements: BTreeSet<usize> = span.iter().filter_map(|o| o.element).collect();
        if elements.is_empty() {
            return None;
        }
        let raw_start = span.iter().map(|o| o.raw_start).min()?;
        let raw_end = span.iter().map(|o| o.raw_end).max()?;

        Some(Hit {
            elements: elements.into_iter().collect(),
            matched_text: self.raw[raw_start..raw_end].trim().to_string(),
            score: 1.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::normalize::normalize;

    fn index(texts: &[&str]) -> FlatIndex {
        let elements: Vec<_> = texts
            .iter()
            .map(|t| DocumentElement::new(*t, "text"))
            .collect();
        FlatIndex::build(&elements, ' ')
    }

    fn find(idx: &FlatIndex, fragment: &str) -> Option<Hit> {
        idx.find(&normalize(fragment))
    }

    #[test]
    fn flattens_with_single_spaces() {
        let idx = index(&["Hello  World", "Second\npart"]);
        assert_eq!(idx.normalized(), "hello world second part");
    }

    #[test]
    fn case_insensitive_single_element() {
        let idx = index(&["Hello world", "Second part"]);
        let hit = find(&idx, "hello WORLD").unwrap();
        assert_eq!(hit.elements, vec![0]);
        assert_eq!(hit.matched_text, "Hello world");
        assert_eq!(hit.score, 1.0);
    }

    #[test]
    fn spans_element_boundary() {
        let idx = index(&["Hello world", "Second part"]);
        let hit = find(&idx, "world   second").unwrap();
        assert_eq!(hit.elements, vec![0, 1]);
        assert_eq!(hit.matched_text, "world Second");
    }

    #[test]
    fn boundary_space_does_not_pull_neighbour() {
        let idx = index(&["alpha", "beta"]);
        let hit = find(&idx, "alpha").unwrap();
        assert_eq!(hit.elements, vec![0]);
    }

    #[test]
    fn first_occurrence_wins() {
        let idx = index(&["repeat me", "other", "repeat me"]);
        assert_eq!(find(&idx, "repeat me").unwrap().elements, vec![0]);
    }

    #[test]
    fn no_match_and_empty_needle() {
        let idx = index(&["Hello world"]);
        assert!(find(&idx, "absent").is_none());
        assert!(find(&idx, "   ").is_none());
    }

    #[test]
    fn empty_document() {
        let idx = index(&[]);
        assert!(find(&idx, "anything").is_none());
    }

    #[test]
    fn punctuation_separator_blocks_cross_element_match() {
        let elements = vec![
            DocumentElement::new("end", "text"),
            DocumentElement::new("start", "text"),
        ];
        let idx = FlatIndex::build(&elements, '|');
        assert!(idx.find("end start").is_none());
        assert!(idx.find("|").is_none());
        assert_eq!(idx.find("end|start").unwrap().elements, vec![0, 1]);
    }

    #[test]
    fn non_ascii_case_folding() {
        let idx = index(&["ÉCOLE Normale"]);
        let hit = find(&idx, "école normale").unwrap();
        assert_eq!(hit.matched_text, "ÉCOLE Normale");
    }
}
