//! Containment matching, the fallback strategy.
//!
//! Candidates are scored one at a time: a candidate qualifies when the
//! fragment contains it or it contains the fragment (both normalized), and
//! its score is the length ratio `min / max` measured in characters. The
//! contained string must sit on word boundaries, so a page number `9` is
//! not found inside `1999`. The highest score wins; on equal scores the
//! earlier candidate is kept.
//!
//! Candidates are usually externally pre-chunked text, each chunk resolved
//! to its elements through the flattened index first, so chunk boundaries
//! need not line up with element boundaries. Elements themselves serve as
//! candidates only when containment is requested explicitly.

use crate::document::DocumentElement;
use crate::pipeline::flatten::FlatIndex;
use crate::pipeline::matcher::{FragmentMatcher, Hit};
use crate::pipeline::normalize::normalize;
use tracing::debug;

#[derive(Debug, Clone)]
struct Candidate {
    raw: String,
    normalized: String,
    char_len: usize,
    elements: Vec<usize>,
}

impl Candidate {
    fn new(raw: &str, elements: Vec<usize>) -> Self {
        let normalized = normalize(raw);
        Self {
            raw: raw.trim().to_string(),
            char_len: normalized.chars().count(),
            normalized,
            elements,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContainmentIndex {
    candidates: Vec<Candidate>,
}

impl ContainmentIndex {
    /// One candidate per element with non-blank text.
    pub fn from_elements(elements: &[DocumentElement]) -> Self {
        let candidates = elements
            .iter()
            .enumerate()
            .map(|(idx, e)| Candidate::new(&e.text, vec![idx]))
            .filter(|c| !c.normalized.is_empty())
            .collect();
        Self { candidates }
    }

    /// One candidate per chunk that can be traced back to the document.
    pub fn from_chunks<S: AsRef<str>>(flat: &FlatIndex, chunks: &[S]) -> Self {
        let mut candidates = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let chunk = chunk.as_ref();
            match flat.find(&normalize(chunk)) {
                Some(hit) => candidates.push(Candidate::new(chunk, hit.elements)),
                None => debug!("Chunk {} has no source in the document; skipped", i),
            }
        }
        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// `min(len) / max(len)` when one string contains the other on word
/// boundaries, else `None`.
///
/// Lengths are in characters; both inputs must already be normalized.
pub fn overlap_score(needle: &str, needle_len: usize, candidate: &str, candidate_len: usize) -> Option<f64> {
    if needle.is_empty() || candidate.is_empty() {
        return None;
    }
    if !(contains_word_aligned(needle, candidate) || contains_word_aligned(candidate, needle)) {
        return None;
    }
    let (lo, hi) = if needle_len <= candidate_len {
        (needle_len, candidate_len)
    } else {
        (candidate_len, needle_len)
    };
    Some(lo as f64 / hi as f64)
}

/// True when `part` occurs in `whole` without cutting a word on either side.
fn contains_word_aligned(whole: &str, part: &str) -> bool {
    let starts_word = part.chars().next().is_some_and(char::is_alphanumeric);
    let ends_word = part.chars().next_back().is_some_and(char::is_alphanumeric);

    whole.match_indices(part).any(|(at, _)| {
        let before = whole[..at].chars().next_back();
        let after = whole[at + part.len()..].chars().next();
        !(starts_word && before.is_some_and(char::is_alphanumeric))
            && !(ends_word && after.is_some_and(char::is_alphanumeric))
    })
}

impl FragmentMatcher for ContainmentIndex {
    fn name(&self) -> &'static str {
        "containment"
    }

    fn find(&self, needle: &str) -> Option<Hit> {
        let needle_len = needle.chars().count();
        let mut best: Option<(&Candidate, f64)> = None;

        for candidate in &self.candidates {
            let Some(score) =
                overlap_score(needle, needle_len, &candidate.normalized, candidate.char_len)
            else {
                continue;
            };
            if score > 0.0 && best.is_none_or(|(_, s)| score > s) {
                best = Some((candidate, score));
            }
        }

        best.map(|(c, score)| Hit {
            elements: c.elements.clone(),
            matched_text: c.raw.clone(),
            score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements(texts: &[&str]) -> Vec<DocumentElement> {
        texts
            .iter()
            .map(|t| DocumentElement::new(*t, "text"))
            .collect()
    }

    #[test]
    fn overlap_ratio() {
        assert_eq!(overlap_score("ab cd", 5, "ab", 2), Some(0.4));
        assert_eq!(overlap_score("ab", 2, "ab cd", 5), Some(0.4));
        assert_eq!(overlap_score("ab", 2, "cd", 2), None);
        assert_eq!(overlap_score("", 0, "cd", 2), None);
    }

    #[test]
    fn containment_respects_word_boundaries() {
        assert_eq!(overlap_score("published in 1999", 17, "9", 1), None);
        assert_eq!(overlap_score("abcd", 4, "ab", 2), None);
        assert_eq!(overlap_score("see page 9.", 11, "9", 1), Some(1.0 / 11.0));
        assert_eq!(overlap_score("x 1999 and 9", 12, "9", 1), Some(1.0 / 12.0));
        assert_eq!(overlap_score("(c) 2024", 8, "(c)", 3), Some(3.0 / 8.0));
    }

    #[test]
    fn page_number_inside_year_is_not_a_candidate() {
        let idx = ContainmentIndex::from_elements(&elements(&["9", "a"]));
        assert!(idx.find(&normalize("published in 1999 elsewhere")).is_none());
    }

    #[test]
    fn fragment_longer_than_element() {
        let els = elements(&["6 Results", "The model scores well."]);
        let idx = ContainmentIndex::from_elements(&els);
        let hit = idx
            .find(&normalize("Section 6 Results and discussion"))
            .unwrap();
        assert_eq!(hit.elements, vec![0]);
        assert_eq!(hit.matched_text, "6 Results");
        assert!(hit.score > 0.0 && hit.score < 1.0);
    }

    #[test]
    fn best_score_wins_and_ties_keep_first() {
        let els = elements(&["model", "the model", "model"]);
        let idx = ContainmentIndex::from_elements(&els);
        let hit = idx.find("model").unwrap();
        assert_eq!(hit.elements, vec![0]);
        assert_eq!(hit.score, 1.0);

        let hit = idx.find("the model works").unwrap();
        assert_eq!(hit.elements, vec![1]);
    }

    #[test]
    fn blank_elements_are_not_candidates() {
        let els = elements(&["", "   ", "text"]);
        assert_eq!(ContainmentIndex::from_elements(&els).len(), 1);
    }

    #[test]
    fn chunks_map_to_elements() {
        let els = elements(&["Alpha beta", "gamma delta", "epsilon"]);
        let flat = FlatIndex::build(&els, ' ');
        let chunks = ["beta gamma delta", "not in the document"];
        let idx = ContainmentIndex::from_chunks(&flat, &chunks);
        assert_eq!(idx.len(), 1);

        let hit = idx.find(&normalize("BETA gamma")).unwrap();
        assert_eq!(hit.elements, vec![0, 1]);
        assert_eq!(hit.matched_text, "beta gamma delta");
    }

    #[test]
    fn no_candidate_contains_needle() {
        let idx = ContainmentIndex::from_elements(&elements(&["one", "two"]));
        assert!(idx.find("three").is_none());
    }
}
