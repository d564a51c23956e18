//! The seam between the locator and its matching strategies.

/// Where a fragment was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// Involved element indices, ascending and unique. Never empty.
    pub elements: Vec<usize>,
    /// Source text covered by the match, trimmed.
    pub matched_text: String,
    /// 1.0 for an exact match, lower for partial overlap.
    pub score: f64,
}

/// A strategy that finds a fragment in a prepared document.
///
/// `needle` is already normalized (see [`crate::pipeline::normalize`]) and
/// non-empty. Implementations report only the first or best match; they
/// never enumerate occurrences.
pub trait FragmentMatcher: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn find(&self, needle: &str) -> Option<Hit>;
}
