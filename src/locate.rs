//! Fragment-to-source entry points.
//!
//! A [`Locator`] prepares a document once (section labels, flattened index,
//! containment candidates) and then answers any number of fragments against
//! it. Preparation finishes before the first search, and the prepared state
//! is immutable, so one `Locator` can serve concurrent callers.
//!
//! Every fragment gets exactly one [`MatchResult`], in input order. A
//! fragment that matches nothing gets an empty result, not an error; only
//! failing to load the document aborts a request.

use crate::config::{LocateConfig, MatchStrategy};
use crate::document::{Document, DocumentElement};
use crate::error::DoctagsError;
use crate::output::{LocateOutput, LocateStats, MatchResult, PageBox};
use crate::pipeline::containment::ContainmentIndex;
use crate::pipeline::flatten::FlatIndex;
use crate::pipeline::matcher::{FragmentMatcher, Hit};
use crate::pipeline::normalize::normalize;
use crate::pipeline::sections::section_labels;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// A document prepared for fragment lookups.
pub struct Locator<'a> {
    elements: &'a [DocumentElement],
    sections: Vec<Option<String>>,
    flat: FlatIndex,
    containment: ContainmentIndex,
    chunked: bool,
    strategy: MatchStrategy,
}

impl<'a> Locator<'a> {
    /// Prepare `elements`; containment candidates are the elements themselves.
    pub fn new(elements: &'a [DocumentElement], config: &LocateConfig) -> Self {
        let flat = FlatIndex::build(elements, config.separator);
        let containment = ContainmentIndex::from_elements(elements);
        Self::assemble(elements, config, flat, containment, false)
    }

    /// Prepare `elements` with externally pre-chunked text as the
    /// containment candidates.
    pub fn with_chunks<S: AsRef<str>>(
        elements: &'a [DocumentElement],
        chunks: &[S],
        config: &LocateConfig,
    ) -> Self {
        let flat = FlatIndex::build(elements, config.separator);
        let containment = ContainmentIndex::from_chunks(&flat, chunks);
        debug!(
            "{} of {} chunks traced back to the document",
            containment.len(),
            chunks.len()
        );
        Self::assemble(elements, config, flat, containment, true)
    }

    fn assemble(
        elements: &'a [DocumentElement],
        config: &LocateConfig,
        flat: FlatIndex,
        containment: ContainmentIndex,
        chunked: bool,
    ) -> Self {
        Self {
            elements,
            sections: section_labels(elements, &config.section_label),
            flat,
            containment,
            chunked,
            strategy: config.strategy,
        }
    }

    fn matchers(&self) -> Vec<&dyn FragmentMatcher> {
        match self.strategy {
            // Raw elements are too short to be trusted as containment
            // candidates; only caller-supplied chunks back up the flat search.
            MatchStrategy::Auto if !self.chunked => vec![&self.flat as &dyn FragmentMatcher],
            MatchStrategy::Auto => vec![
                &self.flat as &dyn FragmentMatcher,
                &self.containment as &dyn FragmentMatcher,
            ],
            MatchStrategy::Flattened => vec![&self.flat as &dyn FragmentMatcher],
            MatchStrategy::Containment => vec![&self.containment as &dyn FragmentMatcher],
        }
    }

    /// Locate one fragment.
    pub fn locate_one(&self, fragment: &str) -> MatchResult {
        let needle = normalize(fragment);
        if needle.is_empty() {
            return MatchResult::empty(fragment);
        }

        let hit = self.matchers().into_iter().find_map(|m| {
            let hit = m.find(&needle);
            if hit.is_some() {
                debug!("Fragment {:?} matched by {} strategy", truncate(fragment), m.name());
            }
            hit
        });

        match hit {
            Some(hit) => self.build_result(fragment, hit),
            None => {
                debug!("Fragment {:?} not found", truncate(fragment));
                MatchResult::empty(fragment)
            }
        }
    }

    /// Locate every fragment; the output has the same length and order.
    pub fn locate<S: AsRef<str>>(&self, fragments: &[S]) -> Vec<MatchResult> {
        fragments
            .iter()
            .map(|f| self.locate_one(f.as_ref()))
            .collect()
    }

    fn build_result(&self, fragment: &str, hit: Hit) -> MatchResult {
        let mut pages = BTreeSet::new();
        let mut boxes = Vec::with_capacity(hit.elements.len());
        let mut sections: Vec<String> = Vec::new();

        for &idx in &hit.elements {
            let Some(element) = self.elements.get(idx) else {
                continue;
            };
            pages.extend(element.provenance.iter().map(|p| p.page_no));
            if let Some(prov) = element.primary_provenance() {
                boxes.push(PageBox::new(prov.page_no, prov.bbox));
            }
            if let Some(Some(section)) = self.sections.get(idx) {
                if !sections.contains(section) {
                    sections.push(section.clone());
                }
            }
        }

        MatchResult {
            fragment: fragment.to_string(),
            matched_text: hit.matched_text,
            pages: pages.into_iter().collect(),
            boxes,
            sections,
            elements: hit.elements,
            score: hit.score,
        }
    }
}

/// Locate fragments with the default configuration.
pub fn locate<S: AsRef<str>>(elements: &[DocumentElement], fragments: &[S]) -> Vec<MatchResult> {
    locate_with(elements, fragments, &LocateConfig::default())
}

/// Locate fragments with an explicit configuration.
pub fn locate_with<S: AsRef<str>>(
    elements: &[DocumentElement],
    fragments: &[S],
    config: &LocateConfig,
) -> Vec<MatchResult> {
    info!(
        "Locating {} fragments in {} elements ({:?})",
        fragments.len(),
        elements.len(),
        config.strategy
    );
    Locator::new(elements, config).locate(fragments)
}

/// Load a document export from disk and locate fragments in it.
///
/// # Errors
/// - [`DoctagsError::SourceNotFound`] / [`DoctagsError::PermissionDenied`] /
///   [`DoctagsError::ReadFailed`] when the file cannot be read
/// - [`DoctagsError::ExtractionFailed`] when it cannot be parsed; no
///   fragment is matched in that case
pub async fn locate_file<S: AsRef<str>>(
    path: impl AsRef<Path>,
    fragments: &[S],
    config: &LocateConfig,
) -> Result<LocateOutput, DoctagsError> {
    let start = Instant::now();
    let document = Document::load(path.as_ref()).await?;
    let results = locate_with(document.elements(), fragments, config);
    let stats = LocateStats::from_results(
        &results,
        document.texts.len(),
        start.elapsed().as_millis() as u64,
    );
    info!(
        "Located {}/{} fragments in {}ms",
        stats.matched, stats.fragments, stats.duration_ms
    );
    Ok(LocateOutput {
        document: document.name,
        results,
        stats,
    })
}

/// Synchronous wrapper around [`locate_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn locate_sync<S: AsRef<str>>(
    path: impl AsRef<Path>,
    fragments: &[S],
    config: &LocateConfig,
) -> Result<LocateOutput, DoctagsError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DoctagsError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(locate_file(path, fragments, config))
}

fn truncate(s: &str) -> String {
    if s.chars().count() > 60 {
        format!("{}\u{2026}", s.chars().take(59).collect::<String>())
    } else {
        s.to_string()
    }
}
