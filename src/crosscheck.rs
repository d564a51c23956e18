//! Cross-check rendered Markdown against its DocTags source.
//!
//! Both texts are reduced to their trimmed, non-empty lines. Each Markdown
//! line is paired with the DocTags line it most resembles, measured by the
//! character-level similarity ratio `2·M / (len_a + len_b)` where `M` is the
//! number of characters in matching blocks. Pairs at or above the threshold
//! are reported; everything below is treated as unaligned and dropped.
//!
//! Line numbers count non-empty lines only, starting at 1.

use crate::error::DoctagsError;
use crate::output::LineMatch;
use similar::TextDiff;
use tracing::debug;

/// Minimum ratio for a pair to be reported unless the caller overrides it.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Pair each Markdown line with its closest DocTags line.
///
/// # Errors
/// [`DoctagsError::InvalidConfig`] when `threshold` is outside `(0, 1]`.
pub fn cross_check(
    markdown: &str,
    doctags: &str,
    threshold: f64,
) -> Result<Vec<LineMatch>, DoctagsError> {
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(DoctagsError::InvalidConfig(format!(
            "Threshold must be in (0, 1], got {threshold}"
        )));
    }

    let md_lines = content_lines(markdown);
    let tag_lines = content_lines(doctags);
    let mut matches = Vec::new();

    for (i, md_line) in md_lines.iter().enumerate() {
        let mut best: Option<(usize, f64)> = None;
        for (j, tag_line) in tag_lines.iter().enumerate() {
            let score = similarity(md_line, tag_line);
            if score > best.map_or(0.0, |(_, s)| s) {
                best = Some((j, score));
            }
        }

        match best {
            Some((j, score)) if score >= threshold => matches.push(LineMatch {
                markdown_line: i + 1,
                doctags_line: j + 1,
                markdown: md_line.to_string(),
                doctags: tag_lines[j].to_string(),
                score: (score * 1000.0).round() / 1000.0,
            }),
            _ => debug!("Markdown line {} has no counterpart above {}", i + 1, threshold),
        }
    }

    Ok(matches)
}

/// Character-level similarity ratio in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    TextDiff::from_chars(a, b).ratio() as f64
}

fn content_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similarity_bounds() {
        assert_eq!(similarity("abc", "abc"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        let s = similarity("# Intro", "Intro");
        assert!(s > 0.8 && s < 1.0, "got {s}");
    }

    #[test]
    fn pairs_rendered_lines_with_sources() {
        let markdown = "# Attention\n\nWe propose a new network architecture, the Transformer.\n\ncompletely unrelated";
        let doctags = "<section_header_level_1>Attention</section_header_level_1>\n\
                       <text>We propose a new network architecture, the Transformer.</text>\n\n\
                       Attention";

        let matches = cross_check(markdown, doctags, 0.8).unwrap();
        assert_eq!(matches.len(), 2);

        assert_eq!(matches[0].markdown_line, 1);
        assert_eq!(matches[0].doctags_line, 3);
        assert_eq!(matches[0].doctags, "Attention");

        assert_eq!(matches[1].markdown_line, 2);
        assert_eq!(matches[1].doctags_line, 2);
        assert!(matches[1].score >= 0.8 && matches[1].score < 1.0);
    }

    #[test]
    fn threshold_is_validated() {
        assert!(cross_check("a", "a", 0.0).is_err());
        assert!(cross_check("a", "a", 1.5).is_err());
        assert_eq!(cross_check("a", "a", 1.0).unwrap().len(), 1);
    }

    #[test]
    fn empty_inputs() {
        assert!(cross_check("", "<text>x</text>", 0.8).unwrap().is_empty());
        assert!(cross_check("line", "", 0.8).unwrap().is_empty());
    }
}
