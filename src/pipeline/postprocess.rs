//! Post-processing: deterministic cleanup after tag resolution.
//!
//! Whatever the tag grammar did not resolve (unterminated tags, stray closing
//! tags, self-standing markers) is stripped here, so the transducer degrades
//! to plain text instead of failing. The remaining rules shape the output
//! into Markdown paragraphs.
//!
//! ## Rule Order
//!
//! Line endings are normalised before anything splits on lines, and residual
//! markup is removed before trimming so a line holding only a tag disappears
//! entirely.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all post-processing rules to resolved DocTags output.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF/CR → LF)
/// 2. Strip residual angle-bracket markup
/// 3. Trim every line and drop blank ones
/// 4. Join the surviving lines with one blank line between them
pub fn finalize_markdown(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = strip_residual_markup(&s);
    let lines = non_blank_lines(&s);
    join_paragraphs(&lines)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Strip residual markup ────────────────────────────────────────────

static RE_RESIDUAL_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

fn strip_residual_markup(input: &str) -> String {
    RE_RESIDUAL_TAG.replace_all(input, "").to_string()
}

// ── Rule 3: Trim lines, drop blanks ──────────────────────────────────────────

fn non_blank_lines(input: &str) -> Vec<&str> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

// ── Rule 4: Paragraph spacing ────────────────────────────────────────────────

fn join_paragraphs(lines: &[&str]) -> String {
    lines.join("\n\n")
}

// ── Tests ────────────────────────────────────────────────────────────────────
