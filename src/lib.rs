//! # edgequake-doctags
//!
//! Turn DocTags markup into clean Markdown, and trace text fragments back to
//! the page, bounding box and section they came from.
//!
//! ## Why this crate?
//!
//! Retrieval pipelines split documents into chunks and forget where those
//! chunks came from. Answers that cite "page 4, under *6.1 Machine
//! Translation*" need that provenance back. This crate works on the output
//! of a document-structure extractor (the DocTags token stream and the JSON
//! element export) and provides both directions:
//!
//! - **Render**: DocTags → Markdown with an innermost-first, pass-based tag
//!   resolver that never fails on malformed markup.
//! - **Locate**: free-text fragments → pages, boxes and sections, tolerant
//!   of case and whitespace drift and of fragments that cross element,
//!   page or section boundaries.
//!
//! ## Pipeline Overview
//!
//! ```text
//! DocTags ──▶ transduce (bottom-up, repeat until stable) ──▶ postprocess ──▶ Markdown
//!
//! Elements ──▶ sections + flattened back-map ──┐
//! Fragment ──▶ normalize ──────────────────────┴──▶ flattened │ containment ──▶ MatchResult
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use edgequake_doctags::{locate, render, BoundingBox, DocumentElement};
//!
//! let md = render("<section_header_level_1>Intro</section_header_level_1>");
//! assert_eq!(md, "# Intro");
//!
//! let elements = vec![
//!     DocumentElement::new("Hello world", "text")
//!         .with_provenance(1, BoundingBox::new(72.0, 700.0, 300.0, 690.0)),
//!     DocumentElement::new("Second part", "text")
//!         .with_provenance(2, BoundingBox::new(72.0, 700.0, 300.0, 690.0)),
//! ];
//! let results = locate(&elements, &["hello WORLD second"]);
//! assert_eq!(results[0].pages, vec![1, 2]);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doctags` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-doctags = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod crosscheck;
pub mod document;
pub mod error;
pub mod locate;
pub mod output;
pub mod pipeline;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{LocateConfig, LocateConfigBuilder, MatchStrategy};
pub use convert::{render, render_file, render_sync, render_to_file, render_with};
pub use crosscheck::cross_check;
pub use document::{BoundingBox, Document, DocumentElement, Provenance};
pub use error::DoctagsError;
pub use locate::{locate, locate_file, locate_sync, locate_with, Locator};
pub use output::{LineMatch, LocateOutput, LocateStats, MatchResult, PageBox};
pub use pipeline::transduce::{RuleTable, TagRule};
pub use stream::{locate_stream, render_stream};
