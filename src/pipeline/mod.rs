//! Processing stages behind the public entry points.
//!
//! Each submodule implements exactly one transformation step, so each is
//! independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! tagged text ──▶ transduce ──▶ postprocess                 (render)
//!
//! elements ──▶ sections ─┐
//!          ──▶ flatten ──┼──▶ matcher ◀── normalize ◀── fragment   (locate)
//!          ──▶ containment
//! ```
//!
//! 1. [`transduce`]   — resolve tags bottom-up with the rule table
//! 2. [`postprocess`] — strip residual markup and shape paragraphs
//! 3. [`normalize`]   — case-fold and collapse whitespace
//! 4. [`sections`]    — per-element section labels in reading order
//! 5. [`flatten`]     — flattened text with a byte back-map (primary strategy)
//! 6. [`containment`] — overlap-scored candidates (fallback strategy)
//! 7. [`matcher`]     — the trait both strategies implement

pub mod containment;
pub mod flatten;
pub mod matcher;
pub mod normalize;
pub mod postprocess;
pub mod sections;
pub mod transduce;
