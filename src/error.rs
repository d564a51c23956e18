//! Error types for the edgequake-doctags library.
//!
//! Only structural failures are errors. Malformed markup degrades to plain
//! text inside the transducer, and a fragment that cannot be found becomes an
//! empty [`crate::output::MatchResult`]; neither ever reaches this enum.
//!
//! What remains are the conditions that abort a whole request: the source
//! document is missing or unreadable, the extractor output cannot be parsed,
//! the output file cannot be written, or the configuration is invalid.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-doctags library.
#[derive(Debug, Error)]
pub enum DoctagsError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Source document was not found at the given path.
    #[error("Source document not found: '{path}'\nCheck the path exists and is readable.")]
    SourceNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but reading it failed (not UTF-8, I/O error, ...).
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The document-structure export could not be parsed.
    ///
    /// Nothing from the document is matched when this is returned.
    #[error("Document '{path}' could not be extracted: {detail}")]
    ExtractionFailed { path: PathBuf, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DoctagsError {
    /// Map an `io::Error` raised while opening `path` to the matching variant.
    pub(crate) fn from_read(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => DoctagsError::SourceNotFound { path },
            std::io::ErrorKind::PermissionDenied => DoctagsError::PermissionDenied { path },
            _ => DoctagsError::ReadFailed { path, source: err },
        }
    }
}
