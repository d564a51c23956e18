//! Source-document model shared by the locator and its callers.
//!
//! The structure mirrors the JSON export of the document-structure extractor
//! that sits upstream of this crate: a `texts` array whose items carry the
//! literal `text`, a `label`, and a `prov` list of page/bounding-box pairs.
//! Only those fields are read; everything else in the export is ignored.

use crate::error::DoctagsError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Bounding box edges in document coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub l: f64,
    /// Top edge
    pub t: f64,
    /// Right edge
    pub r: f64,
    /// Bottom edge
    pub b: f64,
}

impl BoundingBox {
    pub const fn new(l: f64, t: f64, r: f64, b: f64) -> Self {
        Self { l, t, r, b }
    }

    /// Right minus left.
    pub fn width(&self) -> f64 {
        self.r - self.l
    }

    /// Top minus bottom (extractor coordinates grow upwards).
    pub fn height(&self) -> f64 {
        self.t - self.b
    }
}

/// Where a piece of text came from: a 1-indexed page and a box on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub page_no: u32,
    pub bbox: BoundingBox,
}

impl Provenance {
    pub const fn new(page_no: u32, bbox: BoundingBox) -> Self {
        Self { page_no, bbox }
    }
}

/// One extracted text unit, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentElement {
    pub text: String,

    /// Category assigned by the extractor, e.g. `text`, `section_header`.
    #[serde(default = "default_label")]
    pub label: String,

    /// Page/box pairs; more than one when the element crosses pages.
    #[serde(rename = "prov", default)]
    pub provenance: Vec<Provenance>,
}

fn default_label() -> String {
    "text".to_string()
}

impl DocumentElement {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            provenance: Vec::new(),
        }
    }

    /// Append a provenance entry.
    pub fn with_provenance(mut self, page_no: u32, bbox: BoundingBox) -> Self {
        self.provenance.push(Provenance::new(page_no, bbox));
        self
    }

    /// The first provenance entry, if any.
    pub fn primary_provenance(&self) -> Option<&Provenance> {
        self.provenance.first()
    }
}

/// A document as produced by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub name: Option<String>,

    /// Text elements in reading order.
    #[serde(default)]
    pub texts: Vec<DocumentElement>,
}

impl Document {
    pub fn new(texts: Vec<DocumentElement>) -> Self {
        Self { name: None, texts }
    }

    pub fn elements(&self) -> &[DocumentElement] {
        &self.texts
    }

    /// Parse the extractor's JSON export.
    ///
    /// `origin` is only used to label the error.
    pub fn from_json(json: &str, origin: impl AsRef<Path>) -> Result<Self, DoctagsError> {
        serde_json::from_str(json).map_err(|e| DoctagsError::ExtractionFailed {
            path: origin.as_ref().to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Read and parse a JSON export from disk.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DoctagsError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            warn!("Cannot read document {}: {}", path.display(), e);
            DoctagsError::from_read(path, e)
        })?;
        let doc = Self::from_json(&json, path)?;
        debug!(
            "Loaded document {} with {} elements",
            path.display(),
            doc.texts.len()
        );
        Ok(doc)
    }
}
