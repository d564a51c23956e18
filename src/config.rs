//! Configuration types for fragment location.
//!
//! All locator behaviour is controlled through [`LocateConfig`], built via
//! its [`LocateConfigBuilder`]. The transducer has its own knob, the
//! [`crate::pipeline::transduce::RuleTable`], because its only setting is
//! what each tag turns into.

use crate::error::DoctagsError;
use serde::{Deserialize, Serialize};

/// Label that marks section-header elements in extractor output.
pub const DEFAULT_SECTION_LABEL: &str = "section_header";

/// Configuration for locating fragments in a document.
///
/// Built via [`LocateConfig::builder()`] or using [`LocateConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_doctags::{LocateConfig, MatchStrategy};
///
/// let config = LocateConfig::builder()
///     .strategy(MatchStrategy::Flattened)
///     .section_label("title")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocateConfig {
    /// Which matching strategy to run. Default: [`MatchStrategy::Auto`].
    pub strategy: MatchStrategy,

    /// Element label that opens a new section. Default: `section_header`.
    pub section_label: String,

    /// Character inserted between element texts when flattening. Default: `' '`.
    ///
    /// Whitespace lets a fragment run across an element boundary exactly as
    /// it reads in the document. A punctuation separator makes boundaries
    /// opaque to the search. Alphanumeric separators are rejected because
    /// they would fabricate words that exist in no element.
    pub separator: char,

    /// Documents processed at once by the stream API. Default: 4.
    pub concurrency: usize,
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::default(),
            section_label: DEFAULT_SECTION_LABEL.to_string(),
            separator: ' ',
            concurrency: 4,
        }
    }
}

impl LocateConfig {
    /// Create a new builder for `LocateConfig`.
    pub fn builder() -> LocateConfigBuilder {
        LocateConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`LocateConfig`].
#[derive(Debug)]
pub struct LocateConfigBuilder {
    config: LocateConfig,
}

impl LocateConfigBuilder {
    pub fn strategy(mut self, strategy: MatchStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn section_label(mut self, label: impl Into<String>) -> Self {
        self.config.section_label = label.into();
        self
    }

    pub fn separator(mut self, sep: char) -> Self {
        self.config.separator = sep;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<LocateConfig, DoctagsError> {
        let c = &self.config;
        if c.separator.is_alphanumeric() {
            return Err(DoctagsError::InvalidConfig(format!(
                "Separator must not be alphanumeric, got {:?}",
                c.separator
            )));
        }
        if c.section_label.trim().is_empty() {
            return Err(DoctagsError::InvalidConfig(
                "Section label must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How fragments are matched against the document.
///
/// | Strategy | Behaviour |
/// |----------|-----------|
/// | `Auto` | flattened search; supplied chunks by containment when it finds nothing (default) |
/// | `Flattened` | contiguous substring of the whole document, may span elements |
/// | `Containment` | best single candidate by symmetric containment and length overlap |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    #[default]
    Auto,
    Flattened,
    Containment,
}

impl std::str::FromStr for MatchStrategy {
    type Err = DoctagsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(MatchStrategy::Auto),
            "flattened" | "flat" => Ok(MatchStrategy::Flattened),
            "containment" | "contains" => Ok(MatchStrategy::Containment),
            other => Err(DoctagsError::InvalidConfig(format!(
                "Unknown match strategy '{other}' (expected auto, flattened or containment)"
            ))),
        }
    }
}
