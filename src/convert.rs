//! Tag-to-Markdown entry points.
//!
//! [`render`] is the pure core: tagged text in, Markdown out, no I/O and no
//! failure mode. The file-based helpers only add reading and writing around
//! it.

use crate::error::DoctagsError;
use crate::pipeline::postprocess;
use crate::pipeline::transduce::{self, RuleTable};
use std::path::Path;
use tracing::{debug, info};

/// Render DocTags markup to Markdown with the default rule table.
///
/// Never fails: unknown tags fall through to their content and anything
/// left unresolved is stripped to plain text.
///
/// ```rust
/// use edgequake_doctags::render;
///
/// let md = render("<section_header_level_1>Intro</section_header_level_1>\n<text>Hi</text>");
/// assert_eq!(md, "# Intro\n\nHi");
/// ```
pub fn render(tagged: &str) -> String {
    render_with(tagged, &RuleTable::default())
}

/// Render with a caller-supplied rule table.
pub fn render_with(tagged: &str, rules: &RuleTable) -> String {
    let resolved = transduce::resolve_tags(tagged, rules);
    let markdown = postprocess::finalize_markdown(&resolved);
    debug!(
        "Rendered {} bytes of markup into {} bytes of Markdown",
        tagged.len(),
        markdown.len()
    );
    markdown
}

/// Read a DocTags file and render it.
pub async fn render_file(path: impl AsRef<Path>) -> Result<String, DoctagsError> {
    let path = path.as_ref();
    info!("Rendering {}", path.display());
    let tagged = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DoctagsError::from_read(path, e))?;
    Ok(render(&tagged))
}

/// Render a DocTags file and write the Markdown to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
/// Returns the number of bytes written.
pub async fn render_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<usize, DoctagsError> {
    let markdown = render_file(input_path).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DoctagsError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, &markdown)
        .await
        .map_err(|e| DoctagsError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| DoctagsError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!("Wrote {} bytes to {}", markdown.len(), path.display());
    Ok(markdown.len())
}

/// Synchronous wrapper around [`render_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn render_sync(path: impl AsRef<Path>) -> Result<String, DoctagsError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DoctagsError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(render_file(path))
}
