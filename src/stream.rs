//! Multi-document streaming: process independent documents concurrently.
//!
//! Rendering and locating are sequential within one document, but separate
//! documents share nothing, so a batch can run several at once. Results are
//! yielded as each document finishes; completion order is not input order,
//! so every item carries the path it belongs to.

use crate::config::LocateConfig;
use crate::convert::render_file;
use crate::error::DoctagsError;
use crate::locate::locate_file;
use crate::output::LocateOutput;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of per-document results.
pub type DocumentStream<T> = Pin<Box<dyn Stream<Item = (PathBuf, Result<T, DoctagsError>)> + Send>>;

/// Render many DocTags files, at most `concurrency` at a time.
pub fn render_stream(paths: Vec<PathBuf>, concurrency: usize) -> DocumentStream<String> {
    info!("Rendering {} documents", paths.len());
    let s = stream::iter(paths.into_iter().map(|path| async move {
        let result = render_file(&path).await;
        (path, result)
    }))
    .buffer_unordered(concurrency.max(1));

    Box::pin(s)
}

/// Locate the same fragments in many document exports.
///
/// Concurrency comes from `config.concurrency`. A document that fails to
/// load yields its error without affecting the others.
pub fn locate_stream(
    paths: Vec<PathBuf>,
    fragments: Vec<String>,
    config: &LocateConfig,
) -> DocumentStream<LocateOutput> {
    info!(
        "Locating {} fragments across {} documents",
        fragments.len(),
        paths.len()
    );
    let fragments = Arc::new(fragments);
    let concurrency = config.concurrency.max(1);
    let config = Arc::new(config.clone());

    let s = stream::iter(paths.into_iter().map(move |path| {
        let fragments = Arc::clone(&fragments);
        let config = Arc::clone(&config);
        async move {
            let result = locate_file(&path, fragments.as_slice(), &config).await;
            (path, result)
        }
    }))
    .buffer_unordered(concurrency);

    Box::pin(s)
}
