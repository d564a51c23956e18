//! Text normalization shared by every matching strategy.
//!
//! Two strings compare equal here when they differ only in letter case and
//! in the amount or kind of whitespace between words. Both fragments and
//! document text go through the same [`Normalizer`], so the flattened back-map
//! and the fragment agree on every byte.

/// Incremental normalizer: lower-cases, collapses whitespace runs to a
/// single space, drops leading whitespace, and never emits a trailing space
/// until more non-whitespace text arrives.
///
/// `push` reports each emitted byte range to a callback so callers can keep
/// a back-map from normalized bytes to their source.
#[derive(Debug, Default)]
pub struct Normalizer {
    out: String,
    pending_space: bool,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one source character.
    ///
    /// `on_emit(range_len, is_space)` is called once per emitted run: for the
    /// deferred space (if one is flushed) and then for the lower-cased
    /// character itself.
    pub fn push(&mut self, c: char, mut on_emit: impl FnMut(usize, bool)) {
        if c.is_whitespace() {
            if !self.out.is_empty() {
                self.pending_space = true;
            }
            return;
        }
        if self.pending_space {
            self.out.push(' ');
            self.pending_space = false;
            on_emit(1, true);
        }
        let before = self.out.len();
        self.out.extend(c.to_lowercase());
        on_emit(self.out.len() - before, false);
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Case-fold, collapse internal whitespace to single spaces, and trim.
pub fn normalize(text: &str) -> String {
    let mut n = Normalizer::new();
    for c in text.chars() {
        n.push(c, |_, _| {});
    }
    n.finish()
}
