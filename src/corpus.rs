use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

use crate::cursor::SuggestionCursor;
use crate::suggestion::Suggestion;

/// One logical suggestion source expected to contribute results for a query.
///
/// Implementations run on background threads and must not assume anything
/// about the thread that owns the aggregate. A corpus that fails or never
/// returns simply never reports; the engine applies no timeout of its own.
pub trait Corpus: Send + Sync {
    /// Stable name identifying this corpus.
    fn name(&self) -> &str;

    /// Execute the query, returning at most `max_results` suggestions.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying source fails; the provider logs
    /// it and delivers nothing for this corpus.
    fn query(&self, query: &str, max_results: usize) -> Result<CorpusResult>;
}

/// Immutable snapshot of the suggestions one corpus returned for a query.
///
/// Owned by whoever holds it last: created by a corpus, handed to the
/// aggregate, released by the aggregate when it closes or when the result
/// arrives too late to be retained. Dropping an unreleased result releases
/// it. Release is idempotent and observable through
/// [`CorpusResult::watch_release`] so that late-delivery races can be
/// asserted on after ownership has moved.
#[derive(Debug)]
pub struct CorpusResult {
    corpus: String,
    user_query: String,
    entries: Vec<Suggestion>,
    released: Arc<AtomicBool>,
}

impl CorpusResult {
    /// Create a snapshot for `corpus` produced by `user_query`.
    #[must_use]
    pub fn new(
        corpus: impl Into<String>,
        user_query: impl Into<String>,
        entries: Vec<Suggestion>,
    ) -> Self {
        Self {
            corpus: corpus.into(),
            user_query: user_query.into(),
            entries,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Name of the corpus that produced this result.
    #[must_use]
    pub fn corpus(&self) -> &str {
        &self.corpus
    }

    /// Free the backing suggestions. Releasing twice is harmless.
    pub fn release(&mut self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        self.entries.clear();
        self.entries.shrink_to_fit();
    }

    /// Returns `true` once [`release`](Self::release) has run.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Shared flag that flips when the result is released, usable after the
    /// result itself has been handed off.
    #[must_use]
    pub fn watch_release(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }
}

impl Drop for CorpusResult {
    fn drop(&mut self) {
        self.release();
    }
}

impl SuggestionCursor for CorpusResult {
    fn user_query(&self) -> &str {
        &self.user_query
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn suggestion(&self, index: usize) -> Option<&Suggestion> {
        self.entries.get(index)
    }
}
