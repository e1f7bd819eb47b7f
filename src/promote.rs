use tracing::trace;

use crate::corpus::CorpusResult;
use crate::cursor::SuggestionCursor;
use crate::list::DedupSuggestionList;

/// Strategy picking which suggestions are shown out of the shortcut cache
/// and the corpus results accumulated so far.
///
/// Implementations must be deterministic for a fixed input, must treat
/// `max_promoted` as a hard cap on the destination length and must stay
/// stateless across calls. Duplicate suppression is delegated to the
/// destination list, so pushing an already-seen identity key is safe and
/// keeps the first-seen entry.
pub trait Promoter: Send + Sync {
    /// Fill `dest` with at most `max_promoted` suggestions.
    fn pick_promoted(
        &self,
        shortcuts: Option<&dyn SuggestionCursor>,
        corpus_results: &[CorpusResult],
        max_promoted: usize,
        dest: &mut DedupSuggestionList,
    );
}

/// Promotes corpus results in arrival order, preserving each corpus's
/// internal order, until the cap is reached.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatPromoter;

impl Promoter for ConcatPromoter {
    fn pick_promoted(
        &self,
        _shortcuts: Option<&dyn SuggestionCursor>,
        corpus_results: &[CorpusResult],
        max_promoted: usize,
        dest: &mut DedupSuggestionList,
    ) {
        for result in corpus_results {
            for index in 0..result.len() {
                if dest.len() >= max_promoted {
                    return;
                }
                if let Some(suggestion) = result.suggestion(index) {
                    dest.push(suggestion.clone());
                }
            }
        }
    }
}

/// Promotes one suggestion per corpus per round, corpora in arrival order
/// within a round, until every corpus is exhausted or the cap is reached.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinPromoter;

impl Promoter for RoundRobinPromoter {
    fn pick_promoted(
        &self,
        _shortcuts: Option<&dyn SuggestionCursor>,
        corpus_results: &[CorpusResult],
        max_promoted: usize,
        dest: &mut DedupSuggestionList,
    ) {
        let mut position = 0;
        loop {
            let mut yielded = false;
            for result in corpus_results {
                if dest.len() >= max_promoted {
                    return;
                }
                if let Some(suggestion) = result.suggestion(position) {
                    dest.push(suggestion.clone());
                    yielded = true;
                }
            }
            if !yielded {
                return;
            }
            position += 1;
        }
    }
}

/// Reserves the first slots for shortcut-cache entries, then hands the
/// remaining slots to the wrapped promoter.
///
/// A suggestion present both in the cache and in a live corpus result is
/// emitted once, as the shortcut, because the shortcut is pushed first into
/// the deduplicating destination.
#[derive(Debug, Clone, Copy)]
pub struct ShortcutPromoter<P> {
    inner: P,
    max_shortcuts: usize,
}

impl<P> ShortcutPromoter<P> {
    /// Wrap `inner`, promoting at most `max_shortcuts` cache entries first.
    #[must_use]
    pub fn new(inner: P, max_shortcuts: usize) -> Self {
        Self {
            inner,
            max_shortcuts,
        }
    }
}

impl Default for ShortcutPromoter<ConcatPromoter> {
    fn default() -> Self {
        Self::new(ConcatPromoter, crate::config::Config::default().max_promoted_shortcuts)
    }
}

impl<P: Promoter> Promoter for ShortcutPromoter<P> {
    fn pick_promoted(
        &self,
        shortcuts: Option<&dyn SuggestionCursor>,
        corpus_results: &[CorpusResult],
        max_promoted: usize,
        dest: &mut DedupSuggestionList,
    ) {
        if let Some(shortcuts) = shortcuts {
            let reserved = self.max_shortcuts.min(max_promoted);
            for index in 0..shortcuts.len() {
                if dest.len() >= reserved {
                    break;
                }
                if let Some(suggestion) = shortcuts.suggestion(index) {
                    dest.push(suggestion.clone());
                }
            }
            trace!(promoted_shortcuts = dest.len(), "shortcut slots filled");
        }
        self.inner
            .pick_promoted(None, corpus_results, max_promoted, dest);
    }
}
