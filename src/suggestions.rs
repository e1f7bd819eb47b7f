use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

use tracing::{debug, trace};

use crate::corpus::CorpusResult;
use crate::cursor::SuggestionCursor;
use crate::list::{DedupSuggestionList, SuggestionList};
use crate::observer::{ObserverId, ObserverRegistry};
use crate::promote::Promoter;

/// Mutable, observable container accumulating corpus results for one query.
///
/// All mutation and all reads happen on the owning thread; background corpus
/// tasks deliver results through the arrival channel drained by
/// [`pump`](Self::pump) rather than touching this container directly.
///
/// The promoted view is recomputed lazily from whatever has accumulated so
/// far, so it can be read at any time, including before every expected
/// corpus has reported.
pub struct Suggestions {
    user_query: String,
    max_promoted: usize,
    expected_corpora: Vec<String>,
    promoter: Option<Arc<dyn Promoter>>,
    corpus_results: Vec<CorpusResult>,
    shortcuts: Option<SuggestionList>,
    single_corpus_filter: Option<String>,
    cached_promoted: Option<SuggestionList>,
    observers: ObserverRegistry,
    arrivals: Option<Receiver<Vec<CorpusResult>>>,
    closed: bool,
}

impl Suggestions {
    /// Create an empty aggregate for `user_query`.
    ///
    /// `expected_corpora` fixes the set of corpora that will report; it is
    /// immutable for the lifetime of the aggregate. Without a promoter the
    /// blended view stays empty.
    #[must_use]
    pub fn new(
        promoter: Option<Arc<dyn Promoter>>,
        max_promoted: usize,
        user_query: impl Into<String>,
        expected_corpora: Vec<String>,
    ) -> Self {
        let user_query = user_query.into();
        debug!(query = %user_query, expected = expected_corpora.len(), "new suggestions");
        Self {
            user_query,
            max_promoted,
            expected_corpora,
            promoter,
            corpus_results: Vec::new(),
            shortcuts: None,
            single_corpus_filter: None,
            cached_promoted: None,
            observers: ObserverRegistry::new(),
            arrivals: None,
            closed: false,
        }
    }

    /// Wire the channel that background corpus tasks deliver results on.
    pub fn attach_arrivals(&mut self, arrivals: Receiver<Vec<CorpusResult>>) {
        self.arrivals = Some(arrivals);
    }

    /// The query string this aggregate was created for.
    #[must_use]
    pub fn user_query(&self) -> &str {
        &self.user_query
    }

    /// Hard cap on the promoted view length.
    #[must_use]
    pub fn max_promoted(&self) -> usize {
        self.max_promoted
    }

    /// Names of the corpora expected to report.
    #[must_use]
    pub fn expected_corpora(&self) -> &[String] {
        &self.expected_corpora
    }

    /// Number of corpora expected to report.
    #[must_use]
    pub fn expected_result_count(&self) -> usize {
        self.expected_corpora.len()
    }

    /// Names of the corpora that have reported so far.
    #[must_use]
    pub fn included_corpora(&self) -> HashSet<&str> {
        self.corpus_results
            .iter()
            .map(CorpusResult::corpus)
            .collect()
    }

    /// Number of corpus results received so far.
    ///
    /// # Panics
    ///
    /// Panics when called on a closed aggregate; reading counts after close
    /// is a programming error.
    #[must_use]
    pub fn result_count(&self) -> usize {
        assert!(!self.closed, "result_count() called after close()");
        self.corpus_results.len()
    }

    /// Whether every expected corpus has reported.
    ///
    /// This compares cardinalities, not corpus identities: a corpus that
    /// reports twice counts twice. Duplicate reports are not expected in
    /// normal operation.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.corpus_results.len() >= self.expected_corpora.len()
    }

    /// Whether the aggregate has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Append a batch of corpus results and fire one change notification.
    ///
    /// A closed aggregate releases every result instead of retaining it;
    /// late deliveries racing a supersession land here by design.
    ///
    /// # Panics
    ///
    /// Panics when any result was produced for a different query string.
    /// Nothing from the batch is retained in that case; merging results
    /// across queries would corrupt the displayed view.
    pub fn add_results(&mut self, results: Vec<CorpusResult>) {
        if self.closed {
            for mut result in results {
                trace!(corpus = result.corpus(), "releasing late corpus result");
                result.release();
            }
            return;
        }

        for result in &results {
            assert!(
                result.user_query() == self.user_query,
                "corpus result for wrong query: {:?} != {:?}",
                self.user_query,
                result.user_query(),
            );
        }
        for result in results {
            debug!(corpus = result.corpus(), count = result.len(), "corpus result added");
            self.corpus_results.push(result);
        }
        self.notify_changed();
    }

    /// Find the result reported by `corpus`, if any.
    #[must_use]
    pub fn corpus_result(&self, corpus: &str) -> Option<&CorpusResult> {
        self.corpus_results
            .iter()
            .find(|result| result.corpus() == corpus)
    }

    /// Replace the shortcut-cache entries blended into the promoted view.
    pub fn set_shortcuts(&mut self, shortcuts: Option<SuggestionList>) {
        if self.closed {
            return;
        }
        self.shortcuts = shortcuts;
        self.notify_changed();
    }

    /// Switch between the blended view and a single-corpus view.
    ///
    /// Accumulated results are kept either way. No-op when the filter is
    /// unchanged; the notification is skipped when exactly one corpus is
    /// both the sole expected corpus and the requested filter, since the
    /// displayed content cannot change.
    pub fn filter_by_corpus(&mut self, corpus: Option<&str>) {
        if self.single_corpus_filter.as_deref() == corpus {
            return;
        }
        self.single_corpus_filter = corpus.map(str::to_owned);
        self.cached_promoted = None;
        if self.expected_corpora.len() == 1
            && corpus.is_some_and(|name| name == self.expected_corpora[0])
        {
            return;
        }
        self.observers.notify_changed();
    }

    /// The promoted (displayed) view, recomputed first when invalidated.
    ///
    /// Never blocks and never waits on outstanding corpora: it is a pure
    /// function of the results accumulated so far.
    pub fn promoted(&mut self) -> &SuggestionList {
        if let Some(built) = self.cached_promoted.take() {
            return self.cached_promoted.insert(built);
        }
        let built = self.build_promoted();
        trace!(promoted = built.len(), "promoted view rebuilt");
        self.cached_promoted.insert(built)
    }

    fn build_promoted(&self) -> SuggestionList {
        match self.single_corpus_filter.as_deref() {
            Some(corpus) => match self.corpus_result(corpus) {
                Some(result) => SuggestionList::from_cursor(result),
                None => SuggestionList::new(self.user_query.clone()),
            },
            None => {
                let mut dest = DedupSuggestionList::new(self.user_query.clone());
                if let Some(promoter) = &self.promoter {
                    promoter.pick_promoted(
                        self.shortcuts
                            .as_ref()
                            .map(|shortcuts| shortcuts as &dyn SuggestionCursor),
                        &self.corpus_results,
                        self.max_promoted,
                        &mut dest,
                    );
                }
                dest.into_list()
            }
        }
    }

    /// Drain the arrival channel, appending every delivered batch.
    ///
    /// Must run on the owning thread. Returns the number of corpus results
    /// absorbed.
    pub fn pump(&mut self) -> usize {
        let Some(arrivals) = self.arrivals.take() else {
            return 0;
        };
        let mut absorbed = 0;
        let mut disconnected = false;
        loop {
            match arrivals.try_recv() {
                Ok(batch) => {
                    absorbed += batch.len();
                    self.add_results(batch);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        if !disconnected && !self.closed {
            self.arrivals = Some(arrivals);
        }
        absorbed
    }

    /// Register a change observer, fired after every structural change.
    pub fn register_observer(&mut self, observer: impl FnMut() + 'static) -> ObserverId {
        self.observers.register(observer)
    }

    /// Remove a previously registered observer.
    pub fn unregister_observer(&mut self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    /// Release every accumulated corpus result and refuse further mutation.
    ///
    /// Results delivered after closing are released instead of retained.
    ///
    /// # Panics
    ///
    /// Panics when called twice; double close is a programming error.
    pub fn close(&mut self) {
        assert!(!self.closed, "double close()");
        debug!(query = %self.user_query, results = self.corpus_results.len(), "closing suggestions");
        self.closed = true;
        self.arrivals = None;
        for result in &mut self.corpus_results {
            result.release();
        }
        self.corpus_results.clear();
        self.cached_promoted = None;
        self.observers = ObserverRegistry::new();
    }

    fn notify_changed(&mut self) {
        self.cached_promoted = None;
        self.observers.notify_changed();
    }
}

impl std::fmt::Debug for Suggestions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suggestions")
            .field("user_query", &self.user_query)
            .field("expected_corpora", &self.expected_corpora)
            .field("result_count", &self.corpus_results.len())
            .field("closed", &self.closed)
            .finish()
    }
}
