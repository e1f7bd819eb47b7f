use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::corpus::Corpus;
use crate::promote::Promoter;
use crate::shortcut::ShortcutCache;
use crate::suggestions::Suggestions;

/// Errors that can occur when assembling a [`SuggestionsProvider`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// A corpus attempted to register a name that already exists.
    #[error("corpus '{name}' is already registered")]
    DuplicateCorpus { name: String },
}

/// Fans a query out to every registered corpus on background threads and
/// returns the aggregate those threads deliver into.
///
/// Each query gets a fresh id from a shared counter; a worker whose id is no
/// longer the latest drops its result instead of sending it, so a new query
/// supersedes the old one without waiting for its workers.
pub struct SuggestionsProvider {
    corpora: Vec<Arc<dyn Corpus>>,
    promoter: Arc<dyn Promoter>,
    shortcuts: Option<Arc<dyn ShortcutCache>>,
    config: Config,
    latest_query_id: Arc<AtomicU64>,
}

impl SuggestionsProvider {
    /// Create a provider using `promoter` for every aggregate it builds.
    ///
    /// # Errors
    ///
    /// Returns an error when `config` fails validation.
    pub fn new(promoter: Arc<dyn Promoter>, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            corpora: Vec::new(),
            promoter,
            shortcuts: None,
            config,
            latest_query_id: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Register a corpus; queries hit corpora in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::DuplicateCorpus`] when a corpus with the
    /// same name is already registered.
    pub fn register_corpus(&mut self, corpus: Arc<dyn Corpus>) -> Result<(), ProviderError> {
        if self.corpora.iter().any(|c| c.name() == corpus.name()) {
            return Err(ProviderError::DuplicateCorpus {
                name: corpus.name().to_owned(),
            });
        }
        self.corpora.push(corpus);
        Ok(())
    }

    /// Attach a shortcut cache consulted for every query.
    pub fn set_shortcut_cache(&mut self, shortcuts: Arc<dyn ShortcutCache>) {
        self.shortcuts = Some(shortcuts);
    }

    /// Names of the registered corpora, in registration order.
    #[must_use]
    pub fn corpus_names(&self) -> Vec<&str> {
        self.corpora.iter().map(|corpus| corpus.name()).collect()
    }

    /// Counter identifying the most recently issued query.
    #[must_use]
    pub fn latest_query_id(&self) -> &Arc<AtomicU64> {
        &self.latest_query_id
    }

    /// Start a query and return its aggregate immediately.
    ///
    /// Corpus results arrive on the aggregate's channel; the owning thread
    /// absorbs them with [`Suggestions::pump`]. Issuing a new query
    /// supersedes the previous one: its workers abort at the id check, and
    /// anything already in flight fails to send once the old aggregate (and
    /// with it the receiver) is gone.
    #[must_use]
    pub fn query(&self, query: &str) -> Suggestions {
        let id = self.latest_query_id.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(id, query, corpora = self.corpora.len(), "starting query");

        let expected = self
            .corpora
            .iter()
            .map(|corpus| corpus.name().to_owned())
            .collect();
        let mut suggestions = Suggestions::new(
            Some(Arc::clone(&self.promoter)),
            self.config.max_promoted,
            query,
            expected,
        );
        if let Some(cache) = &self.shortcuts {
            suggestions.set_shortcuts(cache.shortcuts_for(query));
        }

        let (tx, rx) = mpsc::channel();
        suggestions.attach_arrivals(rx);

        for corpus in &self.corpora {
            let corpus = Arc::clone(corpus);
            let tx = tx.clone();
            let latest = Arc::clone(&self.latest_query_id);
            let query = query.to_owned();
            let max_results = self.config.max_results_per_corpus;
            thread::spawn(move || {
                let result = match corpus.query(&query, max_results) {
                    Ok(result) => result,
                    Err(error) => {
                        warn!(corpus = corpus.name(), %error, "corpus query failed");
                        return;
                    }
                };
                if should_abort(id, &latest) {
                    debug!(id, corpus = corpus.name(), "query superseded, dropping result");
                    return;
                }
                let _ = tx.send(vec![result]);
            });
        }

        suggestions
    }
}

/// Check if this query has been superseded by a newer one.
#[must_use]
pub fn should_abort(id: u64, latest_query_id: &AtomicU64) -> bool {
    latest_query_id.load(Ordering::Acquire) != id
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::corpus::CorpusResult;
    use crate::cursor::SuggestionCursor;
    use crate::promote::ConcatPromoter;
    use crate::suggestion::Suggestion;

    struct StubCorpus {
        name: &'static str,
        entries: Vec<&'static str>,
        fail: bool,
    }

    impl StubCorpus {
        fn new(name: &'static str, entries: Vec<&'static str>) -> Self {
            Self {
                name,
                entries,
                fail: false,
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                name,
                entries: Vec::new(),
                fail: true,
            }
        }
    }

    impl Corpus for StubCorpus {
        fn name(&self) -> &str {
            self.name
        }

        fn query(&self, query: &str, max_results: usize) -> Result<CorpusResult> {
            if self.fail {
                anyhow::bail!("stub corpus failure");
            }
            let entries = self
                .entries
                .iter()
                .take(max_results)
                .map(|id| Suggestion::new(self.name, *id, format!("{}:{id}", self.name)))
                .collect();
            Ok(CorpusResult::new(self.name, query, entries))
        }
    }

    fn pump_until_done(suggestions: &mut Suggestions) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            suggestions.pump();
            if suggestions.is_done() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn rejects_duplicate_corpus_names() {
        let mut provider =
            SuggestionsProvider::new(Arc::new(ConcatPromoter), Config::default()).unwrap();
        provider
            .register_corpus(Arc::new(StubCorpus::new("apps", vec![])))
            .unwrap();
        let err = provider
            .register_corpus(Arc::new(StubCorpus::new("apps", vec![])))
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::DuplicateCorpus {
                name: "apps".to_owned()
            }
        );
    }

    #[test]
    fn rejects_invalid_config() {
        let config = Config {
            max_promoted: 0,
            ..Config::default()
        };
        assert!(SuggestionsProvider::new(Arc::new(ConcatPromoter), config).is_err());
    }

    #[test]
    fn query_reaches_done_once_every_corpus_reports() {
        let mut provider =
            SuggestionsProvider::new(Arc::new(ConcatPromoter), Config::default()).unwrap();
        provider
            .register_corpus(Arc::new(StubCorpus::new("a", vec!["1", "2"])))
            .unwrap();
        provider
            .register_corpus(Arc::new(StubCorpus::new("b", vec!["3"])))
            .unwrap();

        let mut suggestions = provider.query("qu");
        assert!(pump_until_done(&mut suggestions));
        assert_eq!(suggestions.included_corpora().len(), 2);
        assert_eq!(suggestions.promoted().len(), 3);
    }

    #[test]
    fn failed_corpus_never_reports() {
        let mut provider =
            SuggestionsProvider::new(Arc::new(ConcatPromoter), Config::default()).unwrap();
        provider
            .register_corpus(Arc::new(StubCorpus::new("ok", vec!["1"])))
            .unwrap();
        provider
            .register_corpus(Arc::new(StubCorpus::failing("broken")))
            .unwrap();

        let mut suggestions = provider.query("qu");
        let deadline = Instant::now() + Duration::from_millis(500);
        while Instant::now() < deadline {
            suggestions.pump();
            thread::sleep(Duration::from_millis(5));
        }

        assert!(!suggestions.is_done());
        assert_eq!(suggestions.result_count(), 1);
        assert!(suggestions.corpus_result("broken").is_none());
    }

    #[test]
    fn superseded_ids_report_abort() {
        let latest = AtomicU64::new(2);
        assert!(should_abort(1, &latest));
        assert!(!should_abort(2, &latest));
    }

    #[test]
    fn corpus_results_respect_the_per_corpus_cap() {
        let config = Config {
            max_results_per_corpus: 1,
            ..Config::default()
        };
        let mut provider = SuggestionsProvider::new(Arc::new(ConcatPromoter), config).unwrap();
        provider
            .register_corpus(Arc::new(StubCorpus::new("a", vec!["1", "2", "3"])))
            .unwrap();

        let mut suggestions = provider.query("qu");
        assert!(pump_until_done(&mut suggestions));
        assert_eq!(suggestions.promoted().len(), 1);
    }
}
