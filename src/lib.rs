//! Incremental aggregation of typeahead suggestions from asynchronous
//! sources.
//!
//! A query fans out to an arbitrary set of corpora that report back in any
//! order and at any latency. The [`Suggestions`] aggregate accumulates those
//! reports on a single owning thread, keeps a lazily recomputed promoted
//! view capped and deduplicated through a pluggable [`Promoter`], and
//! notifies registered observers after every structural change. Closing an
//! aggregate releases everything it owns and turns late deliveries into
//! no-ops, so a new query can supersede an old one at any time.

pub mod config;
pub mod corpus;
pub mod cursor;
pub mod latency;
pub mod list;
pub mod observer;
pub mod promote;
pub mod provider;
pub mod shortcut;
pub mod suggestion;
pub mod suggestions;

pub use config::Config;
pub use corpus::{Corpus, CorpusResult};
pub use cursor::{CursorIter, SuggestionCursor};
pub use latency::{LatencyEvent, LatencyTracker};
pub use list::{DedupSuggestionList, SuggestionList};
pub use observer::{ObserverId, ObserverRegistry};
pub use promote::{ConcatPromoter, Promoter, RoundRobinPromoter, ShortcutPromoter};
pub use provider::{ProviderError, SuggestionsProvider, should_abort};
pub use shortcut::{ClickReporter, ShortcutCache};
pub use suggestion::{Suggestion, SuggestionKey};
pub use suggestions::Suggestions;
