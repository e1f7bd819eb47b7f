use crate::list::SuggestionList;
use crate::suggestion::SuggestionKey;

/// Fast local cache of previously chosen suggestions.
///
/// Consumed read-only by promoters; storage and eviction policy live behind
/// this seam, outside the engine.
pub trait ShortcutCache: Send + Sync {
    /// Shortcut entries relevant to `query`, in cache-preferred order.
    fn shortcuts_for(&self, query: &str) -> Option<SuggestionList>;
}

/// Collaborator told about promoted suggestions the user chose.
pub trait ClickReporter {
    /// Record a click on the suggestion with `key` at display `position`.
    fn report_click(&self, key: &SuggestionKey, position: usize);
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::cursor::SuggestionCursor;
    use crate::suggestion::Suggestion;

    #[derive(Default)]
    struct RecordingReporter {
        clicks: RefCell<Vec<(SuggestionKey, usize)>>,
    }

    impl ClickReporter for RecordingReporter {
        fn report_click(&self, key: &SuggestionKey, position: usize) {
            self.clicks.borrow_mut().push((key.clone(), position));
        }
    }

    #[test]
    fn clicks_carry_identity_and_display_position() {
        let mut promoted = SuggestionList::new("qu");
        promoted.push(Suggestion::new("web", "k1", "hit"));
        promoted.push(Suggestion::new("apps", "k2", "app"));

        let reporter = RecordingReporter::default();
        let position = 1;
        if let Some(chosen) = promoted.suggestion(position) {
            reporter.report_click(&chosen.key(), position);
        }

        let clicks = reporter.clicks.borrow();
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks[0].0, SuggestionKey::new("apps", "k2"));
        assert_eq!(clicks[0].1, 1);
    }
}
