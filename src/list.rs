use indexmap::IndexMap;

use crate::cursor::SuggestionCursor;
use crate::suggestion::{Suggestion, SuggestionKey};

/// Insertion-ordered, mutable collection of suggestion records.
///
/// Appending from a cursor copies the records, detaching the list from the
/// source cursor's lifetime.
#[derive(Debug, Clone, Default)]
pub struct SuggestionList {
    user_query: String,
    entries: Vec<Suggestion>,
}

impl SuggestionList {
    /// Create an empty list for the provided user query.
    #[must_use]
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            entries: Vec::new(),
        }
    }

    /// Append a single suggestion.
    pub fn push(&mut self, suggestion: Suggestion) {
        self.entries.push(suggestion);
    }

    /// Copy every suggestion out of `cursor`, preserving its order.
    pub fn extend_from_cursor(&mut self, cursor: &dyn SuggestionCursor) {
        self.entries.reserve(cursor.len());
        for index in 0..cursor.len() {
            if let Some(suggestion) = cursor.suggestion(index) {
                self.entries.push(suggestion.clone());
            }
        }
    }

    /// Build a list by copying an existing cursor.
    #[must_use]
    pub fn from_cursor(cursor: &dyn SuggestionCursor) -> Self {
        let mut list = Self::new(cursor.user_query());
        list.extend_from_cursor(cursor);
        list
    }
}

impl SuggestionCursor for SuggestionList {
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

/// Duplicate-suppressing variant of [`SuggestionList`].
///
/// A candidate whose identity key matches an already inserted record is
/// silently skipped; the first-seen record and its position win.
#[derive(Debug, Clone, Default)]
pub struct DedupSuggestionList {
    user_query: String,
    entries: IndexMap<SuggestionKey, Suggestion>,
}

impl DedupSuggestionList {
    /// Create an empty deduplicating list for the provided user query.
    #[must_use]
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            entries: IndexMap::new(),
        }
    }

    /// Append a suggestion unless its key was seen before.
    ///
    /// Returns `true` when the suggestion was inserted.
    pub fn push(&mut self, suggestion: Suggestion) -> bool {
        let key = suggestion.key();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, suggestion);
        true
    }

    /// Copy every suggestion out of `cursor`, skipping already-seen keys.
    ///
    /// Returns the number of suggestions actually inserted.
    pub fn extend_from_cursor(&mut self, cursor: &dyn SuggestionCursor) -> usize {
        let mut inserted = 0;
        for index in 0..cursor.len() {
            if let Some(suggestion) = cursor.suggestion(index)
                && self.push(suggestion.clone())
            {
                inserted += 1;
            }
        }
        inserted
    }

    /// Returns `true` if a suggestion with this identity key was inserted.
    #[must_use]
    pub fn contains_key(&self, key: &SuggestionKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Convert into a plain ordered list, preserving insertion order.
    #[must_use]
    pub fn into_list(self) -> SuggestionList {
        SuggestionList {
            user_query: self.user_query,
            entries: self.entries.into_values().collect(),
        }
    }
}

impl SuggestionCursor for DedupSuggestionList {
    fn user_query(&self) -> &str {
        &self.user_query
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn suggestion(&self, index: usize) -> Option<&Suggestion> {
        self.entries.get_index(index).map(|(_, suggestion)| suggestion)
    }
}
