use crate::suggestion::Suggestion;

/// Read-only, randomly indexable view over suggestion records with a stable
/// count, tagged with the user query that produced it.
pub trait SuggestionCursor {
    /// The user query string this cursor was produced for.
    fn user_query(&self) -> &str;

    /// Total number of suggestions in the cursor.
    fn len(&self) -> usize;

    /// Returns `true` if the cursor contains no suggestions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Random access to the suggestion at `index`.
    fn suggestion(&self, index: usize) -> Option<&Suggestion>;

    /// Sequential access from the current position onwards.
    fn iter(&self) -> CursorIter<'_>
    where
        Self: Sized,
    {
        CursorIter {
            cursor: self,
            position: 0,
        }
    }
}

impl<T> SuggestionCursor for &T
where
    T: SuggestionCursor + ?Sized,
{
    fn user_query(&self) -> &str {
        <T as SuggestionCursor>::user_query(*self)
    }

    fn len(&self) -> usize {
        <T as SuggestionCursor>::len(*self)
    }

    fn suggestion(&self, index: usize) -> Option<&Suggestion> {
        <T as SuggestionCursor>::suggestion(*self, index)
    }
}

/// Position-tracking iterator over a [`SuggestionCursor`].
pub struct CursorIter<'a> {
    cursor: &'a dyn SuggestionCursor,
    position: usize,
}

impl<'a> CursorIter<'a> {
    /// Iterate over a cursor behind a trait object.
    #[must_use]
    pub fn over(cursor: &'a dyn SuggestionCursor) -> Self {
        Self {
            cursor,
            position: 0,
        }
    }

    /// Index of the suggestion the iterator will yield next.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<'a> Iterator for CursorIter<'a> {
    type Item = &'a Suggestion;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.cursor.suggestion(self.position)?;
        self.position += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cursor.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::SuggestionList;

    #[test]
    fn iterates_in_order_and_tracks_position() {
        let mut list = SuggestionList::new("qu");
        list.push(Suggestion::new("a", "1", "one"));
        list.push(Suggestion::new("a", "2", "two"));

        let mut iter = list.iter();
        assert_eq!(iter.position(), 0);
        assert_eq!(iter.next().map(Suggestion::text1), Some("one"));
        assert_eq!(iter.position(), 1);
        assert_eq!(iter.next().map(Suggestion::text1), Some("two"));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.position(), 2);
    }

    #[test]
    fn iterates_over_trait_objects() {
        let mut list = SuggestionList::new("qu");
        list.push(Suggestion::new("a", "1", "one"));
        let cursor: &dyn SuggestionCursor = &list;
        let texts: Vec<&str> = CursorIter::over(cursor).map(Suggestion::text1).collect();
        assert_eq!(texts, vec!["one"]);
    }
}
