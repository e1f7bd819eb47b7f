use std::collections::BTreeMap;

/// Identity of a suggestion, used to suppress duplicates across sources.
///
/// Two suggestions are the same entry when they come from the same source
/// and carry the same source-intrinsic id, regardless of how either source
/// chose to render them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SuggestionKey {
    pub source: String,
    pub id: String,
}

impl SuggestionKey {
    /// Create a key from a source name and a source-intrinsic id.
    #[must_use]
    pub fn new(source: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            id: id.into(),
        }
    }
}

/// A single candidate result produced by a suggestion source.
///
/// Immutable once produced. Presentation fields are plain strings; how they
/// are rendered belongs to the consumer, not to this crate.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Suggestion {
    source: String,
    id: String,
    text1: String,
    text2: Option<String>,
    icon: Option<String>,
    display_query: Option<String>,
    action_messages: BTreeMap<u32, String>,
    shortcut: bool,
}

impl Suggestion {
    /// Create a suggestion with the mandatory identity and display text.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        id: impl Into<String>,
        text1: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            id: id.into(),
            text1: text1.into(),
            text2: None,
            icon: None,
            display_query: None,
            action_messages: BTreeMap::new(),
            shortcut: false,
        }
    }

    /// Attach a secondary display line.
    #[must_use]
    pub fn with_text2(mut self, text2: impl Into<String>) -> Self {
        self.text2 = Some(text2.into());
        self
    }

    /// Attach an icon reference.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the query text restored to the input box when this suggestion is
    /// selected without being launched.
    #[must_use]
    pub fn with_display_query(mut self, query: impl Into<String>) -> Self {
        self.display_query = Some(query.into());
        self
    }

    /// Map an action key code to a source-defined action message.
    #[must_use]
    pub fn with_action_message(mut self, key_code: u32, message: impl Into<String>) -> Self {
        self.action_messages.insert(key_code, message.into());
        self
    }

    /// Mark the suggestion as coming from the shortcut cache.
    #[must_use]
    pub fn as_shortcut(mut self) -> Self {
        self.shortcut = true;
        self
    }

    /// Name of the source that produced this suggestion.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source-intrinsic id of this suggestion.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Primary display text.
    #[must_use]
    pub fn text1(&self) -> &str {
        &self.text1
    }

    /// Secondary display text, if any.
    #[must_use]
    pub fn text2(&self) -> Option<&str> {
        self.text2.as_deref()
    }

    /// Icon reference, if any.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Query text to restore on selection, if any.
    #[must_use]
    pub fn display_query(&self) -> Option<&str> {
        self.display_query.as_deref()
    }

    /// Source-defined action message for the provided key code.
    #[must_use]
    pub fn action_message(&self, key_code: u32) -> Option<&str> {
        self.action_messages.get(&key_code).map(String::as_str)
    }

    /// Whether the suggestion came from the shortcut cache.
    #[must_use]
    pub fn is_shortcut(&self) -> bool {
        self.shortcut
    }

    /// Identity key used for deduplication.
    #[must_use]
    pub fn key(&self) -> SuggestionKey {
        SuggestionKey::new(self.source.clone(), self.id.clone())
    }
}
