// ContentItem — one open page, reduced to the fields topic extraction needs.

use serde::{Deserialize, Serialize};

/// Maximum number of characters of body text kept per item.
pub const MAX_TEXT_CHARS: usize = 500;

/// Opaque reference to a content source (a tab, in a browser host).
///
/// The engine never interprets the value; it only carries it from the
/// provider through clustering to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(pub u64);

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A captured page, ready for topic extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    pub handle: Handle,
    pub title: String,
    /// Top-level headings joined with spaces (may be empty)
    pub headings: String,
    /// Bounded snippet of body text, at most `MAX_TEXT_CHARS` characters
    pub text: String,
    pub url: String,
    /// Filled in during a grouping run; `None` until then
    pub topic: Option<String>,
    /// Set when the provider could not read the page and degraded the item.
    /// The engine tolerates it but does not act on it.
    pub error: Option<String>,
}

impl ContentItem {
    /// Build an item, trimming `text` to the snippet bound.
    pub fn new(
        handle: Handle,
        title: impl Into<String>,
        headings: impl Into<String>,
        text: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        let text: String = text.into();
        Self {
            handle,
            title: title.into(),
            headings: headings.into(),
            text: text.trim().chars().take(MAX_TEXT_CHARS).collect(),
            url: url.into(),
            topic: None,
            error: None,
        }
    }

    /// Build a degraded item for a page whose content could not be read.
    /// Only the known title survives, and it doubles as the body text.
    pub fn degraded(
        handle: Handle,
        title: Option<&str>,
        url: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        let title = title.filter(|t| !t.trim().is_empty());
        let mut item = Self::new(
            handle,
            title.unwrap_or("Untitled"),
            "",
            title.unwrap_or("Unknown content"),
            url,
        );
        item.error = Some(error.into());
        item
    }

    /// The topic if one has been assigned, otherwise the title.
    pub fn topic_or_title(&self) -> &str {
        self.topic.as_deref().unwrap_or(&self.title)
    }
}
