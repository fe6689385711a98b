// Snapshot provider — reads open pages from a JSON file.
//
// The file is an array of page records as a browser host would capture them:
//
//   [{"id": 1, "title": "...", "url": "...", "headings": "...", "text": "..."}]
//
// A record may carry an "error" string instead of content, meaning the host
// could not read that page. Those become degraded items rather than failures.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::item::{ContentItem, Handle};
use super::provider::{ContentProvider, PageRef};

/// One captured page as stored in a snapshot file.
#[derive(Debug, Clone, Deserialize)]
pub struct PageRecord {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub headings: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// In-memory snapshot of open pages, keyed by handle.
pub struct SnapshotProvider {
    /// Records in file order (page listing preserves it)
    records: Vec<PageRecord>,
    index: HashMap<Handle, usize>,
}

impl SnapshotProvider {
    /// Build a provider from records. Page ids must be unique.
    pub fn new(records: Vec<PageRecord>) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if index.insert(Handle(record.id), i).is_some() {
                anyhow::bail!("Duplicate page id {} in snapshot", record.id);
            }
        }
        Ok(Self { records, index })
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let records: Vec<PageRecord> = serde_json::from_str(raw)?;
        Self::new(records)
    }

    /// Known title for a handle, used by sinks to show members.
    pub fn title_of(&self, handle: Handle) -> Option<&str> {
        self.index
            .get(&handle)
            .map(|&i| self.records[i].title.as_str())
    }

    fn item_from_record(record: &PageRecord) -> Option<ContentItem> {
        let handle = Handle(record.id);
        let title = (!record.title.trim().is_empty()).then_some(record.title.as_str());

        if let Some(err) = &record.error {
            warn!(
                handle = %handle,
                title = record.title,
                error = err.as_str(),
                "Failed to read page content, using title only"
            );
            return Some(ContentItem::degraded(handle, title, &record.url, err));
        }

        if record.title.is_empty() && record.text.is_empty() && record.headings.is_empty() {
            debug!(handle = %handle, "Page has no readable content, skipping");
            return None;
        }

        let text = if !record.text.trim().is_empty() {
            record.text.as_str()
        } else {
            title.unwrap_or("No content")
        };

        Some(ContentItem::new(
            handle,
            title.unwrap_or("Untitled"),
            record.headings.trim(),
            text,
            &record.url,
        ))
    }
}

#[async_trait]
impl ContentProvider for SnapshotProvider {
    async fn pages(&self) -> Result<Vec<PageRef>> {
        Ok(self
            .records
            .iter()
            .map(|r| PageRef {
                handle: Handle(r.id),
                title: r.title.clone(),
                url: r.url.clone(),
            })
            .collect())
    }

    async fn extract(&self, handles: &[Handle]) -> Vec<ContentItem> {
        let mut items = Vec::with_capacity(handles.len());
        for handle in handles {
            match self.index.get(handle) {
                Some(&i) => {
                    if let Some(item) = Self::item_from_record(&self.records[i]) {
                        items.push(item);
                    }
                }
                None => warn!(handle = %handle, "Unknown page handle, skipping"),
            }
        }
        debug!(requested = handles.len(), extracted = items.len(), "Extracted page content");
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"[
        {"id": 1, "title": "Tokio tutorial", "url": "https://tokio.rs/tokio/tutorial", "headings": "Tutorial", "text": "Tokio is an async runtime"},
        {"id": 2, "title": "Broken page", "url": "https://example.com/x", "error": "Cannot access contents"},
        {"id": 3, "title": "", "url": "https://example.com/empty"},
        {"id": 4, "title": "Only a title", "url": "https://example.com/t", "text": "   "}
    ]"#;

    #[tokio::test]
    async fn test_extract_handles_each_record_kind() {
        let provider = SnapshotProvider::from_json(SNAPSHOT).unwrap();
        let handles = [Handle(1), Handle(2), Handle(3), Handle(4), Handle(99)];
        let items = provider.extract(&handles).await;

        let ids: Vec<u64> = items.iter().map(|i| i.handle.0).collect();
        assert_eq!(ids, vec![1, 2, 4]);

        assert_eq!(items[0].text, "Tokio is an async runtime");
        assert!(items[0].error.is_none());

        assert_eq!(items[1].text, "Broken page");
        assert!(items[1].error.is_some());

        assert_eq!(items[2].text, "Only a title");
    }

    #[tokio::test]
    async fn test_pages_preserve_file_order() {
        let provider = SnapshotProvider::from_json(SNAPSHOT).unwrap();
        let pages = provider.pages().await.unwrap();
        let ids: Vec<u64> = pages.iter().map(|p| p.handle.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(provider.title_of(Handle(1)), Some("Tokio tutorial"));
        assert_eq!(provider.title_of(Handle(42)), None);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let raw = r#"[
            {"id": 1, "title": "A", "url": "https://a.com"},
            {"id": 2, "title": "C", "url": "https://c.com"},
            {"id": 1, "title": "B", "url": "https://b.com"}
        ]"#;
        let err = SnapshotProvider::from_json(raw).err().expect("duplicate id should fail");
        assert!(err.to_string().contains("Duplicate page id 1"), "got {err:#}");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(SnapshotProvider::from_json("{not json").is_err());
    }
}
