// ContentProvider trait — the swap-ready source of open pages.
//
// A browser extension, a session file or a test fixture can all sit behind
// this trait. The engine only needs two things: the list of open pages and a
// batch extraction that never fails as a whole.

use anyhow::Result;
use async_trait::async_trait;

use super::item::{ContentItem, Handle};

/// URL prefixes of host-internal pages that are never grouped.
const SYSTEM_URL_PREFIXES: [&str; 4] = ["chrome://", "chrome-extension://", "edge://", "about:"];

/// A page as listed by the host, before its content is read.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRef {
    pub handle: Handle,
    pub title: String,
    pub url: String,
}

#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// List the currently open pages.
    async fn pages(&self) -> Result<Vec<PageRef>>;

    /// Read content for each handle, in order.
    ///
    /// Per-handle failures must not abort the batch: implementations return a
    /// degraded item (see `ContentItem::degraded`) instead.
    async fn extract(&self, handles: &[Handle]) -> Vec<ContentItem>;
}

/// Whether a URL points at a host-internal page (settings, extensions, blank tabs).
pub fn is_system_url(url: &str) -> bool {
    SYSTEM_URL_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

/// Keep only pages that can meaningfully be grouped: those with a URL that
/// isn't a host-internal page.
pub fn groupable(pages: Vec<PageRef>) -> Vec<PageRef> {
    pages
        .into_iter()
        .filter(|p| !p.url.is_empty() && !is_system_url(&p.url))
        .collect()
}
