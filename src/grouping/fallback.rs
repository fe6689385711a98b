// Domain-based fallback grouping.
//
// Used when no classifier is available (or opening one fails). Pages are
// grouped by hostname with a leading "www." removed, so "www.a.com" and
// "a.com" land together. Fully deterministic, no external calls.
//
// Pages whose URL can't be parsed, or parses without a host (file:, data:),
// are left out of every group.

use std::collections::HashMap;

use reqwest::Url;
use tracing::{info, warn};

use super::cluster::{sort_by_size, Cluster};
use crate::content::item::ContentItem;

/// Group items by domain. Each cluster is named after its domain, and the
/// domain doubles as the topic.
///
/// Items whose URL can't be parsed, or parses without a host, are left out.
pub fn group_by_domain(items: &[ContentItem]) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();
    let mut by_domain: HashMap<String, usize> = HashMap::new();

    for item in items {
        let Some(domain) = domain_of(&item.url) else {
            warn!(url = item.url, title = item.title, "Cannot parse page URL, leaving it ungrouped");
            continue;
        };

        match by_domain.get(&domain) {
            Some(&idx) => clusters[idx].members.push(item.handle),
            None => {
                by_domain.insert(domain.clone(), clusters.len());
                clusters.push(Cluster::new(domain.clone(), domain, item.handle));
            }
        }
    }

    sort_by_size(&mut clusters);
    info!(clusters = clusters.len(), "Grouped pages by domain");
    clusters
}

/// The URL's hostname without a leading "www.".
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str().filter(|h| !h.is_empty())?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}
