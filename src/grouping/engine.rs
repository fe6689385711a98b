// GroupingEngine — one grouping run from captured items to applied groups.
//
// Semantic path:
//   1. Check classifier availability (once per run)
//   2. Open a session, owned by this run alone
//   3. Extract a topic per item, one at a time (the session is shared, so
//      calls are never issued concurrently)
//   4. Cluster by topic equivalence
//   5. Release the session, whatever happened
//
// If the classifier is unavailable, or anything on the semantic path fails as
// a whole, the run degrades to domain grouping instead of failing. Only an
// empty batch or a sink that creates nothing is reported to the caller.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::cluster::{Cluster, ClusterBuilder};
use super::errors::GroupingError;
use super::fallback::group_by_domain;
use crate::content::item::{ContentItem, Handle};
use crate::content::provider::{groupable, ContentProvider};
use crate::output::sink::GroupingSink;
use crate::topics::classifier::{TopicClassifier, DEFAULT_EXTRACTION_TIMEOUT};
use crate::topics::traits::{Availability, Classifier, ClassifierSession, SessionConfig};

/// Tunables for a grouping run.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Deadline for each topic extraction
    pub extraction_timeout: Duration,
    /// Options for the per-run classifier session
    pub session: SessionConfig,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            extraction_timeout: DEFAULT_EXTRACTION_TIMEOUT,
            session: SessionConfig::default(),
        }
    }
}

/// Which path produced a set of clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingStrategy {
    /// Classifier topics + greedy clustering
    Semantic,
    /// Hostname-based fallback
    Domain,
}

impl std::fmt::Display for GroupingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupingStrategy::Semantic => f.write_str("semantic"),
            GroupingStrategy::Domain => f.write_str("domain"),
        }
    }
}

/// Clusters plus the path that produced them.
#[derive(Debug, Clone)]
pub struct Partition {
    pub clusters: Vec<Cluster>,
    pub strategy: GroupingStrategy,
}

/// Result of a full pass from page listing to applied groups.
#[derive(Debug, Clone)]
pub struct GroupingOutcome {
    pub clusters: Vec<Cluster>,
    pub groups_created: usize,
    pub strategy: GroupingStrategy,
}

/// Owns a classifier session for the length of one run and destroys it on
/// drop, so every exit path (including early returns and a cancelled run)
/// releases it exactly once.
struct SessionGuard(Box<dyn ClassifierSession>);

impl SessionGuard {
    fn session(&self) -> &dyn ClassifierSession {
        self.0.as_ref()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.0.destroy();
    }
}

pub struct GroupingEngine {
    classifier: Arc<dyn Classifier>,
    options: EngineOptions,
}

impl GroupingEngine {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self::with_options(classifier, EngineOptions::default())
    }

    pub fn with_options(classifier: Arc<dyn Classifier>, options: EngineOptions) -> Self {
        Self {
            classifier,
            options,
        }
    }

    /// Group items into clusters, largest first.
    ///
    /// On the semantic path each item's `topic` is filled in as a side
    /// effect. Fails only when `items` is empty.
    pub async fn run(&self, items: &mut [ContentItem]) -> Result<Vec<Cluster>, GroupingError> {
        Ok(self.partition(items).await?.clusters)
    }

    /// Like `run`, but also reports which path produced the clusters.
    pub async fn partition(&self, items: &mut [ContentItem]) -> Result<Partition, GroupingError> {
        if items.is_empty() {
            return Err(GroupingError::NoContent);
        }

        let availability = self.classifier.availability().await;
        if availability != Availability::Available {
            info!(%availability, items = items.len(), "Classifier not ready, grouping by domain");
            return Ok(domain_partition(items));
        }

        match self.classify(items).await {
            Ok(clusters) => {
                info!(items = items.len(), clusters = clusters.len(), "Grouped pages by topic");
                Ok(Partition {
                    clusters,
                    strategy: GroupingStrategy::Semantic,
                })
            }
            Err(e) => {
                warn!(error = format!("{e:#}"), "Topic grouping failed, grouping by domain");
                Ok(domain_partition(items))
            }
        }
    }

    /// The semantic path. The session guard lives until this returns.
    async fn classify(&self, items: &mut [ContentItem]) -> Result<Vec<Cluster>> {
        let guard = SessionGuard(
            self.classifier
                .create(&self.options.session)
                .await
                .context("Failed to open classifier session")?,
        );
        let topics = TopicClassifier::new(guard.session(), self.options.extraction_timeout);

        for item in items.iter_mut() {
            let topic = topics.extract_topic(item).await;
            item.topic = Some(topic);
        }

        let clusters = ClusterBuilder::new(&topics).build(items).await;
        Ok(clusters)
    }

    /// Full pass: list pages, drop host-internal ones, extract content,
    /// group, and hand the clusters to the sink.
    pub async fn group_and_apply(
        &self,
        provider: &dyn ContentProvider,
        sink: &dyn GroupingSink,
    ) -> Result<GroupingOutcome, GroupingError> {
        let pages = groupable(provider.pages().await.map_err(GroupingError::Provider)?);
        if pages.is_empty() {
            warn!("No groupable pages (all are system pages)");
            return Err(GroupingError::NoContent);
        }

        let mut seen = HashSet::with_capacity(pages.len());
        let mut handles: Vec<Handle> = Vec::with_capacity(pages.len());
        for page in &pages {
            if seen.insert(page.handle) {
                handles.push(page.handle);
            } else {
                warn!(handle = %page.handle, url = page.url, "Page listed twice, keeping the first");
            }
        }
        let mut items = provider.extract(&handles).await;
        if items.is_empty() {
            warn!(pages = handles.len(), "Could not extract content from any page");
            return Err(GroupingError::NoContent);
        }

        let Partition { clusters, strategy } = self.partition(&mut items).await?;
        let groups_created = apply_clusters(sink, &clusters).await?;

        Ok(GroupingOutcome {
            clusters,
            groups_created,
            strategy,
        })
    }
}

fn domain_partition(items: &[ContentItem]) -> Partition {
    Partition {
        clusters: group_by_domain(items),
        strategy: GroupingStrategy::Domain,
    }
}

/// Apply clusters through the sink, treating "nothing created" as a failure.
pub async fn apply_clusters(
    sink: &dyn GroupingSink,
    clusters: &[Cluster],
) -> Result<usize, GroupingError> {
    let created = sink
        .apply(clusters)
        .await
        .map_err(|e| GroupingError::GroupApply {
            clusters: clusters.len(),
            reason: format!("{e:#}"),
        })?;

    if created == 0 {
        return Err(GroupingError::GroupApply {
            clusters: clusters.len(),
            reason: "sink created no groups".to_string(),
        });
    }

    info!(groups = created, "Applied groups");
    Ok(created)
}
