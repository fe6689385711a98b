// Greedy single-link clustering over topic-annotated items.
//
// Items live in a slice addressed by index, with a parallel `visited` array.
// Walking left to right, each unvisited item seeds a cluster and pulls in
// every later unvisited item whose topic is judged equivalent to the seed's.
// That's O(n^2) judgments in the worst case, most of them settled lexically.
//
// Decisions are never revisited: two items split early stay split even if a
// later item would bridge them. The result therefore depends on input order.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::content::item::{ContentItem, Handle};

/// A group of items judged to share a topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    /// Display name for the group
    pub name: String,
    /// Topic the cluster was seeded with
    pub topic: String,
    /// Member handles, in input order
    pub members: Vec<Handle>,
}

impl Cluster {
    pub fn new(name: impl Into<String>, topic: impl Into<String>, first: Handle) -> Self {
        Self {
            name: name.into(),
            topic: topic.into(),
            members: vec![first],
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Decides whether two topics belong in the same cluster.
#[async_trait]
pub trait EquivalenceJudge: Send + Sync {
    async fn equivalent(&self, topic_a: &str, topic_b: &str) -> bool;
}

/// Builds clusters from items that already carry a topic.
pub struct ClusterBuilder<'a> {
    judge: &'a dyn EquivalenceJudge,
}

impl<'a> ClusterBuilder<'a> {
    pub fn new(judge: &'a dyn EquivalenceJudge) -> Self {
        Self { judge }
    }

    /// Partition `items` into clusters, largest first.
    ///
    /// Items without a topic are compared by title. Every item lands in
    /// exactly one cluster; singletons are valid clusters.
    pub async fn build(&self, items: &[ContentItem]) -> Vec<Cluster> {
        let mut visited = vec![false; items.len()];
        let mut clusters = Vec::new();

        for i in 0..items.len() {
            if visited[i] {
                continue;
            }
            let seed = items[i].topic_or_title();
            let mut cluster = Cluster::new(seed, seed, items[i].handle);

            for j in (i + 1)..items.len() {
                if visited[j] {
                    continue;
                }
                if self.judge.equivalent(seed, items[j].topic_or_title()).await {
                    cluster.members.push(items[j].handle);
                    visited[j] = true;
                }
            }

            visited[i] = true;
            debug!(topic = seed, size = cluster.len(), "Built cluster");
            clusters.push(cluster);
        }

        sort_by_size(&mut clusters);
        clusters
    }
}

/// Sort clusters largest first. Stable, so equal-sized clusters keep the
/// order in which they were first seen.
pub fn sort_by_size(clusters: &mut [Cluster]) {
    clusters.sort_by(|a, b| b.len().cmp(&a.len()));
}
