// Unit tests for clustering and fallback grouping.
//
// Checks the structural guarantees of a cluster list: every item appears in
// exactly one cluster, clusters are sorted largest first with ties in
// first-seen order, and domain grouping is deterministic.

mod common;

use std::collections::HashSet;

use async_trait::async_trait;
use common::{handles, page};
use tabweave::content::item::{ContentItem, Handle};
use tabweave::grouping::cluster::{Cluster, ClusterBuilder, EquivalenceJudge};
use tabweave::grouping::fallback::group_by_domain;

/// Topics are equivalent when their numeric suffixes share a remainder.
struct ModuloJudge(u64);

#[async_trait]
impl EquivalenceJudge for ModuloJudge {
    async fn equivalent(&self, a: &str, b: &str) -> bool {
        let n = |t: &str| t.rsplit(' ').next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(0);
        n(a) % self.0 == n(b) % self.0
    }
}

/// Never merges anything.
struct NeverJudge;

#[async_trait]
impl EquivalenceJudge for NeverJudge {
    async fn equivalent(&self, _a: &str, _b: &str) -> bool {
        false
    }
}

fn topical(id: u64, topic: &str) -> ContentItem {
    let mut item = page(id, &format!("Page {id}"), "https://example.com");
    item.topic = Some(topic.to_string());
    item
}

fn assert_partition(items: &[ContentItem], clusters: &[Cluster]) {
    let mut seen = HashSet::new();
    for cluster in clusters {
        assert!(!cluster.members.is_empty(), "empty cluster {}", cluster.name);
        for h in &cluster.members {
            assert!(seen.insert(*h), "handle {h} appears twice");
        }
    }
    let expected: HashSet<Handle> = handles(items).into_iter().collect();
    assert_eq!(seen, expected);
}

fn assert_sorted(clusters: &[Cluster]) {
    for pair in clusters.windows(2) {
        assert!(pair[0].len() >= pair[1].len());
    }
}

// ============================================================
// ClusterBuilder
// ============================================================

#[tokio::test]
async fn clusters_partition_the_input() {
    let items: Vec<ContentItem> = (1..=23).map(|i| topical(i, &format!("topic {i}"))).collect();
    for modulus in [1, 2, 3, 5, 7, 100] {
        let clusters = ClusterBuilder::new(&ModuloJudge(modulus)).build(&items).await;
        assert_partition(&items, &clusters);
        assert_sorted(&clusters);
    }
}

#[tokio::test]
async fn equal_sized_clusters_keep_first_seen_order() {
    let items = vec![
        topical(1, "topic 1"),
        topical(2, "topic 2"),
        topical(3, "topic 3"),
        topical(4, "topic 4"),
    ];
    let clusters = ClusterBuilder::new(&NeverJudge).build(&items).await;
    let names: Vec<&str> = clusters.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["topic 1", "topic 2", "topic 3", "topic 4"]);
}

#[tokio::test]
async fn larger_cluster_moves_ahead_of_earlier_singletons() {
    // Only 2 and 4 pair up; 1 and 3 stay singletons.
    let items = vec![
        topical(1, "topic 1"),
        topical(2, "topic 2"),
        topical(3, "topic 3"),
        topical(4, "topic 4"),
    ];
    struct EvensOnly;
    #[async_trait]
    impl EquivalenceJudge for EvensOnly {
        async fn equivalent(&self, a: &str, b: &str) -> bool {
            a.ends_with(['2', '4']) && b.ends_with(['2', '4'])
        }
    }
    let clusters = ClusterBuilder::new(&EvensOnly).build(&items).await;
    assert_eq!(clusters[0].members, vec![Handle(2), Handle(4)]);
    assert_eq!(clusters[1].members, vec![Handle(1)]);
    assert_eq!(clusters[2].members, vec![Handle(3)]);
}

#[tokio::test]
async fn merge_decisions_are_not_revisited() {
    // Judge only links adjacent numbers: 1~2 and 2~3, but not 1~3.
    struct Adjacent;
    #[async_trait]
    impl EquivalenceJudge for Adjacent {
        async fn equivalent(&self, a: &str, b: &str) -> bool {
            let n = |t: &str| t.rsplit(' ').next().and_then(|s| s.parse::<i64>().ok()).unwrap_or(0);
            (n(a) - n(b)).abs() == 1
        }
    }
    let items = vec![topical(1, "topic 1"), topical(3, "topic 3"), topical(2, "topic 2")];
    let clusters = ClusterBuilder::new(&Adjacent).build(&items).await;
    // Seed 1 absorbs 2; 3 is never compared against 2 again and stays alone.
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].members, vec![Handle(1), Handle(2)]);
    assert_eq!(clusters[1].members, vec![Handle(3)]);
}

// ============================================================
// group_by_domain
// ============================================================

#[test]
fn fallback_groups_www_with_bare_domain() {
    let items = vec![
        page(1, "A one", "https://a.com/one"),
        page(2, "A two", "https://www.a.com/two"),
        page(3, "B", "https://b.com/"),
    ];
    let clusters = group_by_domain(&items);
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].name, "a.com");
    assert_eq!(clusters[0].members.len(), 2);
    assert_eq!(clusters[1].name, "b.com");
    assert_eq!(clusters[1].members.len(), 1);
}

#[test]
fn fallback_is_deterministic() {
    let items = vec![
        page(1, "x", "https://docs.rs/tokio"),
        page(2, "y", "https://github.com/tokio-rs"),
        page(3, "z", "https://docs.rs/serde"),
        page(4, "w", "https://www.github.com/serde-rs"),
        page(5, "v", "https://crates.io"),
    ];
    let first = group_by_domain(&items);
    for _ in 0..5 {
        assert_eq!(group_by_domain(&items), first);
    }
    assert_sorted(&first);
    let names: Vec<&str> = first.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["docs.rs", "github.com", "crates.io"]);
}

#[test]
fn fallback_drops_only_unparsable_urls() {
    let items = vec![
        page(1, "ok", "https://a.com"),
        page(2, "bad", "definitely not a url"),
        page(3, "ok too", "http://b.org/path?q=1"),
    ];
    let clusters = group_by_domain(&items);
    let grouped: HashSet<Handle> = clusters.iter().flat_map(|c| c.members.clone()).collect();
    assert_eq!(grouped, HashSet::from([Handle(1), Handle(3)]));
}
