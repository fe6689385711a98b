// GroupingSink trait — where finished clusters become visible groups.
//
// The presentation rules every sink follows live here so they're identical
// across hosts:
//
// - colors cycle through a fixed 9-entry palette by cluster index
// - labels are "<name> (<count>)", with names over 30 characters cut to 27
//   plus "..."
// - groups with more than 5 members start collapsed
//
// A sink must clear any grouping it applied before, so applying the same
// clusters twice leaves the same state as applying them once.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::grouping::cluster::Cluster;

/// Names longer than this get shortened for display.
const MAX_NAME_CHARS: usize = 30;
/// Characters kept from a shortened name (before the "...").
const SHORTENED_NAME_CHARS: usize = 27;
/// Groups with more members than this are created collapsed.
pub const COLLAPSE_ABOVE: usize = 5;

/// Group colors, in the order they are handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
    Grey,
}

pub const PALETTE: [GroupColor; 9] = [
    GroupColor::Blue,
    GroupColor::Red,
    GroupColor::Yellow,
    GroupColor::Green,
    GroupColor::Pink,
    GroupColor::Purple,
    GroupColor::Cyan,
    GroupColor::Orange,
    GroupColor::Grey,
];

impl GroupColor {
    /// Color for the cluster at `index`, cycling through the palette.
    pub fn for_index(index: usize) -> Self {
        PALETTE[index % PALETTE.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupColor::Blue => "blue",
            GroupColor::Red => "red",
            GroupColor::Yellow => "yellow",
            GroupColor::Green => "green",
            GroupColor::Pink => "pink",
            GroupColor::Purple => "purple",
            GroupColor::Cyan => "cyan",
            GroupColor::Orange => "orange",
            GroupColor::Grey => "grey",
        }
    }
}

impl std::fmt::Display for GroupColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shorten a cluster name for display.
pub fn display_name(name: &str) -> String {
    if name.chars().count() > MAX_NAME_CHARS {
        let head: String = name.chars().take(SHORTENED_NAME_CHARS).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// The group title shown to the user: shortened name plus member count.
pub fn group_label(name: &str, member_count: usize) -> String {
    format!("{} ({})", display_name(name), member_count)
}

/// Visual attributes of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStyle {
    pub label: String,
    pub color: GroupColor,
    pub collapsed: bool,
}

/// Style for the cluster at `index` once `member_count` members resolved.
pub fn style_for(index: usize, name: &str, member_count: usize) -> GroupStyle {
    GroupStyle {
        label: group_label(name, member_count),
        color: GroupColor::for_index(index),
        collapsed: member_count > COLLAPSE_ABOVE,
    }
}

/// Consumer of finished clusters.
#[async_trait]
pub trait GroupingSink: Send + Sync {
    /// Replace any previous grouping with these clusters, in order.
    ///
    /// Clusters whose members can't be resolved are skipped. Returns the
    /// number of groups actually created.
    async fn apply(&self, clusters: &[Cluster]) -> Result<usize>;
}
