// Terminal grouping sink.
//
// Keeps the applied groups in memory (the "host state" for a CLI run) and
// prints them with colors matching the group palette. Handles are resolved
// against the titles the sink was built with; unknown handles are dropped.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use colored::{Color, Colorize};
use serde::Serialize;
use tracing::{debug, warn};

use super::sink::{style_for, GroupColor, GroupStyle, GroupingSink};
use super::truncate_chars;
use crate::content::item::Handle;
use crate::grouping::cluster::Cluster;

/// A group as currently applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedGroup {
    pub id: usize,
    #[serde(flatten)]
    pub style: GroupStyle,
    pub members: Vec<Handle>,
}

pub struct TerminalSink {
    titles: HashMap<Handle, String>,
    groups: Mutex<Vec<AppliedGroup>>,
}

impl TerminalSink {
    /// Create a sink that knows these pages.
    pub fn new(titles: impl IntoIterator<Item = (Handle, String)>) -> Self {
        Self {
            titles: titles.into_iter().collect(),
            groups: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the currently applied groups.
    pub fn groups(&self) -> Vec<AppliedGroup> {
        self.groups
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Print the applied groups.
    pub fn display(&self) {
        let groups = self.groups();
        if groups.is_empty() {
            println!("No groups applied.");
            return;
        }

        println!(
            "\n{}",
            format!("=== {} page groups ===", groups.len()).bold()
        );
        println!();

        for group in &groups {
            let marker = if group.style.collapsed { "▸" } else { "▾" };
            println!(
                "  {} {}  {}",
                marker,
                group.style.label.color(terminal_color(group.style.color)).bold(),
                format!("[{}]", group.style.color).dimmed()
            );
            if group.style.collapsed {
                continue;
            }
            for handle in &group.members {
                let title = self.titles.get(handle).map(String::as_str).unwrap_or("?");
                println!("      {} {}", handle.to_string().dimmed(), truncate_chars(title, 70));
            }
        }
        println!();
    }
}

#[async_trait]
impl GroupingSink for TerminalSink {
    async fn apply(&self, clusters: &[Cluster]) -> Result<usize> {
        let mut groups = self
            .groups
            .lock()
            .map_err(|_| anyhow::anyhow!("Group state lock poisoned"))?;

        if !groups.is_empty() {
            debug!(previous = groups.len(), "Clearing previous groups");
            groups.clear();
        }

        for (index, cluster) in clusters.iter().enumerate() {
            let members: Vec<Handle> = cluster
                .members
                .iter()
                .copied()
                .filter(|h| self.titles.contains_key(h))
                .collect();

            if members.is_empty() {
                warn!(name = cluster.name, "No resolvable pages for group, skipping");
                continue;
            }

            let style = style_for(index, &cluster.name, members.len());
            debug!(label = style.label, color = %style.color, "Created group");
            let id = groups.len() + 1;
            groups.push(AppliedGroup {
                id,
                style,
                members,
            });
        }

        Ok(groups.len())
    }
}

fn terminal_color(color: GroupColor) -> Color {
    match color {
        GroupColor::Blue => Color::Blue,
        GroupColor::Red => Color::Red,
        GroupColor::Yellow => Color::Yellow,
        GroupColor::Green => Color::Green,
        GroupColor::Pink => Color::TrueColor { r: 255, g: 105, b: 180 },
        GroupColor::Purple => Color::Magenta,
        GroupColor::Cyan => Color::Cyan,
        GroupColor::Orange => Color::TrueColor { r: 255, g: 165, b: 0 },
        GroupColor::Grey => Color::BrightBlack,
    }
}
