// Tabweave: topic-coherent grouping of open pages
//
// This is the library root. Each module corresponds to a stage of a grouping
// run: capture content, extract and compare topics, cluster, apply groups.

pub mod config;
pub mod content;
pub mod grouping;
pub mod output;
pub mod topics;

pub use content::item::{ContentItem, Handle};
pub use grouping::cluster::Cluster;
pub use grouping::engine::{GroupingEngine, GroupingOutcome, GroupingStrategy};
pub use grouping::errors::GroupingError;
