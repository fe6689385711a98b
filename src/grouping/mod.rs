// Grouping — partition captured pages into topic-coherent clusters.
//
// The engine runs the semantic path (topic extraction + greedy clustering)
// when a classifier is available, and domain-based fallback otherwise.

pub mod cluster;
pub mod engine;
pub mod errors;
pub mod fallback;
