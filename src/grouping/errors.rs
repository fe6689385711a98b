// Run-level failures a caller is expected to branch on.
//
// Everything per-item or per-comparison (timeouts, failed judgments,
// unparsable URLs) is absorbed where it happens and only logged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupingError {
    /// Nothing to group: the batch was empty, or every page was filtered out.
    #[error("No content to group")]
    NoContent,

    /// The page source itself could not be listed.
    #[error("Failed to list open pages: {0:#}")]
    Provider(anyhow::Error),

    /// The sink ended up creating no groups.
    #[error("No groups were created from {clusters} clusters: {reason}")]
    GroupApply { clusters: usize, reason: String },
}
