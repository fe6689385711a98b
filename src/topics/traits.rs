// Classifier traits — the swap-ready language-model capability.
//
// Like the content provider, the classifier is injected rather than detected
// from the environment. A host without a model passes `NoClassifier`, which
// always reports Unavailable, so domain-based fallback grouping is reachable
// by construction. Tests pass mocks that count prompts.

use anyhow::Result;
use async_trait::async_trait;

/// Whether a classifier can take requests right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Unavailable,
    /// The model exists but is still being fetched; not usable yet
    Downloading,
    Available,
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Availability::Unavailable => "unavailable",
            Availability::Downloading => "downloading",
            Availability::Available => "available",
        };
        f.write_str(s)
    }
}

/// Options for a new classifier conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Language the model should answer in (ISO 639-1)
    pub language: String,
    pub temperature: f64,
    pub top_k: u32,
}

impl Default for SessionConfig {
    /// Low temperature and greedy decoding: topic labels should be stable.
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            temperature: 0.3,
            top_k: 1,
        }
    }
}

/// An open conversation with the model.
#[async_trait]
pub trait ClassifierSession: Send + Sync {
    /// Send a prompt and wait for the complete answer.
    async fn prompt(&self, text: &str) -> Result<String>;

    /// Release the underlying resources. Must be idempotent; a destroyed
    /// session should refuse further prompts.
    fn destroy(&self);
}

/// The language-model capability used for topic extraction and comparison.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Check whether the model can take requests.
    async fn availability(&self) -> Availability;

    /// Open a new conversation. Each grouping run opens its own.
    async fn create(&self, config: &SessionConfig) -> Result<Box<dyn ClassifierSession>>;
}

/// Classifier for hosts with no model at all. Always unavailable.
pub struct NoClassifier;

#[async_trait]
impl Classifier for NoClassifier {
    async fn availability(&self) -> Availability {
        Availability::Unavailable
    }

    async fn create(&self, _config: &SessionConfig) -> Result<Box<dyn ClassifierSession>> {
        anyhow::bail!("No classifier configured, cannot open a session")
    }
}
