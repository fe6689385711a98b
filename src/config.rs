use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::grouping::engine::EngineOptions;
use crate::topics::classifier::DEFAULT_EXTRACTION_TIMEOUT;
use crate::topics::ollama::{OllamaClassifier, DEFAULT_OLLAMA_URL};
use crate::topics::traits::{Classifier, NoClassifier};

/// Default model requested from Ollama.
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Which classifier backend to use.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierBackend {
    /// Local Ollama server (default)
    Ollama,
    /// No model at all; always groups by domain
    None,
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// setting has a default, so an empty environment is a valid configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub classifier_backend: ClassifierBackend,
    /// Ollama endpoint (defaults to http://localhost:11434)
    pub ollama_url: String,
    pub model: String,
    /// Deadline for each topic extraction
    pub topic_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let classifier_backend = match env::var("TABWEAVE_CLASSIFIER").as_deref() {
            Ok("none") | Ok("off") => ClassifierBackend::None,
            Ok("ollama") | Err(_) => ClassifierBackend::Ollama,
            Ok(other) => anyhow::bail!(
                "Unknown TABWEAVE_CLASSIFIER value '{other}'. Use 'ollama' or 'none'."
            ),
        };

        let topic_timeout = match env::var("TABWEAVE_TOPIC_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout_secs(&raw)?,
            Err(_) => DEFAULT_EXTRACTION_TIMEOUT,
        };

        Ok(Self {
            classifier_backend,
            ollama_url: env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string()),
            model: env::var("TABWEAVE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            topic_timeout,
        })
    }

    /// Build the configured classifier.
    pub fn classifier(&self) -> Arc<dyn Classifier> {
        match self.classifier_backend {
            ClassifierBackend::Ollama => Arc::new(OllamaClassifier::new(&self.ollama_url, &self.model)),
            ClassifierBackend::None => Arc::new(NoClassifier),
        }
    }

    /// Engine options derived from this configuration.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            extraction_timeout: self.topic_timeout,
            ..EngineOptions::default()
        }
    }
}

/// Parse a positive whole number of seconds.
pub fn parse_timeout_secs(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid topic timeout '{raw}', expected whole seconds"))?;
    if secs == 0 {
        anyhow::bail!("Topic timeout must be at least 1 second");
    }
    Ok(Duration::from_secs(secs))
}
