// Ollama classifier backend.
//
// Talks to a local Ollama server over its HTTP API. Availability is read from
// /api/tags (the model must already be pulled); prompts go to /api/generate
// with streaming off, so each call returns one complete answer.
//
// Ollama has no server-side conversation object, so a "session" is just the
// client plus the decoding options chosen at creation time. Destroying it
// flips a flag so late callers get an error instead of a silent request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{Availability, Classifier, ClassifierSession, SessionConfig};

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// How long an availability probe may take before we call the server unreachable.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Classifier backed by a model served by Ollama.
pub struct OllamaClassifier {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClassifier {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("Failed to reach Ollama at {}", self.base_url))?;

        if !response.status().is_success() {
            anyhow::bail!("Ollama returned {} for {}", response.status(), url);
        }

        let tags: TagsResponse = response
            .json()
            .await
            .context("Failed to parse Ollama model list")?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl Classifier for OllamaClassifier {
    async fn availability(&self) -> Availability {
        match self.list_models().await {
            Ok(models) if model_listed(&models, &self.model) => Availability::Available,
            Ok(models) => {
                debug!(model = self.model, installed = ?models, "Model not pulled");
                Availability::Unavailable
            }
            Err(e) => {
                debug!(error = %e, "Ollama not reachable");
                Availability::Unavailable
            }
        }
    }

    async fn create(&self, config: &SessionConfig) -> Result<Box<dyn ClassifierSession>> {
        debug!(
            model = self.model,
            temperature = config.temperature,
            top_k = config.top_k,
            "Opening Ollama session"
        );
        Ok(Box::new(OllamaSession {
            client: self.client.clone(),
            url: format!("{}/api/generate", self.base_url),
            model: self.model.clone(),
            system: format!("Always answer in the language with code '{}'.", config.language),
            options: GenerateOptions {
                temperature: config.temperature,
                top_k: config.top_k,
            },
            destroyed: AtomicBool::new(false),
        }))
    }
}

/// Whether `model` appears in Ollama's list. A bare name matches its `:latest` tag.
fn model_listed(installed: &[String], model: &str) -> bool {
    installed
        .iter()
        .any(|name| name == model || name.strip_suffix(":latest") == Some(model))
}

struct OllamaSession {
    client: Client,
    url: String,
    model: String,
    system: String,
    options: GenerateOptions,
    destroyed: AtomicBool,
}

#[async_trait]
impl ClassifierSession for OllamaSession {
    async fn prompt(&self, text: &str) -> Result<String> {
        if self.destroyed.load(Ordering::Acquire) {
            anyhow::bail!("Ollama session already destroyed");
        }

        let request = GenerateRequest {
            model: &self.model,
            prompt: text,
            system: &self.system,
            stream: false,
            options: &self.options,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .context("Failed to call Ollama generate")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Ollama returned {}: {}", status, body);
        }

        let result: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Ollama generate response")?;
        Ok(result.response)
    }

    fn destroy(&self) {
        if !self.destroyed.swap(true, Ordering::AcqRel) {
            debug!(model = self.model, "Closed Ollama session");
        }
    }
}

// --- Ollama API request/response types ---

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: &'a GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f64,
    top_k: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}
