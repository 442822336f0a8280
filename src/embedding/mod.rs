//! Concrete capability providers for semantic tab ranking.
//!
//! Each provider implements [`CapabilityProvider`] from the core crate:
//! it answers "can a model be created here?" and hands out an
//! [`Embedder`] that turns one string into one vector.
//!
//! - **[`OpenAIProvider`]**: `POST /v1/embeddings`; available iff `OPENAI_API_KEY` is set.
//! - **[`OllamaProvider`]**: `POST /api/embed` on a local Ollama; available when the server answers.
//! - **`LocalProvider`**: fastembed in-process (feature `local-embeddings-fastembed`).
//!
//! `provider = "disabled"` produces no provider at all, which the core
//! treats as an absent capability surface.
//!
//! # Provider Selection
//!
//! ```rust
//! # use tab_wind::config::EmbeddingConfig;
//! # use tab_wind::embedding::create_provider;
//! let config = EmbeddingConfig::default(); // provider = "disabled"
//! assert!(create_provider(&config).unwrap().is_none());
//! ```
//!
//! # Retry Strategy
//!
//! The OpenAI and Ollama embedders use exponential backoff for transient errors:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use tab_wind_core::capability::{Availability, CapabilityProvider, Embedder};

use crate::config::EmbeddingConfig;

const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Create the [`CapabilityProvider`] selected by the configuration.
///
/// # Supported Providers
///
/// | Config Value | Provider |
/// |-------------|----------|
/// | `"disabled"` | none |
/// | `"openai"` | [`OpenAIProvider`] |
/// | `"ollama"` | [`OllamaProvider`] |
/// | `"local"` | `LocalProvider` (fastembed, see features) |
///
/// # Errors
///
/// Returns an error for unknown provider names, missing model names, or a
/// `local` provider in a build without fastembed.
pub fn create_provider(config: &EmbeddingConfig) -> Result<Option<Arc<dyn CapabilityProvider>>> {
    match config.provider.as_str() {
        "disabled" => Ok(None),
        "openai" => Ok(Some(Arc::new(OpenAIProvider::new(config)?))),
        "ollama" => Ok(Some(Arc::new(OllamaProvider::new(config)?))),
        #[cfg(feature = "local-embeddings-fastembed")]
        "local" => Ok(Some(Arc::new(LocalProvider::new(config)?))),
        #[cfg(not(feature = "local-embeddings-fastembed"))]
        "local" => bail!("Local embedding provider requires --features local-embeddings-fastembed"),
        other => bail!("Unknown embedding provider: {}", other),
    }
}

fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// POST `body` to `url`, retrying rate limits, server errors, and network
/// failures with exponential backoff.
async fn post_json_with_retry(
    client: &reqwest::Client,
    url: &str,
    bearer: Option<&str>,
    body: &serde_json::Value,
    max_retries: u32,
    label: &str,
) -> Result<serde_json::Value> {
    let mut last_err = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            // Exponential backoff: 1s, 2s, 4s, 8s, ...
            let delay = Duration::from_secs(1 << (attempt - 1).min(5));
            tracing::debug!(attempt, ?delay, "{} request retry", label);
            tokio::time::sleep(delay).await;
        }

        let mut request = client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(token) = bearer {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    return Ok(response.json().await?);
                }

                // Rate limited or server error: retry
                if status.as_u16() == 429 || status.is_server_error() {
                    let body_text = response.text().await.unwrap_or_default();
                    last_err = Some(anyhow::anyhow!(
                        "{} API error {}: {}",
                        label,
                        status,
                        body_text
                    ));
                    continue;
                }

                let body_text = response.text().await.unwrap_or_default();
                bail!("{} API error {}: {}", label, status, body_text);
            }
            Err(e) => {
                last_err = Some(anyhow::anyhow!("{} connection error ({}): {}", label, url, e));
                continue;
            }
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("{} embedding failed after retries", label)))
}

fn first_vector(mut vectors: Vec<Vec<f32>>, label: &str) -> Result<Vec<f32>> {
    if vectors.is_empty() {
        bail!("Empty {} embedding response", label);
    }
    Ok(vectors.swap_remove(0))
}

// ============ OpenAI Provider ============

/// Capability provider backed by the OpenAI embeddings API.
///
/// Reports [`Availability::Readily`] when `OPENAI_API_KEY` is set and
/// [`Availability::No`] otherwise.
pub struct OpenAIProvider {
    model: String,
    max_retries: u32,
    timeout_secs: u64,
}

impl OpenAIProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow::anyhow!("embedding.model required for OpenAI provider"))?;

        Ok(Self {
            model,
            max_retries: config.max_retries,
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl CapabilityProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn capabilities(&self) -> Result<Availability> {
        if std::env::var("OPENAI_API_KEY").is_ok() {
            Ok(Availability::Readily)
        } else {
            tracing::info!("OPENAI_API_KEY environment variable not set");
            Ok(Availability::No)
        }
    }

    async fn create_embedder(&self) -> Result<Arc<dyn Embedder>> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY not set"))?;

        Ok(Arc::new(OpenAIEmbedder {
            client: http_client(self.timeout_secs)?,
            api_key,
            model: self.model.clone(),
            max_retries: self.max_retries,
        }))
    }
}

struct OpenAIEmbedder {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_retries: u32,
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn compute(&self, text: &str) -> Result<Vec<f32>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": [text],
        });
        let json = post_json_with_retry(
            &self.client,
            OPENAI_EMBEDDINGS_URL,
            Some(&self.api_key),
            &body,
            self.max_retries,
            "OpenAI",
        )
        .await?;
        first_vector(parse_openai_response(&json)?, "OpenAI")
    }
}

/// Parse the OpenAI embeddings API response JSON.
///
/// Extracts the `data[].embedding` arrays and returns them in order.
fn parse_openai_response(json: &serde_json::Value) -> Result<Vec<Vec<f32>>> {
    let data = json
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response: missing data array"))?;

    let mut embeddings = Vec::with_capacity(data.len());

    for item in data {
        let embedding = item
            .get("embedding")
            .and_then(|e| e.as_array())
            .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response: missing embedding"))?;

        let vec = embedding
            .iter()
            .map(|v| {
                v.as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response: non-numeric embedding value"))
            })
            .collect::<Result<Vec<f32>>>()?;

        embeddings.push(vec);
    }

    Ok(embeddings)
}

// ============ Ollama Provider ============

/// Capability provider backed by a local Ollama instance.
///
/// `capabilities()` lists the pulled models via `GET /api/tags`: the
/// configured model being present is [`Availability::Readily`], absent is
/// [`Availability::AfterDownload`] (Ollama pulls on demand). An
/// unreachable server is a probe error.
pub struct OllamaProvider {
    model: String,
    url: String,
    max_retries: u32,
    timeout_secs: u64,
}

impl OllamaProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow::anyhow!("embedding.model required for Ollama provider"))?;
        let url = config
            .url
            .clone()
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

        Ok(Self {
            model,
            url: url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl CapabilityProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn capabilities(&self) -> Result<Availability> {
        let client = http_client(self.timeout_secs)?;
        let response = client
            .get(format!("{}/api/tags", self.url))
            .send()
            .await
            .map_err(|e| {
                anyhow::anyhow!(
                    "Ollama connection error (is Ollama running at {}?): {}",
                    self.url,
                    e
                )
            })?;

        if !response.status().is_success() {
            bail!("Ollama API error {}", response.status());
        }

        let json: serde_json::Value = response.json().await?;
        if model_is_pulled(&json, &self.model) {
            Ok(Availability::Readily)
        } else {
            Ok(Availability::AfterDownload)
        }
    }

    async fn create_embedder(&self) -> Result<Arc<dyn Embedder>> {
        Ok(Arc::new(OllamaEmbedder {
            client: http_client(self.timeout_secs)?,
            endpoint: format!("{}/api/embed", self.url),
            model: self.model.clone(),
            max_retries: self.max_retries,
        }))
    }
}

struct OllamaEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    max_retries: u32,
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn compute(&self, text: &str) -> Result<Vec<f32>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": [text],
        });
        let json = post_json_with_retry(
            &self.client,
            &self.endpoint,
            None,
            &body,
            self.max_retries,
            "Ollama",
        )
        .await?;
        first_vector(parse_ollama_response(&json)?, "Ollama")
    }
}

/// `true` if `/api/tags` lists `model`. A model named without a tag
/// matches its `:latest` entry.
fn model_is_pulled(tags: &serde_json::Value, model: &str) -> bool {
    let Some(models) = tags.get("models").and_then(|m| m.as_array()) else {
        return false;
    };
    models
        .iter()
        .filter_map(|m| m.get("name").and_then(|n| n.as_str()))
        .any(|name| {
            name == model || (!model.contains(':') && name == format!("{}:latest", model))
        })
}

fn parse_ollama_response(json: &serde_json::Value) -> Result<Vec<Vec<f32>>> {
    let embeddings = json
        .get("embeddings")
        .and_then(|e| e.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: missing embeddings array"))?;

    let mut result = Vec::with_capacity(embeddings.len());

    for embedding in embeddings {
        let vec = embedding
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: embedding is not an array"))?
            .iter()
            .map(|v| {
                v.as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: non-numeric embedding value"))
            })
            .collect::<Result<Vec<f32>>>()?;
        result.push(vec);
    }

    Ok(result)
}

// ============ Local Provider (fastembed) ============

/// In-process embedding via fastembed.
///
/// Weights are downloaded from Hugging Face on first model creation and
/// cached, so the provider reports [`Availability::AfterDownload`].
/// Model creation and inference run on blocking threads.
#[cfg(feature = "local-embeddings-fastembed")]
pub struct LocalProvider {
    model_name: String,
}

#[cfg(feature = "local-embeddings-fastembed")]
impl LocalProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model_name = config
            .model
            .clone()
            .unwrap_or_else(|| "all-minilm-l6-v2".to_string());
        Ok(Self { model_name })
    }
}

#[cfg(feature = "local-embeddings-fastembed")]
#[async_trait]
impl CapabilityProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn capabilities(&self) -> Result<Availability> {
        config_to_fastembed_model(&self.model_name)?;
        Ok(Availability::AfterDownload)
    }

    async fn create_embedder(&self) -> Result<Arc<dyn Embedder>> {
        let fastembed_model = config_to_fastembed_model(&self.model_name)?;

        let model = tokio::task::spawn_blocking(move || {
            fastembed::TextEmbedding::try_new(
                fastembed::InitOptions::new(fastembed_model).with_show_download_progress(false),
            )
            .map_err(|e| anyhow::anyhow!("Failed to initialize local embedding model: {}", e))
        })
        .await??;

        Ok(Arc::new(LocalEmbedder {
            model: Arc::new(std::sync::Mutex::new(model)),
        }))
    }
}

#[cfg(feature = "local-embeddings-fastembed")]
struct LocalEmbedder {
    model: Arc<std::sync::Mutex<fastembed::TextEmbedding>>,
}

#[cfg(feature = "local-embeddings-fastembed")]
#[async_trait]
impl Embedder for LocalEmbedder {
    async fn compute(&self, text: &str) -> Result<Vec<f32>> {
        let model = self.model.clone();
        let texts = vec![text.to_string()];

        let vectors = tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| anyhow::anyhow!("Local embedding model lock poisoned"))?;
            model
                .embed(texts, None)
                .map_err(|e| anyhow::anyhow!("Local embedding failed: {}", e))
        })
        .await??;

        first_vector(vectors, "local")
    }
}

#[cfg(feature = "local-embeddings-fastembed")]
fn config_to_fastembed_model(name: &str) -> Result<fastembed::EmbeddingModel> {
    match name {
        "all-minilm-l6-v2" => Ok(fastembed::EmbeddingModel::AllMiniLML6V2),
        "bge-small-en-v1.5" => Ok(fastembed::EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Ok(fastembed::EmbeddingModel::BGEBaseENV15),
        "nomic-embed-text-v1.5" => Ok(fastembed::EmbeddingModel::NomicEmbedTextV15),
        "multilingual-e5-small" => Ok(fastembed::EmbeddingModel::MultilingualE5Small),
        other => bail!(
            "Unknown local embedding model: '{}'. Supported models: \
             all-minilm-l6-v2, bge-small-en-v1.5, bge-base-en-v1.5, \
             nomic-embed-text-v1.5, multilingual-e5-small",
            other
        ),
    }
}
