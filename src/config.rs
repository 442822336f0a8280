//! TOML configuration for the `tabwind` binary.
//!
//! Every section is optional. With no config file at all the switcher runs
//! with the `disabled` provider, auto mode, and ten results.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::Path;

use tab_wind_core::search::{SearchMode, SearchOptions};
use tab_wind_core::semantic::SemanticOptions;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            url: None,
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_max_retries() -> u32 {
    2
}
fn default_timeout_secs() -> u64 {
    30
}

impl EmbeddingConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RankingConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default)]
    pub min_score: Option<f32>,
    #[serde(default)]
    pub cache_capacity: Option<usize>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            mode: SearchMode::default(),
            min_score: None,
            cache_capacity: None,
        }
    }
}

fn default_max_results() -> usize {
    10
}

impl RankingConfig {
    /// Translate into the core search options.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            max_results: Some(self.max_results),
            semantic: SemanticOptions {
                min_score: self.min_score,
                cache_capacity: self.cache_capacity.and_then(NonZeroUsize::new),
            },
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    // Validate ranking
    if config.ranking.max_results == 0 {
        anyhow::bail!("ranking.max_results must be >= 1");
    }

    if let Some(min) = config.ranking.min_score {
        if !(-1.0..=1.0).contains(&min) {
            anyhow::bail!("ranking.min_score must be in [-1.0, 1.0]");
        }
    }

    if config.ranking.cache_capacity == Some(0) {
        anyhow::bail!("ranking.cache_capacity must be >= 1 (omit it for an unbounded cache)");
    }

    // Validate embedding
    match config.embedding.provider.as_str() {
        "disabled" | "local" => {}
        "openai" | "ollama" => {
            if config.embedding.model.is_none() {
                anyhow::bail!(
                    "embedding.model must be specified when provider is '{}'",
                    config.embedding.provider
                );
            }
        }
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be disabled, openai, ollama, or local.",
            other
        ),
    }

    Ok(())
}
