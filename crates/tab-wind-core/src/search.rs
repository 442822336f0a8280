//! Search facade used by the switcher UI.
//!
//! [`TabSearch`] owns one [`SubstringRanker`] and one [`SemanticRanker`]
//! and decides per request which one answers:
//!
//! | Mode | Behavior |
//! |------|----------|
//! | `substring` | substring filter only |
//! | `semantic` | semantic ranking only; empty when unavailable |
//! | `auto` | semantic when available and the query is non-blank, substring otherwise or when semantic comes back empty |
//!
//! # Request sequencing
//!
//! Ranking calls are not cancelled when a newer query arrives, so a slow
//! response can land after a faster, fresher one. Every call is tagged
//! with a monotonically increasing request id; [`TabSearch::search_latest`]
//! discards a response whose id is no longer the latest.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::capability::CapabilityProvider;
use crate::models::{Tab, TabId};
use crate::semantic::{SemanticOptions, SemanticRanker};
use crate::substring::{filter_tabs, SubstringRanker};

/// A ranking strategy: query plus tabs in, ordered tab ids out.
///
/// Implementations never fail; every error path degrades to an empty or
/// partial result.
#[async_trait]
pub trait TabRanker: Send + Sync {
    fn name(&self) -> &'static str;

    async fn rank_tabs(&self, query: &str, tabs: &[Tab]) -> Vec<TabId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Auto,
    Substring,
    Semantic,
}

impl FromStr for SearchMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(SearchMode::Auto),
            "substring" => Ok(SearchMode::Substring),
            "semantic" => Ok(SearchMode::Semantic),
            other => bail!(
                "Unknown search mode: {}. Use auto, substring, or semantic.",
                other
            ),
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SearchMode::Auto => "auto",
            SearchMode::Substring => "substring",
            SearchMode::Semantic => "semantic",
        };
        f.write_str(s)
    }
}

/// Which ranker produced a [`SearchOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Substring,
    Semantic,
}

/// One ranked tab. `score` is present only for semantic results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: TabId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub request_id: u64,
    pub strategy: Strategy,
    pub hits: Vec<SearchHit>,
}

impl SearchOutcome {
    pub fn ids(&self) -> Vec<TabId> {
        self.hits.iter().map(|h| h.id).collect()
    }
}

/// Bundles all inputs for a single search invocation.
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub tabs: &'a [Tab],
    pub mode: SearchMode,
    /// Overrides [`SearchOptions::max_results`] for this request.
    pub limit: Option<usize>,
}

impl<'a> SearchRequest<'a> {
    pub fn new(query: &'a str, tabs: &'a [Tab]) -> Self {
        Self {
            query,
            tabs,
            mode: SearchMode::Auto,
            limit: None,
        }
    }

    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Presentation cut-off applied after ranking. `None` keeps everything.
    pub max_results: Option<usize>,
    pub semantic: SemanticOptions,
}

pub struct TabSearch {
    substring: SubstringRanker,
    semantic: SemanticRanker,
    max_results: Option<usize>,
    latest: AtomicU64,
}

impl TabSearch {
    pub fn new(provider: Option<Arc<dyn CapabilityProvider>>, options: SearchOptions) -> Self {
        Self {
            substring: SubstringRanker::new(),
            semantic: SemanticRanker::new(provider, options.semantic),
            max_results: options.max_results,
            latest: AtomicU64::new(0),
        }
    }

    /// Probe the semantic backend. Safe to call repeatedly.
    pub async fn ready(&self) -> bool {
        self.semantic.ready().await
    }

    pub fn semantic(&self) -> &SemanticRanker {
        &self.semantic
    }

    pub fn substring(&self) -> &SubstringRanker {
        &self.substring
    }

    /// Id of the most recently started request (`0` before the first).
    pub fn latest_request(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn is_latest(&self, request_id: u64) -> bool {
        self.latest_request() == request_id
    }

    /// Run a search and return its outcome, stale or not.
    pub async fn search(&self, req: SearchRequest<'_>) -> SearchOutcome {
        let request_id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let (strategy, mut hits) = match req.mode {
            SearchMode::Substring => (Strategy::Substring, substring_hits(&req)),
            SearchMode::Semantic => (Strategy::Semantic, self.semantic_hits(&req).await),
            SearchMode::Auto => self.auto_hits(&req).await,
        };

        if let Some(limit) = req.limit.or(self.max_results) {
            hits.truncate(limit);
        }

        tracing::debug!(
            request_id,
            mode = %req.mode,
            ?strategy,
            hits = hits.len(),
            "search finished"
        );

        SearchOutcome {
            request_id,
            strategy,
            hits,
        }
    }

    /// Run a search, returning `None` if a newer request started meanwhile.
    pub async fn search_latest(&self, req: SearchRequest<'_>) -> Option<SearchOutcome> {
        let outcome = self.search(req).await;
        if self.is_latest(outcome.request_id) {
            Some(outcome)
        } else {
            tracing::debug!(
                request_id = outcome.request_id,
                latest = self.latest_request(),
                "discarding stale search response"
            );
            None
        }
    }

    async fn semantic_hits(&self, req: &SearchRequest<'_>) -> Vec<SearchHit> {
        self.semantic
            .rank_scored(req.query, req.tabs)
            .await
            .into_iter()
            .map(|s| SearchHit {
                id: s.id,
                score: Some(s.score),
            })
            .collect()
    }

    async fn auto_hits(&self, req: &SearchRequest<'_>) -> (Strategy, Vec<SearchHit>) {
        if req.query.trim().is_empty() || !self.semantic.is_available() {
            return (Strategy::Substring, substring_hits(req));
        }

        let hits = self.semantic_hits(req).await;
        if hits.is_empty() && !req.tabs.is_empty() {
            tracing::debug!("semantic ranking returned nothing; using substring match");
            return (Strategy::Substring, substring_hits(req));
        }
        (Strategy::Semantic, hits)
    }
}

fn substring_hits(req: &SearchRequest<'_>) -> Vec<SearchHit> {
    filter_tabs(req.query, req.tabs, None)
        .into_iter()
        .map(|id| SearchHit { id, score: None })
        .collect()
}
