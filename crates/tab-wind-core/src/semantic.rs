//! Embedding-backed tab ranker.
//!
//! # Algorithm
//!
//! 1. If the prober has not settled to "available", return nothing.
//! 2. Embed the query; on failure return nothing.
//! 3. For every tab, reuse the cached vector when the tab's fingerprint is
//!    unchanged, otherwise embed `"{title} {url}"` and overwrite the cache
//!    entry. All tab embeddings run concurrently and are joined once every
//!    one has settled; a failed tab is dropped, the rest continue.
//! 4. Score each embedded tab by cosine similarity to the query.
//! 5. Stable sort descending (`NaN` last), optionally drop scores below
//!    `min_score`, and return the ids.
//!
//! The model handle is created lazily on first use. If creation fails the
//! ranker stays without a model for the rest of its lifetime; there is no
//! automatic retry.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::OnceCell;

use crate::cache::EmbeddingCache;
use crate::capability::{AvailabilityProber, CapabilityProvider, Embedder};
use crate::embedding::{compare_scores, cosine_similarity};
use crate::error::{EmbedTarget, RankError};
use crate::models::{ScoredTab, Tab, TabId};
use crate::search::TabRanker;

/// Tuning for [`SemanticRanker`].
#[derive(Debug, Clone, Default)]
pub struct SemanticOptions {
    /// Drop tabs scoring below this value. `None` returns the full sorted list.
    pub min_score: Option<f32>,
    /// Cap on cached tab vectors. `None` leaves the cache unbounded.
    pub cache_capacity: Option<NonZeroUsize>,
}

pub struct SemanticRanker {
    prober: AvailabilityProber,
    model: OnceCell<Option<Arc<dyn Embedder>>>,
    cache: EmbeddingCache,
    min_score: Option<f32>,
}

impl SemanticRanker {
    /// Construct without any I/O. Call [`ready`](Self::ready) before the
    /// first ranking request to get deterministic readiness.
    pub fn new(provider: Option<Arc<dyn CapabilityProvider>>, options: SemanticOptions) -> Self {
        Self {
            prober: AvailabilityProber::new(provider),
            model: OnceCell::new(),
            cache: EmbeddingCache::new(options.cache_capacity),
            min_score: options.min_score,
        }
    }

    /// Probe the capability provider (once) and report readiness.
    pub async fn ready(&self) -> bool {
        self.prober.ready().await
    }

    /// Settled readiness flag; `false` until [`ready`](Self::ready) completes.
    pub fn is_available(&self) -> bool {
        self.prober.is_available()
    }

    pub fn prober(&self) -> &AvailabilityProber {
        &self.prober
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    /// Forget the cached vector for a closed tab.
    pub fn evict(&self, tab_id: TabId) -> bool {
        self.cache.evict(tab_id)
    }

    /// Forget cached vectors for every tab not in `live`.
    pub fn retain(&self, live: &HashSet<TabId>) -> usize {
        self.cache.retain(live)
    }

    /// Lazily create the model handle.
    ///
    /// Returns the same handle on every call once created. Returns `None`
    /// when the backend is unavailable or creation failed; a failure is
    /// remembered and not retried.
    pub async fn init_model(&self) -> Option<Arc<dyn Embedder>> {
        if !self.prober.is_available() {
            return None;
        }
        let provider = self.prober.provider()?;

        self.model
            .get_or_init(|| async {
                match provider.create_embedder().await {
                    Ok(model) => {
                        tracing::info!(provider = provider.name(), "embedding model created");
                        Some(model)
                    }
                    Err(e) => {
                        tracing::warn!(
                            provider = provider.name(),
                            "{}",
                            RankError::ModelCreationFailed(e)
                        );
                        None
                    }
                }
            })
            .await
            .clone()
    }

    /// Embed `text`. Any backend error is logged and yields `None`.
    pub async fn embed(&self, text: &str) -> Option<Vec<f32>> {
        self.embed_for(text, EmbedTarget::Query).await
    }

    async fn embed_for(&self, text: &str, target: EmbedTarget) -> Option<Vec<f32>> {
        let model = self.init_model().await?;
        match model.compute(text).await {
            Ok(vector) => Some(vector),
            Err(source) => {
                tracing::warn!("{}", RankError::EmbeddingComputeFailed { target, source });
                None
            }
        }
    }

    /// Cached vector for `tab`, or a freshly computed one written back to
    /// the cache.
    async fn tab_vector(&self, tab: &Tab) -> Option<(TabId, Arc<[f32]>)> {
        let fingerprint = tab.fingerprint();
        if let Some(vector) = self.cache.lookup(tab.id, &fingerprint) {
            tracing::debug!(tab_id = tab.id, "embedding cache hit");
            return Some((tab.id, vector));
        }

        let vector: Arc<[f32]> = self
            .embed_for(&tab.embedding_text(), EmbedTarget::Tab(tab.id))
            .await?
            .into();
        self.cache.store(tab.id, vector.clone(), fingerprint);
        Some((tab.id, vector))
    }

    /// Rank `tabs` against `query`, keeping scores.
    ///
    /// Returns an empty list when semantic ranking is unavailable or the
    /// query cannot be embedded. Never fails.
    pub async fn rank_scored(&self, query: &str, tabs: &[Tab]) -> Vec<ScoredTab> {
        if !self.prober.is_available() {
            tracing::debug!("semantic ranking unavailable");
            return Vec::new();
        }

        tracing::debug!(query, tabs = tabs.len(), "semantic ranking");

        let Some(query_vec) = self.embed(query).await else {
            return Vec::new();
        };

        let embedded = join_all(tabs.iter().map(|tab| self.tab_vector(tab))).await;

        let mut scored: Vec<ScoredTab> = embedded
            .into_iter()
            .flatten()
            .map(|(id, vector)| {
                if vector.len() != query_vec.len() {
                    tracing::warn!(
                        "{}",
                        RankError::DimensionMismatch {
                            tab_id: id,
                            expected: query_vec.len(),
                            actual: vector.len(),
                        }
                    );
                }
                ScoredTab {
                    id,
                    score: cosine_similarity(&query_vec, &vector),
                }
            })
            .collect();

        // sort_by is stable: equal scores keep input order
        scored.sort_by(|a, b| compare_scores(a.score, b.score));

        if let Some(min) = self.min_score {
            scored.retain(|s| s.score >= min);
        }

        scored
    }
}

#[async_trait]
impl TabRanker for SemanticRanker {
    fn name(&self) -> &'static str {
        "semantic"
    }

    async fn rank_tabs(&self, query: &str, tabs: &[Tab]) -> Vec<TabId> {
        self.rank_scored(query, tabs)
            .await
            .into_iter()
            .map(|s| s.id)
            .collect()
    }
}
