//! Failure taxonomy for capability probing and ranking.
//!
//! None of these cross the [`rank_tabs`](crate::search::TabRanker::rank_tabs)
//! boundary. They exist so every degradation path is logged with a
//! consistent classification.

use thiserror::Error;

use crate::models::TabId;

#[derive(Debug, Error)]
pub enum RankError {
    /// No capability surface was injected. A steady state, not a fault.
    #[error("capability surface absent")]
    CapabilityAbsent,

    #[error("capability probe failed: {0}")]
    ProbeFailed(#[source] anyhow::Error),

    /// The backend could not create a model handle. Not retried.
    #[error("model creation failed: {0}")]
    ModelCreationFailed(#[source] anyhow::Error),

    #[error("embedding failed for {target}: {source}")]
    EmbeddingComputeFailed {
        target: EmbedTarget,
        #[source]
        source: anyhow::Error,
    },

    #[error("embedding dimension mismatch for tab {tab_id}: query has {expected}, tab has {actual}")]
    DimensionMismatch {
        tab_id: TabId,
        expected: usize,
        actual: usize,
    },
}

/// What an embedding call was computing, for log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedTarget {
    Query,
    Tab(TabId),
}

impl std::fmt::Display for EmbedTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbedTarget::Query => write!(f, "query"),
            EmbedTarget::Tab(id) => write!(f, "tab {}", id),
        }
    }
}
