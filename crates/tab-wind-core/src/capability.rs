//! Capability provider abstraction and availability probing.
//!
//! The semantic ranker never reaches for an ambient global to find an
//! embedding backend. The application injects a [`CapabilityProvider`],
//! which reports whether a model can be created and hands out opaque
//! [`Embedder`] handles. Absence of a provider is modelled as `None` and is
//! a steady state rather than an error.
//!
//! # Lifecycle
//!
//! ```text
//! AvailabilityProber::new(provider)   cheap, synchronous, no I/O
//!            │
//!            ▼
//! prober.ready().await                probes exactly once
//!            │
//!            ▼
//! prober.is_available()               settled, read-only flag
//! ```
//!
//! Before `ready()` completes, `is_available()` reads `false`, so a
//! ranking request that arrives early degrades to "semantic unavailable".

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::error::RankError;

/// What the backend reports about model availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    /// The backend cannot produce a model on this host.
    No,
    /// A model can be created once its weights are fetched.
    AfterDownload,
    /// A model can be created immediately.
    Readily,
}

impl Availability {
    /// `true` when a model handle could plausibly be created.
    pub fn is_usable(self) -> bool {
        !matches!(self, Availability::No)
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Availability::No => "no",
            Availability::AfterDownload => "after-download",
            Availability::Readily => "readily",
        };
        f.write_str(s)
    }
}

/// Opaque model handle: text in, vector out.
///
/// Vector dimensionality is whatever the backend produces; callers only
/// rely on vectors from the same handle having equal length.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn compute(&self, text: &str) -> Result<Vec<f32>>;
}

/// Host-provided capability surface.
///
/// Every method is fallible and may suspend. Implementations must not
/// assume any particular latency or feature set on the caller's side.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    /// Short identifier for logs and CLI output (e.g. `"ollama"`).
    fn name(&self) -> &str;

    /// Report whether a model can be created.
    async fn capabilities(&self) -> Result<Availability>;

    /// Create a model handle.
    async fn create_embedder(&self) -> Result<Arc<dyn Embedder>>;
}

/// Determines once whether semantic ranking can be used.
pub struct AvailabilityProber {
    provider: Option<Arc<dyn CapabilityProvider>>,
    state: OnceCell<bool>,
}

impl AvailabilityProber {
    pub fn new(provider: Option<Arc<dyn CapabilityProvider>>) -> Self {
        Self {
            provider,
            state: OnceCell::new(),
        }
    }

    /// Probe the provider (first call only) and return the readiness flag.
    ///
    /// Never fails: a missing provider, a probe error, or a backend that
    /// answers [`Availability::No`] all resolve to `false`.
    pub async fn ready(&self) -> bool {
        *self
            .state
            .get_or_init(|| async { self.check_availability().await })
            .await
    }

    /// The settled readiness flag. `false` until [`ready`](Self::ready)
    /// has completed at least once.
    pub fn is_available(&self) -> bool {
        self.state.get().copied().unwrap_or(false)
    }

    /// `true` once a probe has settled, regardless of its outcome.
    pub fn is_settled(&self) -> bool {
        self.state.initialized()
    }

    pub fn provider(&self) -> Option<&Arc<dyn CapabilityProvider>> {
        self.provider.as_ref()
    }

    async fn check_availability(&self) -> bool {
        let Some(provider) = &self.provider else {
            tracing::info!("{}; semantic ranking disabled", RankError::CapabilityAbsent);
            return false;
        };

        match provider.capabilities().await {
            Ok(availability) if availability.is_usable() => {
                tracing::info!(
                    provider = provider.name(),
                    %availability,
                    "embedding capability found"
                );
                true
            }
            Ok(availability) => {
                tracing::info!(
                    provider = provider.name(),
                    %availability,
                    "embedding capability unavailable"
                );
                false
            }
            Err(e) => {
                tracing::warn!(provider = provider.name(), "{}", RankError::ProbeFailed(e));
                false
            }
        }
    }
}
