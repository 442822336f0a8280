//! # Tab Wind Core
//!
//! Shared, WASM-safe logic for Tab Wind: tab models, capability probing,
//! semantic and substring ranking, the embedding cache, and the switcher
//! selection model.
//!
//! This crate contains no HTTP client, filesystem I/O, or async runtime.
//! Concrete capability providers (OpenAI, Ollama, fastembed) live in the
//! `tab-wind` app crate and are injected through
//! [`capability::CapabilityProvider`].
//!
//! ```text
//!   query + tabs
//!        │
//!        ▼
//!  ┌───────────┐  ready?  ┌────────────────┐   ┌───────────────┐
//!  │ TabSearch │────────▶│ SemanticRanker │──▶│ EmbeddingCache │
//!  └─────┬─────┘         └───────┬────────┘   └───────────────┘
//!        │ fallback              │ CapabilityProvider / Embedder
//!        ▼                       ▼
//!  ┌─────────────────┐      (injected)
//!  │ SubstringRanker │
//!  └─────────────────┘
//! ```

pub mod cache;
pub mod capability;
pub mod embedding;
pub mod error;
pub mod messages;
pub mod models;
pub mod search;
pub mod semantic;
pub mod substring;
pub mod switcher;
