//! # Tab Wind
//!
//! Keyboard-driven browser tab switching with two ranking strategies:
//! a case-insensitive substring filter and on-device semantic ranking
//! over `"{title} {url}"` embeddings.
//!
//! The ranking logic lives in [`tab_wind_core`]; this crate supplies the
//! native pieces around it: configuration, concrete embedding backends,
//! tab-list loading, and the `tabwind` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────────────┐   ┌───────────┐
//! │  tabs.json   │──▶│        TabSearch         │──▶│ Switcher  │
//! │ toggle-modal │   │ substring │ semantic+LRU │   │ switch-tab│
//! └──────────────┘   └─────────────┬────────────┘   └───────────┘
//!                                  │
//!                    ┌─────────────┼─────────────┐
//!                    ▼             ▼             ▼
//!               ┌────────┐   ┌────────┐   ┌───────────┐
//!               │ OpenAI │   │ Ollama │   │ fastembed │
//!               └────────┘   └────────┘   └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! tabwind probe --config ./config/tabwind.toml
//! tabwind search "rust docs" --tabs tabs.json
//! tabwind select "mail" --tabs tabs.json --down 1
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`embedding`] | Capability providers (OpenAI, Ollama, fastembed) |
//! | [`tabs`] | Tab list loading |
//! | [`search`] | `search` and `select` commands |
//! | [`probe`] | `probe` command |

pub mod config;
pub mod embedding;
pub mod probe;
pub mod search;
pub mod tabs;
