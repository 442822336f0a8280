//! Core data models for Tab Wind.
//!
//! A [`Tab`] is the record the browser hands over on every search: it is
//! owned by the caller, supplied fresh on each ranking call, and never
//! mutated by the rankers. The JSON shape matches the browser tabs API
//! (`windowId`, `favIconUrl`), and unknown fields are ignored so a raw
//! tab list can be deserialized directly.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Browser tab identifier. Unique and stable for the lifetime of a tab.
pub type TabId = i64;

/// Browser window identifier.
pub type WindowId = i64;

/// A browser tab as seen by the switcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub window_id: WindowId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
}

impl Tab {
    pub fn new(id: TabId, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            url: Some(url.into()),
            window_id: 0,
            fav_icon_url: None,
        }
    }

    pub fn with_window(mut self, window_id: WindowId) -> Self {
        self.window_id = window_id;
        self
    }

    /// Title, or `""` when the browser did not report one.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// URL, or `""` when the browser did not report one.
    pub fn url_or_empty(&self) -> &str {
        self.url.as_deref().unwrap_or("")
    }

    /// The text that gets embedded for this tab: `"{title} {url}"`.
    ///
    /// Missing fields contribute an empty string, so a tab with neither
    /// title nor url embeds as a single space.
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.title_or_empty(), self.url_or_empty())
    }

    /// SHA-256 of [`embedding_text`](Tab::embedding_text), hex encoded.
    ///
    /// A cached embedding is valid only while this value is unchanged.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.embedding_text().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Transient `(id, score)` pair produced by the semantic ranker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredTab {
    pub id: TabId,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_browser_tab() {
        let json = r#"{
            "id": 42,
            "windowId": 7,
            "title": "GitHub",
            "url": "https://github.com",
            "favIconUrl": "https://github.com/favicon.ico",
            "active": true,
            "pinned": false,
            "index": 3
        }"#;
        let tab: Tab = serde_json::from_str(json).unwrap();
        assert_eq!(tab.id, 42);
        assert_eq!(tab.window_id, 7);
        assert_eq!(tab.title.as_deref(), Some("GitHub"));
        assert_eq!(
            tab.fav_icon_url.as_deref(),
            Some("https://github.com/favicon.ico")
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let tab: Tab = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(tab.title, None);
        assert_eq!(tab.url, None);
        assert_eq!(tab.window_id, 0);
        assert_eq!(tab.embedding_text(), " ");
    }

    #[test]
    fn test_embedding_text_joins_title_and_url() {
        let tab = Tab::new(1, "Gmail", "mail.google.com");
        assert_eq!(tab.embedding_text(), "Gmail mail.google.com");
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let a = Tab::new(1, "Docs", "docs.rs");
        let b = Tab::new(99, "Docs", "docs.rs").with_window(3);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_fingerprint_changes_with_title() {
        let a = Tab::new(1, "Docs", "docs.rs");
        let b = Tab::new(1, "Docs - serde", "docs.rs");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
