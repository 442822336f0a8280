//! Always-available textual ranker.
//!
//! A tab matches when its lower-cased title or lower-cased url contains
//! the lower-cased query. Matching tabs keep their input order (a stable
//! filter, no scoring) and the result is cut to an optional limit. The
//! empty query matches every tab.

use async_trait::async_trait;

use crate::models::{Tab, TabId};
use crate::search::TabRanker;

/// `true` if `tab` matches an already lower-cased needle.
pub fn matches(tab: &Tab, needle: &str) -> bool {
    tab.title_or_empty().to_lowercase().contains(needle)
        || tab.url_or_empty().to_lowercase().contains(needle)
}

/// Filter `tabs` by case-insensitive substring, preserving order.
///
/// # Example
///
/// ```rust
/// use tab_wind_core::models::Tab;
/// use tab_wind_core::substring::filter_tabs;
///
/// let tabs = vec![
///     Tab::new(1, "GitHub", "github.com"),
///     Tab::new(2, "Gmail", "mail.google.com"),
/// ];
/// assert_eq!(filter_tabs("git", &tabs, None), vec![1]);
/// assert_eq!(filter_tabs("", &tabs, None), vec![1, 2]);
/// ```
pub fn filter_tabs(query: &str, tabs: &[Tab], limit: Option<usize>) -> Vec<TabId> {
    let needle = query.to_lowercase();
    tabs.iter()
        .filter(|tab| matches(tab, &needle))
        .map(|tab| tab.id)
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

/// [`TabRanker`] over [`filter_tabs`].
#[derive(Debug, Clone, Default)]
pub struct SubstringRanker {
    limit: Option<usize>,
}

impl SubstringRanker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

#[async_trait]
impl TabRanker for SubstringRanker {
    fn name(&self) -> &'static str {
        "substring"
    }

    async fn rank_tabs(&self, query: &str, tabs: &[Tab]) -> Vec<TabId> {
        filter_tabs(query, tabs, self.limit)
    }
}
