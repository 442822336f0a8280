//! Selection model for the tab switcher overlay.
//!
//! Holds the tab list delivered with the last `toggle-modal` message, the
//! current ranked result ids, and the highlighted row. Rendering is the
//! host's job; this type only answers "what is shown, what is selected,
//! and which tab should be activated".
//!
//! Keyboard behavior:
//!
//! | Key | Effect |
//! |-----|--------|
//! | ArrowDown | next row, wrapping to the first |
//! | ArrowUp | previous row, wrapping to the last |
//! | Enter | activate the selected row and close |
//! | Escape | close |

use std::collections::HashSet;

use crate::messages::SwitchTab;
use crate::models::{Tab, TabId};

#[derive(Debug, Clone, Default)]
pub struct Switcher {
    tabs: Vec<Tab>,
    results: Vec<TabId>,
    selected: usize,
    open: bool,
}

impl Switcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open with a fresh tab list. Results start as every tab, in order.
    pub fn open(&mut self, tabs: Vec<Tab>) {
        self.results = tabs.iter().map(|t| t.id).collect();
        self.tabs = tabs;
        self.selected = 0;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Close when open, open with `tabs` when closed. Returns the new state.
    pub fn toggle(&mut self, tabs: Vec<Tab>) -> bool {
        if self.open {
            self.close();
        } else {
            self.open(tabs);
        }
        self.open
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Replace the result list (after the query changed). Ids that are not
    /// in the tab list are ignored. Selection resets to the first row.
    pub fn set_results(&mut self, ids: Vec<TabId>) {
        let known: HashSet<TabId> = self.tabs.iter().map(|t| t.id).collect();
        self.results = ids.into_iter().filter(|id| known.contains(id)).collect();
        self.selected = 0;
    }

    /// Result rows in display order.
    pub fn results(&self) -> Vec<&Tab> {
        self.results
            .iter()
            .filter_map(|id| self.tabs.iter().find(|t| t.id == *id))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Tab> {
        let id = self.results.get(self.selected)?;
        self.tabs.iter().find(|t| t.id == *id)
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1) % self.results.len();
        }
    }

    pub fn select_previous(&mut self) {
        let len = self.results.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Mouse hover over row `index`. Out-of-range indices are ignored.
    pub fn hover(&mut self, index: usize) {
        if index < self.results.len() {
            self.selected = index;
        }
    }

    /// Enter: activate the selected row and close. No-op while closed.
    pub fn activate_selected(&mut self) -> Option<SwitchTab> {
        if !self.open {
            return None;
        }
        let request = self.selected().map(switch_request)?;
        self.close();
        Some(request)
    }

    /// Click on the row for `tab_id`. No-op while closed.
    pub fn activate(&mut self, tab_id: TabId) -> Option<SwitchTab> {
        if !self.open || !self.results.contains(&tab_id) {
            return None;
        }
        let request = self.tabs.iter().find(|t| t.id == tab_id).map(switch_request)?;
        self.close();
        Some(request)
    }
}

fn switch_request(tab: &Tab) -> SwitchTab {
    SwitchTab {
        tab_id: tab.id,
        window_id: tab.window_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn switcher() -> Switcher {
        let mut s = Switcher::new();
        s.open(vec![
            Tab::new(1, "GitHub", "github.com").with_window(10),
            Tab::new(2, "Gmail", "mail.google.com").with_window(10),
            Tab::new(3, "GitLab", "gitlab.com").with_window(20),
        ]);
        s
    }

    #[test]
    fn test_open_lists_all_tabs() {
        let s = switcher();
        assert!(s.is_open());
        let ids: Vec<TabId> = s.results().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(s.selected().unwrap().id, 1);
    }

    #[test]
    fn test_arrow_down_wraps() {
        let mut s = switcher();
        s.select_next();
        s.select_next();
        assert_eq!(s.selected_index(), 2);
        s.select_next();
        assert_eq!(s.selected_index(), 0);
    }

    #[test]
    fn test_arrow_up_wraps() {
        let mut s = switcher();
        s.select_previous();
        assert_eq!(s.selected_index(), 2);
        assert_eq!(s.selected().unwrap().id, 3);
    }

    #[test]
    fn test_navigation_on_empty_results() {
        let mut s = switcher();
        s.set_results(Vec::new());
        s.select_next();
        s.select_previous();
        assert_eq!(s.selected_index(), 0);
        assert!(s.selected().is_none());
        assert!(s.activate_selected().is_none());
        assert!(s.is_open());
    }

    #[test]
    fn test_set_results_resets_selection() {
        let mut s = switcher();
        s.select_next();
        s.set_results(vec![3, 1, 99]);
        assert_eq!(s.selected_index(), 0);
        let ids: Vec<TabId> = s.results().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_enter_activates_and_closes() {
        let mut s = switcher();
        s.set_results(vec![3, 1]);
        let req = s.activate_selected().unwrap();
        assert_eq!(
            req,
            SwitchTab {
                tab_id: 3,
                window_id: 20
            }
        );
        assert!(!s.is_open());
    }

    #[test]
    fn test_hover_then_click() {
        let mut s = switcher();
        s.hover(1);
        assert_eq!(s.selected().unwrap().id, 2);
        s.hover(9);
        assert_eq!(s.selected_index(), 1);
        assert!(s.activate(42).is_none());
        let req = s.activate(1).unwrap();
        assert_eq!(req.tab_id, 1);
        assert!(!s.is_open());
    }

    #[test]
    fn test_closed_switcher_ignores_activation() {
        let mut s = switcher();
        s.close();
        assert!(s.activate_selected().is_none());
        assert!(s.activate(1).is_none());
        assert!(!s.is_open());

        s.open(vec![Tab::new(4, "Docs", "docs.rs").with_window(30)]);
        assert_eq!(s.activate(4).map(|r| r.window_id), Some(30));
        assert!(s.activate(4).is_none());
    }

    #[test]
    fn test_toggle() {
        let mut s = switcher();
        assert!(!s.toggle(Vec::new()));
        assert!(s.toggle(vec![Tab::new(5, "a", "b")]));
        assert_eq!(s.tabs().len(), 1);
    }
}
