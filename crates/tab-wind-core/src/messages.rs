//! Messages exchanged between the background worker and the overlay.
//!
//! Only the JSON shapes live here; the transport belongs to the host.
//!
//! ```json
//! {"action": "toggle-modal", "tabs": [{"id": 1, "windowId": 1, "title": "GitHub"}]}
//! {"action": "switch-tab", "tabId": 1, "windowId": 1}
//! ```

use serde::{Deserialize, Serialize};

use crate::models::{Tab, TabId, WindowId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Message {
    /// Background → overlay: open (with this tab list) or close the switcher.
    ToggleModal {
        #[serde(default)]
        tabs: Vec<Tab>,
    },
    /// Overlay → background: focus `window_id` and activate `tab_id`.
    SwitchTab(SwitchTab),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchTab {
    pub tab_id: TabId,
    pub window_id: WindowId,
}

impl From<SwitchTab> for Message {
    fn from(value: SwitchTab) -> Self {
        Message::SwitchTab(value)
    }
}
