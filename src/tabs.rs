//! Tab list loading.
//!
//! The `--tabs` file holds what the background worker would send the
//! overlay: either a bare JSON array of tabs, or a full
//! `{"action": "toggle-modal", "tabs": [...]}` message.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use tab_wind_core::messages::Message;
use tab_wind_core::models::Tab;

#[derive(Deserialize)]
#[serde(untagged)]
enum TabsFile {
    List(Vec<Tab>),
    Message(Message),
}

pub fn load_tabs(path: &Path) -> Result<Vec<Tab>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tabs file: {}", path.display()))?;
    parse_tabs(&content).with_context(|| format!("Invalid tabs file: {}", path.display()))
}

pub fn parse_tabs(content: &str) -> Result<Vec<Tab>> {
    let file: TabsFile = serde_json::from_str(content)
        .context("expected a JSON array of tabs or a toggle-modal message")?;
    match file {
        TabsFile::List(tabs) => Ok(tabs),
        TabsFile::Message(Message::ToggleModal { tabs }) => Ok(tabs),
        TabsFile::Message(Message::SwitchTab(_)) => {
            bail!("a switch-tab message carries no tab list")
        }
    }
}
