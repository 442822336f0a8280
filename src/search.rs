//! `tabwind search` and `tabwind select`.
//!
//! Both commands build a [`TabSearch`] from the config, wait for the
//! capability probe to settle, and rank the tab list from `--tabs`.
//! `search` prints the ranked hits; `select` feeds them through the
//! [`Switcher`] selection model and prints the resulting `switch-tab`
//! message.

use anyhow::Result;
use std::path::Path;

use tab_wind_core::messages::Message;
use tab_wind_core::models::Tab;
use tab_wind_core::search::{SearchMode, SearchOutcome, SearchRequest, Strategy, TabSearch};
use tab_wind_core::switcher::Switcher;

use crate::config::Config;
use crate::embedding;
use crate::tabs;

/// Build the search facade for `config` and run the capability probe.
pub async fn build_search(config: &Config) -> Result<TabSearch> {
    let provider = embedding::create_provider(&config.embedding)?;
    let search = TabSearch::new(provider, config.ranking.search_options());
    search.ready().await;
    Ok(search)
}

pub async fn run_search(
    config: &Config,
    query: &str,
    tabs_path: &Path,
    mode: Option<SearchMode>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let tabs = tabs::load_tabs(tabs_path)?;
    let search = build_search(config).await?;

    let mut request = SearchRequest::new(query, &tabs).mode(mode.unwrap_or(config.ranking.mode));
    if let Some(limit) = limit {
        request = request.limit(limit);
    }
    let outcome = search.search(request).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    print_outcome(&outcome, &tabs);
    Ok(())
}

fn print_outcome(outcome: &SearchOutcome, tabs: &[Tab]) {
    if outcome.hits.is_empty() {
        println!("No matching tabs found");
        return;
    }

    let strategy = match outcome.strategy {
        Strategy::Substring => "substring",
        Strategy::Semantic => "semantic",
    };
    println!("{} result(s) ({}):", outcome.hits.len(), strategy);

    for (i, hit) in outcome.hits.iter().enumerate() {
        let Some(tab) = tabs.iter().find(|t| t.id == hit.id) else {
            continue;
        };
        let title = match tab.title_or_empty() {
            "" => "Untitled",
            t => t,
        };
        match hit.score {
            Some(score) => println!("{}. [{:.3}] {}", i + 1, score, title),
            None => println!("{}. {}", i + 1, title),
        }
        println!("    url: {}", tab.url_or_empty());
        println!("    id: {}", tab.id);
    }
}

/// Open the switcher with the tab list, apply `query`, move the selection
/// `down` then `up` rows, and press Enter.
pub async fn run_select(
    config: &Config,
    query: &str,
    tabs_path: &Path,
    down: usize,
    up: usize,
) -> Result<()> {
    let tabs = tabs::load_tabs(tabs_path)?;
    let search = build_search(config).await?;

    let mut switcher = Switcher::new();
    switcher.open(tabs);

    let outcome = search
        .search(SearchRequest::new(query, switcher.tabs()).mode(config.ranking.mode))
        .await;
    switcher.set_results(outcome.ids());

    for _ in 0..down {
        switcher.select_next();
    }
    for _ in 0..up {
        switcher.select_previous();
    }

    match switcher.activate_selected() {
        Some(request) => println!("{}", serde_json::to_string(&Message::from(request))?),
        None => println!("No matching tabs found"),
    }
    Ok(())
}
