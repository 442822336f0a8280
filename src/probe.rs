//! `tabwind probe`.
//!
//! Runs the capability probe for the configured embedding provider and
//! prints whether semantic ranking is usable, optionally embedding one
//! string end to end.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::search::build_search;

/// Report the configured provider and whether semantic ranking is usable.
///
/// With `embed_text`, also creates the model and embeds that text, which
/// exercises the full path (download, session creation, one inference).
pub async fn run_probe(config: &Config, embed_text: Option<&str>) -> Result<()> {
    let search = build_search(config).await?;
    let semantic = search.semantic();

    let provider = semantic
        .prober()
        .provider()
        .map(|p| p.name().to_string())
        .unwrap_or_else(|| "disabled".to_string());
    let available = semantic.is_available();

    println!("{:<12} {:<10} MODE", "PROVIDER", "AVAILABLE");
    println!("{:<12} {:<10} {}", provider, available, config.ranking.mode);

    let Some(text) = embed_text else {
        return Ok(());
    };
    if !available {
        bail!("Semantic ranking is not available with provider '{}'", provider);
    }
    match semantic.embed(text).await {
        Some(vector) => println!("embedded {} chars -> {} dims", text.chars().count(), vector.len()),
        None => bail!("Embedding failed (run with RUST_LOG=debug for details)"),
    }
    Ok(())
}
