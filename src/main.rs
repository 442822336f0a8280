//! # Tab Wind CLI (`tabwind`)
//!
//! Ranks browser tabs against a query the same way the switcher overlay
//! does, from a tab list saved as JSON.
//!
//! ## Usage
//!
//! ```bash
//! tabwind [--config ./config/tabwind.toml] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tabwind probe` | Show the embedding provider and whether it is available |
//! | `tabwind search "<query>" --tabs <file>` | Rank tabs and print the hits |
//! | `tabwind select "<query>" --tabs <file>` | Pick a tab as the overlay would and print the `switch-tab` message |
//!
//! Logs go to stderr. Set `RUST_LOG=debug` to see probe, cache, and
//! per-request detail.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tab_wind::{config, probe, search};
use tab_wind_core::search::SearchMode;

/// Tab Wind: substring and semantic tab ranking.
#[derive(Parser)]
#[command(
    name = "tabwind",
    version,
    about = "Keyboard-driven tab switcher ranking, from the command line"
)]
struct Cli {
    /// Path to configuration file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the embedding backend.
    ///
    /// Prints the configured provider and whether semantic ranking is
    /// available. With `--embed`, also creates the model and embeds the
    /// given text.
    Probe {
        /// Text to embed as an end-to-end check.
        #[arg(long)]
        embed: Option<String>,
    },

    /// Rank a tab list against a query.
    Search {
        /// The search query string.
        query: String,

        /// JSON file with a tab array or a `toggle-modal` message.
        #[arg(long)]
        tabs: PathBuf,

        /// Search mode: `auto`, `substring`, or `semantic`. Defaults to `[ranking].mode`.
        #[arg(long)]
        mode: Option<SearchMode>,

        /// Maximum number of results. Defaults to `[ranking].max_results`.
        #[arg(long)]
        limit: Option<usize>,

        /// Print the search outcome as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Select a tab the way the switcher overlay would.
    ///
    /// Opens the switcher with the tab list, types the query, moves the
    /// selection, presses Enter, and prints the resulting message.
    Select {
        /// The search query string.
        query: String,

        /// JSON file with a tab array or a `toggle-modal` message.
        #[arg(long)]
        tabs: PathBuf,

        /// Press ArrowDown this many times.
        #[arg(long, default_value_t = 0)]
        down: usize,

        /// Press ArrowUp this many times (after the ArrowDown presses).
        #[arg(long, default_value_t = 0)]
        up: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::Config::default(),
    };

    match cli.command {
        Commands::Probe { embed } => {
            probe::run_probe(&cfg, embed.as_deref()).await?;
        }
        Commands::Search {
            query,
            tabs,
            mode,
            limit,
            json,
        } => {
            search::run_search(&cfg, &query, &tabs, mode, limit, json).await?;
        }
        Commands::Select {
            query,
            tabs,
            down,
            up,
        } => {
            search::run_select(&cfg, &query, &tabs, down, up).await?;
        }
    }

    Ok(())
}
