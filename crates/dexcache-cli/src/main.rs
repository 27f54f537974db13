//! dexcache - a command-line viewer for the public creature-data API.
//!
//! Run a single command (`dexcache show pikachu`) or start an interactive
//! session with no arguments. Within a session every lookup is cached, so
//! revisiting a record costs no network traffic.

mod commands;
mod render;
mod viewer;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dexcache_core::{Config, FavoritesStore, Pokedex};
use viewer::{Flow, Viewer};

// ============================================================================
// Constants
// ============================================================================

const PROMPT: &str = "dex> ";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let mut config = Config::load()?;
    config.apply_env_overrides();

    let dex = Pokedex::from_config(&config).context("Failed to create API client")?;
    info!(
        base_url = config.api_base_url(),
        policy = ?dex.inflight_policy(),
        "dexcache starting"
    );

    let favorites = FavoritesStore::open_in(&config.data_dir()?);
    let mut viewer = Viewer::new(Arc::new(dex), favorites);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        run_session(&mut viewer).await?;
    } else {
        let command = commands::parse(args.iter().map(String::as_str))?;
        let (output, _) = viewer.execute(command).await;
        if !output.is_empty() {
            println!("{}", output);
        }
    }

    info!("dexcache shutting down");
    Ok(())
}

/// Read commands from stdin until `quit` or end of input.
async fn run_session(viewer: &mut Viewer) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", commands::HELP);
    loop {
        print!("{}", PROMPT);
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match commands::parse_line(&line) {
            Ok(command) => {
                let (output, flow) = viewer.execute(command).await;
                if !output.is_empty() {
                    println!("{}", output);
                }
                if flow == Flow::Quit {
                    break;
                }
            }
            Err(e) => println!("{}", e),
        }
    }
    Ok(())
}
