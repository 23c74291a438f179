#![forbid(unsafe_code)]

mod config;
mod entry;
mod handlers;
mod server;
mod support;

pub(crate) use support::*;

use clap::Parser;
use gl_storage::SqliteStore;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const MCP_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "gamelab-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
const LOG_ENV: &str = "GAMELAB_LOG";

pub(crate) struct McpServer {
    initialized: bool,
    store: SqliteStore,
    history_limit: usize,
}

pub(crate) struct McpServerConfig {
    history_limit: usize,
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the protocol; logs go to stderr.
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::parse();
    init_tracing(config.log_json);

    let mut store = SqliteStore::open(&config.storage_dir)?;
    if !config.no_seed {
        let report = store.seed_default_content()?;
        if !report.is_empty() {
            tracing::info!(
                games = report.games_inserted,
                missions = report.missions_inserted,
                "seeded a fresh store"
            );
        }
    }

    tracing::info!(
        storage_dir = %store.storage_dir().display(),
        history_limit = config.history_limit,
        "{SERVER_NAME} {SERVER_VERSION} listening on stdio"
    );
    let mut server = McpServer::new(
        store,
        McpServerConfig {
            history_limit: config.history_limit,
        },
    );
    entry::run_stdio(&mut server)
}
