//! rakshak-sim - platform record store simulator
//!
//! Listens on port 5001 by default. The database file is created on first
//! start; pass `--memory` for a throwaway store.

use anyhow::{Context, Result};
use clap::Parser;
use rakshak_common::config::{default_database_path, TomlConfig};
use rakshak_common::logging;
use rakshak_sim::{build_router, db, AppState};
use std::path::PathBuf;
use tracing::info;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "rakshak-sim")]
#[command(about = "Gig platform record store simulator", long_about = None)]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "RAKSHAK_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port (overrides config)
    #[arg(short, long, env = "RAKSHAK_SIM_PORT")]
    port: Option<u16>,

    /// SQLite database file (overrides config)
    #[arg(short, long, env = "RAKSHAK_SIM_DB")]
    database: Option<PathBuf>,

    /// Use an in-memory database
    #[arg(long, conflicts_with = "database")]
    memory: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    logging::init(&logging::service_directives(
        "rakshak_sim",
        &config.logging.level,
    ));

    info!("Starting rakshak-sim v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {}", config.source_label());

    let pool = if args.memory {
        info!("Using in-memory database");
        db::init_memory_pool()
            .await
            .context("Failed to open in-memory database")?
    } else {
        let db_path = args
            .database
            .or(config.simulator.database_path)
            .unwrap_or_else(default_database_path);
        info!("Database path: {}", db_path.display());

        db::init_database_pool(&db_path)
            .await
            .with_context(|| format!("Failed to open database {}", db_path.display()))?
    };

    let app = build_router(AppState::new(pool));

    let host = args.host.unwrap_or(config.simulator.host);
    let port = args.port.unwrap_or(config.simulator.port);
    let addr = format!("{}:{}", host, port);
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
