//! rakshak-doc - worker statement PDF service
//!
//! Default port: 8100. Without an explicit model URL the service lists the
//! available models at startup and picks the first preferred one.

use anyhow::{Context, Result};
use clap::Parser;
use rakshak_common::config::{TomlConfig, DEFAULT_MODEL_API_ROOT};
use rakshak_common::llm::GenerativeClient;
use rakshak_common::logging;
use rakshak_doc::{build_router, AppState};
use std::path::PathBuf;
use tracing::{info, warn};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "rakshak-doc")]
#[command(about = "Worker statement PDF service", long_about = None)]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "RAKSHAK_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port (overrides config)
    #[arg(short, long, env = "RAKSHAK_DOC_PORT")]
    port: Option<u16>,

    /// generateContent URL; skips model selection
    #[arg(long, env = "GEMINI_API_URL")]
    model_url: Option<String>,

    /// Model API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    model_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(url) = args.model_url.filter(|u| !u.trim().is_empty()) {
        config.llm.api_url = Some(url);
    }
    if let Some(key) = args.model_key {
        config.llm.api_key = Some(key);
    }

    logging::init(&logging::service_directives(
        "rakshak_doc",
        &config.logging.level,
    ));

    info!("Starting rakshak-doc v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {}", config.source_label());

    let timeout = config.statement.timeout();
    let mut client = GenerativeClient::new(&config.llm)
        .context("Failed to build model client")?
        .with_timeout(timeout);

    if !client.is_configured() {
        warn!("No model API key configured; /generate-pdf will answer 502");
    } else if config
        .llm
        .api_url
        .as_deref()
        .map_or(true, |u| u.trim().is_empty())
    {
        match client
            .select_model(DEFAULT_MODEL_API_ROOT, &config.statement.preferred_models)
            .await
        {
            Ok(model) => info!("Using model {}", model),
            Err(e) => warn!("Model selection failed ({}), keeping {}", e, client.endpoint()),
        }
    }

    let state = AppState::new(client, timeout);
    info!("Model: {}", state.model_name());
    let app = build_router(state);

    let host = args.host.unwrap_or(config.statement.host);
    let port = args.port.unwrap_or(config.statement.port);
    let addr = format!("{}:{}", host, port);
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
