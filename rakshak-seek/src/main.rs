//! rakshak-seek - complaint decision service
//!
//! Default port: 8000. Reads `.env.local`, then `.env`, before parsing
//! flags so the usual variables can live next to the binary.

use anyhow::{Context, Result};
use clap::Parser;
use rakshak_common::config::TomlConfig;
use rakshak_common::logging;
use rakshak_seek::{build_router, AppState, SeekConfig};
use std::path::PathBuf;
use tracing::info;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "rakshak-seek")]
#[command(about = "Gig-worker complaint decision service", long_about = None)]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "RAKSHAK_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port (overrides config)
    #[arg(short, long, env = "RAKSHAK_SEEK_PORT")]
    port: Option<u16>,

    /// Platform record store base URL
    #[arg(long, env = "EXTERNAL_PLATFORM_BASE_URL")]
    platform_url: Option<String>,

    /// Record fetch timeout in seconds
    #[arg(long, env = "EXTERNAL_REQUEST_TIMEOUT")]
    platform_timeout: Option<f64>,

    /// Classifier generateContent URL
    #[arg(long, env = "GEMINI_API_URL")]
    model_url: Option<String>,

    /// Classifier API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    model_key: Option<String>,

    /// Classifier timeout in seconds
    #[arg(long, env = "GEMINI_TIMEOUT")]
    model_timeout: Option<f64>,

    /// Audit file directory
    #[arg(long, env = "RAKSHAK_AUDIT_DIR")]
    audit_dir: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut TomlConfig) {
        if let Some(url) = self.platform_url {
            config.platform.base_url = url;
        }
        if let Some(secs) = self.platform_timeout {
            config.platform.timeout_secs = secs;
        }
        if let Some(url) = self.model_url.filter(|u| !u.trim().is_empty()) {
            config.llm.api_url = Some(url);
        }
        if let Some(key) = self.model_key {
            config.llm.api_key = Some(key);
        }
        if let Some(secs) = self.model_timeout {
            config.llm.timeout_secs = secs;
        }
        if let Some(dir) = self.audit_dir {
            config.seek.audit_dir = dir;
        }
        if let Some(host) = self.host {
            config.seek.host = host;
        }
        if let Some(port) = self.port {
            config.seek.port = port;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut toml_config =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut toml_config);

    logging::init(&logging::service_directives(
        "rakshak_seek",
        &toml_config.logging.level,
    ));

    info!("Starting rakshak-seek v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {}", toml_config.source_label());

    let config = SeekConfig::from_toml(&toml_config);
    info!("Platform record store: {}", config.platform.base_url);
    info!("Classifier endpoint: {}", config.llm.endpoint());
    info!(
        "Classifier configured: {}",
        if config.llm.key().is_some() { "yes" } else { "no (fallback only)" }
    );
    info!("Audit directory: {}", config.audit_dir.display());

    let state = AppState::from_config(&config).context("Failed to build decision pipeline")?;
    let app = build_router(state);

    let addr = format!("{}:{}", toml_config.seek.host, toml_config.seek.port);
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
