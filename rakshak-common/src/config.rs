//! Configuration loading
//!
//! Bootstrap configuration comes from a single TOML file shared by every
//! service. Each service reads the sections it needs and layers command-line
//! flags and environment variables (via clap) on top:
//!
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing default config file is not an error: the services start with
//! compiled defaults. Loading happens before logging is initialised, so the
//! chosen file is kept in [`TomlConfig::source`] for the caller to report.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default base URL of the platform record store
pub const DEFAULT_PLATFORM_BASE_URL: &str = "http://127.0.0.1:5001";

/// Default generateContent endpoint for the text-generation model
pub const DEFAULT_MODEL_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// Root of the generative-language REST API (model listing)
pub const DEFAULT_MODEL_API_ROOT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    pub logging: LoggingConfig,
    pub platform: PlatformConfig,
    pub llm: LlmConfig,
    pub seek: SeekSection,
    pub simulator: SimulatorSection,
    pub statement: StatementSection,
    /// File this configuration was read from; `None` for compiled defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Where the external platform record store lives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlatformConfig {
    pub base_url: String,
    /// Fetch timeout in seconds
    pub timeout_secs: f64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PLATFORM_BASE_URL.to_string(),
            timeout_secs: 5.0,
        }
    }
}

impl PlatformConfig {
    pub fn timeout(&self) -> Duration {
        secs_to_duration(self.timeout_secs)
    }
}

/// Text-generation endpoint settings
///
/// `api_key` absent means the model is not configured; callers fall back
/// to local behaviour instead of calling out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    /// Full generateContent URL; `None` uses [`DEFAULT_MODEL_URL`]
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            timeout_secs: 10.0,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        secs_to_duration(self.timeout_secs)
    }

    /// API key if present and not blank
    pub fn key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Resolved generateContent endpoint (trailing slash stripped)
    pub fn endpoint(&self) -> String {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_MODEL_URL)
            .trim_end_matches('/')
            .to_string()
    }
}

/// `[seek]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeekSection {
    pub host: String,
    pub port: u16,
    pub audit_dir: PathBuf,
}

impl Default for SeekSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            audit_dir: PathBuf::from("seek_results"),
        }
    }
}

/// `[simulator]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulatorSection {
    pub host: String,
    pub port: u16,
    /// SQLite database file; `None` uses [`default_database_path`]
    pub database_path: Option<PathBuf>,
}

impl Default for SimulatorSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            database_path: None,
        }
    }
}

/// `[statement]` section (PDF statement service)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatementSection {
    pub host: String,
    pub port: u16,
    /// Model request timeout in seconds (summaries are long)
    pub timeout_secs: f64,
    /// Model names tried in order when no explicit endpoint is configured
    pub preferred_models: Vec<String>,
}

impl Default for StatementSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8100,
            timeout_secs: 60.0,
            preferred_models: vec![
                "models/gemini-2.5-flash".to_string(),
                "models/gemini-2.5-pro".to_string(),
                "models/gemini-pro-latest".to_string(),
                "models/gemini-flash-latest".to_string(),
            ],
        }
    }
}

impl StatementSection {
    pub fn timeout(&self) -> Duration {
        secs_to_duration(self.timeout_secs)
    }
}

impl TomlConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Without one, the default
    /// locations are tried in order and compiled defaults are used when
    /// none exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        for candidate in default_config_paths() {
            if candidate.exists() {
                return Self::from_file(&candidate);
            }
        }

        Ok(Self::default())
    }

    /// Parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        let mut config = Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Human-readable origin for startup logs
    pub fn source_label(&self) -> String {
        match &self.source {
            Some(path) => path.display().to_string(),
            None => "compiled defaults".to_string(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }
}

/// Config file locations tried when no explicit path is given
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("rakshak").join("config.toml"));
    }
    paths.push(PathBuf::from("rakshak.toml"));
    paths
}

/// OS-dependent default location of the simulator database
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("rakshak"))
        .unwrap_or_else(|| PathBuf::from("./rakshak_data"))
        .join("gigworkers.db")
}

/// Shortest configurable timeout
pub const MIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Longest configurable timeout
pub const MAX_TIMEOUT: Duration = Duration::from_secs(3600);

/// Clamp a configured timeout into `[MIN_TIMEOUT, MAX_TIMEOUT]`.
/// NaN and non-positive values read as the minimum.
fn secs_to_duration(secs: f64) -> Duration {
    match Duration::try_from_secs_f64(secs) {
        Ok(duration) => duration.clamp(MIN_TIMEOUT, MAX_TIMEOUT),
        Err(_) if secs > 0.0 => MAX_TIMEOUT,
        Err(_) => MIN_TIMEOUT,
    }
}
