//! Runtime configuration for the decision service
//!
//! Assembled once in `main` from the shared TOML file plus command-line
//! and environment overrides, then handed to each component.

use rakshak_common::config::{LlmConfig, PlatformConfig, TomlConfig};
use std::path::PathBuf;

/// Resolved rakshak-seek configuration
#[derive(Debug, Clone)]
pub struct SeekConfig {
    /// External platform record store
    pub platform: PlatformConfig,
    /// Complaint classifier endpoint
    pub llm: LlmConfig,
    /// Directory receiving one audit file per request
    pub audit_dir: PathBuf,
}

impl SeekConfig {
    pub fn from_toml(config: &TomlConfig) -> Self {
        Self {
            platform: PlatformConfig {
                base_url: config.platform.base_url.trim_end_matches('/').to_string(),
                timeout_secs: config.platform.timeout_secs,
            },
            llm: config.llm.clone(),
            audit_dir: config.seek.audit_dir.clone(),
        }
    }
}
