//! Per-request audit files
//!
//! Every fetched record is written, with the request metadata, to
//! `{dir}/seek_{worker}_{timestamp}.json` before any decision is made.

use chrono::{DateTime, Utc};
use rakshak_common::time::compact_utc;
use rakshak_common::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Audit file writer
#[derive(Debug, Clone)]
pub struct AuditSink {
    dir: PathBuf,
}

impl AuditSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `payload` as pretty JSON. Never overwrites: an existing file
    /// with the same name is an error.
    pub async fn write(&self, worker_id: &str, at: DateTime<Utc>, payload: &Value) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(file_name(worker_id, at));
        let bytes = serde_json::to_vec_pretty(payload)?;

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(&bytes).await?;
        file.flush().await?;

        debug!(path = %path.display(), "Audit file written");
        Ok(path)
    }
}

/// `seek_{worker}_{YYYYMMDDTHHMMSS.mmmZ}.json`
pub fn file_name(worker_id: &str, at: DateTime<Utc>) -> String {
    format!("seek_{}_{}.json", sanitize(worker_id), compact_utc(at))
}

/// Keep `[A-Za-z0-9_-]`, replace everything else with `_`
fn sanitize(worker_id: &str) -> String {
    worker_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
