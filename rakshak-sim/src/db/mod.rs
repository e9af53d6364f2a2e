//! Record store database access
//!
//! Five tables keyed by worker identifier. Dependent rows reference
//! `workers(worker_id)`; deleting a worker removes them explicitly
//! (see [`workers::remove_worker`]) rather than relying on ON DELETE.

pub mod orders;
pub mod reviews;
pub mod snapshot;
pub mod termination;
pub mod workers;

use rakshak_common::Result;
use sqlx::error::DatabaseError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

/// Outcome of an insert that may hit a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Primary key already taken
    Duplicate,
    /// Referenced worker does not exist
    MissingWorker,
}

/// Open (or create) the database file and ensure the schema exists
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true);

    tracing::debug!("Connecting to database: {}", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    init_tables(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory database (tests and throwaway demos)
pub async fn init_memory_pool() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    // One long-lived connection: every new in-memory connection is a new database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    init_tables(&pool).await?;
    Ok(pool)
}

/// Create the record store tables if they don't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS workers (
            worker_id TEXT PRIMARY KEY,
            name TEXT,
            phone TEXT,
            email TEXT,
            joined_at TEXT,
            current_status TEXT,
            notes TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            order_id TEXT PRIMARY KEY,
            worker_id TEXT NOT NULL REFERENCES workers(worker_id),
            order_date TEXT,
            distance_km REAL,
            duration_min REAL,
            payout_amount REAL,
            status TEXT,
            flags TEXT,
            payment_compliant INTEGER,
            reduction_reason TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS termination_status (
            worker_id TEXT PRIMARY KEY REFERENCES workers(worker_id),
            is_terminated INTEGER NOT NULL DEFAULT 0,
            terminated_at TEXT,
            termination_reason_code TEXT,
            termination_reason_text TEXT,
            appeal_allowed INTEGER NOT NULL DEFAULT 0,
            appeal_deadline TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS termination_logs (
            log_id INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id TEXT NOT NULL REFERENCES workers(worker_id),
            logged_at TEXT,
            reason_code TEXT,
            reason_text TEXT,
            related_order_id TEXT,
            evidence TEXT,
            severity INTEGER NOT NULL DEFAULT 0,
            action_taken TEXT,
            recorded_by TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS review_counts (
            worker_id TEXT PRIMARY KEY REFERENCES workers(worker_id),
            count_5 INTEGER NOT NULL DEFAULT 0,
            count_4 INTEGER NOT NULL DEFAULT 0,
            count_3 INTEGER NOT NULL DEFAULT 0,
            count_2 INTEGER NOT NULL DEFAULT 0,
            count_1 INTEGER NOT NULL DEFAULT 0,
            total_reviews INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_orders_worker ON orders(worker_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_logs_worker ON termination_logs(worker_id)")
        .execute(pool)
        .await?;

    tracing::info!("Record store tables initialized");
    Ok(())
}

/// Map constraint violations on insert to an [`InsertOutcome`]
pub(crate) fn classify_insert(result: sqlx::Result<()>) -> Result<InsertOutcome> {
    match result {
        Ok(()) => Ok(InsertOutcome::Inserted),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(InsertOutcome::Duplicate),
        Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
            Ok(InsertOutcome::MissingWorker)
        }
        Err(e) => Err(e.into()),
    }
}
