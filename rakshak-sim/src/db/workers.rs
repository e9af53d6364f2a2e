//! Worker rows and their extension map

use super::{classify_insert, InsertOutcome};
use rakshak_common::models::{Worker, WorkerExtensions};
use rakshak_common::{Error, Result};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub(crate) fn worker_from_row(row: &SqliteRow) -> Worker {
    let notes: Option<String> = row.get("notes");
    Worker {
        worker_id: row.get("worker_id"),
        name: row.get("name"),
        phone: row.get("phone"),
        email: row.get("email"),
        joined_at: row.get("joined_at"),
        current_status: row.get("current_status"),
        extensions: WorkerExtensions::from_notes(notes.as_deref()),
    }
}

/// Insert a worker row
pub async fn add_worker(pool: &SqlitePool, worker: &Worker) -> Result<InsertOutcome> {
    let result = sqlx::query(
        r#"
        INSERT INTO workers (worker_id, name, phone, email, joined_at, current_status, notes)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&worker.worker_id)
    .bind(&worker.name)
    .bind(&worker.phone)
    .bind(&worker.email)
    .bind(&worker.joined_at)
    .bind(&worker.current_status)
    .bind(worker.extensions.to_notes())
    .execute(pool)
    .await
    .map(|_| ());

    classify_insert(result)
}

/// Load one worker
pub async fn get_worker(pool: &SqlitePool, worker_id: &str) -> Result<Option<Worker>> {
    let row = sqlx::query("SELECT * FROM workers WHERE worker_id = ?")
        .bind(worker_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(worker_from_row))
}

/// All workers, most recently joined first
pub async fn list_workers(pool: &SqlitePool) -> Result<Vec<Worker>> {
    let rows = sqlx::query("SELECT * FROM workers ORDER BY joined_at DESC")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(worker_from_row).collect())
}

/// Delete a worker and every row that references it.
///
/// Runs in one transaction. Returns false when no worker row existed
/// (dependent rows, if any were orphaned, are still removed).
pub async fn remove_worker(pool: &SqlitePool, worker_id: &str) -> Result<bool> {
    let mut tx = pool.begin().await?;

    for table in ["orders", "termination_status", "termination_logs", "review_counts"] {
        let removed = sqlx::query(&format!("DELETE FROM {} WHERE worker_id = ?", table))
            .bind(worker_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if removed > 0 {
            tracing::debug!(worker_id, table, removed, "Cascade delete");
        }
    }

    let deleted = sqlx::query("DELETE FROM workers WHERE worker_id = ?")
        .bind(worker_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(deleted > 0)
}

async fn load_extensions(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    worker_id: &str,
) -> Result<Option<WorkerExtensions>> {
    let notes: Option<(Option<String>,)> =
        sqlx::query_as("SELECT notes FROM workers WHERE worker_id = ?")
            .bind(worker_id)
            .fetch_optional(&mut **tx)
            .await?;

    Ok(notes.map(|(n,)| WorkerExtensions::from_notes(n.as_deref())))
}

async fn store_extensions(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    worker_id: &str,
    extensions: &WorkerExtensions,
) -> Result<()> {
    sqlx::query("UPDATE workers SET notes = ? WHERE worker_id = ?")
        .bind(extensions.to_notes())
        .bind(worker_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Add or replace one extension key.
///
/// Returns false when the worker does not exist; an invalid key is
/// `Error::InvalidInput`.
pub async fn set_extension(
    pool: &SqlitePool,
    worker_id: &str,
    key: &str,
    value: Value,
) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let Some(mut extensions) = load_extensions(&mut tx, worker_id).await? else {
        return Ok(false);
    };

    extensions
        .insert(key.to_string(), value)
        .map_err(|e| Error::InvalidInput(e.to_string()))?;

    store_extensions(&mut tx, worker_id, &extensions).await?;
    tx.commit().await?;
    Ok(true)
}

/// Remove one extension key.
///
/// Returns false only when the worker does not exist; removing an absent
/// key is a no-op.
pub async fn remove_extension(pool: &SqlitePool, worker_id: &str, key: &str) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let Some(mut extensions) = load_extensions(&mut tx, worker_id).await? else {
        return Ok(false);
    };

    if extensions.remove(key).is_some() {
        store_extensions(&mut tx, worker_id, &extensions).await?;
        tx.commit().await?;
    }
    Ok(true)
}
