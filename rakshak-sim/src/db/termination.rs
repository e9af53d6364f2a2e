//! Termination status (upsert, one per worker) and termination logs (append-only)

use super::{classify_insert, InsertOutcome};
use rakshak_common::models::{TerminationLog, TerminationStatus};
use rakshak_common::{time, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub(crate) fn status_from_row(row: &SqliteRow) -> TerminationStatus {
    TerminationStatus {
        worker_id: row.get("worker_id"),
        is_terminated: row.get("is_terminated"),
        terminated_at: row.get("terminated_at"),
        termination_reason_code: row.get("termination_reason_code"),
        termination_reason_text: row.get("termination_reason_text"),
        appeal_allowed: row.get("appeal_allowed"),
        appeal_deadline: row.get("appeal_deadline"),
    }
}

pub(crate) fn log_from_row(row: &SqliteRow) -> TerminationLog {
    TerminationLog {
        log_id: row.get("log_id"),
        worker_id: row.get("worker_id"),
        logged_at: row.get("logged_at"),
        reason_code: row.get("reason_code"),
        reason_text: row.get("reason_text"),
        related_order_id: row.get("related_order_id"),
        evidence: row.get("evidence"),
        severity: row.get("severity"),
        action_taken: row.get("action_taken"),
        recorded_by: row.get("recorded_by"),
    }
}

/// Insert or replace the worker's termination status
pub async fn upsert_status(pool: &SqlitePool, status: &TerminationStatus) -> Result<InsertOutcome> {
    let result = sqlx::query(
        r#"
        INSERT INTO termination_status
            (worker_id, is_terminated, terminated_at, termination_reason_code,
             termination_reason_text, appeal_allowed, appeal_deadline)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(worker_id) DO UPDATE SET
            is_terminated = excluded.is_terminated,
            terminated_at = excluded.terminated_at,
            termination_reason_code = excluded.termination_reason_code,
            termination_reason_text = excluded.termination_reason_text,
            appeal_allowed = excluded.appeal_allowed,
            appeal_deadline = excluded.appeal_deadline
        "#,
    )
    .bind(&status.worker_id)
    .bind(status.is_terminated)
    .bind(&status.terminated_at)
    .bind(&status.termination_reason_code)
    .bind(&status.termination_reason_text)
    .bind(status.appeal_allowed)
    .bind(&status.appeal_deadline)
    .execute(pool)
    .await
    .map(|_| ());

    classify_insert(result)
}

pub async fn get_status(pool: &SqlitePool, worker_id: &str) -> Result<Option<TerminationStatus>> {
    let row = sqlx::query("SELECT * FROM termination_status WHERE worker_id = ?")
        .bind(worker_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(status_from_row))
}

pub async fn remove_status(pool: &SqlitePool, worker_id: &str) -> Result<bool> {
    let deleted = sqlx::query("DELETE FROM termination_status WHERE worker_id = ?")
        .bind(worker_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(deleted > 0)
}

/// Append a log entry; `logged_at` defaults to now.
///
/// Returns the new `log_id`, or `None` when the worker does not exist.
pub async fn add_log(pool: &SqlitePool, log: &TerminationLog) -> Result<Option<i64>> {
    let logged_at = log
        .logged_at
        .clone()
        .unwrap_or_else(|| time::iso_utc(time::now()));

    let result = sqlx::query(
        r#"
        INSERT INTO termination_logs
            (worker_id, logged_at, reason_code, reason_text, related_order_id,
             evidence, severity, action_taken, recorded_by)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&log.worker_id)
    .bind(&logged_at)
    .bind(&log.reason_code)
    .bind(&log.reason_text)
    .bind(&log.related_order_id)
    .bind(&log.evidence)
    .bind(log.severity)
    .bind(&log.action_taken)
    .bind(&log.recorded_by)
    .execute(pool)
    .await;

    match result {
        Ok(done) => Ok(Some(done.last_insert_rowid())),
        Err(e) => match classify_insert(Err(e))? {
            InsertOutcome::MissingWorker => Ok(None),
            other => Err(rakshak_common::Error::Internal(format!(
                "unexpected insert outcome for termination log: {:?}",
                other
            ))),
        },
    }
}

/// Logs of one worker, newest first
pub async fn logs_for_worker(pool: &SqlitePool, worker_id: &str) -> Result<Vec<TerminationLog>> {
    let rows = sqlx::query(
        "SELECT * FROM termination_logs WHERE worker_id = ? ORDER BY logged_at DESC, log_id DESC",
    )
    .bind(worker_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(log_from_row).collect())
}

pub async fn remove_log(pool: &SqlitePool, log_id: i64) -> Result<bool> {
    let deleted = sqlx::query("DELETE FROM termination_logs WHERE log_id = ?")
        .bind(log_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_memory_pool, workers};
    use rakshak_common::models::Worker;
    use serde_json::json;

    async fn pool_with_worker() -> SqlitePool {
        let pool = init_memory_pool().await.unwrap();
        let w = Worker::from_payload(json!({"worker_id": "W1"})).unwrap();
        workers::add_worker(&pool, &w).await.unwrap();
        pool
    }

    fn status(terminated: bool, reason: Option<&str>) -> TerminationStatus {
        TerminationStatus {
            worker_id: "W1".to_string(),
            is_terminated: terminated,
            terminated_at: None,
            termination_reason_code: None,
            termination_reason_text: reason.map(str::to_string),
            appeal_allowed: false,
            appeal_deadline: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_previous_status() {
        let pool = pool_with_worker().await;

        upsert_status(&pool, &status(false, None)).await.unwrap();
        upsert_status(&pool, &status(true, Some("fraud review"))).await.unwrap();

        let stored = get_status(&pool, "W1").await.unwrap().unwrap();
        assert!(stored.is_terminated);
        assert_eq!(stored.termination_reason_text.as_deref(), Some("fraud review"));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM termination_status")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_status_for_unknown_worker() {
        let pool = init_memory_pool().await.unwrap();
        assert_eq!(
            upsert_status(&pool, &status(true, None)).await.unwrap(),
            InsertOutcome::MissingWorker
        );
    }

    #[tokio::test]
    async fn test_logs_append_and_default_timestamp() {
        let pool = pool_with_worker().await;
        let log: TerminationLog = serde_json::from_value(json!({
            "worker_id": "W1",
            "reason_text": "customer complaint",
            "severity": 2
        }))
        .unwrap();

        let first = add_log(&pool, &log).await.unwrap().unwrap();
        let second = add_log(&pool, &log).await.unwrap().unwrap();
        assert!(second > first);

        let logs = logs_for_worker(&pool, "W1").await.unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs[0].logged_at.is_some());
        assert_eq!(logs[0].severity, 2);

        assert!(remove_log(&pool, first).await.unwrap());
        assert!(!remove_log(&pool, first).await.unwrap());
    }

    #[tokio::test]
    async fn test_log_for_unknown_worker() {
        let pool = init_memory_pool().await.unwrap();
        let log: TerminationLog = serde_json::from_value(json!({"worker_id": "ghost"})).unwrap();
        assert_eq!(add_log(&pool, &log).await.unwrap(), None);
    }
}
