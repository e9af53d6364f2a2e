//! Aggregated reads: per-worker summary and whole-database dump

use super::{orders, reviews, termination, workers};
use rakshak_common::models::{DatabaseSnapshot, WorkerSummary};
use rakshak_common::Result;
use sqlx::SqlitePool;

/// Worker row plus every dependent row; `None` when the worker is unknown
pub async fn worker_summary(pool: &SqlitePool, worker_id: &str) -> Result<Option<WorkerSummary>> {
    let Some(worker) = workers::get_worker(pool, worker_id).await? else {
        return Ok(None);
    };

    Ok(Some(WorkerSummary {
        worker,
        orders: orders::orders_for_worker(pool, worker_id).await?,
        termination_status: termination::get_status(pool, worker_id).await?,
        termination_logs: termination::logs_for_worker(pool, worker_id).await?,
        review_counts: reviews::get_counts(pool, worker_id).await?,
    }))
}

/// Every row of every table
pub async fn dump(pool: &SqlitePool) -> Result<DatabaseSnapshot> {
    let worker_rows = sqlx::query("SELECT * FROM workers").fetch_all(pool).await?;
    let order_rows = sqlx::query("SELECT * FROM orders").fetch_all(pool).await?;
    let status_rows = sqlx::query("SELECT * FROM termination_status")
        .fetch_all(pool)
        .await?;
    let log_rows = sqlx::query("SELECT * FROM termination_logs")
        .fetch_all(pool)
        .await?;
    let review_rows = sqlx::query("SELECT * FROM review_counts")
        .fetch_all(pool)
        .await?;

    Ok(DatabaseSnapshot {
        workers: worker_rows.iter().map(workers::worker_from_row).collect(),
        orders: order_rows.iter().map(orders::order_from_row).collect(),
        termination_status: status_rows
            .iter()
            .map(termination::status_from_row)
            .collect(),
        termination_logs: log_rows.iter().map(termination::log_from_row).collect(),
        review_counts: review_rows.iter().map(reviews::counts_from_row).collect(),
    })
}
