//! Review count histogram (upsert, one per worker)

use super::{classify_insert, InsertOutcome};
use rakshak_common::models::ReviewCounts;
use rakshak_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub(crate) fn counts_from_row(row: &SqliteRow) -> ReviewCounts {
    ReviewCounts {
        worker_id: row.get("worker_id"),
        count_5: row.get("count_5"),
        count_4: row.get("count_4"),
        count_3: row.get("count_3"),
        count_2: row.get("count_2"),
        count_1: row.get("count_1"),
        total_reviews: Some(row.get("total_reviews")),
    }
}

/// Insert or replace the worker's review counts.
/// A missing total is stored as the sum of the counts.
pub async fn upsert_counts(pool: &SqlitePool, counts: &ReviewCounts) -> Result<InsertOutcome> {
    let total = counts
        .total()
        .map_err(|e| Error::InvalidInput(e.to_string()))?;

    let result = sqlx::query(
        r#"
        INSERT INTO review_counts
            (worker_id, count_5, count_4, count_3, count_2, count_1, total_reviews)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(worker_id) DO UPDATE SET
            count_5 = excluded.count_5,
            count_4 = excluded.count_4,
            count_3 = excluded.count_3,
            count_2 = excluded.count_2,
            count_1 = excluded.count_1,
            total_reviews = excluded.total_reviews
        "#,
    )
    .bind(&counts.worker_id)
    .bind(counts.count_5)
    .bind(counts.count_4)
    .bind(counts.count_3)
    .bind(counts.count_2)
    .bind(counts.count_1)
    .bind(total)
    .execute(pool)
    .await
    .map(|_| ());

    classify_insert(result)
}

pub async fn get_counts(pool: &SqlitePool, worker_id: &str) -> Result<Option<ReviewCounts>> {
    let row = sqlx::query("SELECT * FROM review_counts WHERE worker_id = ?")
        .bind(worker_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(counts_from_row))
}

pub async fn remove_counts(pool: &SqlitePool, worker_id: &str) -> Result<bool> {
    let deleted = sqlx::query("DELETE FROM review_counts WHERE worker_id = ?")
        .bind(worker_id)
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

    #[tokio::test]
    async fn test_upsert_computes_total_and_replaces() {
        let pool = init_memory_pool().await.unwrap();
        let w = Worker::from_payload(json!({"worker_id": "W1"})).unwrap();
        workers::add_worker(&pool, &w).await.unwrap();

        let counts: ReviewCounts = serde_json::from_value(json!({
            "worker_id": "W1", "count_5": 10, "count_4": 4, "count_1": 1
        }))
        .unwrap();
        upsert_counts(&pool, &counts).await.unwrap();
        assert_eq!(
            get_counts(&pool, "W1").await.unwrap().unwrap().total_reviews,
            Some(15)
        );

        let counts: ReviewCounts =
            serde_json::from_value(json!({"worker_id": "W1", "count_2": 3})).unwrap();
        upsert_counts(&pool, &counts).await.unwrap();
        let stored = get_counts(&pool, "W1").await.unwrap().unwrap();
        assert_eq!(stored.count_5, 0);
        assert_eq!(stored.total_reviews, Some(3));

        assert!(remove_counts(&pool, "W1").await.unwrap());
        assert_eq!(get_counts(&pool, "W1").await.unwrap(), None);
    }
}
