//! Order rows

use super::{classify_insert, InsertOutcome};
use rakshak_common::models::Order;
use rakshak_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub(crate) fn order_from_row(row: &SqliteRow) -> Order {
    Order {
        order_id: row.get("order_id"),
        worker_id: row.get("worker_id"),
        order_date: row.get("order_date"),
        distance_km: row.get("distance_km"),
        duration_min: row.get("duration_min"),
        payout_amount: row.get("payout_amount"),
        status: row.get("status"),
        flags: row.get("flags"),
        payment_compliant: row.get("payment_compliant"),
        reduction_reason: row.get("reduction_reason"),
    }
}

/// Insert an order; the worker must exist
pub async fn add_order(pool: &SqlitePool, order: &Order) -> Result<InsertOutcome> {
    let result = sqlx::query(
        r#"
        INSERT INTO orders
            (order_id, worker_id, order_date, distance_km, duration_min,
             payout_amount, status, flags, payment_compliant, reduction_reason)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&order.order_id)
    .bind(&order.worker_id)
    .bind(&order.order_date)
    .bind(order.distance_km)
    .bind(order.duration_min)
    .bind(order.payout_amount)
    .bind(&order.status)
    .bind(&order.flags)
    .bind(order.payment_compliant)
    .bind(&order.reduction_reason)
    .execute(pool)
    .await
    .map(|_| ());

    classify_insert(result)
}

/// Orders of one worker, newest first
pub async fn orders_for_worker(pool: &SqlitePool, worker_id: &str) -> Result<Vec<Order>> {
    let rows = sqlx::query("SELECT * FROM orders WHERE worker_id = ? ORDER BY order_date DESC")
        .bind(worker_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(order_from_row).collect())
}

pub async fn remove_order(pool: &SqlitePool, order_id: &str) -> Result<bool> {
    let deleted = sqlx::query("DELETE FROM orders WHERE order_id = ?")
        .bind(order_id)
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

    fn order(id: &str, worker: &str, date: &str) -> Order {
        serde_json::from_value(json!({
            "order_id": id,
            "worker_id": worker,
            "order_date": date,
            "payout_amount": 120.5,
            "payment_compliant": 1
        }))
        .unwrap()
    }

    async fn pool_with_worker() -> SqlitePool {
        let pool = init_memory_pool().await.unwrap();
        let w = Worker::from_payload(json!({"worker_id": "W1"})).unwrap();
        workers::add_worker(&pool, &w).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_orders_round_trip_newest_first() {
        let pool = pool_with_worker().await;
        add_order(&pool, &order("O1", "W1", "2024-06-01")).await.unwrap();
        add_order(&pool, &order("O2", "W1", "2024-07-01")).await.unwrap();

        let orders = orders_for_worker(&pool, "W1").await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id, "O2");
        assert_eq!(orders[0].payment_compliant, Some(true));
        assert_eq!(orders[0].payout_amount, Some(120.5));
    }

    #[tokio::test]
    async fn test_duplicate_and_unknown_worker() {
        let pool = pool_with_worker().await;
        let o = order("O1", "W1", "2024-06-01");

        assert_eq!(add_order(&pool, &o).await.unwrap(), InsertOutcome::Inserted);
        assert_eq!(add_order(&pool, &o).await.unwrap(), InsertOutcome::Duplicate);
        assert_eq!(
            add_order(&pool, &order("O9", "ghost", "2024-06-01"))
                .await
                .unwrap(),
            InsertOutcome::MissingWorker
        );
    }

    #[tokio::test]
    async fn test_remove_order() {
        let pool = pool_with_worker().await;
        add_order(&pool, &order("O1", "W1", "2024-06-01")).await.unwrap();

        assert!(remove_order(&pool, "O1").await.unwrap());
        assert!(!remove_order(&pool, "O1").await.unwrap());
    }
}
