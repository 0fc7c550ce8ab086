// SQLite OrderStore Implementation

use async_trait::async_trait;
use paysweep_core::domain::{Order, OrderId, OrderStatus};
use paysweep_core::error::{AppError, Result};
use paysweep_core::port::{CandidateFilter, Clock, OrderStore};
use sqlx::SqlitePool;
use std::sync::Arc;

// Helper to convert sqlx::Error to AppError with structured information
fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => AppError::Database(format!(
                        "Unique constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "787" | "3850" => AppError::Database(format!(
                        "Foreign key constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "5" => AppError::Database(format!(
                        "Database locked (SQLITE_BUSY): {}",
                        db_err.message()
                    )),
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => AppError::Database(format!("Column not found: {col}")),
        _ => AppError::Database(err.to_string()),
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: String,
    status: String,
    payment_method: String,
    provider_reference: Option<String>,
    created_at: i64,
}

impl OrderRow {
    fn into_order(self) -> Order {
        Order {
            id: self.id,
            status: OrderStatus::from(self.status),
            payment_method: self.payment_method,
            provider_reference: self.provider_reference,
            created_at: self.created_at,
        }
    }
}

pub struct SqliteOrderStore {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteOrderStore {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn find_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Order>> {
        if filter.statuses.is_empty() {
            return Ok(Vec::new());
        }

        // sqlx has no array binding for SQLite; build the IN placeholders
        let placeholders = vec!["?"; filter.statuses.len()].join(", ");
        let sql = format!(
            r#"
            SELECT id, status, payment_method, provider_reference, created_at
            FROM orders
            WHERE status IN ({placeholders})
              AND payment_method = ?
              AND created_at >= ?
            ORDER BY created_at DESC
            LIMIT ?
            "#
        );

        let mut query = sqlx::query_as::<_, OrderRow>(&sql);
        for status in &filter.statuses {
            query = query.bind(status.as_str().to_string());
        }
        let rows = query
            .bind(&filter.payment_method)
            .bind(filter.created_after)
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(OrderRow::into_order).collect())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, status, payment_method, provider_reference, created_at FROM orders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(OrderRow::into_order))
    }

    async fn complete_payment(&self, id: &OrderId, reference: &str) -> Result<()> {
        let now = self.clock.now_millis();

        // Conditional update: an already-completed order is left untouched,
        // which is where the idempotence contract lives
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'completed', provider_reference = ?, paid_at = ?
            WHERE id = ? AND status <> 'completed'
            "#,
        )
        .bind(reference)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            // Either the order does not exist, or it was already completed
            let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE id = ?")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
            if exists == 0 {
                return Err(AppError::NotFound(format!("Order {id} not found")));
            }
        }

        Ok(())
    }

    async fn add_note(&self, id: &OrderId, text: &str) -> Result<()> {
        let now = self.clock.now_millis();

        sqlx::query("INSERT INTO order_notes (order_id, note, created_at) VALUES (?, ?, ?)")
            .bind(id)
            .bind(text)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use paysweep_core::port::clock::mocks::FixedClock;

    const NOW: i64 = 1_700_000_000_000;

    async fn store() -> SqliteOrderStore {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteOrderStore::new(pool, Arc::new(FixedClock(NOW)))
    }

    async fn seed(
        store: &SqliteOrderStore,
        id: &str,
        status: &str,
        method: &str,
        reference: Option<&str>,
        created_at: i64,
    ) {
        sqlx::query(
            "INSERT INTO orders (id, status, payment_method, provider_reference, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(status)
        .bind(method)
        .bind(reference)
        .bind(created_at)
        .execute(&store.pool)
        .await
        .unwrap();
    }

    fn sweep_filter() -> CandidateFilter {
        CandidateFilter {
            statuses: vec![OrderStatus::Pending, OrderStatus::OnHold],
            payment_method: "stripe".to_string(),
            created_after: NOW - 7 * 24 * 3_600_000,
            limit: 50,
        }
    }

    #[tokio::test]
    async fn find_candidates_filters_status_method_and_recency() {
        let store = store().await;
        seed(&store, "keep-1", "pending", "stripe", Some("pi_1"), NOW - 1000).await;
        seed(&store, "keep-2", "on-hold", "stripe", None, NOW - 2000).await;
        seed(&store, "done", "completed", "stripe", Some("pi_2"), NOW - 1000).await;
        seed(&store, "paypal", "pending", "paypal", Some("x"), NOW - 1000).await;
        seed(
            &store,
            "stale",
            "pending",
            "stripe",
            Some("pi_3"),
            NOW - 30 * 24 * 3_600_000,
        )
        .await;

        let candidates = store.find_candidates(&sweep_filter()).await.unwrap();

        let ids: Vec<&str> = candidates.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["keep-1", "keep-2"]);
    }

    #[tokio::test]
    async fn find_candidates_orders_most_recent_first_and_caps() {
        let store = store().await;
        for i in 0..10i64 {
            seed(
                &store,
                &format!("o-{i}"),
                "pending",
                "stripe",
                None,
                NOW - i * 1000,
            )
            .await;
        }

        let mut filter = sweep_filter();
        // The clamp on RunConfig keeps real limits >= 5; the store applies
        // whatever prefix it is asked for
        filter.limit = 3;
        let candidates = store.find_candidates(&filter).await.unwrap();

        let ids: Vec<&str> = candidates.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["o-0", "o-1", "o-2"]);
    }

    #[tokio::test]
    async fn find_by_id_round_trips_status_strings() {
        let store = store().await;
        seed(&store, "o-1", "on-hold", "stripe", Some("pi_1"), NOW).await;
        seed(&store, "o-2", "checkout-draft", "stripe", None, NOW).await;

        let order = store.find_by_id(&"o-1".to_string()).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::OnHold);
        assert_eq!(order.provider_reference.as_deref(), Some("pi_1"));

        let other = store.find_by_id(&"o-2".to_string()).await.unwrap().unwrap();
        assert_eq!(other.status, OrderStatus::Other("checkout-draft".to_string()));

        assert!(store.find_by_id(&"nope".to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn complete_payment_marks_paid_and_is_idempotent() {
        let store = store().await;
        seed(&store, "o-1", "pending", "stripe", Some("pi_1"), NOW).await;

        store
            .complete_payment(&"o-1".to_string(), "pi_1")
            .await
            .unwrap();
        let order = store.find_by_id(&"o-1".to_string()).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Completed);

        // Second completion is a no-op, not an error
        store
            .complete_payment(&"o-1".to_string(), "pi_1")
            .await
            .unwrap();
        let paid_at: Option<i64> =
            sqlx::query_scalar("SELECT paid_at FROM orders WHERE id = 'o-1'")
                .fetch_one(&store.pool)
                .await
                .unwrap();
        assert_eq!(paid_at, Some(NOW));
    }

    #[tokio::test]
    async fn complete_payment_on_missing_order_is_not_found() {
        let store = store().await;
        let err = store
            .complete_payment(&"ghost".to_string(), "pi_1")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn add_note_appends_with_timestamp() {
        let store = store().await;
        seed(&store, "o-1", "pending", "stripe", None, NOW).await;

        store
            .add_note(&"o-1".to_string(), "Payment reconciled (automatic sweep).")
            .await
            .unwrap();
        store
            .add_note(&"o-1".to_string(), "Second note")
            .await
            .unwrap();

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM order_notes WHERE order_id = 'o-1'")
                .fetch_one(&store.pool)
                .await
                .unwrap();
        assert_eq!(count, 2);
    }
}
