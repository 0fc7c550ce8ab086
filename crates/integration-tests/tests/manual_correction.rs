//! End-to-end single-order correction tests over a real SQLite store.

use std::sync::Arc;

use paysweep_core::application::ReconcileEngine;
use paysweep_core::domain::{CorrectionError, OrderStatus, TransactionStatus};
use paysweep_core::port::activity_log::mocks::RecordingActivityLog;
use paysweep_core::port::clock::mocks::FixedClock;
use paysweep_core::port::provider_client::mocks::MockProviderClient;
use paysweep_core::port::{OrderStore, ProviderClient};
use paysweep_infra_sqlite::{create_pool, run_migrations, SqliteOrderStore};

const NOW: i64 = 1_700_000_000_000;

async fn setup_store() -> (sqlx::SqlitePool, Arc<SqliteOrderStore>) {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    let store = Arc::new(SqliteOrderStore::new(
        pool.clone(),
        Arc::new(FixedClock(NOW)),
    ));
    (pool, store)
}

async fn seed_order(
    pool: &sqlx::SqlitePool,
    id: &str,
    status: &str,
    method: &str,
    reference: Option<&str>,
) {
    sqlx::query(
        "INSERT INTO orders (id, status, payment_method, provider_reference, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(status)
    .bind(method)
    .bind(reference)
    .bind(NOW - 3_600_000)
    .execute(pool)
    .await
    .unwrap();
}

fn build_engine(store: Arc<SqliteOrderStore>, provider: MockProviderClient) -> ReconcileEngine {
    ReconcileEngine::new(
        store,
        Some(Arc::new(provider)),
        Arc::new(RecordingActivityLog::new()),
        Arc::new(FixedClock(NOW)),
        "stripe",
    )
}

#[tokio::test]
async fn correction_completes_a_paid_order_and_leaves_a_note() {
    let (pool, store) = setup_store().await;
    seed_order(&pool, "ord-1", "pending", "stripe", Some("pi_1")).await;

    let provider = MockProviderClient::new().with_status("pi_1", TransactionStatus::Succeeded);
    let engine = build_engine(store.clone(), provider);

    let message = engine.reconcile_one("ord-1", true).await.unwrap();
    assert!(message.contains("ord-1"));

    let order = store.find_by_id(&"ord-1".to_string()).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Completed);

    let notes: Vec<(String,)> =
        sqlx::query_as("SELECT note FROM order_notes WHERE order_id = ?")
            .bind("ord-1")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].0.contains("manual correction"));
}

#[tokio::test]
async fn correction_is_idempotent() {
    let (pool, store) = setup_store().await;
    seed_order(&pool, "ord-1", "pending", "stripe", Some("pi_1")).await;

    let provider = MockProviderClient::new().with_status("pi_1", TransactionStatus::Succeeded);
    let engine = build_engine(store.clone(), provider);

    engine.reconcile_one("ord-1", true).await.unwrap();
    // Running the correction again must not fail or double-complete.
    engine.reconcile_one("ord-1", true).await.unwrap();

    let order = store.find_by_id(&"ord-1".to_string()).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
}

#[tokio::test]
async fn correction_requires_authorization() {
    let (_pool, store) = setup_store().await;
    let engine = build_engine(store, MockProviderClient::new());

    let err = engine.reconcile_one("ord-1", false).await.unwrap_err();
    assert!(matches!(err, CorrectionError::PermissionDenied));
}

#[tokio::test]
async fn correction_rejects_blank_order_id() {
    let (_pool, store) = setup_store().await;
    let engine = build_engine(store, MockProviderClient::new());

    let err = engine.reconcile_one("   ", true).await.unwrap_err();
    assert!(matches!(err, CorrectionError::BadRequest(_)));
}

#[tokio::test]
async fn correction_reports_unknown_order() {
    let (_pool, store) = setup_store().await;
    let engine = build_engine(store, MockProviderClient::new());

    let err = engine.reconcile_one("ord-missing", true).await.unwrap_err();
    assert!(matches!(err, CorrectionError::NotFound(_)));
}

#[tokio::test]
async fn correction_rejects_other_payment_methods_without_calling_provider() {
    let (pool, store) = setup_store().await;
    seed_order(&pool, "ord-1", "pending", "paypal", Some("tx_1")).await;

    let provider = Arc::new(MockProviderClient::new());
    let engine = ReconcileEngine::new(
        store,
        Some(provider.clone() as Arc<dyn ProviderClient>),
        Arc::new(RecordingActivityLog::new()),
        Arc::new(FixedClock(NOW)),
        "stripe",
    );

    let err = engine.reconcile_one("ord-1", true).await.unwrap_err();
    assert!(matches!(err, CorrectionError::WrongMethod { .. }));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn correction_fails_when_order_has_no_reference() {
    let (pool, store) = setup_store().await;
    seed_order(&pool, "ord-1", "pending", "stripe", None).await;

    let engine = build_engine(store, MockProviderClient::new());

    let err = engine.reconcile_one("ord-1", true).await.unwrap_err();
    assert!(matches!(err, CorrectionError::NoReference));
}

#[tokio::test]
async fn correction_reports_unsettled_transactions() {
    let (pool, store) = setup_store().await;
    seed_order(&pool, "ord-1", "pending", "stripe", Some("pi_1")).await;

    let provider = MockProviderClient::new().with_status("pi_1", TransactionStatus::Processing);
    let engine = build_engine(store.clone(), provider);

    let err = engine.reconcile_one("ord-1", true).await.unwrap_err();
    assert!(matches!(err, CorrectionError::NotSucceeded(_)));

    // The order is untouched.
    let order = store.find_by_id(&"ord-1".to_string()).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn correction_fails_without_a_provider_client() {
    let (pool, store) = setup_store().await;
    seed_order(&pool, "ord-1", "pending", "stripe", Some("pi_1")).await;

    let engine = ReconcileEngine::new(
        store,
        None,
        Arc::new(RecordingActivityLog::new()),
        Arc::new(FixedClock(NOW)),
        "stripe",
    );

    let err = engine.reconcile_one("ord-1", true).await.unwrap_err();
    assert!(matches!(err, CorrectionError::ProviderUnavailable));
}
