//! Paysweep Daemon - Main Entry Point
//!
//! Composition root: wires the reconciliation engine to its SQLite order
//! store and Stripe provider client, starts the JSON-RPC trigger surface,
//! and runs the periodic sweep loop.

mod telemetry;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use paysweep_api_rpc::{server::RpcServerConfig, RpcServer};
use paysweep_core::application::{shutdown_channel, ReconcileEngine, SweepScheduler};
use paysweep_core::domain::RunConfig;
use paysweep_core::port::{ProviderClient, SystemClock, TracingActivityLog};
use paysweep_infra_sqlite::{create_pool, run_migrations, SqliteOrderStore};
use paysweep_infra_stripe::StripeClient;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DB_PATH: &str = "paysweep.db";
const PAYMENT_METHOD: &str = "stripe";

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging (JSON format for production)
    let log_format = std::env::var("PAYSWEEP_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("paysweep=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Paysweep daemon v{} starting...", VERSION);

    // 1.1. Initialize OpenTelemetry (optional)
    if let Err(e) = telemetry::init_telemetry() {
        tracing::warn!(error = ?e, "Failed to initialize OpenTelemetry (continuing without it)");
    }

    // 2. Load configuration
    let db_path =
        std::env::var("PAYSWEEP_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

    let rpc_port: u16 = std::env::var("PAYSWEEP_RPC_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9643);

    // RunConfig clamps lookback to [1, 30] days and the cap to [5, 100]
    let run_config = RunConfig::new(
        env_u32("PAYSWEEP_LOOKBACK_DAYS", 7),
        env_u32("PAYSWEEP_MAX_ORDERS", 50),
        std::env::var("PAYSWEEP_ACTIVITY_LOG")
            .map(|v| v != "0" && v.to_lowercase() != "false")
            .unwrap_or(true),
    );

    let sweep_interval_minutes = env_u64("PAYSWEEP_SWEEP_INTERVAL_MINUTES", 30);
    let admin_token = std::env::var("PAYSWEEP_ADMIN_TOKEN").ok();

    info!(db_path = %db_path, "Initializing database...");

    // 3. Initialize database
    let pool = create_pool(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Setup dependencies (DI wiring)
    let clock = Arc::new(SystemClock);
    let order_store = Arc::new(SqliteOrderStore::new(pool.clone(), clock.clone()));
    let activity_log = Arc::new(TracingActivityLog);

    // Provider client is an explicit optional dependency: without a secret
    // key the engine runs in the unavailable mode (sweeps abort with a zero
    // summary, manual corrections fail with provider-unavailable)
    let provider: Option<Arc<dyn ProviderClient>> = match std::env::var("PAYSWEEP_STRIPE_SECRET_KEY")
    {
        Ok(secret_key) => {
            let base_url = std::env::var("PAYSWEEP_STRIPE_BASE_URL")
                .unwrap_or_else(|_| paysweep_infra_stripe::DEFAULT_BASE_URL.to_string());
            let client = StripeClient::with_base_url(secret_key, base_url)
                .map_err(|e| anyhow::anyhow!("Stripe client init failed: {}", e))?;
            Some(Arc::new(client))
        }
        Err(_) => {
            tracing::warn!(
                "PAYSWEEP_STRIPE_SECRET_KEY not set; provider client unavailable"
            );
            None
        }
    };

    let engine = Arc::new(ReconcileEngine::new(
        order_store,
        provider,
        activity_log,
        clock,
        PAYMENT_METHOD,
    ));

    // 5. Start JSON-RPC server (manual trigger surface)
    info!("Starting JSON-RPC server...");
    let rpc_config = RpcServerConfig {
        port: rpc_port,
        ..Default::default()
    };
    let rpc_server = RpcServer::new(rpc_config, engine.clone(), run_config.clone(), admin_token);
    let rpc_handle = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    // 6. Start periodic sweep loop
    info!("Starting sweep scheduler...");
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let scheduler = SweepScheduler::new(engine, run_config, sweep_interval_minutes);

    let scheduler_handle = tokio::spawn(async move {
        scheduler.run(shutdown_rx).await;
    });

    info!("Paysweep ready. Waiting for sweeps...");
    info!("Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 8. Graceful shutdown
    shutdown_tx.shutdown();
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), scheduler_handle).await;

    info!("Shutdown complete.");

    Ok(())
}
