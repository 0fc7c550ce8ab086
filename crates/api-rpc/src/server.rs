//! JSON-RPC Server
//!
//! Implements the JSON-RPC 2.0 server over localhost TCP.

use crate::handler::RpcHandler;
use crate::types::{ReconcileOrderRequest, RunSweepRequest};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use paysweep_core::application::ReconcileEngine;
use paysweep_core::domain::RunConfig;
use std::sync::Arc;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9643;

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        engine: Arc<ReconcileEngine>,
        run_config: RunConfig,
        admin_token: Option<String>,
    ) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(engine, run_config, admin_token)),
        }
    }

    /// Start the JSON-RPC server
    ///
    /// Security: Only binds to 127.0.0.1 by default (no external access)
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server on TCP (localhost only)"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let mut module = RpcModule::new(());

        // Register methods
        let handler = self.handler.clone();
        module
            .register_async_method("sweep.run.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    // Empty params object allowed
                    let req: RunSweepRequest = params.parse().unwrap_or(RunSweepRequest {});
                    handler.run_sweep(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("order.reconcile.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: ReconcileOrderRequest = params.parse()?;
                    handler.reconcile_order(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        info!("JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok(handle)
    }
}
