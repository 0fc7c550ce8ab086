//! RPC Method Handlers
//!
//! Implements the business logic for each JSON-RPC method.

use crate::error::{correction_to_rpc_error, to_rpc_error};
use crate::types::{
    ReconcileOrderRequest, ReconcileOrderResponse, RunSweepRequest, RunSweepResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use paysweep_core::application::ReconcileEngine;
use paysweep_core::domain::RunConfig;
use std::sync::Arc;
use tracing::info;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    engine: Arc<ReconcileEngine>,
    run_config: RunConfig,
    /// When set, `order.reconcile.v1` requires a matching token. When unset
    /// the localhost-only surface is considered authorized.
    admin_token: Option<String>,
}

impl RpcHandler {
    pub fn new(
        engine: Arc<ReconcileEngine>,
        run_config: RunConfig,
        admin_token: Option<String>,
    ) -> Self {
        Self {
            engine,
            run_config,
            admin_token,
        }
    }

    fn is_authorized(&self, presented: Option<&str>) -> bool {
        match &self.admin_token {
            Some(expected) => presented == Some(expected.as_str()),
            None => true,
        }
    }

    /// sweep.run.v1
    pub async fn run_sweep(
        &self,
        _params: RunSweepRequest,
    ) -> Result<RunSweepResponse, ErrorObjectOwned> {
        info!("Manual sweep requested via RPC");

        let summary = self
            .engine
            .run_sweep(&self.run_config)
            .await
            .map_err(to_rpc_error)?;

        Ok(RunSweepResponse {
            checked: summary.checked,
            reconciled: summary.reconciled,
        })
    }

    /// order.reconcile.v1
    pub async fn reconcile_order(
        &self,
        params: ReconcileOrderRequest,
    ) -> Result<ReconcileOrderResponse, ErrorObjectOwned> {
        let authorized = self.is_authorized(params.admin_token.as_deref());

        let message = self
            .engine
            .reconcile_one(&params.order_id, authorized)
            .await
            .map_err(correction_to_rpc_error)?;

        Ok(ReconcileOrderResponse {
            order_id: params.order_id,
            message,
        })
    }
}
