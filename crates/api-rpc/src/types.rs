//! RPC Request/Response Types

use serde::{Deserialize, Serialize};

/// sweep.run.v1 - Run a reconciliation sweep now
#[derive(Debug, Deserialize)]
pub struct RunSweepRequest {
    // No parameters; the sweep uses the daemon's run configuration
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSweepResponse {
    pub checked: u32,
    pub reconciled: u32,
}

/// order.reconcile.v1 - Manually reconcile one order
#[derive(Debug, Deserialize)]
pub struct ReconcileOrderRequest {
    pub order_id: String,
    /// Compared against the daemon's configured admin token; the result is
    /// what the engine sees as `authorized`
    #[serde(default)]
    pub admin_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconcileOrderResponse {
    pub order_id: String,
    pub message: String,
}
