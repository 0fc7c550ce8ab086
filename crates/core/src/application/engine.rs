//! Reconciliation Engine - corrects local order status against the payment
//! provider's authoritative state when an asynchronous notification was
//! missed.
//!
//! One core operation (the per-order transition in [`reconcile_order`])
//! backs both trigger paths:
//! - `run_sweep`: periodic/on-demand corrective pass over a bounded
//!   candidate set
//! - `reconcile_one`: manual correction of a single order
//!
//! [`reconcile_order`]: ReconcileEngine::reconcile_order

use crate::domain::{
    CorrectionError, Order, OrderId, OrderStatus, ReconcileOutcome, RunConfig, SweepSummary,
};
use crate::error::Result;
use crate::port::{ActivityLog, CandidateFilter, Clock, OrderStore, ProviderClient};
use std::sync::Arc;
use tracing::{info, warn};

/// Which path invoked a reconciliation, recorded in the order's audit note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Sweep,
    Manual,
}

impl Trigger {
    fn as_str(&self) -> &'static str {
        match self {
            Trigger::Sweep => "automatic sweep",
            Trigger::Manual => "manual correction",
        }
    }
}

/// Reconciliation engine. Constructed once at startup and shared behind Arc;
/// the provider client is an explicit optional dependency, its absence
/// surfaces through the unavailable paths rather than being probed at call
/// time.
pub struct ReconcileEngine {
    order_store: Arc<dyn OrderStore>,
    provider: Option<Arc<dyn ProviderClient>>,
    activity_log: Arc<dyn ActivityLog>,
    clock: Arc<dyn Clock>,
    payment_method: String,
}

impl ReconcileEngine {
    pub fn new(
        order_store: Arc<dyn OrderStore>,
        provider: Option<Arc<dyn ProviderClient>>,
        activity_log: Arc<dyn ActivityLog>,
        clock: Arc<dyn Clock>,
        payment_method: impl Into<String>,
    ) -> Self {
        Self {
            order_store,
            provider,
            activity_log,
            clock,
            payment_method: payment_method.into(),
        }
    }

    /// The payment method identifier this engine reconciles (e.g. "stripe")
    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    /// Attempt to bring one order's local status in line with the provider's
    /// authoritative state. A 4-state decision:
    ///
    /// 1. No provider reference: skipped, no network call.
    /// 2. Provider query fails: provider-error, order untouched.
    /// 3. Status is not "succeeded": not-yet-succeeded, order untouched.
    /// 4. Status is "succeeded": complete the payment (idempotent on the
    ///    store side) and append an audit note naming the trigger path.
    pub async fn reconcile_order(&self, order: &Order, trigger: Trigger) -> ReconcileOutcome {
        let Some(reference) = order.provider_reference.as_deref() else {
            return ReconcileOutcome::SkippedNoReference;
        };

        // Both callers gate on availability before reaching here
        let Some(provider) = &self.provider else {
            return ReconcileOutcome::ProviderError("provider client not configured".to_string());
        };

        let transaction = match provider.transaction_status(reference).await {
            Ok(tx) => tx,
            Err(e) => {
                warn!(order_id = %order.id, reference = %reference, error = %e, "Provider query failed");
                return ReconcileOutcome::ProviderError(e.to_string());
            }
        };

        if !transaction.status.is_succeeded() {
            return ReconcileOutcome::NotYetSucceeded(transaction.status.to_string());
        }

        if let Err(e) = self.order_store.complete_payment(&order.id, reference).await {
            warn!(order_id = %order.id, error = %e, "Payment completion write failed");
            return ReconcileOutcome::ProviderError(format!("completion failed: {e}"));
        }

        let note = format!(
            "Payment reconciled against provider transaction {reference} ({}).",
            trigger.as_str()
        );
        if let Err(e) = self.order_store.add_note(&order.id, &note).await {
            // Status transition already persisted; keep the Reconciled outcome
            warn!(order_id = %order.id, error = %e, "Failed to append audit note");
        }

        info!(order_id = %order.id, reference = %reference, "Order reconciled");
        ReconcileOutcome::Reconciled
    }

    /// One corrective pass over the candidate set: select once, reconcile
    /// each candidate sequentially, no early termination. A per-order
    /// provider failure never aborts the batch. With the provider client
    /// unavailable the run aborts immediately with a zero summary, logged
    /// once.
    pub async fn run_sweep(&self, config: &RunConfig) -> Result<SweepSummary> {
        if self.provider.is_none() {
            warn!("Provider client unavailable; sweep aborted");
            self.log(
                config,
                "Reconciliation sweep aborted: provider client unavailable.",
            );
            return Ok(SweepSummary::default());
        }

        let now = self.clock.now_millis();
        let filter = CandidateFilter {
            statuses: vec![OrderStatus::Pending, OrderStatus::OnHold],
            payment_method: self.payment_method.clone(),
            created_after: config.lookback_cutoff(now),
            limit: config.max_orders(),
        };

        let candidates = self.order_store.find_candidates(&filter).await?;

        let mut summary = SweepSummary::default();
        for order in &candidates {
            let outcome = self.reconcile_order(order, Trigger::Sweep).await;
            summary.checked += 1;
            if outcome.is_reconciled() {
                summary.reconciled += 1;
            }
            self.log(config, &format!("Order {}: {}", order.id, outcome.detail()));
        }

        info!(
            checked = summary.checked,
            reconciled = summary.reconciled,
            "Reconciliation sweep finished"
        );
        self.log(
            config,
            &format!(
                "Reconciliation sweep finished: {} checked, {} reconciled.",
                summary.checked, summary.reconciled
            ),
        );
        Ok(summary)
    }

    /// Manual single-order correction. Preconditions checked in order, each
    /// a distinct failure; the payment-method check happens before any
    /// network call. Success iff the underlying outcome is Reconciled.
    pub async fn reconcile_one(
        &self,
        order_id: &str,
        authorized: bool,
    ) -> std::result::Result<String, CorrectionError> {
        if !authorized {
            return Err(CorrectionError::PermissionDenied);
        }

        let order_id = order_id.trim();
        if order_id.is_empty() {
            return Err(CorrectionError::BadRequest("missing order id".to_string()));
        }

        let id: OrderId = order_id.to_string();
        let order = self
            .order_store
            .find_by_id(&id)
            .await
            .map_err(|e| CorrectionError::Store(e.to_string()))?
            .ok_or_else(|| CorrectionError::NotFound(id.clone()))?;

        if order.payment_method != self.payment_method {
            return Err(CorrectionError::WrongMethod {
                expected: self.payment_method.clone(),
                actual: order.payment_method.clone(),
            });
        }

        if self.provider.is_none() {
            return Err(CorrectionError::ProviderUnavailable);
        }

        match self.reconcile_order(&order, Trigger::Manual).await {
            ReconcileOutcome::Reconciled => Ok(format!(
                "Order {} reconciled: payment confirmed by provider.",
                order.id
            )),
            ReconcileOutcome::SkippedNoReference => Err(CorrectionError::NoReference),
            ReconcileOutcome::ProviderError(detail) => Err(CorrectionError::Provider(detail)),
            ReconcileOutcome::NotYetSucceeded(status) => Err(CorrectionError::NotSucceeded(status)),
        }
    }

    fn log(&self, config: &RunConfig, message: &str) {
        if config.activity_log_enabled() {
            self.activity_log.record(message);
        }
    }
}
