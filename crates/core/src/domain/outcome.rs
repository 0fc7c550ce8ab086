// Reconciliation Outcomes

use serde::{Deserialize, Serialize};

/// Result of attempting to reconcile one order. Produced transiently per
/// attempt, written to the activity log, and aggregated into a run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Provider reported "succeeded"; local status corrected to completed
    Reconciled,
    /// Order carries no provider transaction reference (a skip, not an error)
    SkippedNoReference,
    /// Provider query or completion write failed; order left untouched
    ProviderError(String),
    /// Provider reported a non-succeeded status; order left untouched
    NotYetSucceeded(String),
}

impl ReconcileOutcome {
    pub fn is_reconciled(&self) -> bool {
        matches!(self, ReconcileOutcome::Reconciled)
    }

    /// Human-readable detail for the activity log
    pub fn detail(&self) -> String {
        match self {
            ReconcileOutcome::Reconciled => "payment confirmed, order marked paid".to_string(),
            ReconcileOutcome::SkippedNoReference => {
                "skipped, no provider transaction reference".to_string()
            }
            ReconcileOutcome::ProviderError(e) => format!("provider error: {e}"),
            ReconcileOutcome::NotYetSucceeded(status) => {
                format!("not reconciled, provider status is \"{status}\"")
            }
        }
    }
}

/// Totals for one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub checked: u32,
    pub reconciled: u32,
}
