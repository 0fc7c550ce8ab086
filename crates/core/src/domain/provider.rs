// Provider Transaction Snapshot

use serde::{Deserialize, Serialize};

/// Transaction status as reported by the payment provider. The exact set is
/// the provider's; the engine only ever distinguishes "succeeded" from
/// everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    Succeeded,
    Processing,
    RequiresAction,
    RequiresPaymentMethod,
    Canceled,
    Other(String),
}

impl TransactionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::Succeeded => "succeeded",
            TransactionStatus::Processing => "processing",
            TransactionStatus::RequiresAction => "requires_action",
            TransactionStatus::RequiresPaymentMethod => "requires_payment_method",
            TransactionStatus::Canceled => "canceled",
            TransactionStatus::Other(s) => s,
        }
    }

    /// Single-literal comparison: only the provider's "succeeded" status
    /// counts. No broader terminal-success equivalence is assumed.
    pub fn is_succeeded(&self) -> bool {
        matches!(self, TransactionStatus::Succeeded)
    }
}

impl From<String> for TransactionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "succeeded" => TransactionStatus::Succeeded,
            "processing" => TransactionStatus::Processing,
            "requires_action" => TransactionStatus::RequiresAction,
            "requires_payment_method" => TransactionStatus::RequiresPaymentMethod,
            "canceled" => TransactionStatus::Canceled,
            _ => TransactionStatus::Other(s),
        }
    }
}

impl From<TransactionStatus> for String {
    fn from(status: TransactionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Point-in-time snapshot of a provider transaction. Fetched fresh on every
/// reconciliation attempt; never cached, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTransaction {
    pub reference: String,
    pub status: TransactionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_succeeded_literal_is_succeeded() {
        assert!(TransactionStatus::from("succeeded".to_string()).is_succeeded());
        for raw in ["processing", "requires_action", "canceled", "success", "SUCCEEDED"] {
            assert!(
                !TransactionStatus::from(raw.to_string()).is_succeeded(),
                "{raw} must not count as succeeded"
            );
        }
    }

    #[test]
    fn unknown_status_round_trips() {
        let status = TransactionStatus::from("requires_capture".to_string());
        assert_eq!(status, TransactionStatus::Other("requires_capture".to_string()));
        assert_eq!(status.as_str(), "requires_capture");
    }
}
