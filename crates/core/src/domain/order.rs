// Order Domain Model

use serde::{Deserialize, Serialize};

/// Order ID (opaque, assigned by the host checkout flow)
pub type OrderId = String;

/// Provider-assigned transaction reference (e.g. a payment intent id)
pub type ProviderReference = String;

/// Order status. The status set is an open set owned by the host
/// application; values this crate does not know about round-trip
/// through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    OnHold,
    Processing,
    Completed,
    Cancelled,
    Refunded,
    Failed,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::OnHold => "on-hold",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Failed => "failed",
            OrderStatus::Other(s) => s,
        }
    }

    /// Statuses the sweep considers still waiting on payment
    pub fn is_awaiting_payment(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::OnHold)
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => OrderStatus::Pending,
            "on-hold" => OrderStatus::OnHold,
            "processing" => OrderStatus::Processing,
            "completed" => OrderStatus::Completed,
            "cancelled" => OrderStatus::Cancelled,
            "refunded" => OrderStatus::Refunded,
            "failed" => OrderStatus::Failed,
            _ => OrderStatus::Other(s),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order Entity
///
/// Created by the host checkout flow (outside this crate); the engine only
/// ever applies the payment-complete transition through the OrderStore port,
/// never creates or deletes orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,

    /// Payment method identifier (e.g. "stripe")
    pub payment_method: String,

    /// Present only once a payment attempt was initiated.
    /// An order without a reference can never be reconciled.
    pub provider_reference: Option<ProviderReference>,

    pub created_at: i64, // epoch ms
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        status: OrderStatus,
        payment_method: impl Into<String>,
        provider_reference: Option<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            status,
            payment_method: payment_method.into(),
            provider_reference,
            created_at,
        }
    }
}
