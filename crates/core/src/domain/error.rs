// Domain Error Types

use thiserror::Error;

/// Failure taxonomy for the manual single-order correction path. Each
/// precondition is a distinct failure, checked in order; the tail variants
/// carry the per-order outcome a correction can end in short of success.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorrectionError {
    #[error("Not authorized to run a manual payment correction")]
    PermissionDenied,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Order was not paid via {expected} (payment method is \"{actual}\")")]
    WrongMethod { expected: String, actual: String },

    #[error("Provider client unavailable")]
    ProviderUnavailable,

    #[error("Order has no provider transaction reference")]
    NoReference,

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Payment not yet succeeded (provider status: \"{0}\")")]
    NotSucceeded(String),

    #[error("Order store error: {0}")]
    Store(String),
}
