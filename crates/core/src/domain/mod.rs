// Domain Layer - Pure business logic and entities

pub mod config;
pub mod error;
pub mod order;
pub mod outcome;
pub mod provider;

// Re-exports
pub use config::RunConfig;
pub use error::CorrectionError;
pub use order::{Order, OrderId, OrderStatus, ProviderReference};
pub use outcome::{ReconcileOutcome, SweepSummary};
pub use provider::{ProviderTransaction, TransactionStatus};
