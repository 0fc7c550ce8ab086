// Port Layer - Interfaces for external collaborators

pub mod activity_log;
pub mod clock;
pub mod order_store;
pub mod provider_client;

// Re-exports
pub use activity_log::{ActivityLog, NullActivityLog, TracingActivityLog};
pub use clock::{Clock, SystemClock};
pub use order_store::{CandidateFilter, OrderStore};
pub use provider_client::{ProviderClient, ProviderError};
