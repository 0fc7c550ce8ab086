// Provider Client Port (Interface)
// Abstraction over the payment provider's transaction-status API.

use crate::domain::ProviderTransaction;
use async_trait::async_trait;
use thiserror::Error;

/// Provider query errors. Transient by taxonomy: a failed query leaves the
/// order untouched and never aborts a running sweep.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("HTTP transport error: {0}")]
    Http(String),

    #[error("Provider API error [{code}]: {message}")]
    Api { code: String, message: String },

    #[error("Response decode error: {0}")]
    Decode(String),
}

/// Provider Client trait
///
/// Implementations:
/// - StripeClient: Stripe REST API (infra-stripe)
/// - MockProviderClient: scriptable test double (below)
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Current status of the transaction identified by `reference`.
    /// Fetched fresh on every call; implementations must not cache.
    async fn transaction_status(
        &self,
        reference: &str,
    ) -> Result<ProviderTransaction, ProviderError>;
}

// ============================================================================
// Mock Implementation for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::TransactionStatus;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scriptable provider for tests: maps transaction references to
    /// statuses or errors and counts calls.
    pub struct MockProviderClient {
        responses: Mutex<HashMap<String, Result<TransactionStatus, ProviderError>>>,
        call_count: Mutex<usize>,
    }

    impl MockProviderClient {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(HashMap::new()),
                call_count: Mutex::new(0),
            }
        }

        pub fn with_status(self, reference: impl Into<String>, status: TransactionStatus) -> Self {
            self.responses
                .lock()
                .unwrap()
                .insert(reference.into(), Ok(status));
            self
        }

        pub fn with_error(self, reference: impl Into<String>, error: ProviderError) -> Self {
            self.responses
                .lock()
                .unwrap()
                .insert(reference.into(), Err(error));
            self
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    impl Default for MockProviderClient {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ProviderClient for MockProviderClient {
        async fn transaction_status(
            &self,
            reference: &str,
        ) -> Result<ProviderTransaction, ProviderError> {
            *self.call_count.lock().unwrap() += 1;

            match self.responses.lock().unwrap().get(reference) {
                Some(Ok(status)) => Ok(ProviderTransaction {
                    reference: reference.to_string(),
                    status: status.clone(),
                }),
                Some(Err(e)) => Err(e.clone()),
                None => Err(ProviderError::Api {
                    code: "resource_missing".to_string(),
                    message: format!("No such payment_intent: {reference}"),
                }),
            }
        }
    }
}
