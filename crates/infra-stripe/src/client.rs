// Stripe ProviderClient Implementation
// Reads payment intent status over the Stripe REST API.

use async_trait::async_trait;
use paysweep_core::domain::{ProviderTransaction, TransactionStatus};
use paysweep_core::port::{ProviderClient, ProviderError};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.stripe.com";

/// Per-call timeout keeps a full sweep of max_orders bounded in wall-clock
/// time even when Stripe is slow.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Successful payment intent body (only the fields the engine needs)
#[derive(Debug, Deserialize)]
struct PaymentIntentBody {
    id: String,
    status: String,
}

/// Stripe error envelope: `{ "error": { "code": ..., "message": ... } }`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Stripe REST client
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    base_url: String,
}

impl StripeClient {
    pub fn new(secret_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_base_url(secret_key, DEFAULT_BASE_URL)
    }

    /// Base URL override for tests and stripe-mock
    pub fn with_base_url(
        secret_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        Ok(Self {
            http,
            secret_key: secret_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ProviderClient for StripeClient {
    async fn transaction_status(
        &self,
        reference: &str,
    ) -> Result<ProviderTransaction, ProviderError> {
        let url = format!("{}/v1/payment_intents/{}", self.base_url, reference);
        debug!(reference = %reference, "Fetching payment intent status");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let http_status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        if !http_status.is_success() {
            return Err(parse_api_error(http_status.as_u16(), &body));
        }

        let intent: PaymentIntentBody =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(ProviderTransaction {
            reference: intent.id,
            status: TransactionStatus::from(intent.status),
        })
    }
}

fn parse_api_error(http_status: u16, body: &str) -> ProviderError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => ProviderError::Api {
            code: envelope
                .error
                .code
                .unwrap_or_else(|| http_status.to_string()),
            message: envelope
                .error
                .message
                .unwrap_or_else(|| "unknown provider error".to_string()),
        },
        Err(_) => ProviderError::Api {
            code: http_status.to_string(),
            message: format!("unexpected response body ({} bytes)", body.len()),
        },
    }
}
