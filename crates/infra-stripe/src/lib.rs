// Paysweep Infrastructure - Stripe Adapter
// Implements: ProviderClient

mod client;

pub use client::{StripeClient, DEFAULT_BASE_URL};
