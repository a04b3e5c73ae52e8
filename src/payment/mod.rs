//! Payment provider integration
//!
//! The gateway talks to a Flutterwave-style REST API for two things:
//! generating hosted payment links and verifying a transaction server-side
//! after the browser lands on the callback. Both sit behind the
//! [`PaymentProvider`] trait so the callback flow can be exercised without
//! the network.

use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod flutterwave;
pub mod types;

#[cfg(feature = "mock-provider")]
pub mod mock;

pub use flutterwave::FlutterwaveClient;
pub use types::{PaymentLinkRequest, VerifiedTransaction};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider rejected request with HTTP status {0}")]
    Rejected(u16),

    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait PaymentProvider: Send + Sync + Debug {
    /// Verify a transaction server-side by its provider-assigned ID
    async fn verify_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<VerifiedTransaction, ProviderError>;

    /// Create a hosted payment link for a funding request
    async fn create_payment_link(
        &self,
        req: &PaymentLinkRequest,
    ) -> Result<String, ProviderError>;
}
