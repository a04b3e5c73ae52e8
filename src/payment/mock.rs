//! In-process payment provider stub
//!
//! [SECURITY WARNING] For development and testing ONLY. It reports whatever
//! verification it was seeded with, without contacting any provider.
//! Production builds MUST be compiled with `--no-default-features`.

use async_trait::async_trait;

use super::types::{PaymentLinkRequest, VerifiedTransaction};
use super::{PaymentProvider, ProviderError};

#[derive(Debug, Default)]
pub struct MockProvider {
    verification: Option<VerifiedTransaction>,
    fail_verification: bool,
}

impl MockProvider {
    /// Provider that fails every verification call
    pub fn unreachable() -> Self {
        Self {
            verification: None,
            fail_verification: true,
        }
    }

    /// Provider that reports the given verification for any transaction ID
    pub fn verifying(verification: VerifiedTransaction) -> Self {
        Self {
            verification: Some(verification),
            fail_verification: false,
        }
    }
}

#[async_trait]
impl PaymentProvider for MockProvider {
    async fn verify_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<VerifiedTransaction, ProviderError> {
        if self.fail_verification {
            return Err(ProviderError::Rejected(503));
        }
        self.verification.clone().ok_or_else(|| {
            ProviderError::Malformed(format!("no verification seeded for {}", transaction_id))
        })
    }

    async fn create_payment_link(
        &self,
        req: &PaymentLinkRequest,
    ) -> Result<String, ProviderError> {
        Ok(format!("http://mock.provider/pay/{}", req.tx_ref))
    }
}
