//! Provider-facing data types

use rust_decimal::Decimal;

/// Result of a server-side transaction verification.
///
/// `status` is the response envelope status ("success"); `tx_status` is the
/// provider-reported state of the payment itself ("successful"). The
/// callback flow requires both, plus a matching `tx_ref`, before any funds
/// move.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedTransaction {
    pub status: String,
    pub tx_ref: String,
    pub tx_status: String,
    pub amount: Decimal,
    pub currency: String,
    /// Front-end redirect target the funding request carried through the
    /// provider's metadata
    pub redirect_url: Option<String>,
}

impl VerifiedTransaction {
    pub fn is_success_envelope(&self) -> bool {
        self.status == "success"
    }

    pub fn is_payment_successful(&self) -> bool {
        self.tx_status == "successful"
    }
}

/// Inputs for a hosted payment link
#[derive(Debug, Clone)]
pub struct PaymentLinkRequest {
    pub tx_ref: String,
    pub amount: Decimal,
    pub currency: String,
    /// This service's callback endpoint, hit by the provider redirect
    pub callback_url: String,
    /// Front-end URL to land on after the callback completes, carried in
    /// provider metadata
    pub redirect_url: String,
    /// Purchasing user, forwarded as the provider customer record
    pub customer: String,
}
