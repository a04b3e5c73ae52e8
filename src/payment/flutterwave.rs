//! Flutterwave REST client
//!
//! Endpoints used:
//! - `GET {base}/transactions/{id}/verify`
//! - `POST {base}/payments`

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use super::types::{PaymentLinkRequest, VerifiedTransaction};
use super::{PaymentProvider, ProviderError};

#[derive(Debug)]
pub struct FlutterwaveClient {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl FlutterwaveClient {
    pub fn new(base_url: &str, secret_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        }
    }
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct VerifyEnvelope {
    status: String,
    data: VerifyData,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    tx_ref: String,
    status: String,
    amount: Decimal,
    currency: String,
    #[serde(default)]
    meta: Option<VerifyMeta>,
}

#[derive(Debug, Deserialize)]
struct VerifyMeta {
    #[serde(default)]
    redirect_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaymentEnvelope {
    status: String,
    data: PaymentData,
}

#[derive(Debug, Deserialize)]
struct PaymentData {
    link: String,
}

impl From<VerifyEnvelope> for VerifiedTransaction {
    fn from(env: VerifyEnvelope) -> Self {
        VerifiedTransaction {
            status: env.status,
            tx_ref: env.data.tx_ref,
            tx_status: env.data.status,
            amount: env.data.amount,
            currency: env.data.currency,
            redirect_url: env.data.meta.and_then(|m| m.redirect_url),
        }
    }
}

#[async_trait]
impl PaymentProvider for FlutterwaveClient {
    async fn verify_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<VerifiedTransaction, ProviderError> {
        let url = format!("{}/transactions/{}/verify", self.base_url, transaction_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Rejected(response.status().as_u16()));
        }

        let envelope: VerifyEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(envelope.into())
    }

    async fn create_payment_link(
        &self,
        req: &PaymentLinkRequest,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/payments", self.base_url);

        let body = json!({
            "tx_ref": req.tx_ref,
            "amount": req.amount.to_string(),
            "currency": req.currency,
            "redirect_url": req.callback_url,
            "meta": { "redirect_url": req.redirect_url },
            "customer": { "email": req.customer },
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Rejected(response.status().as_u16()));
        }

        let envelope: PaymentEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        if envelope.status != "success" {
            return Err(ProviderError::Malformed(format!(
                "payment link request returned status '{}'",
                envelope.status
            )));
        }

        Ok(envelope.data.link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_verify_response() {
        let body = r#"{
            "status": "success",
            "message": "Transaction fetched successfully",
            "data": {
                "id": 288200108,
                "tx_ref": "u1-org1-1700000000000",
                "status": "successful",
                "amount": 5,
                "currency": "EUR",
                "meta": { "redirect_url": "http://localhost:3000/billing" }
            }
        }"#;

        let envelope: VerifyEnvelope = serde_json::from_str(body).unwrap();
        let verified: VerifiedTransaction = envelope.into();

        assert!(verified.is_success_envelope());
        assert!(verified.is_payment_successful());
        assert_eq!(verified.tx_ref, "u1-org1-1700000000000");
        assert_eq!(verified.amount, dec!(5));
        assert_eq!(verified.currency, "EUR");
        assert_eq!(
            verified.redirect_url.as_deref(),
            Some("http://localhost:3000/billing")
        );
    }

    #[test]
    fn test_parse_verify_response_without_meta() {
        let body = r#"{
            "status": "success",
            "data": {
                "tx_ref": "u1-org1-1",
                "status": "failed",
                "amount": "10.50",
                "currency": "USD"
            }
        }"#;

        let envelope: VerifyEnvelope = serde_json::from_str(body).unwrap();
        let verified: VerifiedTransaction = envelope.into();

        assert!(!verified.is_payment_successful());
        assert_eq!(verified.amount, dec!(10.50));
        assert!(verified.redirect_url.is_none());
    }

    #[test]
    fn test_parse_payment_link_response() {
        let body = r#"{
            "status": "success",
            "message": "Hosted Link",
            "data": { "link": "https://checkout.flutterwave.com/v3/hosted/pay/abc123" }
        }"#;

        let envelope: PaymentEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.status, "success");
        assert_eq!(
            envelope.data.link,
            "https://checkout.flutterwave.com/v3/hosted/pay/abc123"
        );
    }
}
