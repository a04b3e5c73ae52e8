//! Payment callback state machine
//!
//! The provider redirects the funding browser session to
//! `GET /api/v1/credits/callback?status&tx_ref&transaction_id`. Every
//! outcome, success or failure, is reported back to the browser as a
//! redirect with a human-readable message; transient failures embed a
//! retry link that re-enters this endpoint with the original query.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use utoipa::IntoParams;

use super::CreditError;
use super::repository::apply_verified_funding;
use crate::config::PaymentConfig;
use crate::payment::{PaymentProvider, VerifiedTransaction};

/// Query parameters the provider appends to the callback redirect
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct CallbackQuery {
    pub status: String,
    pub tx_ref: String,
    #[serde(default)]
    pub transaction_id: String,
}

/// Identity parsed out of a `{user_id}-{org_id}-{nonce}` reference
#[derive(Debug, PartialEq)]
pub struct TxRefParts {
    pub user_id: String,
    pub organization_id: String,
    pub nonce: String,
}

/// Split a transaction reference into its three parts.
///
/// IDs are dash-free (simple-form UUIDs), so the first two `-` are
/// unambiguous separators; the nonce keeps any remainder.
pub fn parse_tx_ref(tx_ref: &str) -> Option<TxRefParts> {
    let mut parts = tx_ref.splitn(3, '-');
    let user_id = parts.next()?.to_string();
    let organization_id = parts.next()?.to_string();
    let nonce = parts.next()?.to_string();

    if user_id.is_empty() || organization_id.is_empty() || nonce.is_empty() {
        return None;
    }

    Some(TxRefParts {
        user_id,
        organization_id,
        nonce,
    })
}

/// Why a verified transaction must not move funds
#[derive(Debug, PartialEq)]
pub enum GateRejection {
    /// Envelope not successful or reference mismatch - worth retrying
    Unverified,
    /// Provider says the payment itself did not succeed - terminal
    PaymentNotSuccessful,
}

/// Gate a verification result against the callback's own reference
pub fn gate_verification(
    expected_tx_ref: &str,
    verified: &VerifiedTransaction,
) -> Result<(), GateRejection> {
    if !verified.is_success_envelope() || verified.tx_ref != expected_tx_ref {
        return Err(GateRejection::Unverified);
    }
    if !verified.is_payment_successful() {
        return Err(GateRejection::PaymentNotSuccessful);
    }
    Ok(())
}

/// Terminal state of one callback invocation
#[derive(Debug)]
pub enum CallbackOutcome {
    Completed {
        redirect_url: String,
        credits_added: Decimal,
    },
    AlreadyProcessed {
        redirect_url: String,
    },
    /// Terminal failure, no retry offered
    Failed {
        redirect_url: String,
        message: &'static str,
    },
    /// Transient failure, retry link embedded
    Retry {
        redirect_url: String,
        message: &'static str,
    },
}

impl CallbackOutcome {
    /// Compose the browser redirect `Location` for this outcome
    pub fn location(&self, payment: &PaymentConfig, query: &CallbackQuery) -> String {
        match self {
            CallbackOutcome::Completed { redirect_url, .. } => {
                redirect_to(redirect_url, "success", "Credit refilled", None)
            }
            CallbackOutcome::AlreadyProcessed { redirect_url } => {
                redirect_to(redirect_url, "error", "Transaction already processed", None)
            }
            CallbackOutcome::Failed {
                redirect_url,
                message,
            } => redirect_to(redirect_url, "error", message, None),
            CallbackOutcome::Retry {
                redirect_url,
                message,
            } => {
                let retry = retry_link(payment, query);
                redirect_to(redirect_url, "error", message, Some(&retry))
            }
        }
    }
}

/// Rebuild the callback URL carrying the original query, for retries
fn retry_link(payment: &PaymentConfig, query: &CallbackQuery) -> String {
    let mut link = format!(
        "{}?status={}&tx_ref={}",
        payment.callback_url(),
        query.status,
        query.tx_ref
    );
    if !query.transaction_id.is_empty() {
        link.push_str("&transaction_id=");
        link.push_str(&query.transaction_id);
    }
    link
}

/// Minimal query-component escaping for the redirect target
fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '&' => out.push_str("%26"),
            '=' => out.push_str("%3D"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            _ => out.push(c),
        }
    }
    out
}

fn redirect_to(base: &str, status: &str, message: &str, link: Option<&str>) -> String {
    let mut url = format!(
        "{}?status={}&message={}",
        base,
        status,
        encode_component(message)
    );
    if let Some(link) = link {
        url.push_str("&link=");
        url.push_str(&encode_component(link));
    }
    url
}

/// Run the full callback state machine for one invocation.
///
/// No wallet or credit row is touched unless the provider's server-side
/// verification succeeds, the references match, and the payment itself is
/// reported successful. The funds application is atomic; see
/// [`apply_verified_funding`].
pub async fn process_callback(
    pool: &PgPool,
    provider: &dyn PaymentProvider,
    payment: &PaymentConfig,
    query: &CallbackQuery,
) -> CallbackOutcome {
    let fallback = payment.frontend_url.clone();

    if query.status != "successful" {
        return CallbackOutcome::Failed {
            redirect_url: fallback,
            message: "Payment was not successful",
        };
    }

    let verified = match provider.verify_transaction(&query.transaction_id).await {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(tx_ref = %query.tx_ref, "verification call failed: {}", e);
            return CallbackOutcome::Retry {
                redirect_url: fallback,
                message: "An error occurred. Please try again",
            };
        }
    };

    // The funding request carried the landing page through provider metadata
    let redirect_url = verified.redirect_url.clone().unwrap_or(fallback);

    if let Err(rejection) = gate_verification(&query.tx_ref, &verified) {
        return match rejection {
            GateRejection::Unverified => CallbackOutcome::Retry {
                redirect_url,
                message: "An error occurred. Please try again",
            },
            GateRejection::PaymentNotSuccessful => CallbackOutcome::Failed {
                redirect_url,
                message: "Transaction not found",
            },
        };
    }

    let Some(parts) = parse_tx_ref(&query.tx_ref) else {
        tracing::warn!(tx_ref = %query.tx_ref, "malformed transaction reference");
        return CallbackOutcome::Failed {
            redirect_url,
            message: "An error occurred. Please try again",
        };
    };

    match apply_verified_funding(
        pool,
        &parts.organization_id,
        &verified.currency,
        verified.amount,
        &verified.tx_ref,
    )
    .await
    {
        Ok(applied) => {
            tracing::info!(
                organization_id = %parts.organization_id,
                tx_ref = %verified.tx_ref,
                credits = %applied.credits_added,
                "credit refill applied"
            );
            CallbackOutcome::Completed {
                redirect_url,
                credits_added: applied.credits_added,
            }
        }
        Err(CreditError::AlreadyProcessed) => CallbackOutcome::AlreadyProcessed { redirect_url },
        Err(e) => {
            tracing::error!(tx_ref = %verified.tx_ref, "credit refill failed: {}", e);
            CallbackOutcome::Retry {
                redirect_url,
                message: "An error occurred while refilling your credit. Please try again",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn verified(tx_ref: &str) -> VerifiedTransaction {
        VerifiedTransaction {
            status: "success".to_string(),
            tx_ref: tx_ref.to_string(),
            tx_status: "successful".to_string(),
            amount: dec!(5),
            currency: "EUR".to_string(),
            redirect_url: Some("http://localhost:3000/billing".to_string()),
        }
    }

    fn payment_config() -> PaymentConfig {
        PaymentConfig {
            provider: "mock".to_string(),
            base_url: "http://localhost:9999".to_string(),
            secret_key: "sk".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            api_url: "http://localhost:8080".to_string(),
        }
    }

    #[test]
    fn test_parse_tx_ref() {
        let parts = parse_tx_ref("user1-org1-1700000000000").unwrap();
        assert_eq!(parts.user_id, "user1");
        assert_eq!(parts.organization_id, "org1");
        assert_eq!(parts.nonce, "1700000000000");
    }

    #[test]
    fn test_parse_tx_ref_nonce_keeps_remainder() {
        let parts = parse_tx_ref("u-o-1700-12.5").unwrap();
        assert_eq!(parts.nonce, "1700-12.5");
    }

    #[test]
    fn test_parse_tx_ref_rejects_malformed() {
        assert!(parse_tx_ref("").is_none());
        assert!(parse_tx_ref("user1-org1").is_none());
        assert!(parse_tx_ref("user1--1700").is_none());
        assert!(parse_tx_ref("-org1-1700").is_none());
    }

    #[test]
    fn test_gate_accepts_matching_verification() {
        let v = verified("u-o-1");
        assert_eq!(gate_verification("u-o-1", &v), Ok(()));
    }

    #[test]
    fn test_gate_rejects_tx_ref_mismatch() {
        // Mismatched tx_ref must never move funds
        let v = verified("u-o-OTHER");
        assert_eq!(
            gate_verification("u-o-1", &v),
            Err(GateRejection::Unverified)
        );
    }

    #[test]
    fn test_gate_rejects_failed_envelope() {
        let mut v = verified("u-o-1");
        v.status = "error".to_string();
        assert_eq!(
            gate_verification("u-o-1", &v),
            Err(GateRejection::Unverified)
        );
    }

    #[test]
    fn test_gate_rejects_unsuccessful_payment() {
        let mut v = verified("u-o-1");
        v.tx_status = "failed".to_string();
        assert_eq!(
            gate_verification("u-o-1", &v),
            Err(GateRejection::PaymentNotSuccessful)
        );
    }

    #[test]
    fn test_completed_location() {
        let query = CallbackQuery {
            status: "successful".to_string(),
            tx_ref: "u-o-1".to_string(),
            transaction_id: "123".to_string(),
        };
        let outcome = CallbackOutcome::Completed {
            redirect_url: "http://localhost:3000/billing".to_string(),
            credits_added: dec!(50),
        };

        assert_eq!(
            outcome.location(&payment_config(), &query),
            "http://localhost:3000/billing?status=success&message=Credit%20refilled"
        );
    }

    #[test]
    fn test_retry_location_embeds_callback_link() {
        let query = CallbackQuery {
            status: "successful".to_string(),
            tx_ref: "u-o-1".to_string(),
            transaction_id: "123".to_string(),
        };
        let outcome = CallbackOutcome::Retry {
            redirect_url: "http://localhost:3000".to_string(),
            message: "An error occurred. Please try again",
        };

        let location = outcome.location(&payment_config(), &query);
        assert!(location.starts_with(
            "http://localhost:3000?status=error&message=An%20error%20occurred."
        ));
        // Retry link query chars are escaped inside the link parameter
        assert!(location.contains(
            "&link=http://localhost:8080/api/v1/credits/callback%3Fstatus%3Dsuccessful%26tx_ref%3Du-o-1%26transaction_id%3D123"
        ));
    }

    #[test]
    fn test_retry_link_omits_empty_transaction_id() {
        let query = CallbackQuery {
            status: "successful".to_string(),
            tx_ref: "u-o-1".to_string(),
            transaction_id: String::new(),
        };
        let link = retry_link(&payment_config(), &query);
        assert_eq!(
            link,
            "http://localhost:8080/api/v1/credits/callback?status=successful&tx_ref=u-o-1"
        );
    }
}
