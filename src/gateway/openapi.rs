//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

// Import handler types for schema registration
use crate::credit::handlers::{FundRequest, PaymentLink, RateCreate};
use crate::credit::models::{CreditWallet, CreditWalletConversion};
use crate::gateway::handlers::HealthResponse;
use crate::wallet::handlers::WalletCreate;
use crate::wallet::models::{Wallet, WalletTransaction};

/// Bearer API-token security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "Authorization",
                    "API token auth: Bearer {api_token}",
                ))),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wallet Gateway API",
        version = "1.0.0",
        description = "Per-organization currency wallets and credit balances funded through an external payment provider.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        // Public endpoints
        crate::gateway::handlers::health_check,
        crate::credit::handlers::payment_callback,
        // Wallet endpoints
        crate::wallet::handlers::create_wallet,
        crate::wallet::handlers::get_organization_wallets,
        crate::wallet::handlers::get_organization_wallet,
        // Credit endpoints
        crate::credit::handlers::add_rate,
        crate::credit::handlers::get_rates,
        crate::credit::handlers::get_rate,
        crate::credit::handlers::get_credit,
        crate::credit::handlers::fund_credit,
    ),
    components(
        schemas(
            HealthResponse,
            Wallet,
            WalletTransaction,
            WalletCreate,
            CreditWallet,
            CreditWalletConversion,
            RateCreate,
            FundRequest,
            PaymentLink,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "System", description = "Health and service status"),
        (name = "Wallet", description = "Organization currency wallets"),
        (name = "Credit", description = "Credit balances, conversion rates, and funding")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_doc_builds() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().unwrap();
        assert!(json.contains("/api/v1/wallets"));
        assert!(json.contains("/api/v1/credits/callback"));
        assert!(json.contains("bearer_auth"));
    }
}
