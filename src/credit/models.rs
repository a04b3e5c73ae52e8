//! Credit data models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Currency-less credit balance, one per organization.
///
/// Only increases, and only through verified, rate-converted top-ups.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct CreditWallet {
    pub id: String,
    pub organization_id: String,
    #[schema(value_type = String, example = "50")]
    pub amount: Decimal,
    pub last_updated: DateTime<Utc>,
}

/// Credits granted per unit of a currency, one row per currency
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct CreditWalletConversion {
    pub id: String,
    pub credit_wallet_type: String,
    pub currency_code: String,
    #[schema(value_type = String, example = "10")]
    pub rate: Decimal,
}
