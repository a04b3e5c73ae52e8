//! Wallet data models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Currency-denominated balance, one per (organization, currency).
///
/// `balance` is only ever mutated together with an inserted
/// [`WalletTransaction`] row, so it always equals the sum of the wallet's
/// transaction amounts.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Wallet {
    pub id: String,
    pub organization_id: String,
    pub currency_code: String,
    #[schema(value_type = String, example = "125.50")]
    pub balance: Decimal,
    pub last_updated: DateTime<Utc>,
}

/// Immutable ledger entry. Negative amounts are debits.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct WalletTransaction {
    pub id: String,
    pub wallet_id: String,
    pub currency_code: String,
    #[schema(value_type = String, example = "5.00")]
    pub amount: Decimal,
    pub transaction_date: DateTime<Utc>,
    pub transaction_ref: String,
}
