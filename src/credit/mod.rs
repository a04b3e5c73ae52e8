//! Credit balances, conversion rates, and the payment callback flow

pub mod callback;
pub mod handlers;
pub mod models;
pub mod repository;

use thiserror::Error;

use crate::wallet::WalletError;

#[derive(Debug, Error)]
pub enum CreditError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Organization does not exist")]
    OrganizationNotFound,

    #[error("Organization does not have a wallet")]
    WalletNotFound,

    #[error("Currency {0} does not have a conversion rate")]
    RateNotFound(String),

    #[error("Currency {0} already has a conversion rate")]
    DuplicateRate(String),

    #[error("Transaction already processed (idempotency guard)")]
    AlreadyProcessed,

    #[error("Amount must be a positive number")]
    InvalidAmount,
}

impl From<WalletError> for CreditError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::Database(e) => CreditError::Database(e),
            WalletError::DuplicateTransaction => CreditError::AlreadyProcessed,
            WalletError::OrganizationNotFound => CreditError::OrganizationNotFound,
            WalletError::WalletNotFound(_) | WalletError::WalletExists(_) => {
                CreditError::WalletNotFound
            }
        }
    }
}

pub use models::{CreditWallet, CreditWalletConversion};
pub use repository::{ConversionRepository, CreditRepository};
