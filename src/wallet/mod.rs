//! Currency wallets and the append-only transaction ledger

pub mod handlers;
pub mod models;
pub mod repository;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Organization does not exist")]
    OrganizationNotFound,

    #[error("Organization does not have a {0} wallet")]
    WalletNotFound(String),

    #[error("Organization already has a {0} wallet")]
    WalletExists(String),

    #[error("Transaction reference already processed")]
    DuplicateTransaction,
}

pub use models::{Wallet, WalletTransaction};
pub use repository::WalletRepository;
