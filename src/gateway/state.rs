use std::sync::Arc;

use crate::config::PaymentConfig;
use crate::db::Database;
use crate::payment::PaymentProvider;

/// Shared gateway state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL database
    pub db: Arc<Database>,
    /// Payment provider client (verify + payment links)
    pub provider: Arc<dyn PaymentProvider>,
    /// Provider settings, including the callback and front-end URLs
    pub payment: PaymentConfig,
}

impl AppState {
    pub fn new(db: Arc<Database>, provider: Arc<dyn PaymentProvider>, payment: PaymentConfig) -> Self {
        Self {
            db,
            provider,
            payment,
        }
    }
}
