//! Wallet Gateway - Organization Wallets & Credit Balances
//!
//! HTTP service for per-organization currency wallets and a derived,
//! currency-less credit balance, funded through an external payment
//! provider.
//!
//! # Modules
//!
//! - [`config`] - YAML application configuration
//! - [`logging`] - tracing / rolling file log setup
//! - [`db`] - PostgreSQL pool and schema bootstrap
//! - [`auth`] - bearer-token middleware and user lookup
//! - [`organization`] - organization ownership checks
//! - [`wallet`] - currency wallets and the transaction ledger
//! - [`credit`] - credit balances, conversion rates, payment callback
//! - [`payment`] - payment provider client (verify + payment links)
//! - [`gateway`] - axum router, shared state, API envelope
//! - [`pagination`] - limit/offset page parameters and `Page<T>`

pub mod auth;
pub mod config;
pub mod credit;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod organization;
pub mod pagination;
pub mod payment;
pub mod wallet;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use db::Database;
pub use gateway::state::AppState;
pub use gateway::types::{ApiError, ApiResponse, ApiResult};
