//! Database connection management and schema bootstrap

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// PostgreSQL database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Idempotent DDL executed at startup.
///
/// The UNIQUE constraint on (wallet_id, transaction_ref) is load-bearing:
/// it serializes concurrent payment callbacks for the same reference.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users_tb (
        user_id     TEXT PRIMARY KEY,
        username    TEXT NOT NULL UNIQUE,
        api_token   TEXT NOT NULL UNIQUE,
        status      SMALLINT NOT NULL DEFAULT 1,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS organizations_tb (
        id          TEXT PRIMARY KEY,
        creator_id  TEXT NOT NULL REFERENCES users_tb(user_id),
        name        TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS wallets_tb (
        id              TEXT PRIMARY KEY,
        organization_id TEXT NOT NULL,
        currency_code   TEXT NOT NULL,
        balance         NUMERIC NOT NULL DEFAULT 0,
        last_updated    TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (organization_id, currency_code)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS wallet_transactions_tb (
        id               TEXT PRIMARY KEY,
        wallet_id        TEXT NOT NULL REFERENCES wallets_tb(id),
        currency_code    TEXT NOT NULL,
        amount           NUMERIC NOT NULL,
        transaction_date TIMESTAMPTZ NOT NULL DEFAULT now(),
        transaction_ref  TEXT NOT NULL,
        UNIQUE (wallet_id, transaction_ref)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS credit_wallets_tb (
        id              TEXT PRIMARY KEY,
        organization_id TEXT NOT NULL UNIQUE,
        amount          NUMERIC NOT NULL DEFAULT 0,
        last_updated    TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS credit_conversions_tb (
        id                 TEXT PRIMARY KEY,
        credit_wallet_type TEXT NOT NULL,
        currency_code      TEXT NOT NULL UNIQUE,
        rate               NUMERIC NOT NULL
    )"#,
];

/// Create all tables if they do not exist yet.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Initializing wallet schema...");

    for ddl in SCHEMA {
        sqlx::query(ddl).execute(pool).await?;
    }

    tracing::info!("Wallet schema ready ({} tables)", SCHEMA.len());
    Ok(())
}
