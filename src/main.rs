//! Wallet Gateway entry point
//!
//! Loads config, connects to PostgreSQL, bootstraps the schema, wires the
//! payment provider, and serves the API.

use std::sync::Arc;

use anyhow::Context;

use wallet_gateway::db::init_schema;
use wallet_gateway::gateway::run_server;
use wallet_gateway::gateway::state::AppState;
use wallet_gateway::logging::init_logging;
use wallet_gateway::payment::{FlutterwaveClient, PaymentProvider};
use wallet_gateway::{AppConfig, Database};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--env" && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

fn build_provider(config: &AppConfig) -> Arc<dyn PaymentProvider> {
    #[cfg(feature = "mock-provider")]
    if config.payment.provider == "mock" {
        println!("⚠️  Mock payment provider active (no real money moves)");
        return Arc::new(wallet_gateway::payment::mock::MockProvider::default());
    }

    Arc::new(FlutterwaveClient::new(
        &config.payment.base_url,
        &config.payment.secret_key,
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);

    // Keep the guard alive so buffered log lines flush on exit
    let _log_guard = init_logging(&config);

    println!("🏦 Wallet Gateway starting (env: {})", env);
    println!("   Git: {}", env!("GIT_HASH"));
    tracing::info!(env = %env, git = env!("GIT_HASH"), "wallet gateway starting");

    let db = Database::connect(&config.database.url, config.database.max_connections)
        .await
        .context("failed to connect to PostgreSQL")?;
    init_schema(db.pool())
        .await
        .context("failed to bootstrap database schema")?;
    println!("🗄️  PostgreSQL connected, schema ready");

    let provider = build_provider(&config);
    tracing::info!(provider = %config.payment.provider, "payment provider wired");

    let state = Arc::new(AppState::new(
        Arc::new(db),
        provider,
        config.payment.clone(),
    ));

    run_server(&config.gateway.host, config.gateway.port, state).await;
    Ok(())
}
