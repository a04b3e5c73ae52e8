pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::auth_middleware;
use crate::credit::handlers as credit_handlers;
use crate::wallet::handlers as wallet_handlers;
use state::AppState;

/// Start the HTTP gateway server
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) {
    // Public routes: health plus the provider's browser redirect target.
    // The callback authenticates through server-side verification, not a
    // bearer token.
    let public_routes = Router::new()
        .route("/api/v1/health", get(handlers::health_check))
        .route(
            "/api/v1/credits/callback",
            get(credit_handlers::payment_callback),
        );

    // Private routes (bearer token required)
    let private_routes = Router::new()
        // Wallets
        .route("/api/v1/wallets", post(wallet_handlers::create_wallet))
        .route(
            "/api/v1/wallets/{organization_id}",
            get(wallet_handlers::get_organization_wallets),
        )
        .route(
            "/api/v1/wallets/{organization_id}/{currency}",
            get(wallet_handlers::get_organization_wallet),
        )
        // Conversion rates
        .route(
            "/api/v1/credits/rates",
            post(credit_handlers::add_rate).get(credit_handlers::get_rates),
        )
        .route(
            "/api/v1/credits/rates/{currency_code}",
            get(credit_handlers::get_rate),
        )
        // Credit balance and funding
        .route(
            "/api/v1/credits/{organization_id}",
            get(credit_handlers::get_credit).post(credit_handlers::fund_credit),
        )
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let app = Router::new()
        .merge(public_routes)
        .merge(private_routes)
        .with_state(state)
        // OpenAPI / Swagger UI (stateless, added after with_state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()));

    let addr = format!("{}:{}", host, port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("❌ FATAL: Failed to bind to {}: {}", addr, e);
            eprintln!(
                "   Hint: Port {} may already be in use. Check with: lsof -i :{}",
                port, port
            );
            std::process::exit(1);
        }
    };

    println!("🚀 Gateway listening on http://{}", addr);
    println!("📖 API Docs: http://{}/docs", addr);
    println!("🔒 API base: /api/v1 (bearer token required)");
    tracing::info!("gateway listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ FATAL: Server error: {}", e);
        std::process::exit(1);
    }
}
