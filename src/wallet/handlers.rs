//! Wallet handlers (create, list, fetch)

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::models::Wallet;
use super::repository::WalletRepository;
use crate::auth::AuthenticatedUser;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ApiResult, error_codes, ok};
use crate::organization::OrganizationRepository;
use crate::pagination::{Page, PageParams};

#[derive(Debug, Deserialize, ToSchema)]
pub struct WalletCreate {
    pub organization_id: String,
    /// ISO currency code; normalized to upper case
    #[schema(example = "EUR")]
    pub currency_code: String,
}

/// Resolve the organization, or 404 when it is missing or owned by
/// someone else.
pub(crate) async fn require_organization(
    state: &AppState,
    organization_id: &str,
    user: &AuthenticatedUser,
) -> Result<(), ApiError> {
    let org = OrganizationRepository::get_owned(state.db.pool(), organization_id, &user.user_id)
        .await
        .map_err(|e| {
            tracing::error!("organization lookup failed: {}", e);
            ApiError::db_error("Query failed")
        })?;

    match org {
        Some(_) => Ok(()),
        None => Err(ApiError::not_found(
            error_codes::ORGANIZATION_NOT_FOUND,
            "Organization does not exist",
        )),
    }
}

/// Create a wallet
///
/// POST /api/v1/wallets
#[utoipa::path(
    post,
    path = "/api/v1/wallets",
    request_body = WalletCreate,
    responses(
        (status = 200, description = "Wallet created", body = Wallet, content_type = "application/json"),
        (status = 403, description = "Organization already has a wallet in this currency"),
        (status = 404, description = "Organization not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Wallet"
)]
pub async fn create_wallet(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<WalletCreate>,
) -> ApiResult<Wallet> {
    require_organization(&state, &body.organization_id, &user).await?;

    let wallet =
        WalletRepository::create(state.db.pool(), &body.organization_id, &body.currency_code)
            .await?;

    tracing::info!(
        organization_id = %wallet.organization_id,
        currency = %wallet.currency_code,
        "wallet created"
    );
    ok(wallet)
}

/// Get all the wallets of an organization
///
/// GET /api/v1/wallets/{organization_id}?page=1&size=50
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{organization_id}",
    params(
        ("organization_id" = String, Path, description = "Organization ID"),
        PageParams
    ),
    responses(
        (status = 200, description = "Paginated wallets", content_type = "application/json"),
        (status = 404, description = "Organization not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Wallet"
)]
pub async fn get_organization_wallets(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(organization_id): Path<String>,
    Query(page): Query<PageParams>,
) -> ApiResult<Page<Wallet>> {
    require_organization(&state, &organization_id, &user).await?;

    let (wallets, total) = WalletRepository::list(state.db.pool(), &organization_id, &page)
        .await
        .map_err(|e| {
            tracing::error!("wallet list failed: {}", e);
            ApiError::db_error("Query failed")
        })?;

    ok(Page::new(wallets, total, &page))
}

/// Get the wallet of an organization in one currency
///
/// GET /api/v1/wallets/{organization_id}/{currency}
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{organization_id}/{currency}",
    params(
        ("organization_id" = String, Path, description = "Organization ID"),
        ("currency" = String, Path, description = "Currency code")
    ),
    responses(
        (status = 200, description = "Wallet", body = Wallet, content_type = "application/json"),
        (status = 404, description = "Organization or wallet not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Wallet"
)]
pub async fn get_organization_wallet(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((organization_id, currency)): Path<(String, String)>,
) -> ApiResult<Wallet> {
    require_organization(&state, &organization_id, &user).await?;

    let currency = currency.to_uppercase();
    let wallet = WalletRepository::find(state.db.pool(), &organization_id, &currency)
        .await
        .map_err(|e| {
            tracing::error!("wallet lookup failed: {}", e);
            ApiError::db_error("Query failed")
        })?
        .ok_or_else(|| {
            ApiError::not_found(
                error_codes::WALLET_NOT_FOUND,
                format!("Organization does not have a {} wallet", currency),
            )
        })?;

    ok(wallet)
}
