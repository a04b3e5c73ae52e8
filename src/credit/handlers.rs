//! Credit handlers (rates, balance, funding, provider callback)

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::CreditError;
use super::callback::{CallbackQuery, process_callback};
use super::models::{CreditWallet, CreditWalletConversion};
use super::repository::{ConversionRepository, CreditRepository};
use crate::auth::AuthenticatedUser;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ApiResult, error_codes, ok};
use crate::pagination::{Page, PageParams};
use crate::payment::PaymentLinkRequest;
use crate::wallet::WalletRepository;
use crate::wallet::handlers::require_organization;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RateCreate {
    /// ISO currency code; normalized to upper case
    #[schema(example = "EUR")]
    pub currency_code: String,
    /// Credits granted per unit of the currency
    #[schema(value_type = String, example = "10")]
    pub rate: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FundRequest {
    /// Amount to pay, in `currency_code`
    #[schema(value_type = String, example = "5")]
    pub amount: Decimal,
    #[schema(example = "EUR")]
    pub currency_code: String,
    /// Front-end page to land on once the payment completes
    pub redirect_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentLink {
    /// Hosted checkout page to send the user to
    pub link: String,
}

/// Register a conversion rate for a currency
///
/// POST /api/v1/credits/rates
#[utoipa::path(
    post,
    path = "/api/v1/credits/rates",
    request_body = RateCreate,
    responses(
        (status = 200, description = "Rate registered", body = CreditWalletConversion, content_type = "application/json"),
        (status = 400, description = "Rate is not a positive number"),
        (status = 409, description = "Currency already has a rate")
    ),
    security(("bearer_auth" = [])),
    tag = "Credit"
)]
pub async fn add_rate(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthenticatedUser>,
    Json(body): Json<RateCreate>,
) -> ApiResult<CreditWalletConversion> {
    if body.rate <= Decimal::ZERO {
        return ApiError::bad_request("Rate must be a positive number").into_err();
    }

    let rate =
        ConversionRepository::add_rate(state.db.pool(), "credits", &body.currency_code, body.rate)
            .await?;

    tracing::info!(currency = %rate.currency_code, rate = %rate.rate, "conversion rate registered");
    ok(rate)
}

/// List registered conversion rates
///
/// GET /api/v1/credits/rates?page=1&size=50
#[utoipa::path(
    get,
    path = "/api/v1/credits/rates",
    params(PageParams),
    responses(
        (status = 200, description = "Paginated conversion rates", content_type = "application/json")
    ),
    security(("bearer_auth" = [])),
    tag = "Credit"
)]
pub async fn get_rates(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthenticatedUser>,
    Query(page): Query<PageParams>,
) -> ApiResult<Page<CreditWalletConversion>> {
    let (rates, total) = ConversionRepository::list(state.db.pool(), &page)
        .await
        .map_err(|e| {
            tracing::error!("rate list failed: {}", e);
            ApiError::db_error("Query failed")
        })?;

    ok(Page::new(rates, total, &page))
}

/// Get the conversion rate for one currency
///
/// GET /api/v1/credits/rates/{currency_code}
#[utoipa::path(
    get,
    path = "/api/v1/credits/rates/{currency_code}",
    params(("currency_code" = String, Path, description = "Currency code")),
    responses(
        (status = 200, description = "Conversion rate", body = CreditWalletConversion, content_type = "application/json"),
        (status = 404, description = "No rate for this currency")
    ),
    security(("bearer_auth" = [])),
    tag = "Credit"
)]
pub async fn get_rate(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthenticatedUser>,
    Path(currency_code): Path<String>,
) -> ApiResult<CreditWalletConversion> {
    let currency_code = currency_code.to_uppercase();
    let rate = ConversionRepository::get_rate(state.db.pool(), &currency_code)
        .await
        .map_err(|e| {
            tracing::error!("rate lookup failed: {}", e);
            ApiError::db_error("Query failed")
        })?
        .ok_or_else(|| {
            ApiError::not_found(
                error_codes::RATE_NOT_FOUND,
                format!("Currency {} does not have a conversion rate", currency_code),
            )
        })?;

    ok(rate)
}

/// Get an organization's credit balance
///
/// GET /api/v1/credits/{organization_id}
///
/// Creates a zero balance on first read.
#[utoipa::path(
    get,
    path = "/api/v1/credits/{organization_id}",
    params(("organization_id" = String, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Credit balance", body = CreditWallet, content_type = "application/json"),
        (status = 404, description = "Organization not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Credit"
)]
pub async fn get_credit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(organization_id): Path<String>,
) -> ApiResult<CreditWallet> {
    require_organization(&state, &organization_id, &user).await?;

    let credit = CreditRepository::get_or_create(state.db.pool(), &organization_id)
        .await
        .map_err(|e| {
            tracing::error!("credit lookup failed: {}", e);
            ApiError::db_error("Query failed")
        })?;

    ok(credit)
}

/// Start a credit top-up
///
/// POST /api/v1/credits/{organization_id}
///
/// Returns a hosted payment link; the balance only changes once the
/// provider redirects back to the callback and verification passes.
#[utoipa::path(
    post,
    path = "/api/v1/credits/{organization_id}",
    params(("organization_id" = String, Path, description = "Organization ID")),
    request_body = FundRequest,
    responses(
        (status = 200, description = "Payment link", body = PaymentLink, content_type = "application/json"),
        (status = 400, description = "Amount is not a positive number"),
        (status = 404, description = "Organization, wallet, or rate not found"),
        (status = 502, description = "Payment provider rejected the request")
    ),
    security(("bearer_auth" = [])),
    tag = "Credit"
)]
pub async fn fund_credit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(organization_id): Path<String>,
    Json(body): Json<FundRequest>,
) -> ApiResult<PaymentLink> {
    require_organization(&state, &organization_id, &user).await?;

    if body.amount <= Decimal::ZERO {
        return Err(CreditError::InvalidAmount.into());
    }

    let currency_code = body.currency_code.to_uppercase();
    let rate = ConversionRepository::get_rate(state.db.pool(), &currency_code)
        .await
        .map_err(|e| {
            tracing::error!("rate lookup failed: {}", e);
            ApiError::db_error("Query failed")
        })?;
    if rate.is_none() {
        return ApiError::not_found(
            error_codes::RATE_NOT_FOUND,
            format!("Currency {} does not have a conversion rate", currency_code),
        )
        .into_err();
    }

    // The organization must have opened at least one wallet before it
    // can top up credits.
    let wallet = WalletRepository::find_any(state.db.pool(), &organization_id)
        .await
        .map_err(|e| {
            tracing::error!("wallet lookup failed: {}", e);
            ApiError::db_error("Query failed")
        })?;
    if wallet.is_none() {
        return ApiError::not_found(
            error_codes::WALLET_NOT_FOUND,
            "Organization does not have a wallet",
        )
        .into_err();
    }

    // Both IDs are dash-free, so the callback can split this on '-'
    let tx_ref = format!(
        "{}-{}-{}",
        user.user_id,
        organization_id,
        Utc::now().timestamp_millis()
    );

    let link = state
        .provider
        .create_payment_link(&PaymentLinkRequest {
            tx_ref: tx_ref.clone(),
            amount: body.amount,
            currency: currency_code,
            callback_url: state.payment.callback_url(),
            redirect_url: body.redirect_url,
            customer: user.username.clone(),
        })
        .await?;

    tracing::info!(organization_id = %organization_id, tx_ref = %tx_ref, "payment link created");
    ok(PaymentLink { link })
}

/// Provider redirect target after a checkout attempt
///
/// GET /api/v1/credits/callback
///
/// Unauthenticated: the caller is the paying user's browser, not an API
/// client. Every outcome redirects to the front end with a message.
#[utoipa::path(
    get,
    path = "/api/v1/credits/callback",
    params(CallbackQuery),
    responses((status = 303, description = "Redirect to the front end with the outcome")),
    tag = "Credit"
)]
pub async fn payment_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    let outcome = process_callback(
        state.db.pool(),
        state.provider.as_ref(),
        &state.payment,
        &query,
    )
    .await;

    Redirect::to(&outcome.location(&state.payment, &query))
}
