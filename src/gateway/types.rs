//! API response envelope and error types
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `ApiError`: HTTP status + domain error code, usable with `?`
//! - `error_codes`: Standard error code constants

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::credit::CreditError;
use crate::payment::ProviderError;
use crate::wallet::WalletError;

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;

    // Resource errors (4xxx)
    pub const ORGANIZATION_NOT_FOUND: i32 = 4001;
    pub const WALLET_NOT_FOUND: i32 = 4002;
    pub const RATE_NOT_FOUND: i32 = 4003;
    pub const DUPLICATE_WALLET: i32 = 4091;
    pub const DUPLICATE_RATE: i32 = 4092;
    pub const DUPLICATE_TRANSACTION: i32 = 4093;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const UPSTREAM_ERROR: i32 = 5002;
}

/// Handler result: success envelope or an `ApiError` response
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Wrap data in a success envelope
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// API error carrying the HTTP status and the envelope error code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            error_codes::INVALID_PARAMETER,
            msg,
        )
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error_codes::MISSING_AUTH, msg)
    }

    pub fn forbidden(code: i32, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, code, msg)
    }

    pub fn not_found(code: i32, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, msg)
    }

    pub fn conflict(code: i32, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, code, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            msg,
        )
    }

    pub fn db_error(msg: impl Into<String>) -> Self {
        Self::internal(msg)
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, error_codes::UPSTREAM_ERROR, msg)
    }

    /// Convenience for `return ApiError::...(..).into_err();`
    pub fn into_err<T>(self) -> ApiResult<T> {
        Err(self)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()>::error(self.code, self.msg));
        (self.status, body).into_response()
    }
}

impl From<WalletError> for ApiError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::OrganizationNotFound => ApiError::not_found(
                error_codes::ORGANIZATION_NOT_FOUND,
                "Organization does not exist",
            ),
            WalletError::WalletNotFound(currency) => ApiError::not_found(
                error_codes::WALLET_NOT_FOUND,
                format!("Organization does not have a {} wallet", currency),
            ),
            WalletError::WalletExists(currency) => ApiError::forbidden(
                error_codes::DUPLICATE_WALLET,
                format!("Organization already has a {} wallet", currency),
            ),
            WalletError::DuplicateTransaction => ApiError::conflict(
                error_codes::DUPLICATE_TRANSACTION,
                "Transaction already processed",
            ),
            WalletError::Database(e) => {
                tracing::error!("wallet query failed: {}", e);
                ApiError::db_error("Query failed")
            }
        }
    }
}

impl From<CreditError> for ApiError {
    fn from(e: CreditError) -> Self {
        match e {
            CreditError::OrganizationNotFound => ApiError::not_found(
                error_codes::ORGANIZATION_NOT_FOUND,
                "Organization does not exist",
            ),
            CreditError::WalletNotFound => ApiError::not_found(
                error_codes::WALLET_NOT_FOUND,
                "Organization does not have a wallet",
            ),
            CreditError::RateNotFound(currency) => ApiError::not_found(
                error_codes::RATE_NOT_FOUND,
                format!("Currency {} does not have a conversion rate", currency),
            ),
            CreditError::DuplicateRate(currency) => ApiError::conflict(
                error_codes::DUPLICATE_RATE,
                format!("Currency {} already has a conversion rate", currency),
            ),
            CreditError::AlreadyProcessed => ApiError::conflict(
                error_codes::DUPLICATE_TRANSACTION,
                "Transaction already processed",
            ),
            CreditError::InvalidAmount => {
                ApiError::bad_request("Amount must be a positive number")
            }
            CreditError::Database(e) => {
                tracing::error!("credit query failed: {}", e);
                ApiError::db_error("Query failed")
            }
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(e: ProviderError) -> Self {
        tracing::error!("payment provider call failed: {}", e);
        ApiError::upstream("Payment provider request failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_error_status_mapping() {
        let err: ApiError = WalletError::OrganizationNotFound.into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, error_codes::ORGANIZATION_NOT_FOUND);

        let err: ApiError = WalletError::WalletExists("EUR".to_string()).into();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.msg, "Organization already has a EUR wallet");
    }

    #[test]
    fn test_duplicate_rate_is_conflict() {
        // The source system returned 404 for this case; that was a defect.
        let err: ApiError = CreditError::DuplicateRate("EUR".to_string()).into();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, error_codes::DUPLICATE_RATE);
    }

    #[test]
    fn test_invalid_amount_is_bad_request() {
        let err: ApiError = CreditError::InvalidAmount.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, error_codes::INVALID_PARAMETER);
        assert_eq!(err.msg, "Amount must be a positive number");
    }

    #[test]
    fn test_envelope_shape() {
        let resp = ApiResponse::success(42);
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"code":0,"msg":"ok","data":42}"#);

        let resp = ApiResponse::<()>::error(error_codes::INVALID_PARAMETER, "bad");
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"code":1001,"msg":"bad"}"#);
    }
}
