//! Bearer-token authentication middleware
//!
//! Token issuance lives outside this service; here a token is only looked
//! up in `users_tb` and resolved to the calling user, which handlers then
//! pass explicitly into every service call.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::gateway::state::AppState;
use crate::gateway::types::ApiError;

/// User status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum UserStatus {
    Disabled = 0,
    Active = 1,
}

impl From<i16> for UserStatus {
    fn from(v: i16) -> Self {
        match v {
            0 => UserStatus::Disabled,
            _ => UserStatus::Active,
        }
    }
}

/// User row backing an API token
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub status: i16,
    pub created_at: DateTime<Utc>,
}

/// Caller identity injected into request extensions by the middleware
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
}

/// User repository for token lookup
pub struct UserRepository;

impl UserRepository {
    /// Resolve an API token to its user
    pub async fn get_by_token(pool: &PgPool, token: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as(
            r#"SELECT user_id, username, status, created_at
               FROM users_tb WHERE api_token = $1"#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await
    }
}

/// Extract the token from `Authorization: Bearer <token>`
fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    value
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Malformed Authorization header"))
}

/// Axum middleware resolving the bearer token to an [`AuthenticatedUser`]
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers())?;

    let user = UserRepository::get_by_token(state.db.pool(), token)
        .await
        .map_err(|e| {
            tracing::error!("token lookup failed: {}", e);
            ApiError::db_error("Query failed")
        })?
        .ok_or_else(|| ApiError::unauthorized("Invalid API token"))?;

    if UserStatus::from(user.status) != UserStatus::Active {
        return Err(ApiError::unauthorized("User is disabled"));
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.user_id,
        username: user.username,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_user_status_from_i16() {
        assert_eq!(UserStatus::from(0), UserStatus::Disabled);
        assert_eq!(UserStatus::from(1), UserStatus::Active);
        assert_eq!(UserStatus::from(99), UserStatus::Active); // default to Active
    }

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer tok123"));
        assert_eq!(extract_bearer(&headers).unwrap(), "tok123");
    }

    #[test]
    fn test_extract_bearer_missing_header() {
        let headers = HeaderMap::new();
        assert!(extract_bearer(&headers).is_err());
    }

    #[test]
    fn test_extract_bearer_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer(&headers).is_err());

        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer "));
        assert!(extract_bearer(&headers).is_err());
    }
}
