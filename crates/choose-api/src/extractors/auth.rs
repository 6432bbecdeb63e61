//! Authentication extractor
//!
//! Extracts and validates bearer access tokens from the Authorization header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use choose_core::Snowflake;
use tracing::warn;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated account extracted from the access token
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub account_id: Snowflake,
}

impl AuthUser {
    pub fn new(account_id: Snowflake) -> Self {
        Self { account_id }
    }
}

fn authenticate(state: &AppState, token: &str) -> Result<AuthUser, ApiError> {
    let claims = state
        .service_context()
        .jwt_service()
        .validate_access_token(token)
        .map_err(|e| {
            warn!(error = %e, "Invalid access token");
            ApiError::App(e)
        })?;

    let account_id = claims.account_id().map_err(|e| {
        warn!(error = %e, "Invalid account id in token");
        ApiError::InvalidAuthFormat
    })?;

    Ok(AuthUser::new(account_id))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        authenticate(&AppState::from_ref(state), bearer.token())
    }
}

/// Optional authenticated account
///
/// `None` when no Authorization header is present; a header carrying a bad
/// token is still rejected.
#[derive(Debug, Clone, Copy)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    /// Caller identity for the access rules
    pub fn identity(&self) -> Option<Snowflake> {
        self.0.map(|user| user.account_id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                let user = authenticate(&AppState::from_ref(state), bearer.token())?;
                Ok(OptionalAuthUser(Some(user)))
            }
            Err(_) => Ok(OptionalAuthUser(None)),
        }
    }
}
