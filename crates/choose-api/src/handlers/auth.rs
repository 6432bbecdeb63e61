//! Authentication handlers
//!
//! Endpoints for obtaining, verifying and refreshing tokens, registration and
//! activation.

use axum::{extract::State, Json};
use choose_service::dto::{
    AccountResponse, ActivateRequest, AuthResponse, LoginRequest, RefreshTokenRequest,
    RegisterRequest, VerifyTokenRequest,
};
use serde_json::{json, Value};

use crate::extractors::ValidatedJson;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Exchange email and password for a token pair
///
/// POST /auth
pub async fn obtain(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = state.auth();
    let response = service.obtain(request).await?;
    Ok(Json(response))
}

/// Check that an access token is valid
///
/// POST /auth/verify
pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyTokenRequest>,
) -> ApiResult<Json<Value>> {
    state.auth().verify(request).await?;
    Ok(Json(json!({})))
}

/// Refresh access token
///
/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = state.auth();
    let response = service.refresh(request).await?;
    Ok(Json(response))
}

/// Register a new, inactive account
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<AccountResponse>>> {
    let service = state.accounts();
    let response = service.register(request).await?;
    Ok(Created(Json(response)))
}

/// Activate an account with the emailed token
///
/// POST /auth/activate
pub async fn activate(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ActivateRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = state.accounts();
    let response = service.activate(request).await?;
    Ok(Json(response))
}
