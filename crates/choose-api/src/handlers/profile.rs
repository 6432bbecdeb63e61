//! Profile handlers

use axum::{extract::State, Json};
use choose_service::dto::{
    AccountResponse, ChangePasswordRequest, ForgetPasswordRequest, ResetPasswordRequest,
    UpdateProfileRequest,
};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// GET /profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<AccountResponse>> {
    let service = state.accounts();
    Ok(Json(service.profile(auth.account_id).await?))
}

/// Replace username and email
///
/// PUT /profile
pub async fn replace_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let service = state.accounts();
    let response = service
        .update_profile(auth.account_id, request, false)
        .await?;
    Ok(Json(response))
}

/// Change some of username and email
///
/// PATCH /profile
pub async fn patch_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let service = state.accounts();
    let response = service
        .update_profile(auth.account_id, request, true)
        .await?;
    Ok(Json(response))
}

/// PUT|PATCH /profile/password/update
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<NoContent> {
    state.accounts().change_password(auth.account_id, request).await?;
    Ok(NoContent)
}

/// Email a password reset link
///
/// POST /profile/password/forget
pub async fn forget_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ForgetPasswordRequest>,
) -> ApiResult<NoContent> {
    state.accounts().forget_password(request).await?;
    Ok(NoContent)
}

/// POST /profile/password/reset
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<NoContent> {
    state.accounts().reset_password(request).await?;
    Ok(NoContent)
}
