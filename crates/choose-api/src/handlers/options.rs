//! Option handlers
//!
//! Options are addressed through their poll's slug.

use axum::{
    extract::{Path, State},
    Json,
};
use choose_service::dto::{CreateOptionRequest, OptionResponse, UpdateOptionRequest};

use crate::extractors::{OptionPath, OptionalAuthUser, PollPath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Add one option while the poll has free places
///
/// POST /polls/{slug}/add-option
/// POST /polls/{slug}/options
pub async fn add_option(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path(path): Path<PollPath>,
    ValidatedJson(request): ValidatedJson<CreateOptionRequest>,
) -> ApiResult<Created<Json<OptionResponse>>> {
    let service = state.options();
    let response = service.add(auth.identity(), &path.slug, request).await?;
    Ok(Created(Json(response)))
}

/// GET /polls/{slug}/options
pub async fn list_options(
    State(state): State<AppState>,
    Path(path): Path<PollPath>,
) -> ApiResult<Json<Vec<OptionResponse>>> {
    let service = state.options();
    Ok(Json(service.list(&path.slug).await?))
}

/// GET /polls/{slug}/options/{option_id}
pub async fn get_option(
    State(state): State<AppState>,
    Path(path): Path<OptionPath>,
) -> ApiResult<Json<OptionResponse>> {
    let option_id = path.option_id()?;
    let service = state.options();
    Ok(Json(service.get(&path.slug, option_id).await?))
}

/// PUT /polls/{slug}/options/{option_id}
pub async fn replace_option(
    state: State<AppState>,
    auth: OptionalAuthUser,
    path: Path<OptionPath>,
    request: ValidatedJson<UpdateOptionRequest>,
) -> ApiResult<Json<OptionResponse>> {
    update(state, auth, path, request, false).await
}

/// PATCH /polls/{slug}/options/{option_id}
pub async fn patch_option(
    state: State<AppState>,
    auth: OptionalAuthUser,
    path: Path<OptionPath>,
    request: ValidatedJson<UpdateOptionRequest>,
) -> ApiResult<Json<OptionResponse>> {
    update(state, auth, path, request, true).await
}

async fn update(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path(path): Path<OptionPath>,
    ValidatedJson(request): ValidatedJson<UpdateOptionRequest>,
    partial: bool,
) -> ApiResult<Json<OptionResponse>> {
    let option_id = path.option_id()?;
    let service = state.options();
    let response = service
        .update(auth.identity(), &path.slug, option_id, request, partial)
        .await?;
    Ok(Json(response))
}

/// DELETE /polls/{slug}/options/{option_id}
pub async fn delete_option(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path(path): Path<OptionPath>,
) -> ApiResult<NoContent> {
    let option_id = path.option_id()?;
    state.options().delete(auth.identity(), &path.slug, option_id).await?;
    Ok(NoContent)
}
