//! Poll handlers
//!
//! Reads are open to everyone. Writes go through the access rules, which
//! turn a missing identity into 401 and a foreign poll into 404.

use axum::{
    extract::{Path, State},
    Json,
};
use choose_service::dto::{CreatePollRequest, PageResponse, PollResponse};

use crate::extractors::{AuthUser, OptionalAuthUser, Pagination, PollPath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// GET /polls
pub async fn list_polls(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> ApiResult<Json<PageResponse<PollResponse>>> {
    let service = state.polls();
    Ok(Json(service.list(page).await?))
}

/// Polls created by the caller
///
/// GET /polls/my-polls
pub async fn my_polls(
    State(state): State<AppState>,
    auth: AuthUser,
    Pagination(page): Pagination,
) -> ApiResult<Json<PageResponse<PollResponse>>> {
    let service = state.polls();
    Ok(Json(service.list_mine(auth.account_id, page).await?))
}

/// POST /polls
pub async fn create_poll(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    ValidatedJson(request): ValidatedJson<CreatePollRequest>,
) -> ApiResult<Created<Json<PollResponse>>> {
    let service = state.polls();
    let response = service.create(auth.identity(), request).await?;
    Ok(Created(Json(response)))
}

/// GET /polls/{slug}
pub async fn get_poll(
    State(state): State<AppState>,
    Path(path): Path<PollPath>,
) -> ApiResult<Json<PollResponse>> {
    let service = state.polls();
    Ok(Json(service.get(&path.slug).await?))
}

/// DELETE /polls/{slug}
pub async fn delete_poll(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    Path(path): Path<PollPath>,
) -> ApiResult<NoContent> {
    state.polls().delete(auth.identity(), &path.slug).await?;
    Ok(NoContent)
}
