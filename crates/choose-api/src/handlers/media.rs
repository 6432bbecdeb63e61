//! Media handlers
//!
//! Uploads take the raw image as the request body. Stored media is served
//! back by name.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use choose_common::is_valid_name;
use choose_core::DomainError;
use choose_service::dto::MediaResponse;

use crate::extractors::AuthUser;
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// POST /static/image
pub async fn upload_image(
    State(state): State<AppState>,
    _auth: AuthUser,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Created<Json<MediaResponse>>> {
    let body = body.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::invalid_body(e.body_text())
        }
    })?;
    if body.is_empty() {
        return Err(ApiError::invalid_body("No image was submitted."));
    }

    let declared_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let service = state.media();
    let response = service.accept_image(body.to_vec(), declared_type).await?;
    Ok(Created(Json(response)))
}

/// GET /media/{name}
pub async fn serve_media(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if !is_valid_name(&name) {
        return Err(DomainError::MediaNotFound(name).into());
    }

    let bytes = state.media().open(&name).await?;
    Ok(([(header::CONTENT_TYPE, content_type(&name))], bytes))
}

/// Content type for a stored name, judged by its extension
fn content_type(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("a_1.jpeg"), "image/jpeg");
        assert_eq!(content_type("a_1.JPG"), "image/jpeg");
        assert_eq!(content_type("a_1.webp"), "image/webp");
        assert_eq!(content_type("noextension"), "application/octet-stream");
    }
}
