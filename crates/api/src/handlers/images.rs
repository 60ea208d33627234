//! Handlers for image upload, metadata and serving.

use axum::extract::{Multipart, Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use recipebox_core::imaging;
use recipebox_core::library::{ImageInfo, StoredImage};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart part carrying the file.
const UPLOAD_FIELD: &str = "image";

/// POST /api/v1/images
///
/// Accepts a multipart body with one `image` file part. Other parts are
/// ignored.
pub async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<StoredImage>>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Image part has no file name".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let stored = state.images.store(&file_name, &data).await?;
        tracing::info!(user_id = user.user_id, image = %stored.name, "Image uploaded");
        return Ok((StatusCode::CREATED, Json(DataResponse { data: stored })));
    }

    Err(AppError::BadRequest(format!(
        "Multipart body has no '{UPLOAD_FIELD}' part"
    )))
}

/// GET /api/v1/images/{name}/info
pub async fn info(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<DataResponse<ImageInfo>>> {
    let info = state.images.info(&name).await?;
    Ok(Json(DataResponse { data: info }))
}

/// DELETE /api/v1/images/{name}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(name): Path<String>,
) -> AppResult<StatusCode> {
    state.images.delete(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /images/{name}
///
/// Stored bytes as uploaded; unknown names get the placeholder image.
pub async fn original(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let data = state.images.original(&name).await?;
    Ok(image_response(data))
}

/// GET /images/{width}/{height}/{name}
///
/// Center-cropped and resized JPEG. Undecodable originals are served as is.
pub async fn scaled(
    State(state): State<AppState>,
    Path((width, height, name)): Path<(u32, u32, String)>,
) -> AppResult<impl IntoResponse> {
    let data = state.images.fetch(&name, width, height).await?;
    Ok(image_response(data))
}

fn image_response(data: Vec<u8>) -> impl IntoResponse {
    ([(CONTENT_TYPE, imaging::content_type(&data))], data)
}
