//! Route definitions for images.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// Routes mounted at `/api/v1/images`.
///
/// ```text
/// POST   /               -> upload
/// GET    /{name}/info    -> info
/// DELETE /{name}         -> delete
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(images::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/{name}/info", get(images::info))
        .route("/{name}", delete(images::delete))
}

/// Root-level image serving, outside `/api/v1`.
///
/// ```text
/// GET /images/{name}                    -> original
/// GET /images/{width}/{height}/{name}   -> scaled
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/images/{name}", get(images::original))
        .route("/images/{width}/{height}/{name}", get(images::scaled))
}
