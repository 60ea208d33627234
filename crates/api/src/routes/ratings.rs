//! Route definitions for the `/ratings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::ratings;
use crate::state::AppState;

/// Routes mounted at `/ratings`.
///
/// ```text
/// GET    /{recipe_id}             -> list
/// POST   /{recipe_id}             -> submit
/// GET    /{recipe_id}/info        -> info
/// GET    /{recipe_id}/{user_id}   -> user_rating
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{recipe_id}", get(ratings::list).post(ratings::submit))
        .route("/{recipe_id}/info", get(ratings::info))
        .route("/{recipe_id}/{user_id}", get(ratings::user_rating))
}
