//! Route definitions for the `/recipes` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::recipes;
use crate::state::AppState;

/// Routes mounted at `/recipes`.
///
/// ```text
/// GET    /            -> list
/// POST   /            -> create
/// GET    /search      -> search
/// GET    /{id}        -> get_by_id
/// PUT    /{id}        -> update
/// DELETE /{id}        -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(recipes::list).post(recipes::create))
        .route("/search", get(recipes::search))
        .route(
            "/{id}",
            get(recipes::get_by_id)
                .put(recipes::update)
                .delete(recipes::delete),
        )
}
