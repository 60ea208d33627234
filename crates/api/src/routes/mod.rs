pub mod health;
pub mod images;
pub mod ratings;
pub mod recipes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /recipes                                   list, create
/// /recipes/search                            search
/// /recipes/{id}                              get, update, delete
///
/// /ratings/{recipe_id}                       list, submit
/// /ratings/{recipe_id}/info                  aggregate
/// /ratings/{recipe_id}/{user_id}             one user's rating
///
/// /images                                    upload (multipart)
/// /images/{name}                             delete (admin only)
/// /images/{name}/info                        metadata
/// ```
///
/// Mutations require a Bearer token.
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/recipes", recipes::router())
        .nest("/ratings", ratings::router())
        .nest("/images", images::router(max_upload_bytes))
}
