//! Handlers for the `/recipes` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use recipebox_core::catalog::RecipeView;
use recipebox_core::ordering::RecipeOrder;
use recipebox_core::recipe::{NewRecipe, RecipeChanges};
use recipebox_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{RecipeListParams, SearchParams};
use crate::response::{DataResponse, RecipePage};
use crate::state::AppState;

/// GET /api/v1/recipes
///
/// Ordered by mean rating unless `order_by` says otherwise. Paginated only
/// when both `page_size` and `page` are given.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<RecipeListParams>,
) -> AppResult<Json<DataResponse<RecipePage>>> {
    let order = RecipeOrder::parse(params.order_by.as_deref());
    let page = state
        .catalog
        .list(params.author_id, params.page()?, order)
        .await?;
    Ok(Json(DataResponse { data: page.into() }))
}

/// GET /api/v1/recipes/search?q=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<RecipePage>>> {
    let order = RecipeOrder::parse(params.order_by.as_deref());
    let page = state.catalog.search(&params.q, params.page()?, order).await?;
    Ok(Json(DataResponse { data: page.into() }))
}

/// GET /api/v1/recipes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RecipeView>>> {
    let recipe = state.catalog.get_by_id(id).await?;
    Ok(Json(DataResponse { data: recipe }))
}

/// POST /api/v1/recipes
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<NewRecipe>,
) -> AppResult<(StatusCode, Json<DataResponse<RecipeView>>)> {
    let recipe = state.catalog.create(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: recipe })))
}

/// PUT /api/v1/recipes/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(changes): Json<RecipeChanges>,
) -> AppResult<Json<DataResponse<RecipeView>>> {
    let recipe = state.catalog.update(id, user.user_id, changes).await?;
    Ok(Json(DataResponse { data: recipe }))
}

/// DELETE /api/v1/recipes/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.catalog.delete(id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
