//! Handlers for the `/ratings/{recipe_id}` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use recipebox_core::aggregator::{RatingView, RecipeRatings};
use recipebox_core::ordering::RatingOrder;
use recipebox_core::rating::{NewRating, RatingAggregate};
use recipebox_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::RatingListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/ratings/{recipe_id}
pub async fn list(
    State(state): State<AppState>,
    Path(recipe_id): Path<DbId>,
    Query(params): Query<RatingListParams>,
) -> AppResult<Json<DataResponse<RecipeRatings>>> {
    let order = RatingOrder::parse(params.order_by.as_deref());
    let ratings = state.ratings.list(recipe_id, params.page()?, order).await?;
    Ok(Json(DataResponse { data: ratings }))
}

/// POST /api/v1/ratings/{recipe_id}
pub async fn submit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(recipe_id): Path<DbId>,
    Json(input): Json<NewRating>,
) -> AppResult<(StatusCode, Json<DataResponse<RatingView>>)> {
    let rating = state.ratings.submit(recipe_id, user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: rating })))
}

/// GET /api/v1/ratings/{recipe_id}/info
pub async fn info(
    State(state): State<AppState>,
    Path(recipe_id): Path<DbId>,
) -> AppResult<Json<DataResponse<RatingAggregate>>> {
    let aggregate = state.ratings.aggregate(recipe_id).await?;
    Ok(Json(DataResponse { data: aggregate }))
}

/// GET /api/v1/ratings/{recipe_id}/{user_id}
pub async fn user_rating(
    State(state): State<AppState>,
    Path((recipe_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<RatingView>>> {
    let rating = state.ratings.get_user_rating(recipe_id, user_id).await?;
    Ok(Json(DataResponse { data: rating }))
}
