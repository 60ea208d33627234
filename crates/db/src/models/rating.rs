//! Rating row model.

use recipebox_core::rating::Rating;
use recipebox_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `ratings` table.
#[derive(Debug, Clone, FromRow)]
pub struct RatingRow {
    pub id: DbId,
    pub recipe_id: DbId,
    pub rater_id: DbId,
    pub score: i32,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<RatingRow> for Rating {
    fn from(row: RatingRow) -> Self {
        Rating {
            id: row.id,
            recipe_id: row.recipe_id,
            rater_id: row.rater_id,
            score: row.score,
            comment: row.comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `COUNT(*)` / `AVG(score)` pair for one recipe.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct RatingStatsRow {
    pub count: i64,
    pub mean: Option<f64>,
}
