//! Repository for the `ratings` table.

use recipebox_core::ordering::RatingOrder;
use recipebox_core::pagination::PageRequest;
use recipebox_core::rating::NewRating;
use recipebox_core::types::DbId;
use sqlx::PgPool;

use crate::models::rating::{RatingRow, RatingStatsRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, recipe_id, rater_id, score, comment, created_at, updated_at";

/// `ORDER BY` body for a rating listing.
pub fn order_clause(order: RatingOrder) -> &'static str {
    match order {
        RatingOrder::Highest => "score DESC, created_at DESC, id DESC",
        RatingOrder::Lowest => "score ASC, created_at DESC, id DESC",
        RatingOrder::Recent => "created_at DESC, id DESC",
    }
}

/// Provides append and read operations for ratings. Ratings are never
/// updated or deleted individually.
pub struct RatingRepo;

impl RatingRepo {
    /// Append a rating. A second rating for the same `(recipe_id, rater_id)`
    /// violates `uq_ratings_recipe_rater`.
    pub async fn create(
        pool: &PgPool,
        recipe_id: DbId,
        rater_id: DbId,
        input: &NewRating,
    ) -> Result<RatingRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO ratings (recipe_id, rater_id, score, comment)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RatingRow>(&query)
            .bind(recipe_id)
            .bind(rater_id)
            .bind(input.score)
            .bind(&input.comment)
            .fetch_one(pool)
            .await
    }

    /// Find the rating a user left on a recipe.
    pub async fn find_by_rater(
        pool: &PgPool,
        recipe_id: DbId,
        rater_id: DbId,
    ) -> Result<Option<RatingRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ratings WHERE recipe_id = $1 AND rater_id = $2");
        sqlx::query_as::<_, RatingRow>(&query)
            .bind(recipe_id)
            .bind(rater_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a user already rated a recipe.
    pub async fn exists(pool: &PgPool, recipe_id: DbId, rater_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM ratings WHERE recipe_id = $1 AND rater_id = $2)",
        )
        .bind(recipe_id)
        .bind(rater_id)
        .fetch_one(pool)
        .await
    }

    /// Count and mean score in a single aggregate query.
    pub async fn stats(pool: &PgPool, recipe_id: DbId) -> Result<RatingStatsRow, sqlx::Error> {
        sqlx::query_as::<_, RatingStatsRow>(
            "SELECT COUNT(*) AS count, AVG(score)::float8 AS mean
             FROM ratings WHERE recipe_id = $1",
        )
        .bind(recipe_id)
        .fetch_one(pool)
        .await
    }

    /// List one page of a recipe's ratings, fetching one extra row to
    /// detect a following page.
    pub async fn list_for_recipe(
        pool: &PgPool,
        recipe_id: DbId,
        order: RatingOrder,
        page: PageRequest,
    ) -> Result<Vec<RatingRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ratings
             WHERE recipe_id = $1
             ORDER BY {}
             LIMIT $2 OFFSET $3",
            order_clause(order)
        );
        sqlx::query_as::<_, RatingRow>(&query)
            .bind(recipe_id)
            .bind(page.fetch_limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_order_ends_in_unique_key() {
        for order in [RatingOrder::Highest, RatingOrder::Lowest, RatingOrder::Recent] {
            assert!(order_clause(order).ends_with("id DESC"));
        }
    }
}
