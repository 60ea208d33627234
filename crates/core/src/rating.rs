//! Rating records and the derived per-recipe aggregate.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{DbId, Timestamp};

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 5;

/// One user's score for one recipe. At most one exists per
/// `(recipe_id, rater_id)` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rating {
    pub id: DbId,
    pub recipe_id: DbId,
    pub rater_id: DbId,
    pub score: i32,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting a rating.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewRating {
    #[validate(range(min = MIN_SCORE, max = MAX_SCORE, message = "must be between 1 and 5"))]
    pub score: i32,
    #[validate(length(min = 3, max = 200, message = "must be between 3 and 200 characters"))]
    pub comment: Option<String>,
}

/// Count and mean score of a recipe's ratings. Never stored; always
/// recomputed from the rating log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingAggregate {
    pub recipe_id: DbId,
    pub count: i64,
    /// Arithmetic mean of the scores, `0.0` when there are none.
    pub mean_score: f64,
}

impl RatingAggregate {
    pub fn empty(recipe_id: DbId) -> Self {
        Self {
            recipe_id,
            count: 0,
            mean_score: 0.0,
        }
    }

    /// Build an aggregate from a store's `COUNT(*)` and `AVG(score)` pair.
    pub fn from_parts(recipe_id: DbId, count: i64, mean: Option<f64>) -> Self {
        if count == 0 {
            return Self::empty(recipe_id);
        }
        Self {
            recipe_id,
            count,
            mean_score: mean.unwrap_or(0.0),
        }
    }

    /// Fold scores in a single pass.
    pub fn from_scores(recipe_id: DbId, scores: impl IntoIterator<Item = i32>) -> Self {
        let (count, sum) = scores
            .into_iter()
            .fold((0i64, 0i64), |(n, s), score| (n + 1, s + i64::from(score)));
        if count == 0 {
            return Self::empty(recipe_id);
        }
        Self {
            recipe_id,
            count,
            mean_score: sum as f64 / count as f64,
        }
    }
}
