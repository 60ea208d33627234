//! Rating submission and per-recipe aggregation.

use std::sync::Arc;

use serde::Serialize;

use crate::error::CoreError;
use crate::ordering::RatingOrder;
use crate::pagination::PageRequest;
use crate::rating::{NewRating, Rating, RatingAggregate};
use crate::recipe::Recipe;
use crate::store::{RatingStore, RecipeStore, UserDirectory};
use crate::types::DbId;
use crate::user::UserSummary;
use crate::validation::validate_input;

/// A rating together with its rater.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingView {
    #[serde(flatten)]
    pub rating: Rating,
    pub user: Option<UserSummary>,
}

/// One page of a recipe's ratings plus the recipe's aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeRatings {
    pub ratings: Vec<RatingView>,
    pub rating_info: RatingAggregate,
    pub has_more: bool,
}

#[derive(Clone)]
pub struct RatingAggregator {
    recipes: Arc<dyn RecipeStore>,
    ratings: Arc<dyn RatingStore>,
    users: Arc<dyn UserDirectory>,
}

impl RatingAggregator {
    pub fn new(
        recipes: Arc<dyn RecipeStore>,
        ratings: Arc<dyn RatingStore>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            recipes,
            ratings,
            users,
        }
    }

    /// Record `rater_id`'s score for a recipe.
    ///
    /// Owners cannot rate their own recipes and each user rates a recipe at
    /// most once. The existence check here only short-circuits the common
    /// case; the store's uniqueness guard decides concurrent submissions.
    pub async fn submit(
        &self,
        recipe_id: DbId,
        rater_id: DbId,
        input: NewRating,
    ) -> Result<RatingView, CoreError> {
        validate_input(&input)?;
        let recipe = self.find_recipe(recipe_id).await?;

        if recipe.owner_id == rater_id {
            return Err(CoreError::Forbidden("You cannot rate your own recipe".into()));
        }
        if self.ratings.rating_exists(recipe_id, rater_id).await? {
            return Err(CoreError::Conflict(
                "This user has already rated this recipe".into(),
            ));
        }

        let rating = self
            .ratings
            .insert_rating(recipe_id, rater_id, &input)
            .await?;
        tracing::info!(recipe_id, rater_id, score = rating.score, "Rating submitted");
        self.view(rating).await
    }

    /// Count and mean score, recomputed from the current ratings.
    pub async fn aggregate(&self, recipe_id: DbId) -> Result<RatingAggregate, CoreError> {
        self.find_recipe(recipe_id).await?;
        self.ratings.aggregate_ratings(recipe_id).await
    }

    pub async fn list(
        &self,
        recipe_id: DbId,
        page: PageRequest,
        order: RatingOrder,
    ) -> Result<RecipeRatings, CoreError> {
        self.find_recipe(recipe_id).await?;
        let found = self.ratings.list_ratings(recipe_id, order, page).await?;

        let mut ratings = Vec::with_capacity(found.items.len());
        for rating in found.items {
            ratings.push(self.view(rating).await?);
        }
        let rating_info = self.ratings.aggregate_ratings(recipe_id).await?;

        Ok(RecipeRatings {
            ratings,
            rating_info,
            has_more: found.has_more,
        })
    }

    pub async fn get_user_rating(
        &self,
        recipe_id: DbId,
        rater_id: DbId,
    ) -> Result<RatingView, CoreError> {
        self.find_recipe(recipe_id).await?;
        let user = self
            .users
            .find_user(rater_id)
            .await?
            .ok_or_else(|| CoreError::not_found("User", rater_id))?;

        let rating = self
            .ratings
            .find_rating(recipe_id, rater_id)
            .await?
            .ok_or_else(|| {
                CoreError::not_found(
                    "Rating",
                    format!("(user {rater_id} has not rated recipe {recipe_id})"),
                )
            })?;

        Ok(RatingView {
            rating,
            user: Some(user),
        })
    }

    async fn find_recipe(&self, id: DbId) -> Result<Recipe, CoreError> {
        self.recipes
            .find_recipe(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Recipe", id))
    }

    async fn view(&self, rating: Rating) -> Result<RatingView, CoreError> {
        let user = self.users.find_user(rating.rater_id).await?;
        Ok(RatingView { rating, user })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::memory::MemoryStore;
    use crate::recipe::NewRecipe;
    use crate::store::RecipeStore as _;

    const OWNER: DbId = 1;

    fn score(score: i32) -> NewRating {
        NewRating {
            score,
            comment: None,
        }
    }

    async fn setup() -> (Arc<MemoryStore>, RatingAggregator, DbId) {
        let store = Arc::new(MemoryStore::new());
        for (id, name) in [(1, "Owner"), (2, "Rita"), (3, "Caio"), (4, "Duda")] {
            store.add_user(id, name, None).await;
        }
        let recipe = store
            .insert_recipe(
                OWNER,
                &NewRecipe {
                    title: "Feijoada".into(),
                    ingredients: "feijao preto".into(),
                    preparation: "cozinhar".into(),
                    about: "classica".into(),
                    photo_url: None,
                },
            )
            .await
            .unwrap();
        let aggregator = RatingAggregator::new(store.clone(), store.clone(), store.clone());
        (store, aggregator, recipe.id)
    }

    #[tokio::test]
    async fn aggregate_of_unrated_recipe_is_zero() {
        let (_, aggregator, recipe) = setup().await;
        let agg = aggregator.aggregate(recipe).await.unwrap();
        assert_eq!(agg.count, 0);
        assert_eq!(agg.mean_score, 0.0);
    }

    #[tokio::test]
    async fn aggregate_requires_existing_recipe() {
        let (_, aggregator, _) = setup().await;
        assert_matches!(aggregator.aggregate(999).await, Err(CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn rating_scenario() {
        let (_, aggregator, recipe) = setup().await;
        aggregator.submit(recipe, 2, score(5)).await.unwrap();
        aggregator.submit(recipe, 3, score(3)).await.unwrap();
        let agg = aggregator.aggregate(recipe).await.unwrap();
        assert_eq!((agg.count, agg.mean_score), (2, 4.0));

        aggregator.submit(recipe, 4, score(4)).await.unwrap();
        let agg = aggregator.aggregate(recipe).await.unwrap();
        assert_eq!((agg.count, agg.mean_score), (3, 4.0));

        for s in 1..=5 {
            assert_matches!(
                aggregator.submit(recipe, OWNER, score(s)).await,
                Err(CoreError::Forbidden(_))
            );
        }
        let retry = NewRating {
            score: 1,
            comment: Some("changed my mind".into()),
        };
        assert_matches!(
            aggregator.submit(recipe, 2, retry).await,
            Err(CoreError::Conflict(_))
        );
        assert_eq!(aggregator.aggregate(recipe).await.unwrap().count, 3);
    }

    #[tokio::test]
    async fn submit_validates_and_checks_recipe() {
        let (_, aggregator, recipe) = setup().await;
        assert_matches!(
            aggregator.submit(recipe, 2, score(6)).await,
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            aggregator.submit(404, 2, score(3)).await,
            Err(CoreError::NotFound { entity: "Recipe", .. })
        );
    }

    #[tokio::test]
    async fn list_pages_with_rating_info() {
        let (store, aggregator, recipe) = setup().await;
        let now = Utc::now();
        for (rater, s, age) in [(2, 2, 3), (3, 5, 2), (4, 4, 1)] {
            store
                .seed_rating(recipe, rater, &score(s), now - Duration::days(age))
                .await
                .unwrap();
        }

        let first = aggregator
            .list(recipe, PageRequest::new(2, 0).unwrap(), RatingOrder::Highest)
            .await
            .unwrap();
        let scores: Vec<i32> = first.ratings.iter().map(|r| r.rating.score).collect();
        assert_eq!(scores, vec![5, 4]);
        assert!(first.has_more);
        assert_eq!(first.rating_info.count, 3);
        assert!((first.rating_info.mean_score - 11.0 / 3.0).abs() < 1e-9);
        assert_eq!(first.ratings[0].user.as_ref().unwrap().name, "Caio");

        let second = aggregator
            .list(recipe, PageRequest::new(2, 1).unwrap(), RatingOrder::Highest)
            .await
            .unwrap();
        assert_eq!(second.ratings.len(), 1);
        assert!(!second.has_more);
    }

    #[tokio::test]
    async fn user_rating_lookup() {
        let (_, aggregator, recipe) = setup().await;
        aggregator.submit(recipe, 2, score(4)).await.unwrap();

        let found = aggregator.get_user_rating(recipe, 2).await.unwrap();
        assert_eq!(found.rating.score, 4);

        assert_matches!(
            aggregator.get_user_rating(999, 2).await,
            Err(CoreError::NotFound { entity: "Recipe", .. })
        );
        assert_matches!(
            aggregator.get_user_rating(recipe, 77).await,
            Err(CoreError::NotFound { entity: "User", .. })
        );
        assert_matches!(
            aggregator.get_user_rating(recipe, 3).await,
            Err(CoreError::NotFound { entity: "Rating", .. })
        );
    }
}
