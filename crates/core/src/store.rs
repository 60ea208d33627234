//! Persistence contracts consumed by the catalog services.
//!
//! Implementations must be `Send + Sync` and safe for concurrent access.
//! Correctness under concurrency (most importantly the one-rating-per-rater
//! rule) is the store's job: [`RatingStore::insert_rating`] must refuse a
//! duplicate `(recipe, rater)` pair with [`CoreError::Conflict`] even when
//! the caller's existence check raced with another insert.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::library::ImageInfo;
use crate::ordering::RatingOrder;
use crate::pagination::{PageRequest, Paged};
use crate::rating::{NewRating, Rating, RatingAggregate};
use crate::recipe::{NewRecipe, Recipe, RecipeChanges, RecipeQuery};
use crate::types::DbId;
use crate::user::UserSummary;

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Insert a recipe owned by `owner_id`, stamping both timestamps.
    async fn insert_recipe(&self, owner_id: DbId, input: &NewRecipe) -> Result<Recipe, CoreError>;

    async fn find_recipe(&self, id: DbId) -> Result<Option<Recipe>, CoreError>;

    /// Run a filtered, ordered, optionally paginated listing.
    ///
    /// [`RecipeOrder::Rating`](crate::ordering::RecipeOrder::Rating) ranks by
    /// `COALESCE(mean score, 0)` computed over the current rating rows.
    async fn query_recipes(&self, query: &RecipeQuery) -> Result<Paged<Recipe>, CoreError>;

    /// Apply present fields and touch `updated_at`. `None` if absent.
    async fn update_recipe(
        &self,
        id: DbId,
        changes: &RecipeChanges,
    ) -> Result<Option<Recipe>, CoreError>;

    /// Hard delete. Returns `true` if a row was removed.
    async fn delete_recipe(&self, id: DbId) -> Result<bool, CoreError>;

    /// Cheap liveness probe for health checks.
    async fn ping(&self) -> Result<(), CoreError>;
}

#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Append a rating. Fails with [`CoreError::Conflict`] on a duplicate
    /// `(recipe_id, rater_id)`.
    async fn insert_rating(
        &self,
        recipe_id: DbId,
        rater_id: DbId,
        input: &NewRating,
    ) -> Result<Rating, CoreError>;

    async fn find_rating(
        &self,
        recipe_id: DbId,
        rater_id: DbId,
    ) -> Result<Option<Rating>, CoreError>;

    async fn rating_exists(&self, recipe_id: DbId, rater_id: DbId) -> Result<bool, CoreError> {
        Ok(self.find_rating(recipe_id, rater_id).await?.is_some())
    }

    /// Count and mean over the recipe's current ratings, in one pass.
    async fn aggregate_ratings(&self, recipe_id: DbId) -> Result<RatingAggregate, CoreError>;

    async fn list_ratings(
        &self,
        recipe_id: DbId,
        order: RatingOrder,
        page: PageRequest,
    ) -> Result<Paged<Rating>, CoreError>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, id: DbId) -> Result<Option<UserSummary>, CoreError>;
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store a new image under a unique `name`.
    async fn insert_image(&self, name: &str, data: &[u8]) -> Result<ImageInfo, CoreError>;

    async fn find_image_data(&self, name: &str) -> Result<Option<Vec<u8>>, CoreError>;

    async fn find_image_info(&self, name: &str) -> Result<Option<ImageInfo>, CoreError>;

    /// Returns `true` if an image was removed.
    async fn delete_image(&self, name: &str) -> Result<bool, CoreError>;
}
