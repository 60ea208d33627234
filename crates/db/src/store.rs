//! [`PgStore`]: the PostgreSQL implementation of the core store traits.

use async_trait::async_trait;
use recipebox_core::error::CoreError;
use recipebox_core::library::ImageInfo;
use recipebox_core::ordering::RatingOrder;
use recipebox_core::pagination::{PageRequest, Paged};
use recipebox_core::rating::{NewRating, Rating, RatingAggregate};
use recipebox_core::recipe::{NewRecipe, Recipe, RecipeChanges, RecipeQuery};
use recipebox_core::store::{ImageStore, RatingStore, RecipeStore, UserDirectory};
use recipebox_core::types::DbId;
use recipebox_core::user::UserSummary;

use crate::error::into_core;
use crate::repositories::{ImageRepo, RatingRepo, RecipeRepo, UserRepo};
use crate::DbPool;

/// Shared handle over a connection pool. Cloning is cheap.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl RecipeStore for PgStore {
    async fn insert_recipe(&self, owner_id: DbId, input: &NewRecipe) -> Result<Recipe, CoreError> {
        let row = RecipeRepo::create(&self.pool, owner_id, input)
            .await
            .map_err(into_core)?;
        Ok(row.into())
    }

    async fn find_recipe(&self, id: DbId) -> Result<Option<Recipe>, CoreError> {
        let row = RecipeRepo::find_by_id(&self.pool, id)
            .await
            .map_err(into_core)?;
        Ok(row.map(Recipe::from))
    }

    async fn query_recipes(&self, query: &RecipeQuery) -> Result<Paged<Recipe>, CoreError> {
        let rows = RecipeRepo::list(&self.pool, query)
            .await
            .map_err(into_core)?;
        let recipes: Vec<Recipe> = rows.into_iter().map(Recipe::from).collect();
        Ok(match query.page {
            Some(page) => Paged::from_overfetch(recipes, page.size),
            None => Paged::all(recipes),
        })
    }

    async fn update_recipe(
        &self,
        id: DbId,
        changes: &RecipeChanges,
    ) -> Result<Option<Recipe>, CoreError> {
        let row = RecipeRepo::update(&self.pool, id, changes)
            .await
            .map_err(into_core)?;
        Ok(row.map(Recipe::from))
    }

    async fn delete_recipe(&self, id: DbId) -> Result<bool, CoreError> {
        RecipeRepo::hard_delete(&self.pool, id)
            .await
            .map_err(into_core)
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(into_core)
    }
}

#[async_trait]
impl RatingStore for PgStore {
    async fn insert_rating(
        &self,
        recipe_id: DbId,
        rater_id: DbId,
        input: &NewRating,
    ) -> Result<Rating, CoreError> {
        let row = RatingRepo::create(&self.pool, recipe_id, rater_id, input)
            .await
            .map_err(into_core)?;
        Ok(row.into())
    }

    async fn find_rating(
        &self,
        recipe_id: DbId,
        rater_id: DbId,
    ) -> Result<Option<Rating>, CoreError> {
        let row = RatingRepo::find_by_rater(&self.pool, recipe_id, rater_id)
            .await
            .map_err(into_core)?;
        Ok(row.map(Rating::from))
    }

    async fn rating_exists(&self, recipe_id: DbId, rater_id: DbId) -> Result<bool, CoreError> {
        RatingRepo::exists(&self.pool, recipe_id, rater_id)
            .await
            .map_err(into_core)
    }

    async fn aggregate_ratings(&self, recipe_id: DbId) -> Result<RatingAggregate, CoreError> {
        let stats = RatingRepo::stats(&self.pool, recipe_id)
            .await
            .map_err(into_core)?;
        Ok(RatingAggregate::from_parts(recipe_id, stats.count, stats.mean))
    }

    async fn list_ratings(
        &self,
        recipe_id: DbId,
        order: RatingOrder,
        page: PageRequest,
    ) -> Result<Paged<Rating>, CoreError> {
        let rows = RatingRepo::list_for_recipe(&self.pool, recipe_id, order, page)
            .await
            .map_err(into_core)?;
        let ratings = rows.into_iter().map(Rating::from).collect();
        Ok(Paged::from_overfetch(ratings, page.size))
    }
}

#[async_trait]
impl UserDirectory for PgStore {
    async fn find_user(&self, id: DbId) -> Result<Option<UserSummary>, CoreError> {
        let row = UserRepo::find_summary(&self.pool, id)
            .await
            .map_err(into_core)?;
        Ok(row.map(UserSummary::from))
    }
}

#[async_trait]
impl ImageStore for PgStore {
    async fn insert_image(&self, name: &str, data: &[u8]) -> Result<ImageInfo, CoreError> {
        let row = ImageRepo::create(&self.pool, name, data)
            .await
            .map_err(into_core)?;
        Ok(row.into())
    }

    async fn find_image_data(&self, name: &str) -> Result<Option<Vec<u8>>, CoreError> {
        ImageRepo::find_data(&self.pool, name)
            .await
            .map_err(into_core)
    }

    async fn find_image_info(&self, name: &str) -> Result<Option<ImageInfo>, CoreError> {
        let row = ImageRepo::find_info(&self.pool, name)
            .await
            .map_err(into_core)?;
        Ok(row.map(ImageInfo::from))
    }

    async fn delete_image(&self, name: &str) -> Result<bool, CoreError> {
        ImageRepo::delete(&self.pool, name).await.map_err(into_core)
    }
}
