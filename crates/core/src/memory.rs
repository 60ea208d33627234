//! In-memory implementation of every store trait.
//!
//! Backs unit and API tests and local runs without PostgreSQL. All tables
//! live behind one [`RwLock`], so the duplicate-rating check and the insert
//! happen under the same write guard.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::CoreError;
use crate::library::ImageInfo;
use crate::ordering::{RatingOrder, RecipeOrder};
use crate::pagination::{PageRequest, Paged};
use crate::rating::{NewRating, Rating, RatingAggregate};
use crate::recipe::{matches_search, NewRecipe, Recipe, RecipeChanges, RecipeQuery};
use crate::store::{ImageStore, RatingStore, RecipeStore, UserDirectory};
use crate::types::{DbId, Timestamp};
use crate::user::UserSummary;

#[derive(Debug, Clone)]
struct StoredImageRow {
    info: ImageInfo,
    data: Vec<u8>,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<DbId, UserSummary>,
    recipes: BTreeMap<DbId, Recipe>,
    ratings: Vec<Rating>,
    images: HashMap<String, StoredImageRow>,
    last_recipe_id: DbId,
    last_rating_id: DbId,
}

impl Tables {
    fn aggregate(&self, recipe_id: DbId) -> RatingAggregate {
        RatingAggregate::from_scores(
            recipe_id,
            self.ratings
                .iter()
                .filter(|r| r.recipe_id == recipe_id)
                .map(|r| r.score),
        )
    }

    fn push_recipe(&mut self, owner_id: DbId, input: &NewRecipe, at: Timestamp) -> Recipe {
        self.last_recipe_id += 1;
        let recipe = Recipe {
            id: self.last_recipe_id,
            owner_id,
            title: input.title.clone(),
            ingredients: input.ingredients.clone(),
            preparation: input.preparation.clone(),
            about: input.about.clone(),
            photo_url: input.photo_url.clone(),
            created_at: at,
            updated_at: at,
        };
        self.recipes.insert(recipe.id, recipe.clone());
        recipe
    }

    fn push_rating(
        &mut self,
        recipe_id: DbId,
        rater_id: DbId,
        input: &NewRating,
        at: Timestamp,
    ) -> Result<Rating, CoreError> {
        if self
            .ratings
            .iter()
            .any(|r| r.recipe_id == recipe_id && r.rater_id == rater_id)
        {
            return Err(CoreError::Conflict(
                "This user has already rated this recipe".into(),
            ));
        }
        self.last_rating_id += 1;
        let rating = Rating {
            id: self.last_rating_id,
            recipe_id,
            rater_id,
            score: input.score,
            comment: input.comment.clone(),
            created_at: at,
            updated_at: at,
        };
        self.ratings.push(rating.clone());
        Ok(rating)
    }
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user in the directory.
    pub async fn add_user(&self, id: DbId, name: &str, photo_url: Option<&str>) {
        let user = UserSummary {
            id,
            name: name.to_string(),
            photo_url: photo_url.map(str::to_string),
        };
        self.tables.write().await.users.insert(id, user);
    }

    /// Insert a recipe with an explicit creation time.
    pub async fn seed_recipe(&self, owner_id: DbId, input: &NewRecipe, created_at: Timestamp) -> Recipe {
        self.tables
            .write()
            .await
            .push_recipe(owner_id, input, created_at)
    }

    /// Insert a rating with an explicit creation time.
    pub async fn seed_rating(
        &self,
        recipe_id: DbId,
        rater_id: DbId,
        input: &NewRating,
        created_at: Timestamp,
    ) -> Result<Rating, CoreError> {
        self.tables
            .write()
            .await
            .push_rating(recipe_id, rater_id, input, created_at)
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn insert_recipe(&self, owner_id: DbId, input: &NewRecipe) -> Result<Recipe, CoreError> {
        Ok(self
            .tables
            .write()
            .await
            .push_recipe(owner_id, input, Utc::now()))
    }

    async fn find_recipe(&self, id: DbId) -> Result<Option<Recipe>, CoreError> {
        Ok(self.tables.read().await.recipes.get(&id).cloned())
    }

    async fn query_recipes(&self, query: &RecipeQuery) -> Result<Paged<Recipe>, CoreError> {
        let tables = self.tables.read().await;

        let mut rows: Vec<&Recipe> = tables
            .recipes
            .values()
            .filter(|r| query.author_id.map_or(true, |author| r.owner_id == author))
            .filter(|r| {
                query
                    .search
                    .as_deref()
                    .map_or(true, |term| matches_search(r, term))
            })
            .collect();

        let newest_first =
            |a: &&Recipe, b: &&Recipe| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id));

        match query.order {
            RecipeOrder::Recent => rows.sort_by(newest_first),
            RecipeOrder::Oldest => {
                rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            }
            RecipeOrder::Rating => {
                let means: HashMap<DbId, f64> = rows
                    .iter()
                    .map(|r| (r.id, tables.aggregate(r.id).mean_score))
                    .collect();
                rows.sort_by(|a, b| {
                    means[&b.id]
                        .total_cmp(&means[&a.id])
                        .then_with(|| newest_first(a, b))
                });
            }
        }

        let rows = rows.into_iter().cloned();
        Ok(match query.page {
            Some(page) => page.apply(rows),
            None => Paged::all(rows.collect()),
        })
    }

    async fn update_recipe(
        &self,
        id: DbId,
        changes: &RecipeChanges,
    ) -> Result<Option<Recipe>, CoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.recipes.get_mut(&id).map(|recipe| {
            changes.apply_to(recipe);
            recipe.updated_at = Utc::now();
            recipe.clone()
        }))
    }

    async fn delete_recipe(&self, id: DbId) -> Result<bool, CoreError> {
        let mut tables = self.tables.write().await;
        let removed = tables.recipes.remove(&id).is_some();
        if removed {
            tables.ratings.retain(|r| r.recipe_id != id);
        }
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

#[async_trait]
impl RatingStore for MemoryStore {
    async fn insert_rating(
        &self,
        recipe_id: DbId,
        rater_id: DbId,
        input: &NewRating,
    ) -> Result<Rating, CoreError> {
        self.tables
            .write()
            .await
            .push_rating(recipe_id, rater_id, input, Utc::now())
    }

    async fn find_rating(
        &self,
        recipe_id: DbId,
        rater_id: DbId,
    ) -> Result<Option<Rating>, CoreError> {
        Ok(self
            .tables
            .read()
            .await
            .ratings
            .iter()
            .find(|r| r.recipe_id == recipe_id && r.rater_id == rater_id)
            .cloned())
    }

    async fn aggregate_ratings(&self, recipe_id: DbId) -> Result<RatingAggregate, CoreError> {
        Ok(self.tables.read().await.aggregate(recipe_id))
    }

    async fn list_ratings(
        &self,
        recipe_id: DbId,
        order: RatingOrder,
        page: PageRequest,
    ) -> Result<Paged<Rating>, CoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&Rating> = tables
            .ratings
            .iter()
            .filter(|r| r.recipe_id == recipe_id)
            .collect();

        let newest_first =
            |a: &&Rating, b: &&Rating| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id));

        match order {
            RatingOrder::Highest => {
                rows.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| newest_first(a, b)))
            }
            RatingOrder::Lowest => {
                rows.sort_by(|a, b| a.score.cmp(&b.score).then_with(|| newest_first(a, b)))
            }
            RatingOrder::Recent => rows.sort_by(newest_first),
        }

        Ok(page.apply(rows.into_iter().cloned()))
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_user(&self, id: DbId) -> Result<Option<UserSummary>, CoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl ImageStore for MemoryStore {
    async fn insert_image(&self, name: &str, data: &[u8]) -> Result<ImageInfo, CoreError> {
        let mut tables = self.tables.write().await;
        if tables.images.contains_key(name) {
            return Err(CoreError::Conflict(format!("Image '{name}' already exists")));
        }
        let now = Utc::now();
        let info = ImageInfo {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.images.insert(
            name.to_string(),
            StoredImageRow {
                info: info.clone(),
                data: data.to_vec(),
            },
        );
        Ok(info)
    }

    async fn find_image_data(&self, name: &str) -> Result<Option<Vec<u8>>, CoreError> {
        Ok(self
            .tables
            .read()
            .await
            .images
            .get(name)
            .map(|row| row.data.clone()))
    }

    async fn find_image_info(&self, name: &str) -> Result<Option<ImageInfo>, CoreError> {
        Ok(self
            .tables
            .read()
            .await
            .images
            .get(name)
            .map(|row| row.info.clone()))
    }

    async fn delete_image(&self, name: &str) -> Result<bool, CoreError> {
        Ok(self.tables.write().await.images.remove(name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use chrono::Duration;

    use super::*;

    fn new_recipe(title: &str) -> NewRecipe {
        NewRecipe {
            title: title.into(),
            ingredients: "water".into(),
            preparation: "boil".into(),
            about: "simple".into(),
            photo_url: None,
        }
    }

    fn score(score: i32) -> NewRating {
        NewRating {
            score,
            comment: None,
        }
    }

    #[tokio::test]
    async fn concurrent_duplicate_ratings_only_one_wins() {
        let store = Arc::new(MemoryStore::new());
        let recipe_id = store.insert_recipe(1, &new_recipe("Tea")).await.unwrap().id;

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.insert_rating(recipe_id, 2, &score(1 + i % 5)).await })
            })
            .collect();

        let mut ok = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(err) => assert_matches!(err, CoreError::Conflict(_)),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(store.aggregate_ratings(recipe_id).await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn rating_order_breaks_ties_newest_first() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let old = store.seed_recipe(1, &new_recipe("Old"), now - Duration::days(2)).await;
        let new = store.seed_recipe(1, &new_recipe("New"), now - Duration::days(1)).await;
        let rated = store.seed_recipe(1, &new_recipe("Rated"), now - Duration::days(3)).await;
        store.seed_rating(rated.id, 2, &score(1), now).await.unwrap();

        let page = store
            .query_recipes(&RecipeQuery {
                author_id: None,
                search: None,
                order: RecipeOrder::Rating,
                page: None,
            })
            .await
            .unwrap();
        let ids: Vec<DbId> = page.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![rated.id, new.id, old.id]);
    }

    #[tokio::test]
    async fn deleting_recipe_drops_its_ratings() {
        let store = MemoryStore::new();
        let recipe = store.insert_recipe(1, &new_recipe("Tea")).await.unwrap();
        store.insert_rating(recipe.id, 2, &score(5)).await.unwrap();

        assert!(store.delete_recipe(recipe.id).await.unwrap());
        assert_eq!(store.aggregate_ratings(recipe.id).await.unwrap().count, 0);
        assert!(!store.delete_recipe(recipe.id).await.unwrap());
    }

    #[tokio::test]
    async fn ratings_list_orders() {
        let store = MemoryStore::new();
        let now = Utc::now();
        for (rater, s, age) in [(2, 3, 3), (3, 5, 2), (4, 1, 1)] {
            store
                .seed_rating(10, rater, &score(s), now - Duration::days(age))
                .await
                .unwrap();
        }
        let page = PageRequest::new(10, 0).unwrap();
        let scores = |p: Paged<Rating>| p.items.iter().map(|r| r.score).collect::<Vec<_>>();

        let highest = store.list_ratings(10, RatingOrder::Highest, page).await.unwrap();
        assert_eq!(scores(highest), vec![5, 3, 1]);
        let lowest = store.list_ratings(10, RatingOrder::Lowest, page).await.unwrap();
        assert_eq!(scores(lowest), vec![1, 3, 5]);
        let recent = store.list_ratings(10, RatingOrder::Recent, page).await.unwrap();
        assert_eq!(scores(recent), vec![1, 5, 3]);
    }
}
