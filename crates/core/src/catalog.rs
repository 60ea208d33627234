//! Recipe catalog: publishing, editing and ranked listings.

use std::sync::Arc;

use serde::Serialize;

use crate::error::CoreError;
use crate::ordering::RecipeOrder;
use crate::pagination::{PageRequest, Paged};
use crate::rating::RatingAggregate;
use crate::recipe::{validate_search_term, NewRecipe, Recipe, RecipeChanges, RecipeQuery};
use crate::store::{RatingStore, RecipeStore, UserDirectory};
use crate::types::DbId;
use crate::user::UserSummary;
use crate::validation::validate_input;

/// A recipe as returned to readers: the record plus its author and its
/// live rating aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeView {
    #[serde(flatten)]
    pub recipe: Recipe,
    /// `None` when the owner is no longer in the user directory.
    pub author: Option<UserSummary>,
    pub rating: RatingAggregate,
}

#[derive(Clone)]
pub struct RecipeCatalog {
    recipes: Arc<dyn RecipeStore>,
    ratings: Arc<dyn RatingStore>,
    users: Arc<dyn UserDirectory>,
}

impl RecipeCatalog {
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

    /// List recipes, optionally restricted to one author. Without a page
    /// the whole ordered result is returned and `has_more` is `false`.
    pub async fn list(
        &self,
        author_id: Option<DbId>,
        page: Option<PageRequest>,
        order: RecipeOrder,
    ) -> Result<Paged<RecipeView>, CoreError> {
        let query = RecipeQuery {
            author_id,
            search: None,
            order,
            page,
        };
        let found = self.recipes.query_recipes(&query).await?;
        self.enrich_page(found).await
    }

    /// Case-insensitive substring search over `"title ingredients"`.
    pub async fn search(
        &self,
        term: &str,
        page: PageRequest,
        order: RecipeOrder,
    ) -> Result<Paged<RecipeView>, CoreError> {
        validate_search_term(term)?;
        let query = RecipeQuery {
            author_id: None,
            search: Some(term.to_string()),
            order,
            page: Some(page),
        };
        let found = self.recipes.query_recipes(&query).await?;
        self.enrich_page(found).await
    }

    pub async fn get_by_id(&self, id: DbId) -> Result<RecipeView, CoreError> {
        let recipe = self.find(id).await?;
        self.enrich(recipe).await
    }

    pub async fn create(&self, owner_id: DbId, input: NewRecipe) -> Result<RecipeView, CoreError> {
        validate_input(&input)?;
        let recipe = self.recipes.insert_recipe(owner_id, &input).await?;
        tracing::info!(recipe_id = recipe.id, owner_id, "Recipe published");
        self.enrich(recipe).await
    }

    /// Apply the non-blank fields of `changes`. Only the owner may edit.
    pub async fn update(
        &self,
        id: DbId,
        requester_id: DbId,
        changes: RecipeChanges,
    ) -> Result<RecipeView, CoreError> {
        let changes = changes.normalized()?;
        let recipe = self.find(id).await?;
        ensure_owner(&recipe, requester_id, "You cannot edit another user's recipe")?;

        let updated = self
            .recipes
            .update_recipe(id, &changes)
            .await?
            .ok_or_else(|| CoreError::not_found("Recipe", id))?;
        tracing::info!(recipe_id = id, "Recipe updated");
        self.enrich(updated).await
    }

    /// Hard-delete a recipe. Only the owner may delete.
    pub async fn delete(&self, id: DbId, requester_id: DbId) -> Result<(), CoreError> {
        let recipe = self.find(id).await?;
        ensure_owner(&recipe, requester_id, "You cannot delete another user's recipe")?;

        if !self.recipes.delete_recipe(id).await? {
            return Err(CoreError::not_found("Recipe", id));
        }
        tracing::info!(recipe_id = id, "Recipe deleted");
        Ok(())
    }

    async fn find(&self, id: DbId) -> Result<Recipe, CoreError> {
        self.recipes
            .find_recipe(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Recipe", id))
    }

    async fn enrich(&self, recipe: Recipe) -> Result<RecipeView, CoreError> {
        let author = self.users.find_user(recipe.owner_id).await?;
        let rating = self.ratings.aggregate_ratings(recipe.id).await?;
        Ok(RecipeView {
            recipe,
            author,
            rating,
        })
    }

    async fn enrich_page(&self, page: Paged<Recipe>) -> Result<Paged<RecipeView>, CoreError> {
        let mut items = Vec::with_capacity(page.items.len());
        for recipe in page.items {
            items.push(self.enrich(recipe).await?);
        }
        Ok(Paged {
            items,
            has_more: page.has_more,
        })
    }
}

fn ensure_owner(recipe: &Recipe, requester_id: DbId, message: &str) -> Result<(), CoreError> {
    if recipe.owner_id != requester_id {
        return Err(CoreError::Forbidden(message.into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::memory::MemoryStore;
    use crate::rating::NewRating;

    const OWNER: DbId = 1;
    const OTHER: DbId = 2;

    fn new_recipe(title: &str, ingredients: &str) -> NewRecipe {
        NewRecipe {
            title: title.into(),
            ingredients: ingredients.into(),
            preparation: "Misture tudo".into(),
            about: "Receita da casa".into(),
            photo_url: None,
        }
    }

    async fn setup() -> (Arc<MemoryStore>, RecipeCatalog) {
        let store = Arc::new(MemoryStore::new());
        store.add_user(OWNER, "Ana", None).await;
        store.add_user(OTHER, "Bruno", Some("http://x/b.png")).await;
        let catalog = RecipeCatalog::new(store.clone(), store.clone(), store.clone());
        (store, catalog)
    }

    fn titles(page: &Paged<RecipeView>) -> Vec<&str> {
        page.items.iter().map(|v| v.recipe.title.as_str()).collect()
    }

    #[tokio::test]
    async fn search_example_orders_by_recency_and_excludes_non_matches() {
        let (store, catalog) = setup().await;
        let now = Utc::now();
        for (title, days) in [
            ("Bolo de Chocolate", 5),
            ("Bolo de Cenoura", 3),
            ("Bolo de Cenoura com Chocolate", 2),
            ("Sopa de Legumes", 4),
        ] {
            store
                .seed_recipe(OWNER, &new_recipe(title, "ingredientes"), now - Duration::days(days))
                .await;
        }

        let page = catalog
            .search("bolo", PageRequest::new(10, 0).unwrap(), RecipeOrder::parse(Some("recent")))
            .await
            .unwrap();
        assert_eq!(
            titles(&page),
            vec!["Bolo de Cenoura com Chocolate", "Bolo de Cenoura", "Bolo de Chocolate"]
        );
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn short_search_term_is_rejected() {
        let (_, catalog) = setup().await;
        let result = catalog
            .search("bo", PageRequest::new(10, 0).unwrap(), RecipeOrder::Rating)
            .await;
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn rating_order_ranks_unrated_as_zero() {
        let (store, catalog) = setup().await;
        let now = Utc::now();
        let low = store.seed_recipe(OWNER, &new_recipe("Low", "a b c"), now - Duration::days(3)).await;
        let none = store.seed_recipe(OWNER, &new_recipe("None", "a b c"), now - Duration::days(2)).await;
        let high = store.seed_recipe(OWNER, &new_recipe("High", "a b c"), now - Duration::days(1)).await;
        for (recipe, score) in [(low.id, 2), (high.id, 5), (high.id, 4)] {
            let rater = if score == 4 { 3 } else { OTHER };
            store
                .seed_rating(recipe, rater, &NewRating { score, comment: None }, now)
                .await
                .unwrap();
        }

        let page = catalog.list(None, None, RecipeOrder::Rating).await.unwrap();
        assert_eq!(titles(&page), vec!["High", "Low", "None"]);
        assert_eq!(page.items[0].rating.mean_score, 4.5);
        assert_eq!(page.items[0].rating.count, 2);
        assert_eq!(page.items[2].recipe.id, none.id);
        assert_eq!(page.items[2].rating.count, 0);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn pages_reproduce_the_full_listing() {
        let (store, catalog) = setup().await;
        let now = Utc::now();
        for i in 0..7 {
            store
                .seed_recipe(OWNER, &new_recipe(&format!("Recipe {i}"), "xyz"), now - Duration::hours(i))
                .await;
        }
        let full = catalog.list(None, None, RecipeOrder::Oldest).await.unwrap();

        let mut collected = Vec::new();
        let mut number = 0;
        loop {
            let page = catalog
                .list(None, Some(PageRequest::new(3, number).unwrap()), RecipeOrder::Oldest)
                .await
                .unwrap();
            assert!(page.items.len() <= 3);
            collected.extend(page.items);
            if !page.has_more {
                break;
            }
            number += 1;
        }
        assert_eq!(collected, full.items);

        let beyond = catalog
            .list(None, Some(PageRequest::new(3, 10).unwrap()), RecipeOrder::Oldest)
            .await
            .unwrap();
        assert!(beyond.items.is_empty());
        assert!(!beyond.has_more);
    }

    #[tokio::test]
    async fn author_filter() {
        let (_, catalog) = setup().await;
        catalog.create(OWNER, new_recipe("Mine", "abc")).await.unwrap();
        catalog.create(OTHER, new_recipe("Theirs", "abc")).await.unwrap();

        let page = catalog.list(Some(OTHER), None, RecipeOrder::Recent).await.unwrap();
        assert_eq!(titles(&page), vec!["Theirs"]);
        assert_eq!(page.items[0].author.as_ref().unwrap().name, "Bruno");
    }

    #[tokio::test]
    async fn create_validates_before_persisting() {
        let (_, catalog) = setup().await;
        let result = catalog.create(OWNER, new_recipe("ab", "abc")).await;
        assert_matches!(result, Err(CoreError::Validation(_)));
        let all = catalog.list(None, None, RecipeOrder::Recent).await.unwrap();
        assert!(all.items.is_empty());
    }

    #[tokio::test]
    async fn update_applies_only_non_blank_fields() {
        let (_, catalog) = setup().await;
        let created = catalog.create(OWNER, new_recipe("Pudim", "leite")).await.unwrap();

        let changes = RecipeChanges {
            title: Some("Pudim de Leite".into()),
            ingredients: Some("  ".into()),
            ..Default::default()
        };
        let updated = catalog.update(created.recipe.id, OWNER, changes).await.unwrap();
        assert_eq!(updated.recipe.title, "Pudim de Leite");
        assert_eq!(updated.recipe.ingredients, "leite");
        assert_eq!(updated.recipe.owner_id, OWNER);
        assert!(updated.recipe.updated_at >= created.recipe.updated_at);
    }

    #[tokio::test]
    async fn only_owner_may_update_or_delete() {
        let (_, catalog) = setup().await;
        let id = catalog.create(OWNER, new_recipe("Pudim", "leite")).await.unwrap().recipe.id;

        let changes = RecipeChanges {
            title: Some("Hijacked".into()),
            ..Default::default()
        };
        assert_matches!(
            catalog.update(id, OTHER, changes).await,
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(catalog.delete(id, OTHER).await, Err(CoreError::Forbidden(_)));

        catalog.delete(id, OWNER).await.unwrap();
        assert_matches!(catalog.get_by_id(id).await, Err(CoreError::NotFound { .. }));
        assert_matches!(catalog.delete(id, OWNER).await, Err(CoreError::NotFound { .. }));
    }
}
