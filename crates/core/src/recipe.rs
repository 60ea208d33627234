//! Recipe records, their input DTOs, and listing queries.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::ordering::RecipeOrder;
use crate::pagination::PageRequest;
use crate::types::{DbId, Timestamp};
use crate::validation::{non_blank, validate_input};

/// Minimum length of a search term, in characters.
pub const MIN_SEARCH_LEN: usize = 3;

/// A published recipe. `owner_id` never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub ingredients: String,
    pub preparation: String,
    pub about: String,
    pub photo_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for publishing a recipe.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewRecipe {
    #[validate(length(min = 3, max = 30, message = "must be between 3 and 30 characters"))]
    pub title: String,
    #[validate(length(min = 3, max = 3000, message = "must be between 3 and 3000 characters"))]
    pub ingredients: String,
    #[validate(length(min = 3, max = 3000, message = "must be between 3 and 3000 characters"))]
    pub preparation: String,
    #[validate(length(min = 3, max = 3000, message = "must be between 3 and 3000 characters"))]
    pub about: String,
    pub photo_url: Option<String>,
}

/// DTO for editing a recipe. Absent or blank fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RecipeChanges {
    #[validate(length(min = 3, max = 30, message = "must be between 3 and 30 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 3, max = 3000, message = "must be between 3 and 3000 characters"))]
    pub ingredients: Option<String>,
    #[validate(length(min = 3, max = 3000, message = "must be between 3 and 3000 characters"))]
    pub preparation: Option<String>,
    #[validate(length(min = 3, max = 3000, message = "must be between 3 and 3000 characters"))]
    pub about: Option<String>,
    pub photo_url: Option<String>,
}

impl RecipeChanges {
    /// Drop blank fields, then check the remaining ones against the same
    /// bounds as [`NewRecipe`].
    pub fn normalized(self) -> Result<Self, CoreError> {
        let changes = Self {
            title: non_blank(self.title),
            ingredients: non_blank(self.ingredients),
            preparation: non_blank(self.preparation),
            about: non_blank(self.about),
            photo_url: non_blank(self.photo_url),
        };
        validate_input(&changes)?;
        Ok(changes)
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.ingredients.is_none()
            && self.preparation.is_none()
            && self.about.is_none()
            && self.photo_url.is_none()
    }

    /// Apply the present fields to `recipe` in place.
    pub fn apply_to(&self, recipe: &mut Recipe) {
        if let Some(title) = &self.title {
            recipe.title.clone_from(title);
        }
        if let Some(ingredients) = &self.ingredients {
            recipe.ingredients.clone_from(ingredients);
        }
        if let Some(preparation) = &self.preparation {
            recipe.preparation.clone_from(preparation);
        }
        if let Some(about) = &self.about {
            recipe.about.clone_from(about);
        }
        if let Some(photo_url) = &self.photo_url {
            recipe.photo_url = Some(photo_url.clone());
        }
    }
}

/// A recipe listing request as handed to a [`RecipeStore`](crate::store::RecipeStore).
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeQuery {
    pub author_id: Option<DbId>,
    /// Case-insensitive substring over `"title ingredients"`.
    pub search: Option<String>,
    pub order: RecipeOrder,
    /// `None` returns the full ordered result.
    pub page: Option<PageRequest>,
}

/// Check a search term's length.
pub fn validate_search_term(term: &str) -> Result<(), CoreError> {
    if term.chars().count() < MIN_SEARCH_LEN {
        return Err(CoreError::Validation(format!(
            "Search term must be at least {MIN_SEARCH_LEN} characters"
        )));
    }
    Ok(())
}

/// The text a search term is matched against: title and ingredients
/// joined by one space, so a term may span the boundary.
pub fn searchable_text(title: &str, ingredients: &str) -> String {
    format!("{title} {ingredients}")
}

/// Case-insensitive literal substring match of `term` against a recipe.
pub fn matches_search(recipe: &Recipe, term: &str) -> bool {
    searchable_text(&recipe.title, &recipe.ingredients)
        .to_lowercase()
        .contains(&term.to_lowercase())
}

/// Escape `LIKE` metacharacters so `term` matches literally inside
/// `'%' || term || '%'` (escape character `\`).
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
