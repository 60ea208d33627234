//! Recipe row model.

use recipebox_core::recipe::Recipe;
use recipebox_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `recipes` table.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
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

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Recipe {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            ingredients: row.ingredients,
            preparation: row.preparation,
            about: row.about,
            photo_url: row.photo_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
