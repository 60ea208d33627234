//! Shared response envelope types for API handlers.
//!
//! Every JSON success body is `{ "data": ... }`.

use recipebox_core::catalog::RecipeView;
use recipebox_core::pagination::Paged;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// One page of recipes.
#[derive(Debug, Serialize)]
pub struct RecipePage {
    pub recipes: Vec<RecipeView>,
    pub has_more: bool,
}

impl From<Paged<RecipeView>> for RecipePage {
    fn from(page: Paged<RecipeView>) -> Self {
        Self {
            recipes: page.items,
            has_more: page.has_more,
        }
    }
}
