//! Query-string parameter types for the listing handlers.
//!
//! No `#[serde(flatten)]` here: flattened query values arrive as strings
//! and do not parse as numbers.

use recipebox_core::error::CoreError;
use recipebox_core::pagination::{PageRequest, DEFAULT_PAGE_SIZE};
use recipebox_core::types::DbId;
use serde::Deserialize;

/// Page request with `DEFAULT_PAGE_SIZE` and page `0` filled in.
fn page_or_default(page_size: Option<i64>, page: Option<i64>) -> Result<PageRequest, CoreError> {
    PageRequest::new(page_size.unwrap_or(DEFAULT_PAGE_SIZE), page.unwrap_or(0))
}

/// `GET /recipes`: pagination only applies when both parts are given.
#[derive(Debug, Deserialize)]
pub struct RecipeListParams {
    pub author_id: Option<DbId>,
    pub page_size: Option<i64>,
    pub page: Option<i64>,
    pub order_by: Option<String>,
}

impl RecipeListParams {
    pub fn page(&self) -> Result<Option<PageRequest>, CoreError> {
        PageRequest::optional(self.page_size, self.page)
    }
}

/// `GET /recipes/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub page_size: Option<i64>,
    pub page: Option<i64>,
    pub order_by: Option<String>,
}

impl SearchParams {
    pub fn page(&self) -> Result<PageRequest, CoreError> {
        page_or_default(self.page_size, self.page)
    }
}

/// `GET /ratings/{recipe_id}`.
#[derive(Debug, Deserialize)]
pub struct RatingListParams {
    pub page_size: Option<i64>,
    pub page: Option<i64>,
    pub order_by: Option<String>,
}

impl RatingListParams {
    pub fn page(&self) -> Result<PageRequest, CoreError> {
        page_or_default(self.page_size, self.page)
    }
}
