//! User references as seen by the catalog.

use serde::Serialize;

use crate::types::DbId;

/// Public projection of a user, attached to recipes and ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub name: String,
    pub photo_url: Option<String>,
}
