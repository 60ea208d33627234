//! User projection model.

use recipebox_core::types::DbId;
use recipebox_core::user::UserSummary;
use sqlx::FromRow;

/// The public columns of a `users` row.
#[derive(Debug, Clone, FromRow)]
pub struct UserSummaryRow {
    pub id: DbId,
    pub name: String,
    pub photo_url: Option<String>,
}

impl From<UserSummaryRow> for UserSummary {
    fn from(row: UserSummaryRow) -> Self {
        UserSummary {
            id: row.id,
            name: row.name,
            photo_url: row.photo_url,
        }
    }
}
