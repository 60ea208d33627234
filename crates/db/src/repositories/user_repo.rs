//! Read-only repository for the `users` table.

use recipebox_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::UserSummaryRow;

pub struct UserRepo;

impl UserRepo {
    /// Find the public projection of a user.
    pub async fn find_summary(pool: &PgPool, id: DbId) -> Result<Option<UserSummaryRow>, sqlx::Error> {
        sqlx::query_as::<_, UserSummaryRow>("SELECT id, name, photo_url FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
