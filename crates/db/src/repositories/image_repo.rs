//! Repository for the `images` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::image::ImageInfoRow;

/// Metadata columns; `data` is only selected when the bytes are needed.
const INFO_COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides storage for uploaded image bytes.
pub struct ImageRepo;

impl ImageRepo {
    /// Insert a new image, returning its metadata.
    pub async fn create(pool: &PgPool, name: &str, data: &[u8]) -> Result<ImageInfoRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO images (id, name, data) VALUES ($1, $2, $3) RETURNING {INFO_COLUMNS}"
        );
        sqlx::query_as::<_, ImageInfoRow>(&query)
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(data)
            .fetch_one(pool)
            .await
    }

    /// Fetch the raw bytes of an image by name.
    pub async fn find_data(pool: &PgPool, name: &str) -> Result<Option<Vec<u8>>, sqlx::Error> {
        sqlx::query_scalar::<_, Vec<u8>>("SELECT data FROM images WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Fetch image metadata by name.
    pub async fn find_info(pool: &PgPool, name: &str) -> Result<Option<ImageInfoRow>, sqlx::Error> {
        let query = format!("SELECT {INFO_COLUMNS} FROM images WHERE name = $1");
        sqlx::query_as::<_, ImageInfoRow>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Delete an image by name. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM images WHERE name = $1")
            .bind(name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
