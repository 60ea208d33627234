//! Image row models. Bytes and metadata are read separately so metadata
//! lookups never pull the blob.

use recipebox_core::library::ImageInfo;
use recipebox_core::types::Timestamp;
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata columns of the `images` table.
#[derive(Debug, Clone, FromRow)]
pub struct ImageInfoRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ImageInfoRow> for ImageInfo {
    fn from(row: ImageInfoRow) -> Self {
        ImageInfo {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
