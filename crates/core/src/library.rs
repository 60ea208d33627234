//! Image upload, lookup and on-read scaling.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::error::CoreError;
use crate::imaging::{self, DEFAULT_IMAGE};
use crate::store::ImageStore;
use crate::types::Timestamp;

/// Accepted upload extensions (case-insensitive).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Metadata of a stored image, without its bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageInfo {
    pub id: Uuid,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of an upload: the stored name and where it is served from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredImage {
    pub name: String,
    pub url: String,
}

/// Check an uploaded file name.
///
/// Only an extension between a non-leading dot and the end of the name is
/// checked; names without one are accepted. Path separators are refused
/// because the stored name becomes a URL path segment.
pub fn validate_upload_name(file_name: &str) -> Result<(), CoreError> {
    if file_name.trim().is_empty() {
        return Err(CoreError::Validation("Image file name must not be empty".into()));
    }
    if file_name.contains(['/', '\\']) {
        return Err(CoreError::Validation(
            "Image file name must not contain path separators".into(),
        ));
    }
    if let Some(dot) = file_name.rfind('.') {
        if dot > 0 && dot < file_name.len() - 1 {
            let extension = file_name[dot + 1..].to_ascii_lowercase();
            if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Unsupported image format '{extension}'. Must be one of: {ALLOWED_EXTENSIONS:?}"
                )));
            }
        }
    }
    Ok(())
}

/// Image lookups backed by an [`ImageStore`].
#[derive(Clone)]
pub struct ImageLibrary {
    images: Arc<dyn ImageStore>,
    base_url: String,
}

impl ImageLibrary {
    /// `base_url` prefixes the `/images/<name>` URLs handed back on upload.
    pub fn new(images: Arc<dyn ImageStore>, base_url: impl Into<String>) -> Self {
        Self {
            images,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Store an uploaded image under `<uuid>-<file_name>`.
    pub async fn store(&self, file_name: &str, data: &[u8]) -> Result<StoredImage, CoreError> {
        validate_upload_name(file_name)?;
        if data.is_empty() {
            return Err(CoreError::Validation("Image payload is empty".into()));
        }

        let name = format!("{}-{file_name}", Uuid::new_v4());
        let info = self.images.insert_image(&name, data).await?;
        tracing::info!(image = %info.name, bytes = data.len(), "Image stored");

        Ok(StoredImage {
            url: self.url_for(&info.name),
            name: info.name,
        })
    }

    pub fn url_for(&self, name: &str) -> String {
        format!("{}/images/{name}", self.base_url)
    }

    pub async fn info(&self, name: &str) -> Result<ImageInfo, CoreError> {
        self.images
            .find_image_info(name)
            .await?
            .ok_or_else(|| CoreError::not_found("Image", name))
    }

    pub async fn delete(&self, name: &str) -> Result<(), CoreError> {
        if !self.images.delete_image(name).await? {
            return Err(CoreError::not_found("Image", name));
        }
        tracing::info!(image = %name, "Image deleted");
        Ok(())
    }

    /// Stored bytes for `name`, or the built-in placeholder when nothing
    /// matches.
    pub async fn original(&self, name: &str) -> Result<Vec<u8>, CoreError> {
        match self.images.find_image_data(name).await? {
            Some(data) => Ok(data),
            None => {
                tracing::debug!(image = %name, "Image not found, serving default");
                Ok(DEFAULT_IMAGE.clone())
            }
        }
    }

    /// Resolve `name` (with default fallback) and scale it to
    /// `width x height`. Storage is never modified; each request scales
    /// the stored original.
    pub async fn fetch(&self, name: &str, width: u32, height: u32) -> Result<Vec<u8>, CoreError> {
        let data = self.original(name).await?;
        if width == 0 || height == 0 {
            return Ok(data);
        }
        tokio::task::spawn_blocking(move || imaging::scale(&data, width, height))
            .await
            .map_err(|e| CoreError::Internal(format!("Image transform task failed: {e}")))
    }
}
