use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::DomainError;
use crate::domain::models::storage::{ImageTransform, StoredObject, UploadOptions};

/// Binary object storage with public URLs
#[async_trait]
pub trait ObjectStorageRepository: Send + Sync {
    /// Upload one object
    async fn upload(
        &self,
        path: &str,
        bytes: Bytes,
        content_type: &str,
        options: &UploadOptions,
    ) -> Result<StoredObject, DomainError>;

    /// Public URL of an object, optionally through the image transformer
    fn get_public_url(&self, path: &str, transform: Option<&ImageTransform>) -> Result<String, DomainError>;
}
