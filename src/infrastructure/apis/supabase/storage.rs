use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use url::Url;

use crate::domain::errors::DomainError;
use crate::domain::models::storage::{ImageTransform, StoredObject, UploadOptions};
use crate::domain::repositories::object_storage_repository::ObjectStorageRepository;

use super::{SupabaseClient, describe_error_response, encode_object_path};

/// Object storage backed by one Supabase Storage bucket
pub struct SupabaseObjectStorageRepository {
    client: Arc<SupabaseClient>,
    bucket: String,
}

impl SupabaseObjectStorageRepository {
    pub fn new(client: Arc<SupabaseClient>, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    fn object_url(&self, path: &str) -> String {
        self.client.endpoint(&format!(
            "/storage/v1/object/{}/{}",
            self.bucket,
            encode_object_path(path)
        ))
    }
}

#[async_trait]
impl ObjectStorageRepository for SupabaseObjectStorageRepository {
    async fn upload(
        &self,
        path: &str,
        bytes: Bytes,
        content_type: &str,
        options: &UploadOptions,
    ) -> Result<StoredObject, DomainError> {
        tracing::debug!("Uploading {} ({} bytes) to {}", path, bytes.len(), self.bucket);

        let request = self
            .client
            .http()
            .post(self.object_url(path))
            .header(CACHE_CONTROL, format!("max-age={}", options.cache_control))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", options.upsert.to_string())
            .body(bytes);

        let response = self.client.authorize(request).send().await.map_err(|e| {
            tracing::error!("Failed to upload {}: {}", path, e);
            DomainError::UploadError(format!("Failed to upload {}: {}", path, e))
        })?;

        if !response.status().is_success() {
            let message = describe_error_response("Object storage", response).await;
            tracing::error!("Upload of {} failed: {}", path, message);
            return Err(DomainError::UploadError(message));
        }

        Ok(StoredObject {
            path: path.to_string(),
        })
    }

    fn get_public_url(&self, path: &str, transform: Option<&ImageTransform>) -> Result<String, DomainError> {
        let pairs = transform.map(ImageTransform::query_pairs).unwrap_or_default();
        let prefix = if pairs.is_empty() {
            "/storage/v1/object/public"
        } else {
            "/storage/v1/render/image/public"
        };

        let raw = self.client.endpoint(&format!(
            "{}/{}/{}",
            prefix,
            self.bucket,
            encode_object_path(path)
        ));

        let mut url = Url::parse(&raw).map_err(|e| {
            DomainError::InternalError(format!("Invalid public URL '{}': {}", raw, e))
        })?;

        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in &pairs {
                query.append_pair(key, value);
            }
        }

        Ok(url.to_string())
    }
}
