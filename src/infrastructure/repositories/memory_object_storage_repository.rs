use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::DomainError;
use crate::domain::models::storage::{ImageTransform, StoredObject, UploadOptions};
use crate::domain::repositories::object_storage_repository::ObjectStorageRepository;

/// Object kept by the in-memory storage
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryObject {
    pub bytes: Bytes,
    pub content_type: String,
    pub cache_control: String,
}

/// In-process object storage; public URLs point at `public_base_url`
pub struct MemoryObjectStorageRepository {
    public_base_url: String,
    objects: Mutex<HashMap<String, MemoryObject>>,
}

impl MemoryObjectStorageRepository {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, path: &str) -> Option<MemoryObject> {
        self.objects
            .lock()
            .ok()
            .and_then(|objects| objects.get(path).cloned())
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStorageRepository for MemoryObjectStorageRepository {
    async fn upload(
        &self,
        path: &str,
        bytes: Bytes,
        content_type: &str,
        options: &UploadOptions,
    ) -> Result<StoredObject, DomainError> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| DomainError::UploadError("Object storage lock poisoned".to_string()))?;

        if !options.upsert && objects.contains_key(path) {
            return Err(DomainError::UploadError(format!(
                "The resource already exists: {}",
                path
            )));
        }

        objects.insert(
            path.to_string(),
            MemoryObject {
                bytes,
                content_type: content_type.to_string(),
                cache_control: options.cache_control.clone(),
            },
        );

        tracing::debug!("Stored object {}", path);
        Ok(StoredObject {
            path: path.to_string(),
        })
    }

    fn get_public_url(&self, path: &str, transform: Option<&ImageTransform>) -> Result<String, DomainError> {
        let mut url = format!("{}/{}", self.public_base_url, path.trim_start_matches('/'));
        if let Some(transform) = transform {
            let query: Vec<String> = transform
                .query_pairs()
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            if !query.is_empty() {
                url.push('?');
                url.push_str(&query.join("&"));
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refuses_to_overwrite_without_upsert() {
        let storage = MemoryObjectStorageRepository::new("http://localhost/storage/");
        let options = UploadOptions::default();

        storage
            .upload("drawings/a.jpg", Bytes::from_static(b"1"), "image/jpeg", &options)
            .await
            .unwrap();
        assert!(matches!(
            storage
                .upload("drawings/a.jpg", Bytes::from_static(b"2"), "image/jpeg", &options)
                .await,
            Err(DomainError::UploadError(_))
        ));

        let stored = storage.get("drawings/a.jpg").unwrap();
        assert_eq!(stored.bytes, Bytes::from_static(b"1"));
        assert_eq!(stored.cache_control, "3600");
    }

    #[test]
    fn public_url_appends_transform() {
        let storage = MemoryObjectStorageRepository::new("http://localhost/storage");
        assert_eq!(
            storage.get_public_url("avatars/x.png", None).unwrap(),
            "http://localhost/storage/avatars/x.png"
        );

        let transform = ImageTransform {
            width: Some(80),
            height: Some(80),
            ..ImageTransform::default()
        };
        assert_eq!(
            storage.get_public_url("avatars/x.png", Some(&transform)).unwrap(),
            "http://localhost/storage/avatars/x.png?width=80&height=80"
        );
    }
}
