use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;

use crate::domain::errors::DomainError;
use crate::domain::models::gallery::{GalleryItem, gallery_items};
use crate::domain::models::storage::{UploadOptions, object_path, random_suffix};
use crate::domain::models::testimonial::{NewTestimonial, PersistedTestimonial, TestimonialDraft};
use crate::domain::repositories::content_repository::{ContentRepository, ContentTable, OrderBy};
use crate::domain::repositories::object_storage_repository::ObjectStorageRepository;
use crate::infrastructure::logging::logger;

#[cfg(test)]
mod tests;

/// Where and how submission files are uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    pub cache_control: String,
    pub avatar_folder: String,
    pub drawing_folder: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            cache_control: UploadOptions::default().cache_control,
            avatar_folder: "avatars".to_string(),
            drawing_folder: "drawings".to_string(),
        }
    }
}

/// Service for reading and submitting testimonials
pub struct TestimonialService {
    content_repository: Arc<dyn ContentRepository>,
    object_storage: Arc<dyn ObjectStorageRepository>,
    settings: UploadSettings,
}

impl TestimonialService {
    pub fn new(
        content_repository: Arc<dyn ContentRepository>,
        object_storage: Arc<dyn ObjectStorageRepository>,
        settings: UploadSettings,
    ) -> Self {
        Self {
            content_repository,
            object_storage,
            settings,
        }
    }

    /// All testimonials, newest first
    pub async fn get_all(&self) -> Result<Vec<PersistedTestimonial>, DomainError> {
        logger::debug("Getting all testimonials");
        let rows = self
            .content_repository
            .select_all(ContentTable::Testimonials, &OrderBy::descending("created_at"))
            .await?;

        let testimonials = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<PersistedTestimonial>(row) {
                Ok(testimonial) => Some(testimonial),
                Err(error) => {
                    logger::warn(&format!("Skipping malformed testimonial row: {}", error));
                    None
                }
            })
            .collect();

        Ok(testimonials)
    }

    /// Every drawing of every testimonial, for the gallery section
    pub async fn gallery(&self) -> Result<Vec<GalleryItem>, DomainError> {
        let testimonials = self.get_all().await?;
        Ok(gallery_items(&testimonials))
    }

    /// Upload the draft's files in order, then write one testimonial record.
    ///
    /// Nothing touches the network until the draft validates. Uploads are
    /// awaited one at a time so `drawing_urls[i]` always belongs to
    /// `drawing_titles[i]`. Objects uploaded before a failure stay in storage.
    pub async fn submit(&self, draft: &TestimonialDraft) -> Result<PersistedTestimonial, DomainError> {
        draft.validate()?;

        logger::info(&format!(
            "Submitting testimonial from {} with {} drawing(s)",
            draft.name.trim(),
            draft.drawing_files.len()
        ));

        let avatar_url = match &draft.profile_image {
            Some(profile) => Some(
                self.upload_file(
                    &self.settings.avatar_folder,
                    &profile.name,
                    profile.bytes.clone(),
                    &profile.content_type,
                )
                .await?,
            ),
            None => None,
        };

        let mut drawing_urls = Vec::with_capacity(draft.drawing_files.len());
        for drawing in &draft.drawing_files {
            let url = self
                .upload_file(
                    &self.settings.drawing_folder,
                    drawing.name(),
                    drawing.bytes().clone(),
                    drawing.content_type(),
                )
                .await?;
            drawing_urls.push(url);
        }

        let record = NewTestimonial {
            name: draft.name.trim().to_string(),
            quote: draft.quote.trim().to_string(),
            course: draft.resolved_course(),
            stars: draft.stars,
            avatar_url,
            drawing_urls,
            drawing_titles: draft.trimmed_titles(),
        };

        let persisted = self.persist(&record).await?;
        logger::info(&format!("Testimonial {} saved", persisted.id));
        Ok(persisted)
    }

    async fn upload_file(
        &self,
        folder: &str,
        file_name: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<String, DomainError> {
        let path = object_path(folder, file_name, Utc::now().timestamp_millis(), &random_suffix());
        let options = UploadOptions {
            cache_control: self.settings.cache_control.clone(),
            upsert: false,
        };

        logger::debug(&format!("Uploading {} ({} bytes)", path, bytes.len()));
        let stored = self
            .object_storage
            .upload(&path, bytes, content_type, &options)
            .await
            .map_err(|error| match error {
                DomainError::UploadError(_) => error,
                other => DomainError::UploadError(format!("{}: {}", path, other)),
            })?;

        self.object_storage
            .get_public_url(&stored.path, None)
            .map_err(|error| DomainError::UploadError(format!("{}: {}", stored.path, error)))
    }

    async fn persist(&self, record: &NewTestimonial) -> Result<PersistedTestimonial, DomainError> {
        let row = serde_json::to_value(record)
            .map_err(|e| DomainError::InternalError(format!("Failed to serialize testimonial: {}", e)))?;

        let inserted = self
            .content_repository
            .insert_one(ContentTable::Testimonials, row)
            .await
            .map_err(|error| match error {
                DomainError::PersistError(_) => error,
                other => DomainError::PersistError(other.to_string()),
            })?;

        serde_json::from_value(inserted).map_err(|e| {
            DomainError::PersistError(format!("Unexpected testimonial returned by the store: {}", e))
        })
    }
}
