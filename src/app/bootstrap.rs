use std::sync::Arc;

use crate::application::services::contact_service::ContactService;
use crate::application::services::content_service::ContentService;
use crate::application::services::crop_session_service::CropSessionService;
use crate::application::services::testimonial_service::{TestimonialService, UploadSettings};
use crate::domain::errors::DomainError;
use crate::domain::models::crop_tool::DEFAULT_ASPECT;
use crate::domain::repositories::content_repository::ContentRepository;
use crate::domain::repositories::email_repository::EmailRepository;
use crate::domain::repositories::object_storage_repository::ObjectStorageRepository;
use crate::infrastructure::apis::emailjs_repository::EmailJsRepository;
use crate::infrastructure::apis::supabase::{
    SupabaseClient, SupabaseContentRepository, SupabaseObjectStorageRepository,
};
use crate::infrastructure::config::{BackendKind, EmailConfig, SiteConfig};
use crate::infrastructure::repositories::memory_content_repository::MemoryContentRepository;
use crate::infrastructure::repositories::memory_email_repository::MemoryEmailRepository;
use crate::infrastructure::repositories::memory_object_storage_repository::MemoryObjectStorageRepository;

pub(super) struct AppServices {
    pub testimonial_service: Arc<TestimonialService>,
    pub crop_session_service: Arc<CropSessionService>,
    pub content_service: Arc<ContentService>,
    pub contact_service: Arc<ContactService>,
}

pub(super) struct AppRepositories {
    content_repository: Arc<dyn ContentRepository>,
    object_storage: Arc<dyn ObjectStorageRepository>,
    email_repository: Arc<dyn EmailRepository>,
    pub memory_storage: Option<Arc<MemoryObjectStorageRepository>>,
}

pub(super) fn build_repositories(config: &SiteConfig) -> Result<AppRepositories, DomainError> {
    let email_repository = build_email_repository(&config.email)?;

    match config.backend {
        BackendKind::Supabase => {
            let client = Arc::new(SupabaseClient::new(
                &config.supabase.url,
                &config.supabase.anon_key,
            )?);
            tracing::info!("Using Supabase at {}", config.supabase.url);

            Ok(AppRepositories {
                content_repository: Arc::new(SupabaseContentRepository::new(client.clone())),
                object_storage: Arc::new(SupabaseObjectStorageRepository::new(
                    client,
                    config.supabase.bucket.clone(),
                )),
                email_repository,
                memory_storage: None,
            })
        }
        BackendKind::Memory => {
            let public_base_url = format!("http://{}/storage", config.server.bind);
            let memory_storage = Arc::new(MemoryObjectStorageRepository::new(public_base_url));
            tracing::warn!("Using the in-memory backend; nothing is persisted across restarts");

            Ok(AppRepositories {
                content_repository: Arc::new(MemoryContentRepository::new()),
                object_storage: memory_storage.clone(),
                email_repository,
                memory_storage: Some(memory_storage),
            })
        }
    }
}

fn build_email_repository(config: &EmailConfig) -> Result<Arc<dyn EmailRepository>, DomainError> {
    let configured = [&config.service_id, &config.template_id, &config.public_key]
        .iter()
        .all(|value| !value.trim().is_empty());

    if configured {
        Ok(Arc::new(EmailJsRepository::new(config.clone())?))
    } else {
        tracing::warn!("EmailJS is not configured; contact messages are only recorded locally");
        Ok(Arc::new(MemoryEmailRepository::new()))
    }
}

pub(super) fn build_services(config: &SiteConfig, repositories: AppRepositories) -> AppServices {
    let settings = UploadSettings {
        cache_control: config.upload_cache_control(),
        avatar_folder: config.uploads.avatar_folder.clone(),
        drawing_folder: config.uploads.drawing_folder.clone(),
    };

    AppServices {
        testimonial_service: Arc::new(TestimonialService::new(
            repositories.content_repository.clone(),
            repositories.object_storage,
            settings,
        )),
        crop_session_service: Arc::new(CropSessionService::new(DEFAULT_ASPECT)),
        content_service: Arc::new(ContentService::new(repositories.content_repository)),
        contact_service: Arc::new(ContactService::new(repositories.email_repository)),
    }
}
