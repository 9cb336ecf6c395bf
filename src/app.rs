use std::sync::Arc;

use crate::application::services::contact_service::ContactService;
use crate::application::services::content_service::ContentService;
use crate::application::services::crop_session_service::CropSessionService;
use crate::application::services::testimonial_service::TestimonialService;
use crate::domain::errors::DomainError;
use crate::infrastructure::config::SiteConfig;
use crate::infrastructure::repositories::memory_object_storage_repository::MemoryObjectStorageRepository;

mod bootstrap;

pub struct AppState {
    pub config: SiteConfig,
    pub testimonial_service: Arc<TestimonialService>,
    pub crop_session_service: Arc<CropSessionService>,
    pub content_service: Arc<ContentService>,
    pub contact_service: Arc<ContactService>,
    /// Set with the memory backend, whose objects are served by this process
    pub memory_storage: Option<Arc<MemoryObjectStorageRepository>>,
}

impl AppState {
    pub fn new(config: SiteConfig) -> Result<Self, DomainError> {
        tracing::info!("Initializing application with {:?} backend", config.backend);

        let repositories = bootstrap::build_repositories(&config)?;
        let memory_storage = repositories.memory_storage.clone();
        let services = bootstrap::build_services(&config, repositories);

        tracing::info!("Application initialized successfully");

        Ok(Self {
            config,
            testimonial_service: services.testimonial_service,
            crop_session_service: services.crop_session_service,
            content_service: services.content_service,
            contact_service: services.contact_service,
            memory_storage,
        })
    }
}
