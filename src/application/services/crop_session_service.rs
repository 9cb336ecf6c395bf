use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::dto::crop_session_dto::{ConfirmCropDto, CropSessionDto, CurrentCropDto};
use crate::domain::errors::DomainError;
use crate::domain::models::crop_queue::SelectionOutcome;
use crate::domain::models::drawing::DrawingFile;
use crate::domain::models::selected_file::SelectedFile;
use crate::application::services::crop_queue_controller::CropQueueController;
use crate::infrastructure::imaging::preview::preview_data_url;
use crate::infrastructure::logging::logger;

/// Sessions untouched for longer than this are dropped
const SESSION_TTL: Duration = Duration::from_secs(60 * 60);

struct CropSession {
    controller: Mutex<CropQueueController>,
    touched: std::sync::Mutex<Instant>,
}

impl CropSession {
    fn touch(&self) {
        if let Ok(mut touched) = self.touched.lock() {
            *touched = Instant::now();
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.touched
            .lock()
            .map(|touched| now.duration_since(*touched) > SESSION_TTL)
            .unwrap_or(true)
    }
}

/// Drawings handed over by a finished session, with their titles by index
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDrawings {
    pub files: Vec<DrawingFile>,
    pub titles: Vec<String>,
}

/// Crop queue runs addressed by id, for callers that drive the crop tool remotely
pub struct CropSessionService {
    sessions: Mutex<HashMap<Uuid, Arc<CropSession>>>,
    aspect: f32,
}

impl CropSessionService {
    pub fn new(aspect: f32) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            aspect,
        }
    }

    /// Start a session over the selected files and load the first source
    pub async fn start(
        &self,
        files: Vec<SelectedFile>,
        enable_crop: bool,
    ) -> Result<CropSessionDto, DomainError> {
        if let Some(file) = files.iter().find(|file| !file.is_image()) {
            return Err(DomainError::ValidationError(format!(
                "{} is not an image ({})",
                file.name, file.content_type
            )));
        }

        let mut controller = CropQueueController::new(enable_crop, self.aspect);
        let outcome = controller.select(files);

        let id = Uuid::new_v4();
        let session = Arc::new(CropSession {
            controller: Mutex::new(controller),
            touched: std::sync::Mutex::new(Instant::now()),
        });

        {
            let mut sessions = self.sessions.lock().await;
            let now = Instant::now();
            sessions.retain(|_, session| !session.is_expired(now));
            sessions.insert(id, Arc::clone(&session));
        }

        match outcome {
            SelectionOutcome::Started { total } => {
                logger::info(&format!("Crop session {} started with {} file(s)", id, total));
                self.load_source(&session).await;
            }
            SelectionOutcome::Bypassed(files) => {
                logger::info(&format!("Crop session {} holds {} uncropped file(s)", id, files.len()));
            }
            SelectionOutcome::Empty => {
                logger::debug(&format!("Crop session {} started with no files", id));
            }
        }

        Ok(Self::view(id, &session).await)
    }

    pub async fn get(&self, id: Uuid) -> Result<CropSessionDto, DomainError> {
        let session = self.session(id).await?;
        self.load_source(&session).await;
        Ok(Self::view(id, &session).await)
    }

    /// Confirm the current crop and load the next source
    pub async fn confirm(&self, id: Uuid, request: ConfirmCropDto) -> Result<CropSessionDto, DomainError> {
        let session = self.session(id).await?;

        {
            let mut controller = session.controller.lock().await;
            match request.region {
                Some(region) => {
                    controller.confirm(region).await?;
                }
                None => {
                    if let Some(tool) = controller.tool_mut() {
                        if let Some(zoom) = request.zoom {
                            tool.set_zoom(zoom);
                        }
                        if let Some(pan) = request.pan {
                            tool.set_pan(pan);
                        }
                    }
                    controller.confirm_tool().await?;
                }
            }
        }

        self.load_source(&session).await;
        Ok(Self::view(id, &session).await)
    }

    /// Cancel the run; the session is dropped
    pub async fn cancel(&self, id: Uuid) -> Result<CropSessionDto, DomainError> {
        let session = self.session(id).await?;
        session.controller.lock().await.cancel()?;
        self.sessions.lock().await.remove(&id);
        Ok(Self::view(id, &session).await)
    }

    pub async fn set_title(&self, id: Uuid, index: usize, title: String) -> Result<CropSessionDto, DomainError> {
        let session = self.session(id).await?;
        session.controller.lock().await.set_title(index, title)?;
        Ok(Self::view(id, &session).await)
    }

    /// Hand the finished drawings over for submission. The session is consumed.
    pub async fn take(&self, id: Uuid) -> Result<SessionDrawings, DomainError> {
        let session = self.session(id).await?;
        let drawings = {
            let controller = session.controller.lock().await;
            SessionDrawings {
                files: controller.drawings()?,
                titles: controller.titles().to_vec(),
            }
        };

        self.sessions.lock().await.remove(&id);
        Ok(drawings)
    }

    /// Put drawings back after a failed submission so the form can be resubmitted
    pub async fn restore(&self, id: Uuid, drawings: SessionDrawings) {
        let mut controller = CropQueueController::new(false, self.aspect);
        let SessionDrawings { files, titles } = drawings;
        controller.restore(files, titles);

        let session = Arc::new(CropSession {
            controller: Mutex::new(controller),
            touched: std::sync::Mutex::new(Instant::now()),
        });
        self.sessions.lock().await.insert(id, session);
    }

    async fn session(&self, id: Uuid) -> Result<Arc<CropSession>, DomainError> {
        let session = self
            .sessions
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("Crop session {}", id)))?;
        session.touch();
        Ok(session)
    }

    // The controller lock is released while decoding, so a cancel is never
    // blocked by a slow decode; a result that arrives late is discarded.
    async fn load_source(&self, session: &CropSession) {
        let request = session.controller.lock().await.decode_request();
        let Some(request) = request else {
            return;
        };

        let (ticket, result) = request.decode().await;
        let mut controller = session.controller.lock().await;
        if let Err(error) = controller.install_decoded(ticket, result) {
            logger::warn(&format!("Crop source could not be loaded: {}", error));
        }
    }

    async fn view(id: Uuid, session: &CropSession) -> CropSessionDto {
        let controller = session.controller.lock().await;
        let current = controller.current_file().map(|(index, file)| CurrentCropDto {
            index,
            file_name: file.name.clone(),
            preview_url: preview_data_url(file),
            dimensions: controller.source_dimensions(),
            region: controller.tool().map(|tool| tool.region()),
            load_error: controller.load_error().map(str::to_string),
        });

        CropSessionDto {
            id,
            status: controller.state(),
            enable_crop: controller.enable_crop(),
            total: controller.total(),
            completed: controller.completed(),
            titles: controller.titles().to_vec(),
            current,
        }
    }
}
