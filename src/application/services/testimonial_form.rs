use std::sync::Arc;

use crate::application::services::crop_queue_controller::CropQueueController;
use crate::application::services::testimonial_service::TestimonialService;
use crate::domain::errors::DomainError;
use crate::domain::models::crop_queue::SelectionOutcome;
use crate::domain::models::selected_file::SelectedFile;
use crate::domain::models::testimonial::{PersistedTestimonial, TestimonialDraft};
use crate::infrastructure::logging::logger;

/// State of the testimonial section: the draft being edited, its crop queue
/// and the list of testimonials already shown.
pub struct TestimonialForm {
    service: Arc<TestimonialService>,
    draft: TestimonialDraft,
    crop: CropQueueController,
    testimonials: Vec<PersistedTestimonial>,
}

impl TestimonialForm {
    pub fn new(service: Arc<TestimonialService>, crop: CropQueueController) -> Self {
        Self {
            service,
            draft: TestimonialDraft::default(),
            crop,
            testimonials: Vec::new(),
        }
    }

    pub fn draft(&self) -> &TestimonialDraft {
        &self.draft
    }

    /// Text fields, course, stars and the profile image are edited here.
    /// Drawings go through `select_drawings` and the crop queue.
    pub fn draft_mut(&mut self) -> &mut TestimonialDraft {
        &mut self.draft
    }

    pub fn crop(&self) -> &CropQueueController {
        &self.crop
    }

    pub fn crop_mut(&mut self) -> &mut CropQueueController {
        &mut self.crop
    }

    pub fn testimonials(&self) -> &[PersistedTestimonial] {
        &self.testimonials
    }

    /// Reload the list from the content store
    pub async fn refresh(&mut self) -> Result<(), DomainError> {
        self.testimonials = self.service.get_all().await?;
        Ok(())
    }

    pub fn select_drawings(&mut self, files: Vec<SelectedFile>) -> SelectionOutcome {
        self.crop.select(files)
    }

    pub fn set_drawing_title(&mut self, index: usize, title: impl Into<String>) -> Result<(), DomainError> {
        self.crop.set_title(index, title)
    }

    /// Cancel cropping; the drawing selection is cleared with it
    pub fn cancel_crop(&mut self) -> Result<usize, DomainError> {
        let discarded = self.crop.cancel()?;
        self.draft.drawing_files.clear();
        self.draft.drawing_titles.clear();
        Ok(discarded)
    }

    /// Submit the draft. On success the new testimonial is shown first and the
    /// form starts over; on failure the draft is kept for another attempt.
    pub async fn submit(&mut self) -> Result<PersistedTestimonial, DomainError> {
        self.draft.drawing_files = self.crop.drawings()?;
        self.draft.drawing_titles = self.crop.titles().to_vec();

        let persisted = self.service.submit(&self.draft).await?;

        self.testimonials.insert(0, persisted.clone());
        self.draft = TestimonialDraft::default();
        self.crop.reset();
        logger::debug(&format!("Form reset after testimonial {}", persisted.id));

        Ok(persisted)
    }
}
