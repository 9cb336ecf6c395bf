use std::sync::Arc;

use bytes::Bytes;

use crate::domain::errors::DomainError;
use crate::domain::models::crop::{CropRegion, CroppedFile, ImageDimensions};
use crate::domain::models::crop_queue::{CropProgress, CropQueue, CropQueueState, SelectionOutcome};
use crate::domain::models::crop_tool::{CropTool, DEFAULT_ASPECT};
use crate::domain::models::drawing::DrawingFile;
use crate::domain::models::selected_file::SelectedFile;
use crate::infrastructure::imaging::crop_encoder::{DecodedImage, crop_to_jpeg_async, decode_image_async};
use crate::infrastructure::logging::logger;

/// Identifies which queue position a decode was started for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeTicket {
    run: u64,
    index: usize,
}

/// Source image waiting to be decoded for the crop tool
#[derive(Debug, Clone)]
pub struct DecodeRequest {
    pub ticket: DecodeTicket,
    pub bytes: Bytes,
}

impl DecodeRequest {
    pub async fn decode(self) -> (DecodeTicket, Result<DecodedImage, DomainError>) {
        let result = decode_image_async(self.bytes).await;
        (self.ticket, result)
    }
}

#[derive(Debug, Clone)]
enum SourceState {
    Ready(Arc<DecodedImage>),
    Failed(String),
}

#[derive(Debug, Clone)]
struct LoadedSource {
    ticket: DecodeTicket,
    state: SourceState,
    tool: Option<CropTool>,
}

/// Drives the crop queue for one form: decoding each source before the crop
/// tool becomes interactive, encoding confirmed regions, and keeping the
/// per-file titles aligned with the selection.
pub struct CropQueueController {
    queue: CropQueue,
    enable_crop: bool,
    aspect: f32,
    titles: Vec<String>,
    bypassed: Option<Vec<DrawingFile>>,
    source: Option<LoadedSource>,
}

impl Default for CropQueueController {
    fn default() -> Self {
        Self::new(true, DEFAULT_ASPECT)
    }
}

impl CropQueueController {
    pub fn new(enable_crop: bool, aspect: f32) -> Self {
        Self {
            queue: CropQueue::new(),
            enable_crop,
            aspect,
            titles: Vec::new(),
            bypassed: None,
            source: None,
        }
    }

    pub fn enable_crop(&self) -> bool {
        self.enable_crop
    }

    /// Takes effect on the next selection
    pub fn set_enable_crop(&mut self, enable_crop: bool) {
        self.enable_crop = enable_crop;
    }

    pub fn state(&self) -> CropQueueState {
        self.queue.state()
    }

    pub fn total(&self) -> usize {
        self.queue.total()
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn current_file(&self) -> Option<(usize, &SelectedFile)> {
        self.queue.current()
    }

    /// Start a new selection. Titles are reset to the file names, one per file.
    pub fn select(&mut self, files: Vec<SelectedFile>) -> SelectionOutcome {
        if self.queue.is_active() {
            logger::warn("New selection while a crop run is active; previous run discarded");
        }

        self.titles = files.iter().map(SelectedFile::default_title).collect();
        self.source = None;

        let outcome = self.queue.select(files, self.enable_crop);
        self.bypassed = match &outcome {
            SelectionOutcome::Bypassed(files) => Some(files.clone()),
            _ => None,
        };

        logger::debug(&format!(
            "Selected {} file(s), crop {}",
            self.titles.len(),
            if self.enable_crop { "enabled" } else { "disabled" }
        ));
        outcome
    }

    pub fn set_title(&mut self, index: usize, title: impl Into<String>) -> Result<(), DomainError> {
        let slot = self.titles.get_mut(index).ok_or_else(|| {
            DomainError::NotFound(format!("No selected drawing at index {}", index))
        })?;
        *slot = title.into();
        Ok(())
    }

    /// Decode work for the current file, if its source is not loaded yet
    pub fn decode_request(&self) -> Option<DecodeRequest> {
        let (index, file) = self.queue.current()?;
        let ticket = DecodeTicket {
            run: self.queue.run(),
            index,
        };

        if self.source.as_ref().is_some_and(|source| source.ticket == ticket) {
            return None;
        }

        Some(DecodeRequest {
            ticket,
            bytes: file.bytes.clone(),
        })
    }

    /// Accept the result of a decode. Results for a run or position the
    /// queue has moved past are discarded and yield `Ok(None)`.
    pub fn install_decoded(
        &mut self,
        ticket: DecodeTicket,
        result: Result<DecodedImage, DomainError>,
    ) -> Result<Option<ImageDimensions>, DomainError> {
        let is_current = self.queue.run() == ticket.run
            && self.queue.current().map(|(index, _)| index) == Some(ticket.index);
        if !is_current {
            logger::debug(&format!(
                "Discarding decoded image for run {} index {}",
                ticket.run, ticket.index
            ));
            return Ok(None);
        }

        match result {
            Ok(image) => {
                let dimensions = image.dimensions();
                self.source = Some(LoadedSource {
                    ticket,
                    state: SourceState::Ready(Arc::new(image)),
                    tool: Some(CropTool::new(dimensions, self.aspect)),
                });
                Ok(Some(dimensions))
            }
            Err(error) => {
                logger::error(&format!(
                    "Failed to decode drawing {}: {}",
                    ticket.index + 1,
                    error
                ));
                self.source = Some(LoadedSource {
                    ticket,
                    state: SourceState::Failed(error.to_string()),
                    tool: None,
                });
                Err(error)
            }
        }
    }

    /// Decode the current file and make the crop tool interactive
    pub async fn load_current(&mut self) -> Result<Option<ImageDimensions>, DomainError> {
        match self.decode_request() {
            Some(request) => {
                let (ticket, result) = request.decode().await;
                self.install_decoded(ticket, result)
            }
            None => Ok(self.source_dimensions()),
        }
    }

    fn current_source(&self) -> Option<&LoadedSource> {
        let (index, _) = self.queue.current()?;
        self.source.as_ref().filter(|source| {
            source.ticket.run == self.queue.run() && source.ticket.index == index
        })
    }

    pub fn source_dimensions(&self) -> Option<ImageDimensions> {
        match &self.current_source()?.state {
            SourceState::Ready(image) => Some(image.dimensions()),
            SourceState::Failed(_) => None,
        }
    }

    /// Decode failure of the current file, if any
    pub fn load_error(&self) -> Option<&str> {
        match &self.current_source()?.state {
            SourceState::Failed(message) => Some(message),
            SourceState::Ready(_) => None,
        }
    }

    pub fn tool(&self) -> Option<&CropTool> {
        self.current_source()?.tool.as_ref()
    }

    pub fn tool_mut(&mut self) -> Option<&mut CropTool> {
        let (index, _) = self.queue.current()?;
        let run = self.queue.run();
        self.source
            .as_mut()
            .filter(|source| source.ticket.run == run && source.ticket.index == index)
            .and_then(|source| source.tool.as_mut())
    }

    /// Crop the current file to `region` and advance the queue
    pub async fn confirm(&mut self, region: CropRegion) -> Result<CropProgress, DomainError> {
        let (index, name) = match self.queue.current() {
            Some((index, file)) => (index, file.name.clone()),
            None => {
                return Err(DomainError::InvalidState(format!(
                    "no crop in progress (state: {:?})",
                    self.queue.state()
                )));
            }
        };

        let image = match self.current_source().map(|source| &source.state) {
            Some(SourceState::Ready(image)) => Arc::clone(image),
            Some(SourceState::Failed(message)) => {
                return Err(DomainError::ImageDecodeError(message.clone()));
            }
            None => {
                return Err(DomainError::InvalidState(format!(
                    "drawing {} is still loading",
                    index + 1
                )));
            }
        };

        region.validate(image.dimensions())?;

        let encoded = crop_to_jpeg_async(image, region).await?;
        let cropped = CroppedFile::new(name, encoded, region, index);
        let progress = self.queue.accept(cropped)?;
        self.source = None;

        match progress {
            CropProgress::Advanced { index, total } => {
                logger::debug(&format!("Cropped drawing {}/{}", index, total));
            }
            CropProgress::Completed { total } => {
                logger::info(&format!("All {} drawing(s) cropped", total));
            }
        }

        Ok(progress)
    }

    /// Confirm whatever region the crop tool currently shows
    pub async fn confirm_tool(&mut self) -> Result<CropProgress, DomainError> {
        if let Some(message) = self.load_error() {
            return Err(DomainError::ImageDecodeError(message.to_string()));
        }

        let region = self
            .tool()
            .map(CropTool::region)
            .ok_or_else(|| DomainError::InvalidState("crop tool is not ready".to_string()))?;
        self.confirm(region).await
    }

    /// Cancel the run: every crop confirmed so far and the selection are dropped
    pub fn cancel(&mut self) -> Result<usize, DomainError> {
        let discarded = self.queue.cancel()?;
        self.source = None;
        self.titles.clear();
        logger::info(&format!("Crop cancelled, {} cropped drawing(s) discarded", discarded));
        Ok(discarded)
    }

    /// Drawings produced by the last selection, in selection order
    pub fn drawings(&self) -> Result<Vec<DrawingFile>, DomainError> {
        if let Some(files) = &self.bypassed {
            return Ok(files.clone());
        }

        match self.queue.state() {
            CropQueueState::Completed => Ok(self
                .queue
                .output()
                .iter()
                .cloned()
                .map(DrawingFile::from)
                .collect()),
            CropQueueState::AwaitingCrop(index) => Err(DomainError::InvalidState(format!(
                "drawing {} of {} is still waiting to be cropped",
                index + 1,
                self.queue.total()
            ))),
            CropQueueState::Idle | CropQueueState::Cancelled => Ok(Vec::new()),
        }
    }

    /// Number of drawings ready so far
    pub fn completed(&self) -> usize {
        match &self.bypassed {
            Some(files) => files.len(),
            None => self.queue.output().len(),
        }
    }

    /// Reinstate drawings that were handed out but not submitted
    pub fn restore(&mut self, files: Vec<DrawingFile>, titles: Vec<String>) {
        self.queue = CropQueue::new();
        self.source = None;
        self.titles = titles;
        self.bypassed = Some(files);
    }

    /// Return to idle, forgetting the selection and its titles
    pub fn reset(&mut self) {
        self.queue = CropQueue::new();
        self.titles.clear();
        self.bypassed = None;
        self.source = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::imaging::crop_encoder::test_images::quadrant_png;

    fn image_file(name: &str, width: u32, height: u32) -> SelectedFile {
        SelectedFile::new(name, None, quadrant_png(width, height))
    }

    #[tokio::test]
    async fn crops_each_file_in_selection_order() {
        let mut controller = CropQueueController::default();
        controller.select(vec![
            image_file("first.png", 40, 20),
            image_file("second.png", 30, 30),
        ]);
        assert_eq!(controller.titles(), ["first", "second"]);

        assert_eq!(controller.load_current().await.unwrap(), Some(ImageDimensions::new(40, 20)));
        let progress = controller.confirm(CropRegion::new(0, 0, 20, 10)).await.unwrap();
        assert_eq!(progress, CropProgress::Advanced { index: 1, total: 2 });

        controller.load_current().await.unwrap();
        let progress = controller.confirm_tool().await.unwrap();
        assert_eq!(progress, CropProgress::Completed { total: 2 });

        let drawings = controller.drawings().unwrap();
        assert_eq!(drawings.len(), 2);
        assert_eq!(drawings[0].name(), "first.png");
        assert_eq!(drawings[1].name(), "second.png");
        assert!(drawings.iter().all(|drawing| drawing.content_type() == "image/jpeg"));

        let DrawingFile::Cropped(second) = &drawings[1] else {
            panic!("expected a cropped drawing");
        };
        assert_eq!((second.region.width, second.region.height), (30, 30));
    }

    #[tokio::test]
    async fn invalid_region_is_rejected_before_encoding() {
        let mut controller = CropQueueController::default();
        controller.select(vec![image_file("a.png", 16, 16)]);
        controller.load_current().await.unwrap();

        for region in [CropRegion::new(0, 0, 0, 10), CropRegion::new(8, 8, 9, 4)] {
            assert!(matches!(
                controller.confirm(region).await,
                Err(DomainError::InvalidRegion(_))
            ));
        }

        assert_eq!(controller.state(), CropQueueState::AwaitingCrop(0));
        assert!(controller.tool().is_some());
    }

    #[tokio::test]
    async fn confirm_requires_a_loaded_source() {
        let mut controller = CropQueueController::default();
        controller.select(vec![image_file("a.png", 8, 8)]);

        assert!(matches!(
            controller.confirm(CropRegion::new(0, 0, 4, 4)).await,
            Err(DomainError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn decode_failure_still_allows_cancel() {
        let mut controller = CropQueueController::default();
        controller.select(vec![
            image_file("ok.png", 8, 8),
            SelectedFile::new("broken.png", None, b"nope".to_vec()),
        ]);
        controller.load_current().await.unwrap();
        controller.confirm(CropRegion::new(0, 0, 8, 8)).await.unwrap();

        assert!(matches!(
            controller.load_current().await,
            Err(DomainError::ImageDecodeError(_))
        ));
        assert!(controller.load_error().is_some());
        assert!(matches!(
            controller.confirm(CropRegion::new(0, 0, 1, 1)).await,
            Err(DomainError::ImageDecodeError(_))
        ));

        assert_eq!(controller.cancel().unwrap(), 1);
        assert_eq!(controller.state(), CropQueueState::Cancelled);
        assert!(controller.drawings().unwrap().is_empty());
        assert!(controller.titles().is_empty());
    }

    #[tokio::test]
    async fn confirming_the_tool_on_an_undecodable_file_reports_the_decode_error() {
        let mut controller = CropQueueController::default();
        controller.select(vec![SelectedFile::new("broken.png", None, b"nope".to_vec())]);
        assert!(controller.load_current().await.is_err());

        assert!(matches!(
            controller.confirm_tool().await,
            Err(DomainError::ImageDecodeError(_))
        ));
        assert_eq!(controller.state(), CropQueueState::AwaitingCrop(0));
        assert_eq!(controller.cancel().unwrap(), 0);
    }

    #[tokio::test]
    async fn decode_finishing_after_cancel_is_discarded() {
        let mut controller = CropQueueController::default();
        controller.select(vec![image_file("a.png", 8, 8)]);

        let request = controller.decode_request().unwrap();
        controller.cancel().unwrap();

        let (ticket, result) = request.decode().await;
        assert!(result.is_ok());
        assert_eq!(controller.install_decoded(ticket, result).unwrap(), None);
        assert!(controller.tool().is_none());
        assert_eq!(controller.state(), CropQueueState::Cancelled);
    }

    #[tokio::test]
    async fn stale_decode_from_previous_selection_is_discarded() {
        let mut controller = CropQueueController::default();
        controller.select(vec![image_file("old.png", 8, 8)]);
        let stale = controller.decode_request().unwrap();

        controller.select(vec![image_file("new.png", 12, 12)]);
        let (ticket, result) = stale.decode().await;
        assert_eq!(controller.install_decoded(ticket, result).unwrap(), None);

        assert_eq!(controller.load_current().await.unwrap(), Some(ImageDimensions::new(12, 12)));
    }

    #[test]
    fn disabled_crop_returns_selection_unchanged() {
        let mut controller = CropQueueController::new(false, 1.0);
        let files = vec![image_file("a.png", 4, 4), image_file("b.png", 4, 4)];
        controller.select(files.clone());

        let drawings = controller.drawings().unwrap();
        assert_eq!(
            drawings,
            files.into_iter().map(DrawingFile::from).collect::<Vec<_>>()
        );
        assert!(controller.decode_request().is_none());
        assert_eq!(controller.state(), CropQueueState::Idle);
    }

    #[test]
    fn drawings_unavailable_mid_run() {
        let mut controller = CropQueueController::default();
        controller.select(vec![image_file("a.png", 4, 4)]);
        assert!(matches!(controller.drawings(), Err(DomainError::InvalidState(_))));

        controller.set_title(0, "Renamed").unwrap();
        assert_eq!(controller.titles(), ["Renamed"]);
        assert!(controller.set_title(3, "x").is_err());
    }
}
