use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::crop::{CropRegion, ImageDimensions, PanOffset};
use crate::domain::models::crop_queue::CropQueueState;

/// File currently shown in the crop tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentCropDto {
    pub index: usize,
    pub file_name: String,
    /// `data:` URL of the source image
    pub preview_url: String,
    /// Set once the source is decoded
    pub dimensions: Option<ImageDimensions>,
    /// Region the tool currently covers
    pub region: Option<CropRegion>,
    /// Decode failure; the run can still be cancelled
    pub load_error: Option<String>,
}

/// Crop session response DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropSessionDto {
    pub id: Uuid,
    pub status: CropQueueState,
    pub enable_crop: bool,
    pub total: usize,
    /// Drawings ready for submission so far
    pub completed: usize,
    pub titles: Vec<String>,
    pub current: Option<CurrentCropDto>,
}

/// Confirmation of one crop: an explicit region, or tool parameters applied
/// to the current tool state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfirmCropDto {
    #[serde(default)]
    pub region: Option<CropRegion>,
    #[serde(default)]
    pub zoom: Option<f32>,
    #[serde(default)]
    pub pan: Option<PanOffset>,
}

/// DTO for renaming one drawing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingTitleDto {
    pub title: String,
}
