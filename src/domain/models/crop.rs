use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Content type of every cropped output
pub const CROPPED_CONTENT_TYPE: &str = "image/jpeg";

/// Intrinsic pixel size of a decoded source image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Pan offset of the interactive crop tool, in source pixels from the image centre
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanOffset {
    pub x: f32,
    pub y: f32,
}

/// Crop rectangle in source-image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    /// X coordinate of the crop
    pub x: i32,
    /// Y coordinate of the crop
    pub y: i32,
    /// Width of the crop
    pub width: i32,
    /// Height of the crop
    pub height: i32,
    /// Zoom factor the tool was at when the region was produced
    #[serde(default = "default_zoom")]
    pub zoom: f32,
    /// Pan offset the tool was at when the region was produced
    #[serde(default)]
    pub pan: PanOffset,
}

fn default_zoom() -> f32 {
    1.0
}

impl CropRegion {
    /// Create a region with no tool state attached
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            zoom: default_zoom(),
            pan: PanOffset::default(),
        }
    }

    /// Check the region against the source image bounds
    pub fn validate(&self, bounds: ImageDimensions) -> Result<(), DomainError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(DomainError::InvalidRegion(format!(
                "region size must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        if self.x < 0 || self.y < 0 {
            return Err(DomainError::InvalidRegion(format!(
                "region origin must not be negative, got ({}, {})",
                self.x, self.y
            )));
        }

        let right = i64::from(self.x) + i64::from(self.width);
        let bottom = i64::from(self.y) + i64::from(self.height);
        if right > i64::from(bounds.width) || bottom > i64::from(bounds.height) {
            return Err(DomainError::InvalidRegion(format!(
                "region ({}, {}, {}x{}) exceeds image bounds {}x{}",
                self.x, self.y, self.width, self.height, bounds.width, bounds.height
            )));
        }

        Ok(())
    }
}

/// The re-encoded output of one confirmed crop
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedFile {
    /// Name of the source file this crop came from
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
    /// Rectangle used to produce the output
    pub region: CropRegion,
    /// Position of the source file in the original selection
    pub source_index: usize,
}

impl CroppedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>, region: CropRegion, source_index: usize) -> Self {
        Self {
            name: name.into(),
            content_type: CROPPED_CONTENT_TYPE.to_string(),
            bytes: bytes.into(),
            region,
            source_index,
        }
    }
}
