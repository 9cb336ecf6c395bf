use serde::{Deserialize, Serialize};

use crate::domain::models::crop::{CropRegion, ImageDimensions, PanOffset};

pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 3.0;
pub const DEFAULT_ASPECT: f32 = 1.0;

/// Adjustable state of the interactive crop tool for one source image.
///
/// At zoom 1 the region is the largest centred rectangle of `aspect` that fits the
/// image. Zooming shrinks that rectangle around the (panned) centre; the resulting
/// region is always clamped inside the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropTool {
    dimensions: ImageDimensions,
    aspect: f32,
    zoom: f32,
    pan: PanOffset,
}

impl CropTool {
    pub fn new(dimensions: ImageDimensions, aspect: f32) -> Self {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            DEFAULT_ASPECT
        };

        Self {
            dimensions,
            aspect,
            zoom: MIN_ZOOM,
            pan: PanOffset::default(),
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> PanOffset {
        self.pan
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = if zoom.is_finite() {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            MIN_ZOOM
        };
        self.pan = self.clamp_pan(self.pan);
    }

    pub fn set_pan(&mut self, pan: PanOffset) {
        self.pan = self.clamp_pan(pan);
    }

    /// Pixel rectangle currently covered by the tool
    pub fn region(&self) -> CropRegion {
        let (width, height) = self.zoomed_size();
        let image_width = self.dimensions.width as f32;
        let image_height = self.dimensions.height as f32;

        let centre_x = image_width / 2.0 + self.pan.x;
        let centre_y = image_height / 2.0 + self.pan.y;

        let max_x = self.dimensions.width.saturating_sub(width) as f32;
        let max_y = self.dimensions.height.saturating_sub(height) as f32;
        let x = (centre_x - width as f32 / 2.0).round().clamp(0.0, max_x);
        let y = (centre_y - height as f32 / 2.0).round().clamp(0.0, max_y);

        CropRegion {
            x: x as i32,
            y: y as i32,
            width: width as i32,
            height: height as i32,
            zoom: self.zoom,
            pan: self.pan,
        }
    }

    fn base_size(&self) -> (f32, f32) {
        let image_width = self.dimensions.width as f32;
        let image_height = self.dimensions.height as f32;
        if image_height <= 0.0 || image_width <= 0.0 {
            return (0.0, 0.0);
        }

        if image_width / image_height > self.aspect {
            (image_height * self.aspect, image_height)
        } else {
            (image_width, image_width / self.aspect)
        }
    }

    fn zoomed_size(&self) -> (u32, u32) {
        let (base_width, base_height) = self.base_size();
        let width = (base_width / self.zoom).round().max(1.0) as u32;
        let height = (base_height / self.zoom).round().max(1.0) as u32;
        (
            width.min(self.dimensions.width.max(1)),
            height.min(self.dimensions.height.max(1)),
        )
    }

    fn clamp_pan(&self, pan: PanOffset) -> PanOffset {
        let (width, height) = self.zoomed_size();
        let limit_x = self.dimensions.width.saturating_sub(width) as f32 / 2.0;
        let limit_y = self.dimensions.height.saturating_sub(height) as f32 / 2.0;
        let clamp = |value: f32, limit: f32| {
            if value.is_finite() {
                value.clamp(-limit, limit)
            } else {
                0.0
            }
        };

        PanOffset {
            x: clamp(pan.x, limit_x),
            y: clamp(pan.y, limit_y),
        }
    }
}
