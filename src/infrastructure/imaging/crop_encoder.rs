use std::sync::Arc;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, GenericImageView};

use crate::domain::errors::DomainError;
use crate::domain::models::crop::{CropRegion, ImageDimensions};

/// Quality of every cropped JPEG
pub const JPEG_QUALITY: u8 = 90;

/// Source image decoded into a pixel buffer
#[derive(Debug, Clone)]
pub struct DecodedImage {
    image: DynamicImage,
}

impl DecodedImage {
    pub fn dimensions(&self) -> ImageDimensions {
        let (width, height) = self.image.dimensions();
        ImageDimensions::new(width, height)
    }
}

impl From<DynamicImage> for DecodedImage {
    fn from(image: DynamicImage) -> Self {
        Self { image }
    }
}

/// Decode an uploaded image blob
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DomainError> {
    if bytes.is_empty() {
        return Err(DomainError::ImageDecodeError("image data is empty".to_string()));
    }

    let image = image::load_from_memory(bytes)
        .map_err(|e| DomainError::ImageDecodeError(format!("Failed to load image: {}", e)))?;

    Ok(DecodedImage { image })
}

/// Decode on the blocking pool so the caller's task is only suspended
pub async fn decode_image_async(bytes: Bytes) -> Result<DecodedImage, DomainError> {
    tokio::task::spawn_blocking(move || decode_image(&bytes))
        .await
        .map_err(|e| DomainError::InternalError(format!("Image decode task failed: {}", e)))?
}

/// Cut exactly `region` out of `source` and re-encode it as JPEG.
///
/// The output is `region.width` x `region.height` pixels; nothing is rotated or
/// resized. The region must already be validated against the source bounds.
pub fn crop_to_jpeg(source: &DecodedImage, region: &CropRegion) -> Result<Vec<u8>, DomainError> {
    if region.width <= 0 || region.height <= 0 {
        return Err(DomainError::EncodeError(format!(
            "cannot allocate a {}x{} surface",
            region.width, region.height
        )));
    }

    region
        .validate(source.dimensions())
        .map_err(|e| DomainError::EncodeError(e.to_string()))?;

    let (x, y) = (region.x as u32, region.y as u32);
    let (width, height) = (region.width as u32, region.height as u32);

    // JPEG has no alpha channel
    let cropped = source.image.crop_imm(x, y, width, height).to_rgb8();

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
        .encode(cropped.as_raw(), width, height, ColorType::Rgb8)
        .map_err(|e| DomainError::EncodeError(format!("Failed to encode image: {}", e)))?;

    Ok(buffer)
}

pub async fn crop_to_jpeg_async(
    source: Arc<DecodedImage>,
    region: CropRegion,
) -> Result<Vec<u8>, DomainError> {
    tokio::task::spawn_blocking(move || crop_to_jpeg(&source, &region))
        .await
        .map_err(|e| DomainError::InternalError(format!("Image encode task failed: {}", e)))?
}


#[cfg(test)]
mod tests {
    use super::test_images::quadrant_png;
    use super::*;

    #[test]
    fn output_has_exactly_the_region_size() {
        let source = decode_image(&quadrant_png(64, 48)).unwrap();
        assert_eq!(source.dimensions(), ImageDimensions::new(64, 48));

        let encoded = crop_to_jpeg(&source, &CropRegion::new(10, 5, 30, 20)).unwrap();
        let decoded = image::load_from_memory(&encoded).unwrap();
        assert_eq!(decoded.dimensions(), (30, 20));
        assert_eq!(
            image::guess_format(&encoded).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn crop_keeps_the_selected_pixels() {
        let source = decode_image(&quadrant_png(40, 40)).unwrap();
        // Top-left quadrant is pure red
        let encoded = crop_to_jpeg(&source, &CropRegion::new(2, 2, 12, 12)).unwrap();
        let pixel = image::load_from_memory(&encoded)
            .unwrap()
            .to_rgb8()
            .get_pixel(6, 6)
            .0;
        assert!(pixel[0] > 200 && pixel[1] < 60 && pixel[2] < 60, "{:?}", pixel);
    }

    #[test]
    fn zero_area_region_fails_to_encode() {
        let source = decode_image(&quadrant_png(8, 8)).unwrap();
        assert!(matches!(
            crop_to_jpeg(&source, &CropRegion::new(0, 0, 0, 4)),
            Err(DomainError::EncodeError(_))
        ));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(DomainError::ImageDecodeError(_))
        ));
        assert!(matches!(decode_image(&[]), Err(DomainError::ImageDecodeError(_))));
    }

    #[tokio::test]
    async fn async_variants_match_sync_ones() {
        let source = decode_image_async(Bytes::from(quadrant_png(16, 16))).await.unwrap();
        let encoded = crop_to_jpeg_async(Arc::new(source), CropRegion::new(0, 0, 8, 8))
            .await
            .unwrap();
        assert_eq!(image::load_from_memory(&encoded).unwrap().dimensions(), (8, 8));
    }
}
