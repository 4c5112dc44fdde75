//! Reference Image Preparation
//!
//! Validates an uploaded reference photo, downscales it, and re-encodes it as
//! PNG. The result is handed to recognition as a data URI and to asset
//! storage as raw bytes named by content hash.

use crate::services::ImagePayload;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageFormat};
use sha2::{Digest, Sha256};
use shared::error::{AppError, AppResult, ErrorCode};
use std::io::Cursor;
use std::path::Path;

/// Supported upload formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

const PNG_CONTENT_TYPE: &str = "image/png";

/// Upload limits
#[derive(Debug, Clone, Copy)]
pub struct ImageLimits {
    pub max_bytes: usize,
    /// Longest side after downscaling
    pub max_dimension: u32,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_bytes: 4 * 1024 * 1024,
            max_dimension: 2048,
        }
    }
}

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Validate size and format, returning the decoded image
fn validate_image(data: &[u8], file_name: &str, limits: &ImageLimits) -> AppResult<DynamicImage> {
    if data.is_empty() {
        return Err(AppError::invalid_image("Empty file provided"));
    }
    if data.len() > limits.max_bytes {
        return Err(AppError::with_message(
            ErrorCode::ImageTooLarge,
            format!(
                "File too large. Maximum size is {} bytes ({}MB)",
                limits.max_bytes,
                limits.max_bytes / 1024 / 1024
            ),
        )
        .with_detail("size", data.len()));
    }

    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| AppError::invalid_image(format!("Invalid file extension for: {}", file_name)))?;
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::invalid_image(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext,
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    let format = image::guess_format(data)
        .map_err(|e| AppError::invalid_image(format!("Invalid image file ({}): {}", ext, e)))?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP) {
        return Err(AppError::invalid_image(format!(
            "Unsupported image content {:?}",
            format
        )));
    }

    image::load_from_memory_with_format(data, format)
        .map_err(|e| AppError::invalid_image(format!("Invalid image file ({}): {}", ext, e)))
}

/// Downscale so the longest side fits, keeping the aspect ratio
fn fit_dimension(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    if img.width() <= max_dimension && img.height() <= max_dimension {
        return img;
    }
    tracing::debug!(
        width = img.width(),
        height = img.height(),
        max_dimension,
        "Downscaling reference image"
    );
    img.resize(max_dimension, max_dimension, FilterType::Lanczos3)
}

/// Validate, downscale and re-encode an uploaded reference photo
pub fn prepare_reference_image(
    data: &[u8],
    file_name: &str,
    limits: &ImageLimits,
) -> AppResult<ImagePayload> {
    let img = validate_image(data, file_name, limits)?;
    let img = match img.color() {
        ColorType::Rgb8 | ColorType::Rgba8 => img,
        _ => DynamicImage::ImageRgba8(img.to_rgba8()),
    };
    let img = fit_dimension(img, limits.max_dimension);

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| AppError::internal(format!("Failed to encode image: {}", e)))?;

    let data_uri = format!("data:{};base64,{}", PNG_CONTENT_TYPE, STANDARD.encode(&bytes));
    let file_name = format!("{}.png", calculate_hash(&bytes));
    tracing::debug!(file = %file_name, size = bytes.len(), "Reference image prepared");

    Ok(ImagePayload {
        file_name,
        content_type: PNG_CONTENT_TYPE.to_string(),
        bytes,
        data_uri,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 30, 30]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_prepares_png_payload() {
        let payload = prepare_reference_image(&png(8, 4), "case.PNG", &ImageLimits::default()).unwrap();
        assert_eq!(payload.content_type, "image/png");
        assert!(payload.data_uri.starts_with("data:image/png;base64,"));
        assert!(payload.file_name.ends_with(".png"));
        // sha256 hex + ".png"
        assert_eq!(payload.file_name.len(), 64 + 4);
    }

    #[test]
    fn test_downscales_longest_side() {
        let limits = ImageLimits {
            max_bytes: 1024 * 1024,
            max_dimension: 10,
        };
        let payload = prepare_reference_image(&png(40, 20), "case.png", &limits).unwrap();
        let img = image::load_from_memory(&payload.bytes).unwrap();
        assert_eq!((img.width(), img.height()), (10, 5));
    }

    #[test]
    fn test_same_content_same_name() {
        let limits = ImageLimits::default();
        let a = prepare_reference_image(&png(3, 3), "a.png", &limits).unwrap();
        let b = prepare_reference_image(&png(3, 3), "b.jpg", &limits).unwrap();
        assert_eq!(a.file_name, b.file_name);
    }

    #[test]
    fn test_rejects_bad_input() {
        let limits = ImageLimits {
            max_bytes: 64,
            max_dimension: 2048,
        };
        let err = prepare_reference_image(&[], "a.png", &limits).unwrap_err();
        assert_eq!(err.code, ErrorCode::ImageInvalid);

        let err = prepare_reference_image(&[0u8; 65], "a.png", &limits).unwrap_err();
        assert_eq!(err.code, ErrorCode::ImageTooLarge);

        let err = prepare_reference_image(b"not an image", "a.png", &limits).unwrap_err();
        assert_eq!(err.code, ErrorCode::ImageInvalid);

        let err = prepare_reference_image(&png(2, 2), "a.gif", &ImageLimits::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ImageInvalid);
        let err = prepare_reference_image(&png(2, 2), "noext", &ImageLimits::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ImageInvalid);
    }
}
