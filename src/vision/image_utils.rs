// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image decoding for incoming frames
//!
//! Turns an encoded buffer (multipart upload bytes, or the base64 payload of a
//! data-URI stream frame) into a 3-channel RGB image. A decode failure is always
//! reported as an [`ImageError`]; callers must never treat it as "no hand".

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Default maximum encoded image size (10MB)
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Errors raised while turning bytes into pixels
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Missing media-type prefix (expected '<prefix>,<base64>')")]
    MissingMediaTypePrefix,

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,
}

/// Image information extracted during loading
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// Size of the encoded buffer in bytes
    pub size_bytes: usize,
}

/// Decode raw image bytes (multipart uploads, binary stream frames)
///
/// The returned image is always `ImageRgb8`, regardless of the source format
/// or the presence of an alpha channel.
pub fn decode_image_bytes(
    bytes: &[u8],
    max_bytes: usize,
) -> Result<(DynamicImage, ImageInfo), ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    if bytes.len() > max_bytes {
        return Err(ImageError::TooLarge(bytes.len(), max_bytes));
    }

    let format = detect_format(bytes)?;

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    let info = ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((DynamicImage::ImageRgb8(img.into_rgb8()), info))
}

/// Decode a base64-encoded image
pub fn decode_base64_image(
    base64_str: &str,
    max_bytes: usize,
) -> Result<(DynamicImage, ImageInfo), ImageError> {
    let trimmed = base64_str.trim();
    if trimmed.is_empty() {
        return Err(ImageError::EmptyData);
    }

    // Reject before allocating: base64 expands by 4/3
    let estimated = trimmed.len() / 4 * 3;
    if estimated > max_bytes {
        return Err(ImageError::TooLarge(estimated, max_bytes));
    }

    let bytes = STANDARD.decode(trimmed)?;
    decode_image_bytes(&bytes, max_bytes)
}

/// Decode a data-URI style frame: `data:image/jpeg;base64,<payload>`
///
/// Everything up to and including the first comma is discarded, whatever it
/// contains.
pub fn decode_data_uri(
    frame: &str,
    max_bytes: usize,
) -> Result<(DynamicImage, ImageInfo), ImageError> {
    let payload = strip_media_type_prefix(frame)?;
    decode_base64_image(payload, max_bytes)
}

/// Return the part of `frame` after the first comma
pub fn strip_media_type_prefix(frame: &str) -> Result<&str, ImageError> {
    frame
        .split_once(',')
        .map(|(_, payload)| payload)
        .ok_or(ImageError::MissingMediaTypePrefix)
}

/// Run a decode on the blocking thread pool
///
/// A decode task that panics is reported as `DecodeFailed`.
pub async fn decode_blocking<F>(decode: F) -> Result<(DynamicImage, ImageInfo), ImageError>
where
    F: FnOnce() -> Result<(DynamicImage, ImageInfo), ImageError> + Send + 'static,
{
    tokio::task::spawn_blocking(decode)
        .await
        .map_err(|e| ImageError::DecodeFailed(format!("Decode task failed: {}", e)))?
}

/// Detect image format from magic bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47 (0x89 P N G)
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // GIF: GIF87a or GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        // TIFF: II (little-endian) or MM (big-endian)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Ok(ImageFormat::Tiff),

        _ => Err(ImageError::UnsupportedFormat),
    }
}
