//! Image preparation helpers
//!
//! Small wrappers over the `image` crate for the fixed preparation steps
//! the models require: RGB coercion for outpainting inputs, exact resize
//! for video reference frames, and PNG re-encoding of results.

use crate::error::Result;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Reference-frame width expected by the video model
pub const VIDEO_FRAME_WIDTH: u32 = 1280;
/// Reference-frame height expected by the video model
pub const VIDEO_FRAME_HEIGHT: u32 = 720;

/// Decode image bytes in any supported format
///
/// # Errors
/// - `Image` when the bytes are not a decodable image
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Coerce to RGB, dropping any alpha channel. Outpainting inputs must be
/// three-channel.
#[must_use]
pub fn ensure_rgb(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb8(_) => image,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

/// Resize to exactly `width`x`height` with Lanczos3 resampling
#[must_use]
pub fn resize_exact(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    image.resize_exact(width, height, FilterType::Lanczos3)
}

/// Encode as PNG. Preserves transparency, which the background-removal
/// output depends on.
///
/// # Errors
/// - `Image` on encoder failure
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Prepare raw bytes as a video reference frame: decode, resize to the
/// model's expected dimensions, re-encode as PNG.
///
/// # Errors
/// - `Image` when the input cannot be decoded or re-encoded
pub fn prepare_reference_frame(bytes: &[u8]) -> Result<Vec<u8>> {
    let image = decode(bytes)?;
    let resized = resize_exact(&image, VIDEO_FRAME_WIDTH, VIDEO_FRAME_HEIGHT);
    encode_png(&resized)
}
