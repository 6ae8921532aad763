//! Image loading for upload
//!
//! Anything the `image` crate can decode is accepted (PNG, BMP, binary and
//! ASCII PNM, ...). The panel is monochrome: pure white pixels stay white
//! and every other colour is drawn black. The image must match the panel
//! resolution exactly.

use std::path::Path;

use image::{DynamicImage, Rgb};
use picopaper_protocol::bitmap::{set_pixel, WHITE_BYTE};
use picopaper_protocol::Geometry;
use thiserror::Error;

const WHITE: Rgb<u8> = Rgb([0xFF, 0xFF, 0xFF]);

/// Errors loading a bitmap for upload
#[derive(Debug, Error)]
pub enum BitmapError {
    #[error("failed to read image: {0}")]
    Image(#[from] image::ImageError),

    #[error("image is {found_width} x {found_height}, the panel needs {width} x {height}")]
    SizeMismatch {
        width: u16,
        height: u16,
        found_width: u32,
        found_height: u32,
    },
}

/// Pack a decoded image into the panel frame format
///
/// Returns `geometry.buffer_len()` bytes, MSB-first, a cleared bit is black.
pub fn pack(image: &DynamicImage, geometry: Geometry) -> Result<Vec<u8>, BitmapError> {
    let rgb = image.to_rgb8();
    let (found_width, found_height) = rgb.dimensions();
    if found_width != u32::from(geometry.width) || found_height != u32::from(geometry.height) {
        return Err(BitmapError::SizeMismatch {
            width: geometry.width,
            height: geometry.height,
            found_width,
            found_height,
        });
    }

    let mut frame = vec![WHITE_BYTE; geometry.buffer_len()];
    for (x, y, pixel) in rgb.enumerate_pixels() {
        if *pixel != WHITE {
            set_pixel(&mut frame, geometry, x, y, true);
        }
    }
    Ok(frame)
}

/// Decode an in-memory image, guessing the format from its contents
pub fn decode(data: &[u8], geometry: Geometry) -> Result<Vec<u8>, BitmapError> {
    let image = image::load_from_memory(data)?;
    pack(&image, geometry)
}

/// Read and pack an image file
pub fn load(path: &Path, geometry: Geometry) -> Result<Vec<u8>, BitmapError> {
    let image = image::open(path)?;
    pack(&image, geometry)
}
