//! Image processing functionality for DOCX conversion

use std::io::Cursor;

use docx_rs::*;
use image::{ImageFormat, Rgba, RgbaImage};
use log::warn;

use crate::converter::ImageRun;
use crate::media::sizing::PLACEHOLDER_SIZE;

const PLACEHOLDER_FILL: Rgba<u8> = Rgba([0xE0, 0xE0, 0xE0, 0xFF]);
/// EMU per pixel, as used by `docx-rs` for picture extents.
const EMU_PER_PX: u32 = 9525;
/// Largest pixel dimension whose extent fits in the `u32` EMU field.
pub const MAX_PICTURE_PX: u32 = u32::MAX / EMU_PER_PX;

/// Turns image runs into pictures.
pub struct DocxImageProcessor;

impl DocxImageProcessor {
    /// Adds an image run to a run: the picture, or its alternative text when
    /// no picture can be produced.
    pub fn process_inline_image(&self, run: Run, image: &ImageRun) -> Run {
        let data = if image.data.is_empty() {
            self.placeholder(image.width, image.height)
        } else {
            self.to_embeddable(image)
        };

        match data {
            Some(data) => {
                let (width, height) = fit_extent(image.width, image.height);
                run.add_image(Pic::new_with_dimensions(data, width, height))
            }
            None => run.add_text(format!("[{}]", image.alt)),
        }
    }

    /// Pictures are stored as PNG or JPEG, other formats are re-encoded.
    ///
    /// The payload bytes decide, since the declared type may come from the
    /// source locator alone.
    fn to_embeddable(&self, image: &ImageRun) -> Option<Vec<u8>> {
        if let Ok(ImageFormat::Png | ImageFormat::Jpeg) = image::guess_format(&image.data) {
            return Some(image.data.clone());
        }

        let decoded = match image::load_from_memory(&image.data) {
            Ok(decoded) => decoded,
            Err(err) => {
                // The payload is kept as declared; readers sniff the bytes.
                warn!("cannot re-encode {} image: {err}", image.format.as_str());
                return Some(image.data.clone());
            }
        };

        let mut buffer = Vec::new();
        match decoded.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png) {
            Ok(()) => Some(buffer),
            Err(err) => {
                warn!("cannot re-encode {} image: {err}", image.format.as_str());
                Some(image.data.clone())
            }
        }
    }

    /// A flat grey picture standing in for an image that failed to load.
    fn placeholder(&self, width: u32, height: u32) -> Option<Vec<u8>> {
        // The bitmap is stretched to the picture extent.
        let (max_width, max_height) = PLACEHOLDER_SIZE;
        let canvas = RgbaImage::from_pixel(
            width.clamp(1, max_width),
            height.clamp(1, max_height),
            PLACEHOLDER_FILL,
        );
        let mut buffer = Vec::new();
        match canvas.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png) {
            Ok(()) => Some(buffer),
            Err(err) => {
                warn!("cannot render image placeholder: {err}");
                None
            }
        }
    }
}

/// Scales a pixel size down uniformly until its EMU extent fits in `u32`.
fn fit_extent(width: u32, height: u32) -> (u32, u32) {
    let largest = width.max(height);
    if largest <= MAX_PICTURE_PX {
        return (width.max(1), height.max(1));
    }

    let ratio = MAX_PICTURE_PX as f64 / largest as f64;
    let scale = |value: u32| ((value as f64 * ratio).round() as u32).clamp(1, MAX_PICTURE_PX);
    (scale(width), scale(height))
}
