//! In-memory frames.
//!
//! A `Frame` is an RGB8 pixel buffer at the resolution it was captured or loaded
//! at. That resolution is what the grounding post-processor uses to turn
//! quantised locations back into pixel coordinates, so it must never be resized
//! between capture and inference.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::{ImageFormat, Rgb, RgbImage};

use crate::detect::BoundingBox;

/// Outline colour used when annotating detections.
pub const ANNOTATION_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Outline thickness in pixels.
pub const ANNOTATION_WIDTH: u32 = 5;

/// RGB frame in native resolution.
#[derive(Clone, Debug)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Build a frame from a tightly packed RGB8 buffer.
    pub fn from_rgb(pixels: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        if pixels.len() != expected_len {
            return Err(anyhow!(
                "expected {} RGB bytes for {}x{}, received {}",
                expected_len,
                width,
                height,
                pixels.len()
            ));
        }
        let image = RgbImage::from_raw(width, height, pixels)
            .ok_or_else(|| anyhow!("pixel buffer does not fit {}x{}", width, height))?;
        Ok(Self { image })
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Native `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    /// Copy of this frame with `bbox` outlined.
    pub fn annotated(&self, bbox: &BoundingBox) -> Frame {
        let mut copy = self.clone();
        copy.draw_box(bbox);
        copy
    }

    /// Outline `bbox` in place. Coordinates are clamped to the frame; the
    /// outline grows inward from the box edges.
    pub fn draw_box(&mut self, bbox: &BoundingBox) {
        let (width, height) = self.size();
        if width == 0 || height == 0 {
            return;
        }
        let clamp_x = |v: f64| v.max(0.0).min((width - 1) as f64).round() as u32;
        let clamp_y = |v: f64| v.max(0.0).min((height - 1) as f64).round() as u32;
        let (x1, x2) = (clamp_x(bbox.x1.min(bbox.x2)), clamp_x(bbox.x1.max(bbox.x2)));
        let (y1, y2) = (clamp_y(bbox.y1.min(bbox.y2)), clamp_y(bbox.y1.max(bbox.y2)));

        for t in 0..ANNOTATION_WIDTH {
            let top = y1.saturating_add(t).min(y2);
            let bottom = y2.saturating_sub(t).max(y1);
            for x in x1..=x2 {
                self.image.put_pixel(x, top, ANNOTATION_COLOR);
                self.image.put_pixel(x, bottom, ANNOTATION_COLOR);
            }
            let left = x1.saturating_add(t).min(x2);
            let right = x2.saturating_sub(t).max(x1);
            for y in y1..=y2 {
                self.image.put_pixel(left, y, ANNOTATION_COLOR);
                self.image.put_pixel(right, y, ANNOTATION_COLOR);
            }
        }
    }

    /// Save to disk. The encoder follows the file extension (png or jpg/jpeg).
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = ImageFormat::from_path(path)
            .with_context(|| format!("unsupported image extension: {}", path.display()))?;
        self.image
            .save_with_format(path, format)
            .with_context(|| format!("failed to write image {}", path.display()))
    }
}
