//! Local image file source.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use super::FrameSource;
use crate::frame::Frame;

/// Extensions picked up from a test directory, in processing order.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg"];

/// Reads one image file, converted to RGB at its native resolution.
pub struct FileSource {
    path: PathBuf,
    frames_read: u64,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frames_read: 0,
        }
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Decode `path` into a frame.
    pub fn load(path: &Path) -> Result<Frame> {
        let image = image::open(path)
            .with_context(|| format!("failed to decode image {}", path.display()))?;
        Ok(Frame::from_image(image.to_rgb8()))
    }
}

impl FrameSource for FileSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn next_frame(&mut self) -> Result<Frame> {
        let frame = Self::load(&self.path)?;
        self.frames_read += 1;
        Ok(frame)
    }
}

/// Image files directly inside `dir` (non-recursive): all `.png` files, then
/// all `.jpg` files, each group sorted by name.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(anyhow!("test directory {} does not exist", dir.display()));
    }
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to list directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() {
            entries.push(path);
        }
    }
    entries.sort();

    let mut images = Vec::new();
    for ext in IMAGE_EXTENSIONS {
        images.extend(
            entries
                .iter()
                .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(*ext))
                .cloned(),
        );
    }
    Ok(images)
}
