//! Frame sources.
//!
//! - Image files on disk (`FileSource`), used by test mode
//! - The primary display (`ScreenSource`, feature: desktop), used by live mode
//!
//! Every source reports the resolution exactly as captured or decoded. Frames
//! are produced fresh per call; sources keep no pixel cache.

pub mod file;
#[cfg(feature = "desktop")]
pub mod screen;

use anyhow::Result;

use crate::frame::Frame;

pub use file::{list_images, FileSource, IMAGE_EXTENSIONS};
#[cfg(feature = "desktop")]
pub use screen::ScreenSource;

/// Producer of frames for detection.
pub trait FrameSource {
    /// Source identifier for logs.
    fn describe(&self) -> String;

    /// Produce a current frame in native resolution.
    fn next_frame(&mut self) -> Result<Frame>;
}
