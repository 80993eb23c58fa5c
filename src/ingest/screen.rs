#![cfg(feature = "desktop")]

//! Primary display source.

use anyhow::{anyhow, Context, Result};

use super::FrameSource;
use crate::frame::Frame;

/// Captures the primary monitor at full native resolution on every call.
#[derive(Default)]
pub struct ScreenSource;

impl ScreenSource {
    pub fn new() -> Self {
        Self
    }
}

impl FrameSource for ScreenSource {
    fn describe(&self) -> String {
        "screen:primary".to_string()
    }

    fn next_frame(&mut self) -> Result<Frame> {
        let monitors = xcap::Monitor::all().context("failed to enumerate monitors")?;
        let monitor = monitors
            .iter()
            .find(|m| m.is_primary().unwrap_or(false))
            .or_else(|| monitors.first())
            .ok_or_else(|| anyhow!("no monitors found"))?;
        let rgba = monitor.capture_image().context("screen capture failed")?;

        let (width, height) = rgba.dimensions();
        let rgb: Vec<u8> = rgba
            .into_raw()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Frame::from_rgb(rgb, width, height)
    }
}
