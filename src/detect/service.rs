use anyhow::{Context, Result};

use super::backend::GroundingBackend;
use super::filter::ButtonFilter;
use super::parse::parse_phrase_grounding;
use super::result::{ButtonHit, Grounding};
use crate::frame::Frame;
use crate::GROUNDING_TASK;

/// Loaded grounding model plus the caption and filter it is queried with.
///
/// Constructed once per run and passed by `&mut` to every caller. The backend
/// is released when the service is dropped.
pub struct GroundingService {
    backend: Box<dyn GroundingBackend>,
    caption: String,
    filter: ButtonFilter,
    inferences: u64,
    failures: u64,
}

impl GroundingService {
    /// Load the backend's model. Errors here are fatal for the run.
    pub fn load(
        mut backend: Box<dyn GroundingBackend>,
        caption: impl Into<String>,
        filter: ButtonFilter,
    ) -> Result<Self> {
        backend
            .load()
            .with_context(|| format!("failed to load grounding backend '{}'", backend.name()))?;
        log::info!("grounding backend '{}' loaded", backend.name());
        Ok(Self {
            backend,
            caption: caption.into(),
            filter,
            inferences: 0,
            failures: 0,
        })
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn filter(&self) -> &ButtonFilter {
        &self.filter
    }

    /// Task token immediately followed by the caption.
    pub fn prompt(&self) -> String {
        format!("{}{}", GROUNDING_TASK, self.caption)
    }

    /// Number of inference calls made and how many of them failed.
    pub fn stats(&self) -> (u64, u64) {
        (self.inferences, self.failures)
    }

    /// Run one inference. Never fails: backend errors become `Grounding::Failed`.
    pub fn infer(&mut self, frame: &Frame) -> Grounding {
        self.inferences += 1;
        let prompt = self.prompt();
        match self.backend.generate(frame, &prompt) {
            Ok(text) => {
                let (width, height) = frame.size();
                Grounding::Boxes(parse_phrase_grounding(&text, width, height))
            }
            Err(e) => {
                self.failures += 1;
                Grounding::Failed(format!("{:#}", e))
            }
        }
    }

    /// Run inference and pick the skip button, if any.
    ///
    /// A failed inference is logged and reported as no detection so that one
    /// bad call never stops a polling loop.
    pub fn detect(&mut self, frame: &Frame) -> Option<ButtonHit> {
        match self.infer(frame) {
            Grounding::Boxes(boxes) => {
                let hit = self.filter.select(&boxes);
                if hit.is_none() {
                    log::info!("no valid '{}' button detected", self.caption);
                }
                hit
            }
            Grounding::Failed(reason) => {
                log::warn!("error detecting skip button: {}", reason);
                None
            }
        }
    }
}

impl Drop for GroundingService {
    fn drop(&mut self) {
        match self.backend.release() {
            Ok(()) => log::info!("grounding backend '{}' released", self.backend.name()),
            Err(e) => log::warn!(
                "grounding backend '{}' release failed: {:#}",
                self.backend.name(),
                e
            ),
        }
    }
}
