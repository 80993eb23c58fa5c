//! Records printed on stdout.

use serde::Serialize;

use crate::detect::{BoundingBox, ButtonHit, Point};

/// Outcome classification of a live run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Partial,
}

/// Live-mode result: `{status, message, [clicked_at]}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clicked_at: Option<Point>,
}

/// Test-mode result for one image.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FileReport {
    pub file: String,
    pub detected: bool,
    pub position: Option<Point>,
    pub bbox: Option<BoundingBox>,
}

impl FileReport {
    pub fn new(file: String, hit: Option<&ButtonHit>) -> Self {
        Self {
            file,
            detected: hit.is_some(),
            position: hit.map(|h| h.center),
            bbox: hit.map(|h| h.bbox),
        }
    }
}

/// All test-mode results in processing order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn detected(&self) -> usize {
        self.files.iter().filter(|f| f.detected).count()
    }

    pub fn total(&self) -> usize {
        self.files.len()
    }

    /// e.g. "2/3 detections."
    pub fn summary(&self) -> String {
        format!("{}/{} detections.", self.detected(), self.total())
    }
}
