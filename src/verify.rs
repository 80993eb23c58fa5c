//! Post-click verification.
//!
//! After a click the UI is given a short time to settle, then the screen is
//! captured and searched again. A button that is no longer found counts as a
//! successful skip; one that is still found means the click may not have
//! worked. This is a presence check only.

use std::time::Duration;

use anyhow::Result;

use crate::detect::{ButtonHit, GroundingService};
use crate::ingest::FrameSource;
use crate::live::Pacer;
use crate::report::RunStatus;

/// Default settle time between click and re-check.
pub const DEFAULT_VERIFY_DELAY: Duration = Duration::from_secs(2);

pub const SKIPPED_MESSAGE: &str = "Ad skipped successfully!";
pub const STILL_PRESENT_MESSAGE: &str =
    "Clicked, but 'Skip' button may still be present - manual check needed.";

#[derive(Clone, Debug, PartialEq)]
pub struct Verification {
    pub status: RunStatus,
    pub message: String,
    /// The button found on re-check, if it is still there.
    pub remaining: Option<ButtonHit>,
}

/// Wait `delay`, recapture and re-run detection with the same caption.
pub fn verify_skip(
    service: &mut GroundingService,
    source: &mut dyn FrameSource,
    pacer: &mut dyn Pacer,
    delay: Duration,
) -> Result<Verification> {
    pacer.sleep(delay);
    let frame = source.next_frame()?;
    let remaining = service.detect(&frame);
    let verification = match remaining {
        None => Verification {
            status: RunStatus::Success,
            message: SKIPPED_MESSAGE.to_string(),
            remaining: None,
        },
        Some(hit) => Verification {
            status: RunStatus::Partial,
            message: STILL_PRESENT_MESSAGE.to_string(),
            remaining: Some(hit),
        },
    };
    match verification.status {
        RunStatus::Success => log::info!("{}", verification.message),
        RunStatus::Partial => log::warn!("{}", verification.message),
    }
    Ok(verification)
}
