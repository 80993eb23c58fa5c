//! adskip
//!
//! Finds the skip button of a video advertisement with a phrase-grounding
//! vision-language model, clicks it, and checks that it went away.
//!
//! # Architecture
//!
//! One run is linear: load settings, load the model, then either
//!
//! - **test mode**: ground every image in a directory and annotate the hits, or
//! - **live mode**: poll the primary display until a button shows up or the
//!   time limit passes, click its center once, and re-check after a short delay.
//!
//! # Module Structure
//!
//! - `config`: settings file and environment overrides
//! - `frame`: RGB frames in native resolution, annotation
//! - `ingest`: frame sources (image files, the primary display)
//! - `detect`: grounding backends, output parsing, button selection
//! - `actuate`: synthetic clicks
//! - `verify`: post-click presence check
//! - `batch`, `live`: the two run modes
//! - `report`: JSON records for stdout

pub mod actuate;
pub mod batch;
pub mod config;
pub mod detect;
pub mod frame;
pub mod ingest;
pub mod live;
pub mod report;
pub mod verify;

/// Task token prefixed to the caption.
pub const GROUNDING_TASK: &str = "<CAPTION_TO_PHRASE_GROUNDING>";

/// Model requested from the inference server unless configured otherwise.
pub const DEFAULT_MODEL_ID: &str = "microsoft/Florence-2-large";

/// Largest plausible button, in square pixels (~200x250).
pub const DEFAULT_MAX_BBOX_AREA: u64 = 50_000;

/// Number of quantisation bins per axis in location tokens.
pub const LOC_BINS: u32 = 1000;

pub use actuate::{Actuator, DryRunActuator};
#[cfg(feature = "desktop")]
pub use actuate::EnigoActuator;
pub use batch::run_batch;
pub use config::{BackendKind, BackendSettings, Settings};
pub use detect::{
    BoundingBox, ButtonFilter, ButtonHit, Grounding, GroundingBackend, GroundingService,
    LabeledBox, Point, StubBackend, StubReply,
};
pub use frame::Frame;
pub use ingest::{FileSource, FrameSource};
#[cfg(feature = "desktop")]
pub use ingest::ScreenSource;
pub use live::{LiveOptions, LiveSession, LiveState, Pacer, PollOutcome, SystemPacer};
pub use report::{BatchReport, FileReport, RunReport, RunStatus};
pub use verify::{verify_skip, Verification};
