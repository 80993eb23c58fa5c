//! Live mode: poll the screen, click the first detected button, verify.
//!
//! The run is a two-state machine. While `Polling`, each step captures one
//! frame and runs one detection; it either finds the button, times out, or
//! sleeps one interval and stays `Polling`. `Done` carries the outcome. At most
//! one click is issued per run, and only after a detection.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::actuate::Actuator;
use crate::detect::{ButtonHit, GroundingService};
use crate::frame::Frame;
use crate::ingest::FrameSource;
use crate::report::{RunReport, RunStatus};
use crate::verify::verify_skip;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_POLL: Duration = Duration::from_secs(30);

pub const NOT_FOUND_MESSAGE: &str = "No skip ad button detected within time limit. Try again?";

/// Wall clock and sleep, injectable for tests.
pub trait Pacer {
    /// Time since the run started.
    fn elapsed(&self) -> Duration;

    fn sleep(&mut self, duration: Duration);
}

/// Real time: `Instant` plus blocking `thread::sleep`.
pub struct SystemPacer {
    start: Instant,
}

impl SystemPacer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Pacer for SystemPacer {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Clone, Debug)]
pub struct LiveOptions {
    pub interval: Duration,
    pub max_poll: Duration,
    pub verify_delay: Duration,
    /// Where annotated detection snapshots are written.
    pub output_dir: PathBuf,
}

impl Default for LiveOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            max_poll: DEFAULT_MAX_POLL,
            verify_delay: crate::verify::DEFAULT_VERIFY_DELAY,
            output_dir: PathBuf::from("test_outputs"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LiveState {
    Polling,
    Done(PollOutcome),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PollOutcome {
    Found(ButtonHit),
    TimedOut,
}

/// One live run over borrowed collaborators.
pub struct LiveSession<'a> {
    service: &'a mut GroundingService,
    source: &'a mut dyn FrameSource,
    actuator: &'a mut dyn Actuator,
    pacer: &'a mut dyn Pacer,
    options: LiveOptions,
    polls: u32,
}

impl<'a> LiveSession<'a> {
    pub fn new(
        service: &'a mut GroundingService,
        source: &'a mut dyn FrameSource,
        actuator: &'a mut dyn Actuator,
        pacer: &'a mut dyn Pacer,
        options: LiveOptions,
    ) -> Self {
        Self {
            service,
            source,
            actuator,
            pacer,
            options,
            polls: 0,
        }
    }

    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Advance the polling state by one step.
    pub fn step(&mut self) -> Result<LiveState> {
        if self.pacer.elapsed() >= self.options.max_poll {
            return Ok(LiveState::Done(PollOutcome::TimedOut));
        }

        let frame = self.source.next_frame()?;
        self.polls += 1;
        if let Some(hit) = self.service.detect(&frame) {
            save_snapshot(&frame, &hit, &self.options.output_dir);
            return Ok(LiveState::Done(PollOutcome::Found(hit)));
        }

        log::info!("no button in poll {}", self.polls);
        self.pacer.sleep(self.options.interval);
        Ok(LiveState::Polling)
    }

    /// Poll until found or timed out, then click once and verify.
    pub fn run(mut self) -> Result<RunReport> {
        std::fs::create_dir_all(&self.options.output_dir).with_context(|| {
            format!(
                "failed to create output directory {}",
                self.options.output_dir.display()
            )
        })?;
        log::info!(
            "starting live ad skip monitoring on {}. interval: {}s, max poll: {}s",
            self.source.describe(),
            self.options.interval.as_secs_f64(),
            self.options.max_poll.as_secs_f64()
        );

        let mut state = LiveState::Polling;
        while state == LiveState::Polling {
            state = self.step()?;
        }

        let hit = match state {
            LiveState::Done(PollOutcome::Found(hit)) => hit,
            _ => {
                log::warn!(
                    "no '{}' button found within {}s",
                    self.service.caption(),
                    self.options.max_poll.as_secs_f64()
                );
                return Ok(RunReport {
                    status: RunStatus::Partial,
                    message: NOT_FOUND_MESSAGE.to_string(),
                    clicked_at: None,
                });
            }
        };

        self.actuator.click(hit.center)?;

        let verification = verify_skip(
            self.service,
            self.source,
            self.pacer,
            self.options.verify_delay,
        )?;
        Ok(RunReport {
            status: verification.status,
            message: verification.message,
            clicked_at: Some(hit.center),
        })
    }
}

fn save_snapshot(frame: &Frame, hit: &ButtonHit, output_dir: &Path) {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!("detection_{}.png", timestamp));
    match frame.annotated(&hit.bbox).save(&path) {
        Ok(()) => log::info!("saved image with bbox to {}", path.display()),
        Err(e) => log::warn!("could not save detection snapshot: {:#}", e),
    }
}
