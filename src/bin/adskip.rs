//! adskip - find, click and verify the skip button of a video ad
//!
//! Test mode grounds every image in a directory and prints a JSON array of
//! per-file results. Live mode polls the primary display, clicks the first
//! detected button once, re-checks, and prints a single JSON status object.

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use adskip::config::DEFAULT_SETTINGS_PATH;
use adskip::detect::backends;
use adskip::{run_batch, GroundingService, Settings};

#[path = "../ui.rs"]
mod ui;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Process a directory of images; no clicking.
    Test,
    /// Poll the screen, click when found, verify.
    Live,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Run mode.
    #[arg(long, value_enum, default_value_t = Mode::Live)]
    mode: Mode,
    /// Directory of test images (required for --mode test).
    #[arg(long)]
    test_dir: Option<PathBuf>,
    /// Output directory for annotated images.
    #[arg(long, default_value = "test_outputs")]
    output_dir: PathBuf,
    /// Poll interval in seconds (live mode).
    #[arg(long, default_value_t = 3)]
    interval: u64,
    /// Maximum polling duration in seconds (live mode).
    #[arg(long, default_value_t = 30)]
    max_poll_seconds: u64,
    /// Settle time in seconds between the click and the re-check (live mode).
    #[arg(long, default_value_t = 2)]
    verify_delay_secs: u64,
    /// Settings file.
    #[arg(long, env = "ADSKIP_SETTINGS", default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,
    /// Log the click instead of injecting it (live mode).
    #[arg(long)]
    dry_run: bool,
    /// UI mode for stderr progress.
    #[arg(long, value_enum, default_value_t = ui::UiMode::Auto, value_name = "MODE")]
    ui: ui::UiMode,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let ui = ui::Ui::new(args.ui);

    if args.mode == Mode::Test && args.test_dir.is_none() {
        return Err(anyhow!("--test-dir is required for test mode"));
    }
    if args.mode == Mode::Live && args.interval == 0 {
        return Err(anyhow!("--interval must be >= 1"));
    }

    let settings = {
        let stage = ui.stage("Load settings");
        let settings = Settings::load(&args.settings);
        if settings.is_ok() {
            stage.done();
        }
        settings
    };
    let settings = settings.map_err(|e| {
        log::error!("error loading settings: {:#}", e);
        e
    })?;

    let result = match args.mode {
        Mode::Test => run_test_mode(&args, &settings, &ui),
        Mode::Live => run_live_mode(&args, &settings, &ui),
    };
    if let Err(e) = &result {
        log::error!("fatal error: {:#}", e);
    }
    log::info!("run finished");
    result
}

fn load_service(settings: &Settings, ui: &ui::Ui) -> Result<GroundingService> {
    let stage = ui.stage("Load grounding model");
    let backend = backends::from_settings(&settings.backend)?;
    let service = GroundingService::load(
        backend,
        settings.grounding_caption.clone(),
        settings.button_filter()?,
    )?;
    stage.done();
    Ok(service)
}

fn run_test_mode(args: &Args, settings: &Settings, ui: &ui::Ui) -> Result<()> {
    let test_dir = args
        .test_dir
        .as_deref()
        .ok_or_else(|| anyhow!("--test-dir is required for test mode"))?;
    let mut service = load_service(settings, ui)?;
    let report = {
        let stage = ui.stage("Ground test images");
        let report = run_batch(&mut service, test_dir, &args.output_dir)?;
        stage.done();
        report
    };
    drop(service);
    println!("{}", serde_json::to_string_pretty(&report.files)?);
    Ok(())
}

#[cfg(not(feature = "desktop"))]
fn run_live_mode(_args: &Args, _settings: &Settings, _ui: &ui::Ui) -> Result<()> {
    Err(anyhow!(
        "live mode requires the desktop feature (screen capture and input injection)"
    ))
}

#[cfg(feature = "desktop")]
fn run_live_mode(args: &Args, settings: &Settings, ui: &ui::Ui) -> Result<()> {
    use std::time::Duration;

    use adskip::{
        Actuator, DryRunActuator, EnigoActuator, LiveOptions, LiveSession, ScreenSource,
        SystemPacer,
    };

    let mut source = ScreenSource::new();
    let mut actuator: Box<dyn Actuator> = if args.dry_run {
        Box::new(DryRunActuator::new())
    } else {
        Box::new(EnigoActuator::new()?)
    };
    let mut service = load_service(settings, ui)?;

    let options = LiveOptions {
        interval: Duration::from_secs(args.interval),
        max_poll: Duration::from_secs(args.max_poll_seconds),
        verify_delay: Duration::from_secs(args.verify_delay_secs),
        output_dir: args.output_dir.clone(),
    };
    let mut pacer = SystemPacer::start();
    let report = LiveSession::new(
        &mut service,
        &mut source,
        actuator.as_mut(),
        &mut pacer,
        options,
    )
    .run()?;
    drop(service);
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
