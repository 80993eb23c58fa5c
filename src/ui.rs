use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::time::{Duration, Instant};

/// How stage progress is shown on stderr.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum UiMode {
    Auto,
    Plain,
    Pretty,
}

#[derive(Clone, Debug)]
pub struct Ui {
    mode: UiMode,
    is_tty: bool,
}

impl Ui {
    /// Spinners only ever draw on stderr; stdout stays reserved for JSON.
    pub fn new(mode: UiMode) -> Self {
        Self {
            mode,
            is_tty: std::io::stderr().is_terminal(),
        }
    }

    fn pretty(&self) -> bool {
        self.is_tty && self.mode != UiMode::Plain
    }

    /// Announce a stage. The guard reports the duration when dropped, as a
    /// failure unless `StageGuard::done` was called.
    pub fn stage(&self, name: &str) -> StageGuard {
        if self.pretty() {
            let spinner = ProgressBar::new_spinner();
            spinner.set_draw_target(ProgressDrawTarget::stderr());
            spinner.enable_steady_tick(Duration::from_millis(120));
            let style = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            spinner.set_style(style);
            spinner.set_message(format!("{name}…"));
            StageGuard::new(name.to_string(), Some(spinner))
        } else {
            log::info!("==> {}", name);
            StageGuard::new(name.to_string(), None)
        }
    }
}

pub struct StageGuard {
    name: String,
    start: Instant,
    spinner: Option<ProgressBar>,
    completed: bool,
}

impl StageGuard {
    fn new(name: String, spinner: Option<ProgressBar>) -> Self {
        Self {
            name,
            start: Instant::now(),
            spinner,
            completed: false,
        }
    }

    /// Mark the stage as finished successfully.
    pub fn done(mut self) {
        self.completed = true;
    }

    fn summary(&self) -> String {
        let mark = if self.completed { "✔" } else { "✘" };
        format!(
            "{} {} ({})",
            mark,
            self.name,
            format_duration(self.start.elapsed())
        )
    }
}

impl Drop for StageGuard {
    fn drop(&mut self) {
        let message = self.summary();
        match (&self.spinner, self.completed) {
            (Some(spinner), true) => spinner.finish_with_message(message),
            (Some(spinner), false) => spinner.abandon_with_message(message),
            (None, true) => log::info!("{}", message),
            (None, false) => log::warn!("{}", message),
        }
    }
}

fn format_duration(duration: Duration) -> String {
    if duration.as_secs() >= 1 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}
