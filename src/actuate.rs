//! Synthetic input.

use anyhow::Result;

use crate::detect::Point;

/// Issues a single primary-button click at an absolute screen position.
///
/// Implementations do not retry and do not check whether the click landed;
/// that is left to the verifier's fresh detection pass.
pub trait Actuator {
    fn name(&self) -> &'static str;

    fn click(&mut self, at: Point) -> Result<()>;
}

/// Logs the click instead of injecting it.
#[derive(Default)]
pub struct DryRunActuator {
    clicks: Vec<Point>,
}

impl DryRunActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clicks(&self) -> &[Point] {
        &self.clicks
    }
}

impl Actuator for DryRunActuator {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    fn click(&mut self, at: Point) -> Result<()> {
        log::info!("dry run: would click at ({}, {})", at.x, at.y);
        self.clicks.push(at);
        Ok(())
    }
}

#[cfg(feature = "desktop")]
pub use desktop::EnigoActuator;

#[cfg(feature = "desktop")]
mod desktop {
    use anyhow::{anyhow, Result};
    use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};

    use super::Actuator;
    use crate::detect::Point;

    /// OS-level mouse injection.
    pub struct EnigoActuator {
        enigo: Enigo,
    }

    impl EnigoActuator {
        pub fn new() -> Result<Self> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| anyhow!("failed to initialise input injection: {}", e))?;
            Ok(Self { enigo })
        }
    }

    impl Actuator for EnigoActuator {
        fn name(&self) -> &'static str {
            "enigo"
        }

        fn click(&mut self, at: Point) -> Result<()> {
            self.enigo
                .move_mouse(at.x, at.y, Coordinate::Abs)
                .map_err(|e| anyhow!("failed to move pointer to ({}, {}): {}", at.x, at.y, e))?;
            self.enigo
                .button(Button::Left, Direction::Click)
                .map_err(|e| anyhow!("failed to click at ({}, {}): {}", at.x, at.y, e))?;
            log::info!("clicked at ({}, {}) to skip ad", at.x, at.y);
            Ok(())
        }
    }
}
