use anyhow::Result;

use crate::frame::Frame;

/// Phrase-grounding model backend.
///
/// A backend owns the model (or the connection to wherever the model runs).
/// `load` acquires it, `generate` runs one blocking inference, and `release`
/// gives it back. `GroundingService` guarantees `release` runs once after a
/// successful `load`, on every exit path.
pub trait GroundingBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Acquire the model. Failure here is fatal for the run.
    fn load(&mut self) -> Result<()> {
        Ok(())
    }

    /// Run the model on `frame` with `prompt` (task token followed by the
    /// caption) and return its raw generated text.
    ///
    /// The frame is passed in native resolution; implementations must not
    /// rescale coordinates themselves.
    fn generate(&mut self, frame: &Frame, prompt: &str) -> Result<String>;

    /// Release the model.
    fn release(&mut self) -> Result<()> {
        Ok(())
    }
}
