use std::collections::VecDeque;

use anyhow::{anyhow, Result};

use crate::detect::backend::GroundingBackend;
use crate::frame::Frame;

/// Scripted reply for `StubBackend`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StubReply {
    Text(String),
    Fail(String),
}

/// Stub backend for tests and dry runs. Replays scripted replies in order,
/// then answers every further call with the fallback reply.
pub struct StubBackend {
    script: VecDeque<StubReply>,
    fallback: StubReply,
    calls: u64,
}

impl StubBackend {
    /// Always answer with `text`.
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::scripted(Vec::new(), StubReply::Text(text.into()))
    }

    pub fn scripted(script: Vec<StubReply>, fallback: StubReply) -> Self {
        Self {
            script: script.into(),
            fallback,
            calls: 0,
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::fixed("")
    }
}

impl GroundingBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn generate(&mut self, _frame: &Frame, _prompt: &str) -> Result<String> {
        self.calls += 1;
        let reply = self
            .script
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        match reply {
            StubReply::Text(text) => Ok(text),
            StubReply::Fail(reason) => Err(anyhow!(reason)),
        }
    }
}
