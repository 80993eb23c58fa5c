#![cfg(feature = "backend-http")]

use std::io::Cursor;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use base64::Engine;
use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::detect::backend::GroundingBackend;
use crate::frame::Frame;
use crate::GROUNDING_TASK;

const MAX_NEW_TOKENS: u32 = 1024;
const NUM_BEAMS: u32 = 3;

/// Configuration for a local grounding inference server.
#[derive(Clone, Debug)]
pub struct HttpConfig {
    /// Base URL, e.g. "http://127.0.0.1:8765".
    pub endpoint: String,
    pub model_id: String,
    pub timeout: Duration,
}

#[derive(Serialize)]
struct LoadRequest<'a> {
    model_id: &'a str,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model_id: &'a str,
    task: &'a str,
    prompt: &'a str,
    image_png_base64: String,
    width: u32,
    height: u32,
    max_new_tokens: u32,
    num_beams: u32,
    do_sample: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    text: String,
}

/// Backend that runs the model in a local inference server over HTTP.
///
/// Frames are sent losslessly as PNG in native resolution; the server only
/// generates text, all coordinate post-processing happens on this side.
pub struct HttpBackend {
    config: HttpConfig,
    agent: ureq::Agent,
}

impl HttpBackend {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(anyhow!(
                "grounding endpoint must be an http(s) URL, got '{}'",
                config.endpoint
            ));
        }
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Ok(Self {
            config: HttpConfig { endpoint, ..config },
            agent,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.endpoint, path)
    }
}

impl GroundingBackend for HttpBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    fn load(&mut self) -> Result<()> {
        self.agent
            .post(&self.url("load"))
            .send_json(LoadRequest {
                model_id: &self.config.model_id,
            })
            .with_context(|| {
                format!(
                    "failed to load model {} at {}",
                    self.config.model_id, self.config.endpoint
                )
            })?;
        log::info!(
            "model {} loaded at {}",
            self.config.model_id,
            self.config.endpoint
        );
        Ok(())
    }

    fn generate(&mut self, frame: &Frame, prompt: &str) -> Result<String> {
        let mut png = Vec::new();
        frame
            .as_image()
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .context("encode frame as png")?;

        let request = GenerateRequest {
            model_id: &self.config.model_id,
            task: GROUNDING_TASK,
            prompt,
            image_png_base64: base64::engine::general_purpose::STANDARD.encode(&png),
            width: frame.width(),
            height: frame.height(),
            max_new_tokens: MAX_NEW_TOKENS,
            num_beams: NUM_BEAMS,
            do_sample: false,
        };
        let response: GenerateResponse = self
            .agent
            .post(&self.url("generate"))
            .send_json(request)
            .context("grounding request failed")?
            .into_json()
            .context("malformed grounding response")?;
        Ok(response.text)
    }

    fn release(&mut self) -> Result<()> {
        self.agent
            .post(&self.url("unload"))
            .send_json(LoadRequest {
                model_id: &self.config.model_id,
            })
            .context("failed to unload model")?;
        Ok(())
    }
}
