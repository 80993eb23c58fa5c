use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::detect::ButtonFilter;

pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";
const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8765";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Deserialize, Default)]
struct SettingsFile {
    grounding_caption: Option<String>,
    skip_patterns: Option<Vec<String>>,
    max_bbox_area: Option<u64>,
    backend: Option<BackendConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct BackendConfigFile {
    kind: Option<BackendKind>,
    endpoint: Option<String>,
    model_id: Option<String>,
    timeout_secs: Option<u64>,
    stub_reply: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Http,
    Stub,
}

/// Validated run settings. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Phrase the model is asked to ground, e.g. "Skip".
    pub grounding_caption: String,
    /// Label patterns a detection must match.
    pub skip_patterns: Vec<String>,
    /// Largest accepted box area in square pixels.
    pub max_bbox_area: u64,
    pub backend: BackendSettings,
}

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub kind: BackendKind,
    pub endpoint: String,
    pub model_id: String,
    pub timeout: Duration,
    pub stub_reply: String,
}

impl Settings {
    /// Read settings from `path`, apply `ADSKIP_*` environment overrides and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let file_cfg = read_settings_file(path)?;
        let mut settings = Self::from_file(file_cfg);
        settings.apply_env()?;
        settings.validate()?;
        Ok(settings)
    }

    fn from_file(file: SettingsFile) -> Self {
        let grounding_caption = file.grounding_caption.unwrap_or_default();
        let skip_patterns = file
            .skip_patterns
            .unwrap_or_else(|| vec![ButtonFilter::caption_pattern(&grounding_caption)]);
        let backend = file.backend.unwrap_or_default();
        Self {
            grounding_caption,
            skip_patterns,
            max_bbox_area: file.max_bbox_area.unwrap_or(crate::DEFAULT_MAX_BBOX_AREA),
            backend: BackendSettings {
                kind: backend.kind.unwrap_or_default(),
                endpoint: backend
                    .endpoint
                    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
                model_id: backend
                    .model_id
                    .unwrap_or_else(|| crate::DEFAULT_MODEL_ID.to_string()),
                timeout: Duration::from_secs(backend.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
                stub_reply: backend.stub_reply.unwrap_or_default(),
            },
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(caption) = std::env::var("ADSKIP_GROUNDING_CAPTION") {
            if !caption.trim().is_empty() {
                // a caption-derived default pattern follows the override
                let derived = vec![ButtonFilter::caption_pattern(&self.grounding_caption)];
                if self.skip_patterns == derived {
                    self.skip_patterns = vec![ButtonFilter::caption_pattern(&caption)];
                }
                self.grounding_caption = caption;
            }
        }
        if let Ok(endpoint) = std::env::var("ADSKIP_GROUNDING_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                self.backend.endpoint = endpoint;
            }
        }
        if let Ok(area) = std::env::var("ADSKIP_MAX_BBOX_AREA") {
            self.max_bbox_area = area
                .trim()
                .parse()
                .map_err(|_| anyhow!("ADSKIP_MAX_BBOX_AREA must be an integer number of pixels"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.grounding_caption.trim().is_empty() {
            return Err(anyhow!(
                "'grounding_caption' not found in settings (e.g. {{\"grounding_caption\": \"Skip\"}})"
            ));
        }
        if self.max_bbox_area == 0 {
            return Err(anyhow!("max_bbox_area must be greater than zero"));
        }
        if self.backend.timeout.is_zero() {
            return Err(anyhow!("backend.timeout_secs must be greater than zero"));
        }
        self.button_filter()?;
        Ok(())
    }

    pub fn button_filter(&self) -> Result<ButtonFilter> {
        ButtonFilter::new(&self.skip_patterns, self.max_bbox_area)
    }
}

fn read_settings_file(path: &Path) -> Result<SettingsFile> {
    if !path.exists() {
        return Err(anyhow!("{} does not exist", path.display()));
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read settings file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid settings file {}: {}", path.display(), e))?;
    Ok(cfg)
}
