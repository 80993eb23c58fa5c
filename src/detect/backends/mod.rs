#[cfg(feature = "backend-http")]
pub mod http;
pub mod stub;

use anyhow::Result;

use crate::config::{BackendKind, BackendSettings};
use crate::detect::backend::GroundingBackend;

#[cfg(feature = "backend-http")]
pub use http::{HttpBackend, HttpConfig};
pub use stub::{StubBackend, StubReply};

/// Build the configured backend. The model is not loaded yet.
pub fn from_settings(settings: &BackendSettings) -> Result<Box<dyn GroundingBackend>> {
    match settings.kind {
        BackendKind::Stub => Ok(Box::new(StubBackend::fixed(settings.stub_reply.clone()))),
        BackendKind::Http => {
            #[cfg(feature = "backend-http")]
            {
                Ok(Box::new(HttpBackend::new(HttpConfig {
                    endpoint: settings.endpoint.clone(),
                    model_id: settings.model_id.clone(),
                    timeout: settings.timeout,
                })?))
            }
            #[cfg(not(feature = "backend-http"))]
            {
                Err(anyhow::anyhow!(
                    "the http grounding backend requires the backend-http feature"
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn settings(kind: BackendKind) -> BackendSettings {
        BackendSettings {
            kind,
            endpoint: "http://127.0.0.1:8765".to_string(),
            model_id: crate::DEFAULT_MODEL_ID.to_string(),
            timeout: Duration::from_secs(60),
            stub_reply: String::new(),
        }
    }

    #[test]
    fn stub_kind_builds_stub_backend() {
        let backend = from_settings(&settings(BackendKind::Stub)).unwrap();
        assert_eq!(backend.name(), "stub");
    }

    #[cfg(feature = "backend-http")]
    #[test]
    fn default_kind_builds_http_backend() {
        let backend = from_settings(&settings(BackendKind::default())).unwrap();
        assert_eq!(backend.name(), "http");
    }
}
