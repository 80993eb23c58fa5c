use std::sync::Mutex;

use tempfile::NamedTempFile;

use adskip::config::{BackendKind, Settings};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "ADSKIP_GROUNDING_CAPTION",
        "ADSKIP_GROUNDING_ENDPOINT",
        "ADSKIP_MAX_BBOX_AREA",
    ] {
        std::env::remove_var(key);
    }
}

fn write_settings(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp settings");
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write settings");
    file
}

#[test]
fn loads_caption_and_backend_from_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_settings(
        r#"{
            "grounding_caption": "Skip",
            "max_bbox_area": 40000,
            "backend": {
                "kind": "http",
                "endpoint": "http://10.0.0.5:9000",
                "model_id": "microsoft/Florence-2-base",
                "timeout_secs": 15
            },
            "ui_language": "en"
        }"#,
    );
    let settings = Settings::load(file.path()).expect("load settings");

    assert_eq!(settings.grounding_caption, "Skip");
    assert_eq!(settings.skip_patterns, vec!["(?i)Skip"]);
    assert_eq!(settings.max_bbox_area, 40_000);
    assert_eq!(settings.backend.kind, BackendKind::Http);
    assert_eq!(settings.backend.endpoint, "http://10.0.0.5:9000");
    assert_eq!(settings.backend.model_id, "microsoft/Florence-2-base");
    assert_eq!(settings.backend.timeout.as_secs(), 15);
}

#[test]
fn env_overrides_take_precedence() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_settings(r#"{"grounding_caption": "Skip"}"#);
    std::env::set_var("ADSKIP_GROUNDING_CAPTION", "Skip Ad");
    std::env::set_var("ADSKIP_GROUNDING_ENDPOINT", "http://gpu-box:8765");
    std::env::set_var("ADSKIP_MAX_BBOX_AREA", "12345");

    let settings = Settings::load(file.path()).expect("load settings");
    assert_eq!(settings.grounding_caption, "Skip Ad");
    assert_eq!(settings.skip_patterns, vec!["(?i)Skip Ad"]);
    assert_eq!(settings.backend.endpoint, "http://gpu-box:8765");
    assert_eq!(settings.max_bbox_area, 12_345);

    clear_env();
}

#[test]
fn explicit_patterns_survive_caption_override() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_settings(r#"{"grounding_caption": "Skip", "skip_patterns": ["(?i)skip"]}"#);
    std::env::set_var("ADSKIP_GROUNDING_CAPTION", "Skip Ads");

    let settings = Settings::load(file.path()).expect("load settings");
    assert_eq!(settings.skip_patterns, vec!["(?i)skip"]);

    clear_env();
}

#[test]
fn missing_file_is_fatal() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let dir = tempfile::tempdir().unwrap();
    let err = Settings::load(&dir.path().join("settings.json")).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn malformed_or_incomplete_file_is_fatal() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let not_json = write_settings("grounding_caption = Skip");
    assert!(Settings::load(not_json.path()).is_err());

    let no_caption = write_settings(r#"{"caption": "Skip"}"#);
    let err = Settings::load(no_caption.path()).unwrap_err();
    assert!(err.to_string().contains("grounding_caption"));

    let empty_caption = write_settings(r#"{"grounding_caption": ""}"#);
    assert!(Settings::load(empty_caption.path()).is_err());
}

#[test]
fn non_numeric_area_override_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_settings(r#"{"grounding_caption": "Skip"}"#);
    std::env::set_var("ADSKIP_MAX_BBOX_AREA", "large");
    assert!(Settings::load(file.path()).is_err());

    clear_env();
}
