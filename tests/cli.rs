use std::path::Path;
use std::process::{Command, Output};

use image::{Rgb, RgbImage};

fn adskip(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_adskip"))
        .args(args)
        .args(["--ui", "plain"])
        .env("RUST_LOG", "info")
        .env_remove("ADSKIP_SETTINGS")
        .env_remove("ADSKIP_GROUNDING_CAPTION")
        .env_remove("ADSKIP_GROUNDING_ENDPOINT")
        .env_remove("ADSKIP_MAX_BBOX_AREA")
        .output()
        .expect("run adskip")
}

fn write_stub_settings(path: &Path) {
    std::fs::write(
        path,
        r#"{
            "grounding_caption": "Skip",
            "backend": {"kind": "stub", "stub_reply": "Skip<loc_100><loc_100><loc_120><loc_110>"}
        }"#,
    )
    .unwrap();
}

#[test]
fn missing_settings_exits_before_model_load() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    std::fs::create_dir(&images).unwrap();
    let missing = dir.path().join("settings.json");

    let output = adskip(&[
        "--mode",
        "test",
        "--test-dir",
        images.to_str().unwrap(),
        "--settings",
        missing.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"), "stderr: {}", stderr);
    assert!(stderr.contains("✘ Load settings"), "stderr: {}", stderr);
    assert!(!stderr.contains("grounding backend"), "stderr: {}", stderr);
    assert!(!stderr.contains("Load grounding model"), "stderr: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_mode_prints_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    let outputs = dir.path().join("outputs");
    std::fs::create_dir(&images).unwrap();
    RgbImage::from_pixel(1000, 1000, Rgb([0, 0, 0]))
        .save(images.join("ad.png"))
        .unwrap();
    let settings = dir.path().join("settings.json");
    write_stub_settings(&settings);

    let output = adskip(&[
        "--mode",
        "test",
        "--test-dir",
        images.to_str().unwrap(),
        "--output-dir",
        outputs.to_str().unwrap(),
        "--settings",
        settings.to_str().unwrap(),
    ]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr);
    assert!(stderr.contains("✔ Load grounding model"), "stderr: {}", stderr);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let files = json.as_array().expect("stdout is a JSON array");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["detected"], true);
    assert_eq!(files[0]["position"], serde_json::json!([110, 105]));
    assert!(outputs.join("output_ad.png").exists());
}

#[test]
fn test_mode_requires_test_dir() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.json");
    write_stub_settings(&settings);

    let output = adskip(&["--mode", "test", "--settings", settings.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}
