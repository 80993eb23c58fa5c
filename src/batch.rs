//! Test mode: run detection over a directory of screenshots.

use std::path::Path;

use anyhow::{Context, Result};

use crate::detect::GroundingService;
use crate::ingest::{list_images, FileSource, FrameSource};
use crate::report::{BatchReport, FileReport};

/// Detect the skip button in every image of `test_dir` and write annotated
/// copies of the hits to `output_dir` as `output_<file name>`.
///
/// An image that cannot be decoded is logged and reported as not detected.
pub fn run_batch(
    service: &mut GroundingService,
    test_dir: &Path,
    output_dir: &Path,
) -> Result<BatchReport> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let mut report = BatchReport::default();
    for path in list_images(test_dir)? {
        let file = path.display().to_string();
        let mut source = FileSource::new(&path);
        log::info!("processing {}", source.describe());

        let frame = match source.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("skipping {}: {:#}", file, e);
                report.files.push(FileReport::new(file, None));
                continue;
            }
        };

        let hit = service.detect(&frame);
        match &hit {
            Some(hit) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let out = output_dir.join(format!("output_{}", name));
                match frame.annotated(&hit.bbox).save(&out) {
                    Ok(()) => log::info!("saved image with bbox to {}", out.display()),
                    Err(e) => log::warn!("could not save annotated image: {:#}", e),
                }
            }
            None => log::info!("no detection for {}", file),
        }
        report.files.push(FileReport::new(file, hit.as_ref()));
    }

    log::info!("test complete: {}", report.summary());
    Ok(report)
}
