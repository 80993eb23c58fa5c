//! Post-processing of phrase-grounding output.
//!
//! The model answers with text of the form
//! `phrase<loc_a><loc_b><loc_c><loc_d>[<loc_..>x4 ...]phrase2<loc_..>...`, where each
//! location token is a bin index in `0..LOC_BINS` along the image axis.

use std::sync::OnceLock;

use regex::Regex;

use super::result::{BoundingBox, LabeledBox};
use crate::LOC_BINS;

const SPECIAL_TOKENS: &[&str] = &["<s>", "</s>", "<pad>"];

fn phrase_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([^<]+)((?:<loc_\d+>){4,})").expect("static regex"))
}

fn box_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<loc_(\d+)><loc_(\d+)><loc_(\d+)><loc_(\d+)>").expect("static regex")
    })
}

/// Parse generated text into labelled boxes in absolute pixel coordinates of a
/// `width` x `height` image. Output preserves the model's order.
pub fn parse_phrase_grounding(text: &str, width: u32, height: u32) -> Vec<LabeledBox> {
    let mut cleaned = text.to_string();
    for token in SPECIAL_TOKENS {
        cleaned = cleaned.replace(token, "");
    }

    let mut out = Vec::new();
    for caps in phrase_regex().captures_iter(&cleaned) {
        let label = caps[1].trim();
        if label.is_empty() {
            continue;
        }
        for loc in box_regex().captures_iter(&caps[2]) {
            let bins: Option<Vec<u32>> = (1..=4).map(|i| loc[i].parse().ok()).collect();
            let Some(bins) = bins else {
                continue;
            };
            out.push(LabeledBox {
                bbox: BoundingBox::new(
                    dequantize(bins[0], width),
                    dequantize(bins[1], height),
                    dequantize(bins[2], width),
                    dequantize(bins[3], height),
                ),
                label: label.to_string(),
            });
        }
    }
    out
}

/// Bin index to pixel coordinate (bin center).
pub fn dequantize(bin: u32, size: u32) -> f64 {
    (bin as f64 + 0.5) * (size as f64 / LOC_BINS as f64)
}

/// Bin index covering pixel coordinate `value`. Inverse of `dequantize` for bin centers.
pub fn quantize(value: f64, size: u32) -> u32 {
    let bin = (value / (size as f64 / LOC_BINS as f64)).floor();
    bin.clamp(0.0, (LOC_BINS - 1) as f64) as u32
}

/// Render one phrase and its box in the model's output syntax. Used to script
/// stub replies from pixel-space boxes.
pub fn encode_phrase(label: &str, bbox: &BoundingBox, width: u32, height: u32) -> String {
    format!(
        "{}<loc_{}><loc_{}><loc_{}><loc_{}>",
        label,
        quantize(bbox.x1, width),
        quantize(bbox.y1, height),
        quantize(bbox.x2, width),
        quantize(bbox.y2, height)
    )
}
