use anyhow::{anyhow, Result};
use regex::Regex;

use super::result::{ButtonHit, LabeledBox};

/// Selects the skip button among grounded boxes.
///
/// A candidate is accepted when its trimmed label matches any pattern and its
/// area does not exceed `max_area`. The first acceptable candidate in model
/// order wins.
#[derive(Clone, Debug)]
pub struct ButtonFilter {
    patterns: Vec<Regex>,
    max_area: f64,
}

impl ButtonFilter {
    pub fn new(patterns: &[String], max_area: u64) -> Result<Self> {
        if patterns.is_empty() {
            return Err(anyhow!("at least one skip pattern is required"));
        }
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p).map_err(|e| anyhow!("invalid skip pattern '{}': {}", p, e)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            patterns,
            max_area: max_area as f64,
        })
    }

    /// Case-insensitive literal match on `caption`.
    pub fn caption_pattern(caption: &str) -> String {
        format!("(?i){}", regex::escape(caption.trim()))
    }

    pub fn max_area(&self) -> f64 {
        self.max_area
    }

    pub fn matches_label(&self, label: &str) -> bool {
        let label = label.trim();
        self.patterns.iter().any(|p| p.is_match(label))
    }

    pub fn select(&self, candidates: &[LabeledBox]) -> Option<ButtonHit> {
        for candidate in candidates {
            let label = candidate.label.trim();
            if !self.matches_label(label) {
                continue;
            }
            let area = candidate.bbox.area();
            if area > self.max_area {
                log::info!(
                    "ignoring large bbox {:?} with area {} > {}",
                    candidate.bbox,
                    area,
                    self.max_area
                );
                continue;
            }
            let center = candidate.bbox.center();
            log::info!(
                "detected '{}' at center ({}, {}) with bbox {:?}",
                label,
                center.x,
                center.y,
                candidate.bbox
            );
            return Some(ButtonHit {
                center,
                bbox: candidate.bbox,
                label: label.to_string(),
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::result::{BoundingBox, Point};

    fn labeled(label: &str, x1: f64, y1: f64, x2: f64, y2: f64) -> LabeledBox {
        LabeledBox {
            bbox: BoundingBox::new(x1, y1, x2, y2),
            label: label.to_string(),
        }
    }

    fn skip_filter() -> ButtonFilter {
        ButtonFilter::new(&[ButtonFilter::caption_pattern("Skip")], 50_000).unwrap()
    }

    #[test]
    fn accepts_first_matching_candidate_in_model_order() {
        let filter = skip_filter();
        let hit = filter
            .select(&[
                labeled("Learn more", 0.0, 0.0, 10.0, 10.0),
                labeled("  skip ad ", 100.0, 100.0, 120.0, 110.0),
                labeled("Skip", 0.0, 0.0, 5.0, 5.0),
            ])
            .unwrap();
        assert_eq!(hit.label, "skip ad");
        assert_eq!(hit.center, Point { x: 110, y: 105 });
    }

    #[test]
    fn oversized_match_is_rejected_and_scan_continues() {
        let filter = skip_filter();
        // 300 x 200 = 60000 > 50000
        let oversized = labeled("Skip Ad", 0.0, 0.0, 300.0, 200.0);
        assert!(filter.select(std::slice::from_ref(&oversized)).is_none());

        let hit = filter
            .select(&[oversized, labeled("Skip", 10.0, 10.0, 20.0, 20.0)])
            .unwrap();
        assert_eq!(hit.bbox, BoundingBox::new(10.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn area_exactly_at_maximum_is_accepted() {
        let filter = ButtonFilter::new(&[ButtonFilter::caption_pattern("Skip")], 100).unwrap();
        assert!(filter.select(&[labeled("Skip", 0.0, 0.0, 10.0, 10.0)]).is_some());
        assert!(filter.select(&[labeled("Skip", 0.0, 0.0, 10.0, 10.5)]).is_none());
    }

    #[test]
    fn oversized_boxes_never_selected_for_any_label() {
        let filter = skip_filter();
        for label in ["Skip", "SKIP AD", "skip", "Skip Ads >"] {
            for (w, h) in [(301.0, 200.0), (1000.0, 51.0), (50_001.0, 1.0)] {
                assert!(filter.select(&[labeled(label, 0.0, 0.0, w, h)]).is_none());
            }
        }
    }

    #[test]
    fn labels_without_caption_are_never_selected() {
        let filter = skip_filter();
        for label in ["Visit advertiser", "Sk ip", "ad", "", "   "] {
            assert!(filter.select(&[labeled(label, 0.0, 0.0, 10.0, 10.0)]).is_none());
        }
    }

    #[test]
    fn selection_is_repeatable() {
        let filter = skip_filter();
        let boxes = vec![
            labeled("Skip", 0.0, 0.0, 400.0, 400.0),
            labeled("Skip", 5.0, 5.0, 15.0, 15.0),
        ];
        assert_eq!(filter.select(&boxes), filter.select(&boxes));
    }

    #[test]
    fn caption_pattern_escapes_regex_metacharacters() {
        let filter = ButtonFilter::new(&[ButtonFilter::caption_pattern("Skip (5)")], 100).unwrap();
        assert!(filter.matches_label("skip (5)"));
        assert!(!filter.matches_label("Skip 5"));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(ButtonFilter::new(&["(unclosed".to_string()], 10).is_err());
        assert!(ButtonFilter::new(&[], 10).is_err());
    }
}
