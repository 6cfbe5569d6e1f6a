use std::fmt;

use crate::api::types::{Detection, InspectionResult, InspectionStatus};

// Prediction classes that count as an acceptable part. Injected from the
// settings so deployments (and tests) can swap the set.
#[derive(Debug, Clone)]
pub struct GoodClasses(Vec<String>);

impl GoodClasses {
    pub fn new(classes: Vec<String>) -> Self {
        Self(classes)
    }

    pub fn contains(&self, class: &str) -> bool {
        self.0.iter().any(|c| c == class)
    }
}

// Overall verdict shown in the corner of the frame. Accepted wins outright;
// a non-accepted result with zero defects is indeterminate, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Pass,
    Fail(usize),
    Unknown,
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Badge::Pass => write!(f, "Pass"),
            Badge::Fail(count) => write!(f, "Fail: {} Defects", count),
            Badge::Unknown => write!(f, "Unknown"),
        }
    }
}

// One screen-space rectangle, in percent of the rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub passing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub boxes: Vec<OverlayBox>,
    pub badge: Badge,
    pub defect_count: usize,
    // First detection's confidence as a percentage, 0 when there are none.
    pub confidence_pct: f64,
}

pub fn defect_count(result: &InspectionResult, good: &GoodClasses) -> usize {
    result
        .detections
        .iter()
        .filter(|d| !good.contains(&d.prediction))
        .count()
}

// Pure view computation: no side effects, no network. Detections with an
// unusable box are left out of the render set; their class still counts.
pub fn build(result: &InspectionResult, good: &GoodClasses) -> Overlay {
    let defects = defect_count(result, good);
    let boxes = result
        .detections
        .iter()
        .filter_map(|d| overlay_box(d, good))
        .collect();
    let badge = if result.status == InspectionStatus::Accepted {
        Badge::Pass
    } else if defects > 0 {
        Badge::Fail(defects)
    } else {
        Badge::Unknown
    };
    Overlay {
        boxes,
        badge,
        defect_count: defects,
        confidence_pct: result.headline_confidence() * 100.0,
    }
}

fn overlay_box(detection: &Detection, good: &GoodClasses) -> Option<OverlayBox> {
    let bounds = detection.normalized_box()?;
    Some(OverlayBox {
        left: bounds.x1 * 100.0,
        top: bounds.y1 * 100.0,
        width: (bounds.x2 - bounds.x1) * 100.0,
        height: (bounds.y2 - bounds.y1) * 100.0,
        passing: good.contains(&detection.prediction),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good() -> GoodClasses {
        GoodClasses::new(vec![
            "polished_casting".to_string(),
            "unpolished_casting".to_string(),
        ])
    }

    fn detection(prediction: &str, confidence: f64, bounds: [f64; 4]) -> Detection {
        Detection {
            prediction: prediction.to_string(),
            confidence,
            bounds,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn accepted_result_renders_green_box_and_pass_badge() {
        let result = InspectionResult {
            status: InspectionStatus::Accepted,
            detections: vec![detection("polished_casting", 0.95, [0.1, 0.1, 0.4, 0.4])],
        };
        let overlay = build(&result, &good());

        assert_eq!(overlay.boxes.len(), 1);
        let b = &overlay.boxes[0];
        assert!(close(b.left, 10.0));
        assert!(close(b.top, 10.0));
        assert!(close(b.width, 30.0));
        assert!(close(b.height, 30.0));
        assert!(b.passing);
        assert_eq!(overlay.badge, Badge::Pass);
        assert_eq!(overlay.defect_count, 0);
        assert!(close(overlay.confidence_pct, 95.0));
    }

    #[test]
    fn rejected_result_with_defect_shows_fail_badge() {
        let result = InspectionResult {
            status: InspectionStatus::Rejected,
            detections: vec![detection("scratch", 0.8, [0.0, 0.0, 1.0, 1.0])],
        };
        let overlay = build(&result, &good());

        assert_eq!(overlay.badge, Badge::Fail(1));
        assert_eq!(overlay.defect_count, 1);
        assert_eq!(overlay.boxes.len(), 1);
        assert!(!overlay.boxes[0].passing);
        assert_eq!(overlay.badge.to_string(), "Fail: 1 Defects");
    }

    #[test]
    fn accepted_status_wins_over_defect_boxes() {
        let result = InspectionResult {
            status: InspectionStatus::Accepted,
            detections: vec![detection("scratch", 0.6, [0.2, 0.2, 0.5, 0.5])],
        };
        let overlay = build(&result, &good());
        assert_eq!(overlay.badge, Badge::Pass);
        // The box itself still renders as a failure.
        assert!(!overlay.boxes[0].passing);
    }

    #[test]
    fn non_accepted_status_with_zero_defects_is_unknown() {
        let result = InspectionResult {
            status: InspectionStatus::Rejected,
            detections: vec![detection("polished_casting", 0.9, [0.1, 0.1, 0.2, 0.2])],
        };
        let overlay = build(&result, &good());
        assert_eq!(overlay.badge, Badge::Unknown);
        assert_eq!(overlay.defect_count, 0);
    }

    #[test]
    fn invalid_boxes_are_dropped_without_affecting_the_rest() {
        let result = InspectionResult {
            status: InspectionStatus::Rejected,
            detections: vec![
                detection("scratch", 0.8, [0.1, 0.1, 1.4, 0.4]),
                detection("pit", 0.7, [f64::NAN, 0.0, 0.5, 0.5]),
                detection("scratch", 0.6, [0.3, 0.3, 0.6, 0.6]),
            ],
        };
        let overlay = build(&result, &good());

        // Only the last detection has a usable box.
        assert_eq!(overlay.boxes.len(), 1);
        assert!(close(overlay.boxes[0].left, 30.0));
        // All three classes still count as defects.
        assert_eq!(overlay.defect_count, 3);
        assert_eq!(overlay.badge, Badge::Fail(3));
    }

    #[test]
    fn empty_detection_list_has_zero_defects() {
        let result = InspectionResult {
            status: InspectionStatus::Rejected,
            detections: vec![],
        };
        assert_eq!(defect_count(&result, &good()), 0);
        let overlay = build(&result, &good());
        assert_eq!(overlay.badge, Badge::Unknown);
        assert!(close(overlay.confidence_pct, 0.0));
    }

    #[test]
    fn substituted_class_set_changes_the_verdict() {
        let lenient = GoodClasses::new(vec!["scratch".to_string()]);
        let result = InspectionResult {
            status: InspectionStatus::Rejected,
            detections: vec![detection("scratch", 0.8, [0.0, 0.0, 1.0, 1.0])],
        };
        assert_eq!(defect_count(&result, &lenient), 0);
        assert_eq!(defect_count(&result, &good()), 1);
    }
}
