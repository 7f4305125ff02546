//! Per-point label placement with collision avoidance.
//!
//! Callers hand over anchor points in ascending pixel order plus the
//! occupied boxes already drawn (axis ticks, legends). Each label goes
//! right of its anchor when that side has room, left when only the left
//! does, and is suppressed when neither side can hold it.

use serde::{Deserialize, Serialize};

/// Where a label ended up relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelPlacement {
    Left,
    Right,
    Suppressed,
}

/// A label anchor: the x pixel of the feature and the rendered text width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelPoint {
    pub x: f64,
    pub width: f64,
}

impl LabelPoint {
    pub fn new(x: f64, width: f64) -> Self {
        Self { x, width }
    }
}

/// A pre-occupied horizontal interval labels must not enter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSpan {
    pub x1: f64,
    pub x2: f64,
}

impl BoxSpan {
    pub fn new(x1: f64, x2: f64) -> Self {
        Self { x1, x2 }
    }
}

/// Text width estimation. Rendering backends differ, so the resolver takes
/// this as a seam; the monospace estimate is good enough for layout.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_px: f64) -> f64;
}

/// Width estimate assuming a fixed glyph aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    pub char_aspect: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { char_aspect: 0.6 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn text_width(&self, text: &str, font_px: f64) -> f64 {
        text.chars().count() as f64 * font_px * self.char_aspect
    }
}

/// Decide a placement for every point. `points` must be sorted by `x`
/// ascending; decisions for later points see where earlier labels landed.
pub fn resolve_labels(points: &[LabelPoint], boxes: &[BoxSpan]) -> Vec<LabelPlacement> {
    let mut placements = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        let left_room = p.x - left_bound(points, &placements, boxes, i);
        let right_room = right_bound(points, boxes, i) - p.x;
        // Right is the preferred side when both are clear.
        let placement = if right_room >= p.width {
            LabelPlacement::Right
        } else if left_room >= p.width {
            LabelPlacement::Left
        } else {
            log::debug!("label at x={} suppressed: no room on either side", p.x);
            LabelPlacement::Suppressed
        };
        placements.push(placement);
    }
    placements
}

/// Rightmost obstruction left of point `i`: the previous point's extent
/// (including its label if that label went right) and any box edge that
/// starts left of the point.
fn left_bound(
    points: &[LabelPoint],
    placements: &[LabelPlacement],
    boxes: &[BoxSpan],
    i: usize,
) -> f64 {
    let p = points[i];
    let mut bound = f64::NEG_INFINITY;
    if i > 0 {
        let prev = points[i - 1];
        let extent = match placements[i - 1] {
            LabelPlacement::Right => prev.x + prev.width,
            _ => prev.x,
        };
        bound = bound.max(extent);
    }
    for b in boxes {
        if b.x1 < p.x {
            bound = bound.max(b.x2.min(p.x));
        }
    }
    bound
}

/// Leftmost obstruction right of point `i`: the next point's anchor and
/// any box edge past the point.
fn right_bound(points: &[LabelPoint], boxes: &[BoxSpan], i: usize) -> f64 {
    let p = points[i];
    let mut bound = f64::INFINITY;
    if i + 1 < points.len() {
        bound = bound.min(points[i + 1].x);
    }
    for b in boxes {
        if b.x2 > p.x {
            bound = bound.min(b.x1.max(p.x));
        }
    }
    bound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lone_point_with_both_sides_clear_goes_right() {
        let placements = resolve_labels(&[LabelPoint::new(500.0, 40.0)], &[]);
        assert_eq!(placements, vec![LabelPlacement::Right]);
    }

    #[test]
    fn test_box_on_right_pushes_label_left() {
        let boxes = [BoxSpan::new(520.0, 900.0)];
        let placements = resolve_labels(&[LabelPoint::new(500.0, 40.0)], &boxes);
        assert_eq!(placements, vec![LabelPlacement::Left]);
    }

    #[test]
    fn test_boxed_in_point_is_suppressed() {
        let boxes = [BoxSpan::new(0.0, 490.0), BoxSpan::new(510.0, 900.0)];
        let placements = resolve_labels(&[LabelPoint::new(500.0, 40.0)], &boxes);
        assert_eq!(placements, vec![LabelPlacement::Suppressed]);
    }

    #[test]
    fn test_close_pair_splits_sides() {
        // 30px apart with 40px labels: the first's right side is cut off
        // by the next anchor so it falls back to left; the second has its
        // whole right free.
        let points = [LabelPoint::new(500.0, 40.0), LabelPoint::new(530.0, 40.0)];
        let placements = resolve_labels(&points, &[]);
        assert_eq!(placements, vec![LabelPlacement::Left, LabelPlacement::Right]);
    }

    #[test]
    fn test_right_placed_neighbor_blocks_following_label() {
        // The first label goes right and its extent leaves the second
        // point without room on its left, while a trailing box closes off
        // the second's right.
        let boxes = [BoxSpan::new(0.0, 495.0), BoxSpan::new(560.0, 900.0)];
        let points = [LabelPoint::new(500.0, 40.0), LabelPoint::new(550.0, 40.0)];
        let placements = resolve_labels(&points, &boxes);
        assert_eq!(
            placements,
            vec![LabelPlacement::Right, LabelPlacement::Suppressed]
        );
    }

    #[test]
    fn test_right_label_extent_consumes_gap_before_next_point() {
        // 45px separate the anchors, enough for the second's 40px label if
        // its left neighbor were bare. But the first label defaults right,
        // occupying [500, 540], and a box closes the second's right side:
        // the decision must see the placed label, not just the anchor.
        let boxes = [BoxSpan::new(560.0, 900.0)];
        let points = [LabelPoint::new(500.0, 40.0), LabelPoint::new(545.0, 40.0)];
        let placements = resolve_labels(&points, &boxes);
        assert_eq!(
            placements,
            vec![LabelPlacement::Right, LabelPlacement::Suppressed]
        );
    }

    #[test]
    fn test_spread_points_default_right() {
        let points: Vec<LabelPoint> = (1..=5)
            .map(|i| LabelPoint::new(i as f64 * 100.0, 30.0))
            .collect();
        let placements = resolve_labels(&points, &[]);
        assert!(placements.iter().all(|&p| p == LabelPlacement::Right));
    }

    #[test]
    fn test_box_straddling_point_blocks_both_sides() {
        let boxes = [BoxSpan::new(400.0, 600.0)];
        let placements = resolve_labels(&[LabelPoint::new(500.0, 40.0)], &boxes);
        // The box contributes min(x2, x) = x on the left and max(x1, x) = x
        // on the right: zero room.
        assert_eq!(placements, vec![LabelPlacement::Suppressed]);
    }

    #[test]
    fn test_monospace_measure() {
        let m = MonospaceMeasure::default();
        assert!((m.text_width("TP53", 12.0) - 28.8).abs() < 1e-9);
        assert_eq!(m.text_width("", 12.0), 0.0);
    }
}
