use serde::{Deserialize, Serialize};

use crate::types::Bp;

/// Tunable layout parameters shared by the mapper, controller, and stacker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Fixed pixel gap inserted between adjacent active regions.
    pub region_gap: f64,
    /// Zoom-in ceiling in pixels per nucleotide. Once the scale factor
    /// reaches this the view already shows individual bases and further
    /// zoom-in is rejected.
    pub max_px_per_bp: f64,
    /// Jump requests narrower than this emit a highlight interval carrying
    /// the original request in addition to the (expanded) view.
    pub highlight_span_bp: Bp,
    /// Vertical pixel budget shared by all stacked rows of one track.
    pub stack_area_height: f64,
    /// Cap on the height of a single stacked row.
    pub max_row_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            region_gap: 10.0,
            max_px_per_bp: 20.0,
            highlight_span_bp: 40,
            stack_area_height: 300.0,
            max_row_height: 12.0,
        }
    }
}

impl LayoutConfig {
    /// Smallest representable visible span for a given viewport width, in bp.
    pub fn min_span_bp(&self, viewport_width: f64) -> Bp {
        ((viewport_width / self.max_px_per_bp).ceil() as Bp).max(1)
    }
}
