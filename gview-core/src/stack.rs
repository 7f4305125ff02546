//! Greedy interval stacking for track rows, with paging over the rail
//! window when a track has more rows than its panel can show.

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;

/// A horizontal pixel interval to be stacked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: f64,
    pub stop: f64,
}

impl Span {
    pub fn new(start: f64, stop: f64) -> Self {
        Self { start, stop }
    }
}

/// An input interval with its assigned row, in original input order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stacked {
    pub start: f64,
    pub stop: f64,
    pub row: usize,
}

/// The rail assignment for a whole track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackLayout {
    pub items: Vec<Stacked>,
    pub total_rows: usize,
    pub row_height: f64,
}

/// One page of a layout whose rows exceed the panel height. Row indices
/// are rebased to the window so renderers draw from row 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedStack {
    pub items: Vec<Stacked>,
    pub window_start: usize,
    pub window_stop: usize,
    pub total_rows: usize,
    /// Position of the window within the full row range, in `[0, 1]`,
    /// for drawing a scroll indicator.
    pub scroll_fraction: f64,
}

/// Assign each interval to the first row whose rightmost occupied edge
/// lies strictly left of the interval's start. Intervals sharing a
/// boundary pixel do not share a row.
pub fn stack(items: &[Span], config: &LayoutConfig) -> StackLayout {
    if items.is_empty() {
        return StackLayout {
            items: Vec::new(),
            total_rows: 0,
            row_height: config.max_row_height,
        };
    }

    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        items[a]
            .start
            .partial_cmp(&items[b].start)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut rails: Vec<f64> = Vec::new();
    let mut rows = vec![0usize; items.len()];
    for &idx in &order {
        let it = items[idx];
        let row = match rails.iter().position(|&edge| edge < it.start) {
            Some(row) => row,
            None => {
                rails.push(f64::NEG_INFINITY);
                rails.len() - 1
            }
        };
        rails[row] = it.stop;
        rows[idx] = row;
    }

    let total_rows = rails.len();
    let row_height = (config.stack_area_height / total_rows as f64)
        .min(config.max_row_height)
        .max(1.0);
    log::debug!(
        "stacked {} intervals into {total_rows} rows at {row_height:.1}px",
        items.len()
    );

    StackLayout {
        items: items
            .iter()
            .zip(rows)
            .map(|(it, row)| Stacked {
                start: it.start,
                stop: it.stop,
                row,
            })
            .collect(),
        total_rows,
        row_height,
    }
}

impl StackLayout {
    /// Restrict the layout to rows `[window_start, window_stop)`, dropping
    /// intervals outside the window and rebasing the rest to row 0.
    pub fn page(&self, window_start: usize, window_stop: usize) -> PagedStack {
        let stop = window_stop.min(self.total_rows);
        let start = window_start.min(stop);
        let items = self
            .items
            .iter()
            .filter(|it| it.row >= start && it.row < stop)
            .map(|it| Stacked {
                row: it.row - start,
                ..*it
            })
            .collect();
        let scroll_fraction = if self.total_rows == 0 {
            0.0
        } else {
            start as f64 / self.total_rows as f64
        };
        PagedStack {
            items,
            window_start: start,
            window_stop: stop,
            total_rows: self.total_rows,
            scroll_fraction,
        }
    }
}
