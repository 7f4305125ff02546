//! Region list: the ordered set of genomic intervals composing the main
//! view axis.
//!
//! Every region carries two interval pairs: `start/stop` are the currently
//! visible bounds and move under pan/zoom, while `bstart/bstop` are the
//! absolute chromosome-level bounds and act as hard clamps. A reversed
//! region is drawn right-to-left, so its "used" portion grows from the high
//! end down.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};
use crate::types::Bp;

/// A contiguous genomic interval mapped into the view's pixel axis.
///
/// Invariant: `bstart <= start <= stop <= bstop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub chrom: String,
    /// Visible bounds, 0-based half-open. Mutated by zoom/pan.
    pub start: Bp,
    pub stop: Bp,
    /// Absolute chromosome-level bounds. Never mutated.
    pub bstart: Bp,
    pub bstop: Bp,
    /// Draw right-to-left (minus-strand gene views).
    pub reverse: bool,
    /// Derived pixel width, resolved against the current viewport.
    pub width: f64,
}

impl Region {
    pub fn new(chrom: impl Into<String>, start: Bp, stop: Bp, bstart: Bp, bstop: Bp) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            stop,
            bstart,
            bstop,
            reverse: false,
            width: 0.0,
        }
    }

    /// Region whose visible bounds coincide with its absolute bounds.
    pub fn full(chrom: impl Into<String>, start: Bp, stop: Bp) -> Self {
        Self::new(chrom, start, stop, start, stop)
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn visible_len(&self) -> Bp {
        self.stop - self.start
    }

    pub fn full_len(&self) -> Bp {
        self.bstop - self.bstart
    }

    pub fn contains(&self, chrom: &str, pos: Bp) -> bool {
        self.chrom == chrom && self.start <= pos && pos < self.stop
    }

    /// Genomic offset of `pos` from this region's left pixel edge: measured
    /// from the low end normally, from the high end when reversed.
    pub fn offset_within(&self, pos: Bp) -> Bp {
        if self.reverse {
            self.stop - pos
        } else {
            pos - self.start
        }
    }

    /// No room left to reveal on the left pixel side.
    pub fn left_exhausted(&self) -> bool {
        if self.reverse {
            self.stop == self.bstop
        } else {
            self.start == self.bstart
        }
    }

    /// No room left to reveal on the right pixel side.
    pub fn right_exhausted(&self) -> bool {
        if self.reverse {
            self.start == self.bstart
        } else {
            self.stop == self.bstop
        }
    }

    pub fn validate(&self) -> LayoutResult<()> {
        if !(self.bstart <= self.start && self.start <= self.stop && self.stop <= self.bstop) {
            return Err(LayoutError::invalid_coordinate(format!(
                "region {} violates bstart <= start <= stop <= bstop ({} <= {} <= {} <= {})",
                self.chrom, self.bstart, self.start, self.stop, self.bstop
            )));
        }
        Ok(())
    }
}

/// Ordered regions plus the inclusive index range currently in view.
///
/// Regions outside the active range are flanking context (e.g. the rest of a
/// gene body while a single exon is zoomed) that pan/zoom-out can reveal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionList {
    pub regions: Vec<Region>,
    pub active_start: usize,
    pub active_stop: usize,
}

impl RegionList {
    /// All regions active.
    pub fn new(regions: Vec<Region>) -> Self {
        let active_stop = regions.len().saturating_sub(1);
        Self {
            regions,
            active_start: 0,
            active_stop,
        }
    }

    pub fn single(region: Region) -> Self {
        Self::new(vec![region])
    }

    pub fn with_active(mut self, active_start: usize, active_stop: usize) -> Self {
        self.active_start = active_start;
        self.active_stop = active_stop;
        self
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.active_stop - self.active_start + 1
    }

    pub fn active(&self) -> &[Region] {
        &self.regions[self.active_start..=self.active_stop]
    }

    pub fn first_active(&self) -> &Region {
        &self.regions[self.active_start]
    }

    pub fn last_active(&self) -> &Region {
        &self.regions[self.active_stop]
    }

    /// Sum of visible lengths over the active regions.
    pub fn visible_bp(&self) -> Bp {
        self.active().iter().map(Region::visible_len).sum()
    }

    /// Basepairs consumed by active regions before `index`, optionally
    /// including the partially-consumed portion of `index` itself. The used
    /// portion of a reversed region grows from its high end, so it reads
    /// `bstop - stop` there.
    pub fn cumulative_len(&self, index: usize, include_current: bool) -> Bp {
        debug_assert!(index >= self.active_start && index <= self.active_stop);
        let mut total: Bp = self.regions[self.active_start..index]
            .iter()
            .map(Region::visible_len)
            .sum();
        if include_current {
            let r = &self.regions[index];
            total += if r.reverse {
                r.bstop - r.stop
            } else {
                r.stop - r.start
            };
        }
        total
    }

    pub fn validate(&self) -> LayoutResult<()> {
        if self.regions.is_empty() {
            return Err(LayoutError::empty_view("region list has no regions"));
        }
        if self.active_start > self.active_stop || self.active_stop >= self.regions.len() {
            return Err(LayoutError::empty_view(format!(
                "active range {}..={} out of bounds for {} regions",
                self.active_start,
                self.active_stop,
                self.regions.len()
            )));
        }
        for r in &self.regions {
            r.validate()?;
        }
        if self.visible_bp() <= 0 {
            return Err(LayoutError::empty_view("active regions span zero basepairs"));
        }
        Ok(())
    }
}
