//! Bidirectional genomic <-> pixel conversion over the active region list.
//!
//! The pixel axis is the concatenation of the active regions' visible spans,
//! joined by fixed `region_gap` pixel gaps, followed by the subpanels. The
//! pixel->genomic direction is an outward walk that can leave the active
//! range: the first region touched contributes its visible bounds, the
//! terminal active region extends to its absolute bound, and regions beyond
//! the active range contribute their full chromosome-level spans, which is
//! what lets a pan reveal previously out-of-view regions.

use crate::config::LayoutConfig;
use crate::error::{LayoutError, LayoutResult};
use crate::region::RegionList;
use crate::types::{Bp, CoordMode, Hit};
use crate::view::ViewState;

/// Tolerance for pixel-budget comparisons; keeps exact-edge pans and zooms
/// from tripping on floating-point representation.
const PX_EPS: f64 = 1e-6;

/// Result of a pixel->genomic walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenomicPoint {
    pub region_index: usize,
    pub pos: Bp,
    /// True when the offset ran past every region and the position was
    /// clamped to the absolute chromosome-level edge.
    pub clamped: bool,
}

/// Pixels per basepair for the active region set.
pub fn scale_factor(
    regions: &RegionList,
    config: &LayoutConfig,
    viewport_width: f64,
) -> LayoutResult<f64> {
    let gaps = config.region_gap * (regions.active_count() - 1) as f64;
    let span = regions.visible_bp();
    if span <= 0 {
        return Err(LayoutError::empty_view("active regions span zero basepairs"));
    }
    let sf = (viewport_width - gaps) / span as f64;
    if !sf.is_finite() || sf <= 0.0 {
        return Err(LayoutError::invalid_viewport(format!(
            "viewport {}px cannot hold {} active regions",
            viewport_width,
            regions.active_count()
        )));
    }
    Ok(sf)
}

/// Coordinate mapper borrowing one `ViewState`.
pub struct Mapper<'a> {
    view: &'a ViewState,
}

impl<'a> Mapper<'a> {
    pub fn new(view: &'a ViewState) -> Self {
        Self { view }
    }

    pub fn scale_factor(&self) -> LayoutResult<f64> {
        scale_factor(
            &self.view.regions,
            &self.view.config,
            self.view.viewport_width,
        )
    }

    /// True once the scale factor has reached the configured ceiling and the
    /// view already displays individual bases.
    pub fn at_max_zoom(&self) -> LayoutResult<bool> {
        Ok(self.scale_factor()? >= self.view.config.max_px_per_bp - PX_EPS)
    }

    /// Pixel x of the left edge of active region `index`.
    pub fn region_left_px(&self, index: usize) -> LayoutResult<f64> {
        let sf = self.scale_factor()?;
        let rl = &self.view.regions;
        let slot = index - rl.active_start;
        Ok(rl.cumulative_len(index, false) as f64 * sf + slot as f64 * self.view.config.region_gap)
    }

    /// All pixel hits for a genomic position: the main axis, the gene
    /// overlay fallback, and every matching subpanel.
    pub fn genomic_to_pixel(&self, chrom: &str, pos: Bp) -> LayoutResult<Vec<Hit>> {
        let sf = self.scale_factor()?;
        let rl = &self.view.regions;
        let mut hits = Vec::new();

        for index in rl.active_start..=rl.active_stop {
            let r = &rl.regions[index];
            if r.contains(chrom, pos) {
                let left = self.region_left_px(index)?;
                hits.push(Hit::region(index, left + r.offset_within(pos) as f64 * sf));
            }
        }

        if hits.is_empty() {
            if let Some(hit) = self.overlay_boundary_hit(chrom, pos)? {
                hits.push(hit);
            }
        }

        // Subpanels compose after the full main axis.
        let mut x = self.view.viewport_width;
        for (index, panel) in self.view.subpanels.iter().enumerate() {
            x += panel.left_pad;
            if panel.contains(chrom, pos) {
                let px = x + (pos - panel.start) as f64 * panel.scale_factor();
                hits.push(Hit::subpanel(index, px));
            }
            x += panel.width;
        }

        Ok(hits)
    }

    /// Gene-overlay mode: a position inside an intron (or past the extreme
    /// exons but inside the gene body) snaps to the nearest region boundary.
    fn overlay_boundary_hit(&self, chrom: &str, pos: Bp) -> LayoutResult<Option<Hit>> {
        let CoordMode::GeneOverlay {
            chrom: gchrom,
            start: gstart,
            stop: gstop,
        } = &self.view.mode
        else {
            return Ok(None);
        };
        if gchrom != chrom || pos < *gstart || pos >= *gstop {
            return Ok(None);
        }

        let sf = self.scale_factor()?;
        let rl = &self.view.regions;
        let first = rl.active_start;
        let last = rl.active_stop;

        if pos < rl.regions[first].start {
            let px = self.region_left_px(first)?;
            return Ok(Some(Hit::region(first, px).clamped()));
        }
        if pos >= rl.regions[last].stop {
            let px =
                self.region_left_px(last)? + rl.regions[last].visible_len() as f64 * sf;
            return Ok(Some(Hit::region(last, px).clamped()));
        }
        for index in first..last {
            let lo = &rl.regions[index];
            let hi = &rl.regions[index + 1];
            if lo.stop <= pos && pos < hi.start {
                // Snap to whichever exon edge is genomically closer.
                let hit = if pos - lo.stop <= hi.start - pos {
                    let px = self.region_left_px(index)? + lo.visible_len() as f64 * sf;
                    Hit::region(index, px)
                } else {
                    Hit::region(index + 1, self.region_left_px(index + 1)?)
                };
                return Ok(Some(hit.clamped()));
            }
        }
        Ok(None)
    }

    /// Walk the region list outward from the active start, in the direction
    /// implied by the offset sign, and return the genomic position under the
    /// pixel offset.
    pub fn pixel_to_genomic(&self, px: f64) -> LayoutResult<GenomicPoint> {
        let sf = self.scale_factor()?;
        if px >= 0.0 {
            Ok(self.walk_right(px, sf))
        } else {
            Ok(self.walk_left(-px, sf))
        }
    }

    fn walk_right(&self, mut remaining: f64, sf: f64) -> GenomicPoint {
        let rl = &self.view.regions;
        let gap = self.view.config.region_gap;
        let last = rl.len() - 1;
        let mut index = rl.active_start;
        loop {
            let r = &rl.regions[index];
            // Budget of this region in the walk: visible span inside the
            // active range, extended to the absolute bound at the terminal
            // active region, full chromosome span beyond it.
            let (near, span) = if index <= rl.active_stop {
                let near = if r.reverse { r.stop } else { r.start };
                let span = if index < rl.active_stop {
                    r.visible_len()
                } else if r.reverse {
                    r.stop - r.bstart
                } else {
                    r.bstop - r.start
                };
                (near, span)
            } else if r.reverse {
                (r.bstop, r.full_len())
            } else {
                (r.bstart, r.full_len())
            };
            let avail = span as f64 * sf;
            let fits = if index == last {
                remaining <= avail + PX_EPS
            } else {
                remaining + PX_EPS < avail
            };
            if fits {
                let step = ((remaining / sf) + PX_EPS).floor() as Bp;
                let pos = if r.reverse { near - step } else { near + step };
                return GenomicPoint {
                    region_index: index,
                    pos,
                    clamped: false,
                };
            }
            if index == last {
                let pos = if r.reverse { r.bstart } else { r.bstop };
                return GenomicPoint {
                    region_index: index,
                    pos,
                    clamped: true,
                };
            }
            remaining -= avail;
            // An offset landing inside an inter-region gap snaps to the next
            // region's first base.
            remaining = if remaining < gap { 0.0 } else { remaining - gap };
            index += 1;
        }
    }

    fn walk_left(&self, mut remaining: f64, sf: f64) -> GenomicPoint {
        let rl = &self.view.regions;
        let gap = self.view.config.region_gap;
        let mut index = rl.active_start;
        loop {
            let r = &rl.regions[index];
            let (near, span) = if index == rl.active_start {
                if r.reverse {
                    (r.stop, r.bstop - r.stop)
                } else {
                    (r.start, r.start - r.bstart)
                }
            } else if r.reverse {
                (r.bstart, r.full_len())
            } else {
                (r.bstop, r.full_len())
            };
            let avail = span as f64 * sf;
            if remaining <= avail + PX_EPS {
                let step = ((remaining / sf) + PX_EPS).floor() as Bp;
                let pos = if r.reverse { near + step } else { near - step };
                return GenomicPoint {
                    region_index: index,
                    pos,
                    clamped: false,
                };
            }
            if index == 0 {
                let pos = if r.reverse { r.bstop } else { r.bstart };
                return GenomicPoint {
                    region_index: 0,
                    pos,
                    clamped: true,
                };
            }
            remaining -= avail;
            remaining = if remaining < gap { 0.0 } else { remaining - gap };
            index -= 1;
        }
    }
}
