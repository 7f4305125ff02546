//! View range controller: zoom, pan, and jump over an explicit `ViewState`
//! value.
//!
//! Every operation is pure. It either returns a fresh, fully validated
//! `ViewState` or a typed rejection, and the input state is never touched.
//! The UI layer keeps whatever `ViewState` it considers current; staleness
//! of asynchronous data fetches is checked against the state's bounds
//! signature rather than through cancellation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::{LayoutError, LayoutResult};
use crate::locus::{resolve_target, LocusResolver};
use crate::mapper::{GenomicPoint, Mapper};
use crate::region::{Region, RegionList};
use crate::subpanel::SubpanelSet;
use crate::types::{Bp, ChromSizes, CoordMode, Hit, Locus};

/// Outcome of a zoom request. Hitting the resolution ceiling or the full
/// chromosome extent is ordinary interaction, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoomResult {
    Applied(ViewState),
    /// The view already shows individual bases; zooming in further was a
    /// no-op.
    TooFine,
    /// The view already spans everything it can; zooming out was a no-op.
    AtFullExtent,
}

/// Outcome of a pan request.
#[derive(Debug, Clone, PartialEq)]
pub enum PanResult {
    Applied(ViewState),
    /// The pan would have crossed an absolute chromosome boundary; the view
    /// snaps back to offset zero and nothing changes.
    Clamped,
}

/// Outcome of a jump: the replaced view, plus a highlight interval when the
/// request was too narrow to display verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct JumpResult {
    pub view: ViewState,
    pub highlight: Option<Locus>,
}

/// Staleness guard for asynchronous track data. Capture a ticket when a
/// fetch is issued; apply the response only if the ticket is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    signature: u64,
}

impl FetchTicket {
    pub fn new(view: &ViewState) -> Self {
        Self {
            signature: view.bounds_signature(),
        }
    }

    pub fn is_current(&self, view: &ViewState) -> bool {
        let current = self.signature == view.bounds_signature();
        if !current {
            log::debug!("discarding stale fetch response: view range superseded");
        }
        current
    }
}

/// The complete coordinate state of one synchronized view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub regions: RegionList,
    pub subpanels: SubpanelSet,
    pub viewport_width: f64,
    pub mode: CoordMode,
    pub config: LayoutConfig,
}

impl ViewState {
    pub fn new(
        regions: RegionList,
        viewport_width: f64,
        config: LayoutConfig,
    ) -> LayoutResult<Self> {
        Self {
            regions,
            subpanels: SubpanelSet::new(),
            viewport_width,
            mode: CoordMode::Genomic,
            config,
        }
        .finalize()
    }

    /// Validate and resolve derived pixel widths. Consumes the candidate so
    /// rejected operations never leak a half-updated state.
    fn finalize(mut self) -> LayoutResult<Self> {
        if !(self.viewport_width > 0.0) {
            return Err(LayoutError::invalid_viewport(
                "viewport width must be positive",
            ));
        }
        self.regions.validate()?;
        self.subpanels.validate()?;
        let sf = crate::mapper::scale_factor(&self.regions, &self.config, self.viewport_width)?;
        let (a, b) = (self.regions.active_start, self.regions.active_stop);
        for (index, r) in self.regions.regions.iter_mut().enumerate() {
            r.width = if index >= a && index <= b {
                r.visible_len() as f64 * sf
            } else {
                0.0
            };
        }
        Ok(self)
    }

    pub fn mapper(&self) -> Mapper<'_> {
        Mapper::new(self)
    }

    /// The active regions with resolved widths, in display order.
    pub fn active_regions(&self) -> &[Region] {
        self.regions.active()
    }

    pub fn scale_factor(&self) -> LayoutResult<f64> {
        self.mapper().scale_factor()
    }

    pub fn genomic_to_pixel(&self, chrom: &str, pos: Bp) -> LayoutResult<Vec<Hit>> {
        self.mapper().genomic_to_pixel(chrom, pos)
    }

    pub fn pixel_to_genomic(&self, px: f64) -> LayoutResult<GenomicPoint> {
        self.mapper().pixel_to_genomic(px)
    }

    /// Hash of everything a track data fetch depends on: region bounds,
    /// active range, subpanel keys, viewport width.
    pub fn bounds_signature(&self) -> u64 {
        let mut h = DefaultHasher::new();
        for r in &self.regions.regions {
            r.chrom.hash(&mut h);
            r.start.hash(&mut h);
            r.stop.hash(&mut h);
            r.reverse.hash(&mut h);
        }
        self.regions.active_start.hash(&mut h);
        self.regions.active_stop.hash(&mut h);
        self.viewport_width.to_bits().hash(&mut h);
        self.mode.hash(&mut h);
        for key in self.subpanels.keys() {
            key.hash(&mut h);
        }
        h.finish()
    }

    /// Viewport-resize notification: same genomic bounds, new pixel widths.
    pub fn resized(&self, viewport_width: f64) -> LayoutResult<ViewState> {
        let mut next = self.clone();
        next.viewport_width = viewport_width;
        next.finalize()
    }

    /// False once the active range spans the whole region list and both
    /// extreme regions sit on their absolute chromosome-level bounds.
    pub fn can_zoom_out(&self) -> bool {
        let rl = &self.regions;
        let full = rl.active_start == 0 && rl.active_stop == rl.len() - 1;
        let left_done = rl.regions[0].left_exhausted();
        let right_done = rl.regions[rl.len() - 1].right_exhausted();
        !(full && left_done && right_done)
    }

    /// Commit a new view whose left/right edges sit at the given pixel
    /// offsets in the current pixel space.
    pub fn zoom_to_pixel_range(&self, px1: f64, px2: f64) -> LayoutResult<ZoomResult> {
        let (a, b) = if px1 <= px2 { (px1, px2) } else { (px2, px1) };
        if b - a < 1.0 {
            return Ok(ZoomResult::TooFine);
        }
        let m = self.mapper();
        let p1 = m.pixel_to_genomic(a)?;
        let p2 = m.pixel_to_genomic(b)?;

        let next = self.committed(p1, p2)?;
        let new_span = next.regions.visible_bp();
        if new_span <= 0 {
            return Ok(ZoomResult::TooFine);
        }
        // 1bp of tolerance absorbs the floor() rounding of the endpoint
        // walks when a zoom lands exactly on the minimum span.
        if new_span + 1 < self.config.min_span_bp(self.viewport_width) {
            log::debug!(
                "zoom to {new_span}bp rejected: below resolution ceiling ({} px/bp)",
                self.config.max_px_per_bp
            );
            return Ok(ZoomResult::TooFine);
        }
        Ok(ZoomResult::Applied(next.finalize()?))
    }

    /// Zoom in (or out) by a fold factor, symmetric about the viewport
    /// center. Zoom-in is floor-clamped to the minimum representable span.
    pub fn zoom_by_factor(&self, fold: f64, zoom_out: bool) -> LayoutResult<ZoomResult> {
        if !(fold > 1.0) || !fold.is_finite() {
            return Err(LayoutError::invalid_coordinate(
                "zoom fold must be greater than 1",
            ));
        }
        let w = self.viewport_width;
        if zoom_out {
            if !self.can_zoom_out() {
                return Ok(ZoomResult::AtFullExtent);
            }
            let pad = w * (fold - 1.0) / 2.0;
            return self.zoom_to_pixel_range(-pad, w + pad);
        }
        if self.mapper().at_max_zoom()? {
            return Ok(ZoomResult::TooFine);
        }
        let total = self.regions.visible_bp() as f64;
        let min_span = self.config.min_span_bp(w) as f64;
        let target = (total / fold).max(min_span);
        let half = (target / total) * w / 2.0;
        self.zoom_to_pixel_range(w / 2.0 - half, w / 2.0 + half)
    }

    /// Shift the view by a pixel offset. Positive offsets move toward
    /// higher pixel coordinates. A pan that would cross an absolute
    /// chromosome boundary is rejected wholesale.
    pub fn pan_by_pixels(&self, offset_px: f64) -> LayoutResult<PanResult> {
        if offset_px == 0.0 {
            return Ok(PanResult::Applied(self.clone()));
        }
        let m = self.mapper();
        let p1 = m.pixel_to_genomic(offset_px)?;
        let p2 = m.pixel_to_genomic(self.viewport_width + offset_px)?;
        if p1.clamped || p2.clamped {
            log::debug!("pan of {offset_px}px rejected at chromosome boundary, snapping back");
            return Ok(PanResult::Clamped);
        }
        let next = self.committed(p1, p2)?;
        Ok(PanResult::Applied(next.finalize()?))
    }

    /// Replace the region list with a single window around the target.
    pub fn jump(
        &self,
        target: &str,
        sizes: &ChromSizes,
        resolver: Option<&dyn LocusResolver>,
    ) -> LayoutResult<JumpResult> {
        let requested = resolve_target(target, sizes, resolver)?;
        let chrom_len = sizes.len_of(&requested.chrom)?;
        let min_span = self.config.min_span_bp(self.viewport_width);

        let highlight =
            (requested.span() < self.config.highlight_span_bp).then(|| requested.clone());

        let (mut start, mut stop) = (requested.start, requested.stop);
        if stop - start < min_span {
            let center = (start + stop) / 2;
            start = center - min_span / 2;
            stop = start + min_span;
        }
        if start < 0 {
            stop = (stop - start).min(chrom_len);
            start = 0;
        }
        if stop > chrom_len {
            let span = stop - start;
            stop = chrom_len;
            start = (chrom_len - span).max(0);
        }

        let mut next = self.clone();
        next.regions = RegionList::single(Region::new(
            requested.chrom.clone(),
            start,
            stop,
            0,
            chrom_len,
        ));
        next.mode = CoordMode::Genomic;
        let view = next.finalize()?;
        log::info!(
            "jump to {}:{}-{} (requested {})",
            requested.chrom,
            start,
            stop,
            requested
        );
        Ok(JumpResult { view, highlight })
    }

    /// Build the candidate state for a committed pixel range. Mirrors the
    /// budgets of the pixel walk: regions the window passed over get their
    /// hidden flanks revealed, then the two endpoints cut the edges.
    fn committed(&self, p1: GenomicPoint, p2: GenomicPoint) -> LayoutResult<ViewState> {
        let (i1, i2) = (p1.region_index, p2.region_index);
        if i1 > i2 {
            return Err(LayoutError::invalid_coordinate(
                "pixel range endpoints resolved out of order",
            ));
        }
        let old_a = self.regions.active_start;
        let old_b = self.regions.active_stop;
        let mut next = self.clone();
        let regions = &mut next.regions.regions;

        for j in i1..=i2 {
            let r = &mut regions[j];
            if j < old_a || j > old_b {
                r.start = r.bstart;
                r.stop = r.bstop;
            }
            if j == old_a && i1 < old_a {
                if r.reverse {
                    r.stop = r.bstop;
                } else {
                    r.start = r.bstart;
                }
            }
            if j == old_b && i2 > old_b {
                if r.reverse {
                    r.start = r.bstart;
                } else {
                    r.stop = r.bstop;
                }
            }
        }
        {
            let r = &mut regions[i1];
            let pos = p1.pos.clamp(r.bstart, r.bstop);
            if r.reverse {
                r.stop = pos;
            } else {
                r.start = pos;
            }
        }
        {
            let r = &mut regions[i2];
            let pos = p2.pos.clamp(r.bstart, r.bstop);
            if r.reverse {
                r.start = pos;
            } else {
                r.stop = pos;
            }
        }
        next.regions.active_start = i1;
        next.regions.active_stop = i2;
        // A right endpoint that snapped through an inter-region gap lands on
        // the next region's first base and selects none of it; end the
        // active range at the previous region instead.
        if i2 > i1 && next.regions.regions[i2].visible_len() == 0 {
            next.regions.regions[i2] = self.regions.regions[i2].clone();
            next.regions.active_stop = i2 - 1;
        }
        Ok(next)
    }
}
