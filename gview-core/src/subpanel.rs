//! Subpanels: secondary, independently pannable region blocks composed to
//! the right of the main axis.
//!
//! One subpanel instance exists per declared slot and is shared structurally
//! across tracks: every track matches its own per-subpanel state against the
//! canonical set by key, never by reference.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};
use crate::types::Bp;

/// A secondary region block with its own width, scale factor, and pan state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subpanel {
    pub chrom: String,
    pub start: Bp,
    pub stop: Bp,
    pub bstart: Bp,
    pub bstop: Bp,
    /// Pixels allocated to this subpanel.
    pub width: f64,
    /// Pixels of padding before this subpanel's left edge.
    pub left_pad: f64,
}

impl Subpanel {
    pub fn new(
        chrom: impl Into<String>,
        start: Bp,
        stop: Bp,
        bstart: Bp,
        bstop: Bp,
        width: f64,
        left_pad: f64,
    ) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            stop,
            bstart,
            bstop,
            width,
            left_pad,
        }
    }

    pub fn visible_len(&self) -> Bp {
        self.stop - self.start
    }

    pub fn scale_factor(&self) -> f64 {
        self.width / self.visible_len() as f64
    }

    pub fn contains(&self, chrom: &str, pos: Bp) -> bool {
        self.chrom == chrom && self.start <= pos && pos < self.stop
    }

    /// Identity tuple used for cross-track synchronization.
    pub fn key(&self) -> SubpanelKey {
        SubpanelKey {
            chrom: self.chrom.clone(),
            start: self.start,
            stop: self.stop,
            width_px: self.width.round() as u32,
        }
    }

    pub fn validate(&self) -> LayoutResult<()> {
        if !(self.bstart <= self.start && self.start < self.stop && self.stop <= self.bstop) {
            return Err(LayoutError::invalid_coordinate(format!(
                "subpanel {} violates bstart <= start < stop <= bstop",
                self.chrom
            )));
        }
        if !(self.width > 0.0) {
            return Err(LayoutError::invalid_viewport(
                "subpanel width must be positive",
            ));
        }
        Ok(())
    }
}

/// Stable identity of a subpanel for track-state matching. Tracks cache
/// these and reload whenever the canonical set disagrees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubpanelKey {
    pub chrom: String,
    pub start: Bp,
    pub stop: Bp,
    pub width_px: u32,
}

/// Outcome of a subpanel pan request.
#[derive(Debug, Clone, PartialEq)]
pub enum SubpanelPan {
    Applied(SubpanelSet),
    /// The pan would have crossed an absolute bound; nothing changed.
    Clamped,
}

/// The canonical ordered set of subpanels, laid out left to right after the
/// main region axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubpanelSet {
    panels: Vec<Subpanel>,
}

impl SubpanelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, panel: Subpanel) {
        self.panels.push(panel);
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Subpanel> {
        self.panels.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subpanel> {
        self.panels.iter()
    }

    pub fn keys(&self) -> Vec<SubpanelKey> {
        self.panels.iter().map(Subpanel::key).collect()
    }

    /// Total pixels this set appends after the main axis (pads included).
    pub fn total_width(&self) -> f64 {
        self.panels.iter().map(|p| p.left_pad + p.width).sum()
    }

    pub fn validate(&self) -> LayoutResult<()> {
        for p in &self.panels {
            p.validate()?;
        }
        Ok(())
    }

    /// Pan one subpanel by a pixel offset without touching anything else.
    /// Positive offsets move toward higher coordinates. A pan that would
    /// cross `bstart`/`bstop` snaps back: the whole request is dropped.
    pub fn pan(&self, index: usize, offset_px: f64) -> LayoutResult<SubpanelPan> {
        let panel = self.panels.get(index).ok_or_else(|| {
            LayoutError::invalid_coordinate(format!("no subpanel at index {index}"))
        })?;
        let shift = (offset_px / panel.scale_factor()).floor() as Bp;
        if shift == 0 {
            return Ok(SubpanelPan::Applied(self.clone()));
        }
        let start = panel.start + shift;
        let stop = panel.stop + shift;
        if start < panel.bstart || stop > panel.bstop {
            log::debug!(
                "subpanel {} pan of {}px rejected at absolute bound",
                panel.chrom,
                offset_px
            );
            return Ok(SubpanelPan::Clamped);
        }
        let mut next = self.clone();
        next.panels[index].start = start;
        next.panels[index].stop = stop;
        Ok(SubpanelPan::Applied(next))
    }
}

impl FromIterator<Subpanel> for SubpanelSet {
    fn from_iter<T: IntoIterator<Item = Subpanel>>(iter: T) -> Self {
        Self {
            panels: iter.into_iter().collect(),
        }
    }
}
