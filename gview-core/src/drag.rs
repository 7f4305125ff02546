//! Pointer drag bookkeeping for rubber-band zoom and horizontal pan.
//!
//! The machine only tracks pixels; committing the resulting gesture
//! against a `ViewState` is the caller's job, so a gesture computed over
//! a stale state can simply be dropped.

use serde::{Deserialize, Serialize};

/// What a completed drag asks the view to do, in current pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gesture {
    /// Rubber-band select: zoom to this pixel range.
    ZoomRange(f64, f64),
    /// Horizontal pan by this offset.
    Pan(f64),
}

/// Which interaction a press started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragKind {
    Zoom,
    Pan,
}

/// Minimum travel before a release counts as a zoom selection rather
/// than a stray click.
const MIN_ZOOM_DRAG_PX: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        origin: f64,
        kind: DragKind,
    },
    Committing(Gesture),
}

impl DragState {
    /// Pointer down at `x`. A press during another drag restarts it.
    pub fn press(&mut self, x: f64, kind: DragKind) {
        *self = DragState::Dragging { origin: x, kind };
    }

    /// Pointer up at `x`. Moves to `Committing` when the drag produced a
    /// gesture, back to `Idle` otherwise.
    pub fn release(&mut self, x: f64) {
        let DragState::Dragging { origin, kind } = *self else {
            *self = DragState::Idle;
            return;
        };
        *self = match kind {
            DragKind::Zoom => {
                if (x - origin).abs() < MIN_ZOOM_DRAG_PX {
                    log::debug!("zoom drag under {MIN_ZOOM_DRAG_PX}px ignored");
                    DragState::Idle
                } else {
                    DragState::Committing(Gesture::ZoomRange(origin.min(x), origin.max(x)))
                }
            }
            DragKind::Pan => {
                if x == origin {
                    DragState::Idle
                } else {
                    // Dragging content rightward pans the view window left.
                    DragState::Committing(Gesture::Pan(origin - x))
                }
            }
        };
    }

    /// Take the pending gesture, resetting to `Idle`.
    pub fn take(&mut self) -> Option<Gesture> {
        match *self {
            DragState::Committing(gesture) => {
                *self = DragState::Idle;
                Some(gesture)
            }
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }
}
