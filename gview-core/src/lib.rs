//! GView Core Library
//!
//! Coordinate mapping, view-range control, and layout primitives for a
//! multi-region genome browser: region lists, genomic/pixel conversion,
//! interval stacking, and label placement.

pub mod config;
pub mod drag;
pub mod error;
pub mod labels;
pub mod locus;
pub mod mapper;
pub mod region;
pub mod stack;
pub mod subpanel;
pub mod track;
pub mod types;
pub mod view;

#[cfg(test)]
mod tests;

// Re-export commonly used types and functions
pub use config::LayoutConfig;
pub use drag::{DragKind, DragState, Gesture};
pub use error::{LayoutError, LayoutResult};
pub use labels::{resolve_labels, BoxSpan, LabelPlacement, LabelPoint};
pub use locus::{parse_locus, LocusResolver};
pub use mapper::{GenomicPoint, Mapper};
pub use region::{Region, RegionList};
pub use stack::{stack, PagedStack, Span, StackLayout, Stacked};
pub use subpanel::{Subpanel, SubpanelKey, SubpanelPan, SubpanelSet};
pub use track::{TrackInstance, TrackOps, TrackRegistry};
pub use types::{Bp, ChromSizes, CoordMode, Hit, HitSpace, Locus};
pub use view::{FetchTicket, JumpResult, PanResult, ViewState, ZoomResult};

/// Version information for the GView core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
