//! Cross-module scenario tests exercising the full interaction pipeline:
//! drag gestures through view commits, coordinate round trips, multi-region
//! layouts, subpanel synchronization, and stale-fetch handling.

use crate::config::LayoutConfig;
use crate::drag::{DragKind, DragState, Gesture};
use crate::labels::{resolve_labels, BoxSpan, LabelPlacement, LabelPoint};
use crate::region::{Region, RegionList};
use crate::stack::{stack, Span};
use crate::subpanel::{Subpanel, SubpanelPan};
use crate::types::{Bp, ChromSizes, CoordMode, HitSpace};
use crate::view::{FetchTicket, PanResult, ViewState, ZoomResult};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Canonical view fixtures shared across scenarios.
pub struct TestViews;

impl TestViews {
    fn config() -> LayoutConfig {
        init_logging();
        LayoutConfig {
            region_gap: 0.0,
            ..LayoutConfig::default()
        }
    }

    /// 1kb of chr1 in a 900px viewport: scale factor 0.9.
    pub fn single_1kb() -> ViewState {
        let regions = RegionList::single(Region::new("chr1", 1000, 2000, 0, 249_250_621));
        ViewState::new(regions, 900.0, Self::config()).unwrap()
    }

    /// Three exon regions of a gene with 10px gaps between them.
    pub fn three_exons() -> ViewState {
        let regions = RegionList::new(vec![
            Region::full("chr7", 100, 200),
            Region::full("chr7", 400, 500),
            Region::full("chr7", 800, 900),
        ])
        .with_active(0, 2);
        let config = LayoutConfig {
            region_gap: 10.0,
            ..LayoutConfig::default()
        };
        // 3 x 100bp + 2 x 10px gap in 620px: scale factor 2.0.
        ViewState::new(regions, 620.0, config).unwrap()
    }

    pub fn sizes() -> ChromSizes {
        [
            ("chr1", 249_250_621i64),
            ("chr2", 243_199_373),
            ("chr7", 159_138_663),
        ]
        .into_iter()
        .collect()
    }
}

fn applied_zoom(result: ZoomResult) -> ViewState {
    match result {
        ZoomResult::Applied(view) => view,
        other => panic!("expected applied zoom, got {other:?}"),
    }
}

fn applied_pan(result: PanResult) -> ViewState {
    match result {
        PanResult::Applied(view) => view,
        PanResult::Clamped => panic!("expected applied pan"),
    }
}

#[test]
fn test_round_trip_within_one_pixel_of_basepairs() {
    let view = TestViews::single_1kb();
    let sf = view.scale_factor().unwrap();
    let tol = (1.0 / sf).ceil() as Bp;
    for px in [0.0, 1.0, 137.0, 450.0, 899.0] {
        let point = view.pixel_to_genomic(px).unwrap();
        assert!(!point.clamped, "unexpected clamp at {px}px");
        let hits = view.genomic_to_pixel("chr1", point.pos).unwrap();
        let hit = hits
            .iter()
            .find(|h| matches!(h.space, HitSpace::Region(_)))
            .unwrap();
        let back = view.pixel_to_genomic(hit.px).unwrap();
        assert!(
            (back.pos - point.pos).abs() <= tol,
            "{px}px: {} vs {}",
            point.pos,
            back.pos
        );
    }
}

#[test]
fn test_pixel_conservation_across_regions_and_gaps() {
    let view = TestViews::three_exons();
    let widths: f64 = view.active_regions().iter().map(|r| r.width).sum();
    let gaps = view.config.region_gap * (view.regions.active_count() - 1) as f64;
    assert!((widths + gaps - view.viewport_width).abs() < 1e-9);
    // Each 100bp exon gets an equal 200px share.
    for r in view.active_regions() {
        assert!((r.width - 200.0).abs() < 1e-9);
    }
}

#[test]
fn test_drag_zoom_then_drag_back_pan() {
    let view = TestViews::single_1kb();
    let mut drag = DragState::default();

    drag.press(90.0, DragKind::Zoom);
    drag.release(810.0);
    let Some(Gesture::ZoomRange(a, b)) = drag.take() else {
        panic!("expected zoom gesture");
    };
    let zoomed = applied_zoom(view.zoom_to_pixel_range(a, b).unwrap());
    assert_eq!(zoomed.regions.regions[0].start, 1100);
    assert_eq!(zoomed.regions.regions[0].stop, 1900);

    // Dragging content 90px rightward pans the window left by 100bp.
    drag.press(500.0, DragKind::Pan);
    drag.release(590.0);
    let Some(Gesture::Pan(dx)) = drag.take() else {
        panic!("expected pan gesture");
    };
    assert_eq!(dx, -90.0);
    let panned = applied_pan(zoomed.pan_by_pixels(dx).unwrap());
    let sf = zoomed.scale_factor().unwrap();
    let shift = (90.0 / sf).floor() as Bp;
    assert_eq!(panned.regions.regions[0].start, 1100 - shift);
}

#[test]
fn test_zoom_in_then_out_recovers_range_within_tolerance() {
    let view = TestViews::single_1kb();
    let zoomed = applied_zoom(view.zoom_by_factor(4.0, false).unwrap());
    assert_eq!(zoomed.regions.visible_bp(), 250);
    let back = applied_zoom(zoomed.zoom_by_factor(4.0, true).unwrap());
    let r = &back.regions.regions[0];
    let tol = (1.0 / view.scale_factor().unwrap()).ceil() as Bp + 1;
    assert!((r.start - 1000).abs() <= tol);
    assert!((r.stop - 2000).abs() <= tol);
}

#[test]
fn test_multi_region_zoom_narrows_active_range() {
    let view = TestViews::three_exons();
    // Select only the middle exon's pixel band: 210..410.
    let next = applied_zoom(view.zoom_to_pixel_range(215.0, 405.0).unwrap());
    assert_eq!(next.regions.active_start, 1);
    assert_eq!(next.regions.active_stop, 1);
    assert_eq!(next.regions.len(), 3, "inactive exons are kept");
    let mid = &next.regions.regions[1];
    assert!(mid.start > 400 && mid.stop < 500);
}

#[test]
fn test_pan_on_fully_bounded_exon_view_snaps_back() {
    // Every exon region already spans its absolute bounds, so panning in
    // either direction has nowhere to go and leaves the view untouched.
    let view = TestViews::three_exons();
    assert!(matches!(
        view.pan_by_pixels(100.0).unwrap(),
        PanResult::Clamped
    ));
    assert!(matches!(
        view.pan_by_pixels(-100.0).unwrap(),
        PanResult::Clamped
    ));
    assert!(!view.can_zoom_out());
}

#[test]
fn test_gene_overlay_snaps_intron_positions() {
    let mut view = TestViews::three_exons();
    view.mode = CoordMode::GeneOverlay {
        chrom: "chr7".to_string(),
        start: 100,
        stop: 900,
    };
    // 250 falls in the first intron; the nearest exon edge is exon 1's
    // stop, whose pixel is that exon's right edge.
    let hits = view.genomic_to_pixel("chr7", 250).unwrap();
    let hit = &hits[0];
    assert!(hit.clamped);
    assert!(matches!(hit.space, HitSpace::Region(0)));
    assert!((hit.px - 200.0).abs() < 1e-9, "snapped to {}", hit.px);
}

#[test]
fn test_subpanel_hits_compose_after_main_axis() {
    let mut view = TestViews::single_1kb();
    view.subpanels = vec![Subpanel::new("chr1", 1400, 1600, 0, 249_250_621, 100.0, 10.0)]
        .into_iter()
        .collect();
    let view = view.resized(900.0).unwrap();
    let hits = view.genomic_to_pixel("chr1", 1500).unwrap();
    assert_eq!(hits.len(), 2);
    let main = hits.iter().find(|h| matches!(h.space, HitSpace::Region(_)));
    let sub = hits
        .iter()
        .find(|h| matches!(h.space, HitSpace::Subpanel(_)));
    assert!((main.unwrap().px - 450.0).abs() < 1e-9);
    // 10px pad + (100bp at 0.5 px/bp) past the 900px main axis.
    assert!((sub.unwrap().px - 960.0).abs() < 1e-9);
}

#[test]
fn test_subpanel_pan_clamps_at_absolute_bounds() {
    let panels: crate::subpanel::SubpanelSet =
        vec![Subpanel::new("chr1", 0, 200, 0, 1000, 100.0, 0.0)]
            .into_iter()
            .collect();
    assert!(matches!(
        panels.pan(0, -10.0).unwrap(),
        SubpanelPan::Clamped
    ));
    let panned = match panels.pan(0, 100.0).unwrap() {
        SubpanelPan::Applied(set) => set,
        SubpanelPan::Clamped => panic!("pan clamped"),
    };
    assert_eq!(panned.get(0).unwrap().start, 200);
}

#[test]
fn test_stale_fetch_dropped_after_view_change() {
    let view = TestViews::single_1kb();
    let ticket = FetchTicket::new(&view);
    let zoomed = applied_zoom(view.zoom_by_factor(2.0, false).unwrap());
    assert!(!ticket.is_current(&zoomed));
    assert!(FetchTicket::new(&zoomed).is_current(&zoomed));
    // Resizing alone also invalidates in-flight data.
    let resized = view.resized(1200.0).unwrap();
    assert!(!ticket.is_current(&resized));
}

#[test]
fn test_stacked_intervals_from_mapped_features() {
    let view = TestViews::single_1kb();
    // Three features in genomic space, two of them overlapping in pixels.
    let features: [(Bp, Bp); 3] = [(1100, 1300), (1250, 1450), (1600, 1800)];
    let spans: Vec<Span> = features
        .iter()
        .map(|&(start, stop)| {
            let a = view.genomic_to_pixel("chr1", start).unwrap()[0].px;
            let b = view.genomic_to_pixel("chr1", stop).unwrap()[0].px;
            Span::new(a, b)
        })
        .collect();
    let layout = stack(&spans, &view.config);
    let rows: Vec<usize> = layout.items.iter().map(|it| it.row).collect();
    assert_eq!(rows, vec![0, 1, 0]);
    assert_eq!(layout.total_rows, 2);
}

#[test]
fn test_labels_resolved_against_mapped_anchors() {
    let view = TestViews::single_1kb();
    let anchor = view.genomic_to_pixel("chr1", 1500).unwrap()[0].px;
    // With both sides clear the label defaults right of its anchor.
    let points = [LabelPoint::new(anchor, 60.0)];
    assert_eq!(resolve_labels(&points, &[]), vec![LabelPlacement::Right]);
    // A legend box crowding the right half forces it left.
    let boxes = [BoxSpan::new(anchor + 5.0, 900.0)];
    assert_eq!(resolve_labels(&points, &boxes), vec![LabelPlacement::Left]);
}

#[test]
fn test_jump_resets_multi_region_view_to_single_window() {
    let view = TestViews::three_exons();
    let result = view.jump("chr2:50000-70000", &TestViews::sizes(), None).unwrap();
    assert_eq!(result.view.regions.len(), 1);
    assert_eq!(result.view.mode, CoordMode::Genomic);
    let r = &result.view.regions.regions[0];
    assert_eq!((r.start, r.stop), (50000, 70000));
    assert_eq!(r.bstop, 243_199_373);
    assert_eq!(result.highlight, None);
}

#[test]
fn test_view_state_serde_round_trip() {
    let mut view = TestViews::three_exons();
    view.subpanels = vec![Subpanel::new("chr7", 100, 200, 0, 159_138_663, 80.0, 5.0)]
        .into_iter()
        .collect();
    let view = view.resized(620.0).unwrap();
    let json = serde_json::to_string(&view).unwrap();
    let restored: ViewState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, view);
    assert_eq!(restored.bounds_signature(), view.bounds_signature());
}
