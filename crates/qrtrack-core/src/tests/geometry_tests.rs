use qrtrack_types::PixelRect;

use crate::geometry::{RectF, Transform, compute_transform, map_rect, mapped_source_bounds};

#[test]
fn tall_source_into_square_viewport() {
    let t = compute_transform(1000, 2000, 500, 500);
    assert_eq!(t.scale, 0.5);
    assert_eq!(t.offset_x, 0.0);
    assert_eq!(t.offset_y, -250.0);
}

#[test]
fn zero_area_source_falls_back_to_identity() {
    assert_eq!(compute_transform(0, 480, 1080, 1920), Transform::IDENTITY);
    assert_eq!(compute_transform(640, 0, 1080, 1920), Transform::IDENTITY);
    assert_eq!(compute_transform(0, 0, 0, 0), Transform::IDENTITY);
}

#[test]
fn matching_aspect_ratio_has_no_offset() {
    let t = compute_transform(640, 480, 1280, 960);
    assert_eq!(t.scale, 2.0);
    assert_eq!(t.offset_x, 0.0);
    assert_eq!(t.offset_y, 0.0);
}

#[test]
fn mapped_source_covers_viewport() {
    let sizes = [
        (640, 480, 1080, 1920),
        (1920, 1080, 1080, 2340),
        (480, 640, 1920, 1080),
        (1, 1, 3, 7),
        (1000, 3, 17, 999),
        (4032, 3024, 412, 915),
    ];
    let eps = 1e-9;

    for (sw, sh, vw, vh) in sizes {
        let t = compute_transform(sw, sh, vw, vh);
        assert!(t.scale > 0.0);

        let bounds = mapped_source_bounds(sw, sh, &t);
        let (vw, vh) = (vw as f64, vh as f64);
        let viewport = RectF::new(eps, eps, vw - eps, vh - eps);
        assert!(
            bounds.contains(&viewport),
            "{sw}x{sh} -> {vw}x{vh}: {bounds:?} does not cover the viewport"
        );
        // One axis fits exactly, the other overhangs symmetrically
        assert!(
            (bounds.left.abs() < eps && (bounds.right - vw).abs() < eps)
                || (bounds.top.abs() < eps && (bounds.bottom - vh).abs() < eps),
            "{sw}x{sh} -> {vw}x{vh}: neither axis is tight"
        );
        assert!((bounds.left + (bounds.right - vw)).abs() < eps);
        assert!((bounds.top + (bounds.bottom - vh)).abs() < eps);
    }
}

#[test]
fn contains_includes_edges() {
    let outer = RectF::new(0.0, 0.0, 10.0, 10.0);
    assert!(outer.contains(&outer));
    assert!(outer.contains(&RectF::new(2.0, 3.0, 4.0, 5.0)));
    assert!(!outer.contains(&RectF::new(-0.5, 0.0, 10.0, 10.0)));
    assert!(!outer.contains(&RectF::new(0.0, 0.0, 10.0, 10.5)));
}

#[test]
fn map_rect_scales_then_offsets() {
    let t = compute_transform(1000, 2000, 500, 500);
    let mapped = map_rect(PixelRect::new(100, 600, 300, 800), &t);
    assert_eq!(mapped, RectF::new(50.0, 50.0, 150.0, 150.0));
}

#[test]
fn map_rect_keeps_fractions() {
    let t = Transform {
        scale: 1.5,
        offset_x: 0.25,
        offset_y: -0.5,
    };
    let mapped = map_rect(PixelRect::new(1, 1, 3, 3), &t);
    assert_eq!(mapped, RectF::new(1.75, 1.0, 4.75, 4.0));
}

#[test]
fn unmap_inverts_map() {
    let t = compute_transform(640, 480, 1080, 1920);
    let (x, y) = t.map_point(320.0, 240.0);
    let (sx, sy) = t.unmap_point(x, y);
    assert!((sx - 320.0).abs() < 1e-9);
    assert!((sy - 240.0).abs() < 1e-9);
}
