// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Angular slice geometry shared by the pie and circos generators.
//!
//! Angles are in degrees, measured from the positive x axis and increasing
//! counterclockwise on screen (y grows downward, so the kurbo angle is the
//! negation).

use kurbo::{BezPath, Circle, Point, Rect, Shape};

use nodemark_core::TextAlign;

/// Curve flattening tolerance for sector paths.
pub(crate) const TOLERANCE: f64 = 0.1;

/// Folds an angle into `[0, 360)`.
pub(crate) fn fold_angle(mut angle: f64) -> f64 {
    while angle < 0.0 {
        angle += 360.0;
    }
    while angle >= 360.0 {
        angle -= 360.0;
    }
    angle
}

/// Builds an annular sector (a pie wedge when `inner_radius` is zero)
/// centered on the origin.
///
/// `start_deg` is the leading edge; the slice sweeps `sweep_deg` degrees
/// counterclockwise, or clockwise when `clockwise` is set.
pub(crate) fn sector_path(
    outer_radius: f64,
    inner_radius: f64,
    start_deg: f64,
    sweep_deg: f64,
    clockwise: bool,
) -> BezPath {
    let (a0, a1) = if clockwise {
        (start_deg - sweep_deg, start_deg)
    } else {
        (start_deg, start_deg + sweep_deg)
    };
    let circle = Circle::new(Point::ZERO, outer_radius);
    let segment = circle.segment(inner_radius, -a1.to_radians(), (a1 - a0).to_radians());
    segment.path_elements(TOLERANCE).collect()
}

/// A point on the ellipse of half-extents `(half_w, half_h)` at the slice
/// mid-angle, scaled out by `scale`.
///
/// The vertical angles are special-cased so labels at 12 and 6 o'clock sit
/// exactly on the axis.
pub(crate) fn label_position(angle: f64, half_w: f64, half_h: f64, scale: f64) -> Point {
    let angle = fold_angle(angle);
    let w = half_w * scale;
    let h = half_h * scale;
    if angle == 270.0 {
        Point::new(0.0, h)
    } else if angle == 90.0 {
        Point::new(0.0, -h)
    } else {
        let midpoint = (360.0 - angle).to_radians();
        Point::new(midpoint.cos() * w, midpoint.sin() * h)
    }
}

/// Quadrant lookup for slice label alignment.
///
/// Mid-angles near the horizontal axis push text outward left or right;
/// the narrow vertical bands center it above or below.
pub(crate) fn label_alignment(mid_angle: f64) -> TextAlign {
    let angle = fold_angle(mid_angle);
    if !(80.0..280.0).contains(&angle) {
        TextAlign::Left
    } else if angle < 100.0 {
        TextAlign::CenterBottom
    } else if angle < 260.0 {
        TextAlign::Right
    } else {
        TextAlign::CenterTop
    }
}

/// The point on a text box edge a leader line starts from, given how the
/// text was aligned against its anchor.
pub(crate) fn leader_origin(text_bounds: Rect, align: TextAlign) -> Point {
    let c = text_bounds.center();
    match align {
        TextAlign::Left => Point::new(text_bounds.x0, c.y),
        TextAlign::Right => Point::new(text_bounds.x1, c.y),
        TextAlign::CenterBottom | TextAlign::Bottom => Point::new(c.x, text_bounds.y1),
        _ => Point::new(c.x, text_bounds.y0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_covers_the_expected_quadrant() {
        // 90 degree slice starting at 0: upper-right quadrant on screen.
        let path = sector_path(50.0, 0.0, 0.0, 90.0, false);
        let bbox = path.bounding_box();
        assert!(bbox.x1 > 45.0);
        assert!(bbox.y0 < -45.0);
        assert!(bbox.x0 >= -1.0, "slice must not cross into the left half");
    }

    #[test]
    fn clockwise_sector_mirrors_counterclockwise() {
        let ccw = sector_path(50.0, 0.0, 0.0, 90.0, false).bounding_box();
        let cw = sector_path(50.0, 0.0, 0.0, 90.0, true).bounding_box();
        assert!((ccw.y0 + cw.y1).abs() < 1.0, "mirrored across the x axis");
    }

    #[test]
    fn ring_sector_excludes_the_center() {
        let path = sector_path(50.0, 30.0, 0.0, 360.0, false);
        let bbox = path.bounding_box();
        assert!(bbox.width() > 95.0, "full ring spans the outer circle");
    }

    #[test]
    fn alignment_quadrants_match_the_lookup_table() {
        assert_eq!(label_alignment(0.0), TextAlign::Left);
        assert_eq!(label_alignment(79.9), TextAlign::Left);
        assert_eq!(label_alignment(90.0), TextAlign::CenterBottom);
        assert_eq!(label_alignment(180.0), TextAlign::Right);
        assert_eq!(label_alignment(270.0), TextAlign::CenterTop);
        assert_eq!(label_alignment(280.0), TextAlign::Left);
        assert_eq!(label_alignment(-80.0), TextAlign::Left, "folds into [0,360)");
        assert_eq!(label_alignment(450.0), TextAlign::CenterBottom);
    }

    #[test]
    fn vertical_label_positions_sit_on_the_axis() {
        let top = label_position(90.0, 50.0, 50.0, 1.0);
        assert_eq!(top, Point::new(0.0, -50.0));
        let bottom = label_position(270.0, 50.0, 50.0, 1.0);
        assert_eq!(bottom, Point::new(0.0, 50.0));
    }

    #[test]
    fn label_position_scales_outward() {
        let near = label_position(0.0, 50.0, 50.0, 1.0);
        let far = label_position(0.0, 50.0, 50.0, 1.7);
        assert!((near.x - 50.0).abs() < 1e-9);
        assert!((far.x - 85.0).abs() < 1e-9);
    }
}
