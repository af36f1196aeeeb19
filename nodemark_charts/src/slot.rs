// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Indexed-slot layout shared by the bar and heat-strip generators.
//!
//! Both charts partition the reference box into `n` equal slots separated
//! by a fixed gap and map each value to a rectangle above or below a
//! `ybase` baseline. The heat-strip only swaps the fill, so the geometry
//! lives here once.

use kurbo::{BezPath, Rect};

/// Slot layout parameters over a scaled reference box.
#[derive(Clone, Copy, Debug)]
pub struct SlotLayout {
    /// Number of slots.
    pub count: usize,
    /// Gap between slots, scene units.
    pub separation: f64,
    /// Stroke allowance subtracted from each slot.
    pub stroke_width: f64,
    /// Baseline fraction: 0 = top, 0.5 = middle, 1 = bottom.
    pub ybase: f64,
    /// Symmetrized extent: `max(|min|, |max|)` mirrored on both sides.
    max: f64,
    /// Scaled box origin and size.
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl SlotLayout {
    /// Builds a layout over a centered reference box.
    ///
    /// `min`/`max` are the value extremes; the larger magnitude wins and is
    /// mirrored so the baseline splits the box consistently.
    pub fn new(
        reference: Rect,
        scale: f64,
        count: usize,
        separation: f64,
        stroke_width: f64,
        ybase: f64,
        min: f64,
        max: f64,
    ) -> Self {
        let max = if max.abs() > min.abs() { max.abs() } else { min.abs() };
        Self {
            count: count.max(1),
            separation,
            stroke_width,
            ybase,
            max,
            x: reference.x0 * scale,
            y: reference.y0 * scale,
            width: reference.width() * scale,
            height: reference.height() * scale,
        }
    }

    /// Slot width and effective separation.
    ///
    /// When slots get thinner than one unit the separation collapses.
    fn slice(&self) -> (f64, f64) {
        let n = self.count as f64;
        let mut separation = self.separation;
        let mut slice = (self.width - n * separation + separation) / n;
        if slice < 1.0 && separation > 0.0 {
            slice = self.width / n;
            separation = 0.0;
        }
        (slice - self.stroke_width, separation)
    }

    /// Y coordinate of the baseline.
    pub fn baseline(&self) -> f64 {
        self.y + self.ybase * self.height
    }

    /// The rectangle for `value` at slot `index`.
    ///
    /// Positive values extend up from the baseline, negative values down,
    /// both scaled by the symmetrized maximum.
    pub fn slot_rect(&self, index: usize, value: f64) -> Rect {
        let (slice, separation) = self.slice();
        let base = self.ybase * self.height;
        let max = if self.max != 0.0 { self.max } else { 1.0 };

        let px = self.x + index as f64 * (slice + self.stroke_width + separation);
        let (py, h) = if value > 0.0 {
            (
                self.y + base - base * (value / max) - self.stroke_width,
                base * (value / max) + self.stroke_width / 4.0,
            )
        } else {
            (
                self.y + base - self.stroke_width / 4.0,
                base * (-value / max) - self.stroke_width,
            )
        };
        Rect::new(px, py, px + slice, py + h.max(0.0))
    }

    /// A line along the baseline spanning the first through last slot.
    pub fn zero_line(&self) -> BezPath {
        let first = self.slot_rect(0, 0.0);
        let last = self.slot_rect(self.count - 1, 0.0);
        let y = self.baseline();
        let mut path = BezPath::new();
        path.move_to((first.x0, y));
        path.line_to((last.x1, y));
        path
    }

    /// A vertical axis line on the left edge of slot 0 spanning the value
    /// range.
    pub fn axis_line(&self, min: f64, max: f64) -> BezPath {
        let bottom = self.slot_rect(0, min);
        let top = self.slot_rect(0, max);
        let mut path = BezPath::new();
        path.move_to((bottom.x0, bottom.y1));
        path.line_to((top.x0, top.y0));
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> SlotLayout {
        let reference = Rect::new(-50.0, -25.0, 50.0, 25.0);
        SlotLayout::new(reference, 1.0, 4, 2.0, 0.5, 0.5, -2.0, 4.0)
    }

    #[test]
    fn slots_tile_the_box_left_to_right() {
        let l = layout();
        let r0 = l.slot_rect(0, 1.0);
        let r1 = l.slot_rect(1, 1.0);
        assert!(r1.x0 > r0.x1, "slots must not overlap");
        let r3 = l.slot_rect(3, 1.0);
        assert!(r3.x1 <= 50.0 + 1e-9, "last slot stays inside the box");
    }

    #[test]
    fn positive_values_rise_above_the_baseline() {
        let l = layout();
        let r = l.slot_rect(0, 4.0);
        assert!(r.y1 <= l.baseline() + 1e-9);
        assert!(r.height() > 0.0);
    }

    #[test]
    fn negative_values_hang_below_the_baseline() {
        let l = layout();
        let r = l.slot_rect(1, -2.0);
        assert!(r.y0 >= l.baseline() - 1.0);
        assert!(r.y1 > l.baseline());
    }

    #[test]
    fn larger_magnitude_side_sets_the_scale() {
        // min -2, max 4: the full positive extent belongs to value 4.
        let l = layout();
        let full = l.slot_rect(0, 4.0);
        let half = l.slot_rect(0, 2.0);
        assert!(full.height() > 1.9 * half.height() - 1.0);
    }

    #[test]
    fn separation_collapses_for_sliver_slots() {
        let reference = Rect::new(-50.0, -25.0, 50.0, 25.0);
        let l = SlotLayout::new(reference, 1.0, 90, 2.0, 0.0, 0.5, 0.0, 1.0);
        let r0 = l.slot_rect(0, 1.0);
        let r1 = l.slot_rect(1, 1.0);
        assert!((r1.x0 - r0.x1).abs() < 1e-9, "no gap once slots are slivers");
    }

    #[test]
    fn zero_line_spans_all_slots() {
        let l = layout();
        let line = l.zero_line();
        let bbox = kurbo::Shape::bounding_box(&line);
        assert!(bbox.width() > 90.0);
        assert!((bbox.y0 - l.baseline()).abs() < 1e-9);
    }
}
