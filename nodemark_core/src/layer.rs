// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paintable layers and the transform contract.

use kurbo::{Affine, BezPath, Point, Rect};
use peniko::color::palette::css;
use peniko::{Brush, Color, Gradient};
use smallvec::SmallVec;

use crate::transform::min_scale;

/// Gradient stop list. Two stops inline covers the common ramps.
pub type GradientStops = SmallVec<[(f32, Color); 2]>;

/// Fill paint for a layer.
///
/// Gradient control geometry is stored in unit coordinates and scaled into
/// the target rectangle when [`Paint::brush`] is called, so the same paint
/// value stays valid when the host re-projects the layer.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// A flat color.
    Solid(Color),
    /// A linear gradient between two points in the unit box.
    Linear {
        /// Gradient start, unit coordinates.
        start: Point,
        /// Gradient end, unit coordinates.
        end: Point,
        /// Color stops, offsets in `[0, 1]`.
        stops: GradientStops,
    },
    /// A radial gradient centered in the unit box.
    Radial {
        /// Gradient center, unit coordinates.
        center: Point,
        /// Radius as a fraction of the smaller box dimension.
        radius: f64,
        /// Color stops, offsets in `[0, 1]`.
        stops: GradientStops,
    },
}

impl Paint {
    /// Resolves this paint against a target rectangle.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "gradient radii are small scene lengths"
    )]
    pub fn brush(&self, bounds: Rect) -> Brush {
        let project = |p: &Point| {
            Point::new(
                bounds.x0 + p.x * bounds.width(),
                bounds.y0 + p.y * bounds.height(),
            )
        };
        match self {
            Self::Solid(color) => Brush::Solid(*color),
            Self::Linear { start, end, stops } => Brush::Gradient(
                Gradient::new_linear(project(start), project(end)).with_stops(stops.as_slice()),
            ),
            Self::Radial {
                center,
                radius,
                stops,
            } => {
                let r = radius * bounds.width().min(bounds.height());
                Brush::Gradient(
                    Gradient::new_radial(project(center), r as f32).with_stops(stops.as_slice()),
                )
            }
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

/// Stroke styling for outlined layers.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene units.
    pub stroke_width: f64,
}

impl StrokeStyle {
    /// Creates a solid-color stroke.
    pub fn solid(color: Color, stroke_width: f64) -> Self {
        Self {
            brush: Brush::Solid(color),
            stroke_width,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(css::BLACK, 1.0)
    }
}

/// Unshaped text carried by a layer.
///
/// Shaping and glyph layout are downstream; the origin is the top-left of
/// the measured text box and the angle rotates about that origin.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSpan {
    /// Text content, possibly multi-line.
    pub text: String,
    /// Top-left of the text box in scene coordinates.
    pub origin: Point,
    /// Font size in scene units.
    pub font_size: f64,
    /// Rotation in degrees about the origin.
    pub angle: f64,
}

/// One paintable unit of chart output.
///
/// A layer with no shape and no text still contributes its bounds to the
/// chart extent. Layers are produced against a local reference box and
/// re-projected with [`Layer::transform`].
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Vector shape, or `None` when there is nothing to draw.
    pub shape: Option<BezPath>,
    /// Unshaped text, drawn with the fill paint.
    pub text: Option<TextSpan>,
    /// Fill paint.
    pub fill: Option<Paint>,
    /// Outline stroke.
    pub stroke: Option<StrokeStyle>,
    /// Bounding box used for chart-extent union.
    pub bounds: Rect,
}

impl Layer {
    /// Creates a filled shape layer. Bounds are taken from the path.
    pub fn filled(shape: BezPath, fill: impl Into<Paint>) -> Self {
        let bounds = kurbo::Shape::bounding_box(&shape);
        Self {
            shape: Some(shape),
            text: None,
            fill: Some(fill.into()),
            stroke: None,
            bounds,
        }
    }

    /// Creates a stroke-only shape layer. Bounds are taken from the path.
    pub fn stroked(shape: BezPath, stroke: StrokeStyle) -> Self {
        let bounds = kurbo::Shape::bounding_box(&shape);
        Self {
            shape: Some(shape),
            text: None,
            fill: None,
            stroke: Some(stroke),
            bounds,
        }
    }

    /// Creates a text layer.
    pub fn text(span: TextSpan, color: Color, bounds: Rect) -> Self {
        Self {
            shape: None,
            text: Some(span),
            fill: Some(Paint::Solid(color)),
            stroke: None,
            bounds,
        }
    }

    /// Sets the outline stroke.
    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Re-derives this layer under an affine transform.
    ///
    /// The rebuild is immutable. Stroke widths and font sizes scale with the
    /// transform's minimum axis scale so anisotropic transforms do not fatten
    /// outlines along one axis.
    pub fn transform(&self, affine: Affine) -> Self {
        let scale = min_scale(affine);
        let shape = self.shape.as_ref().map(|path| affine * path.clone());
        let text = self.text.as_ref().map(|span| TextSpan {
            text: span.text.clone(),
            origin: affine * span.origin,
            font_size: span.font_size * scale,
            angle: span.angle,
        });
        let stroke = self.stroke.as_ref().map(|s| StrokeStyle {
            brush: s.brush.clone(),
            stroke_width: s.stroke_width * scale,
        });
        Self {
            shape,
            text,
            fill: self.fill.clone(),
            stroke,
            bounds: affine.transform_rect_bbox(self.bounds),
        }
    }
}

/// Union of all layer bounds, or the zero rect for an empty list.
pub fn union_bounds(layers: &[Layer]) -> Rect {
    let mut iter = layers.iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    iter.fold(first.bounds, |acc, layer| acc.union(layer.bounds))
}

#[cfg(test)]
mod tests {
    use kurbo::Shape;

    use super::*;

    fn unit_square() -> BezPath {
        Rect::new(0.0, 0.0, 10.0, 10.0).to_path(0.1)
    }

    #[test]
    fn transform_scales_bounds_and_stroke() {
        let layer = Layer::filled(unit_square(), css::TOMATO)
            .with_stroke(StrokeStyle::solid(css::BLACK, 2.0));
        let t = Affine::translate((5.0, -3.0)) * Affine::scale(3.0);
        let moved = layer.transform(t);

        assert_eq!(
            moved.bounds,
            t.transform_rect_bbox(layer.bounds),
            "bounds must follow the affine"
        );
        let stroke = moved.stroke.as_ref().unwrap();
        assert!(
            (stroke.stroke_width - 6.0).abs() < 1e-12,
            "stroke width must scale with the transform"
        );
    }

    #[test]
    fn anisotropic_transform_uses_min_axis_scale() {
        let layer = Layer::filled(unit_square(), css::TOMATO)
            .with_stroke(StrokeStyle::solid(css::BLACK, 1.0));
        let moved = layer.transform(Affine::scale_non_uniform(4.0, 2.0));
        let stroke = moved.stroke.as_ref().unwrap();
        assert!(
            (stroke.stroke_width - 2.0).abs() < 1e-12,
            "stroke must follow the smaller axis scale"
        );
    }

    #[test]
    fn shapeless_layer_still_transforms_bounds() {
        let layer = Layer {
            shape: None,
            text: None,
            fill: None,
            stroke: None,
            bounds: Rect::new(0.0, 0.0, 100.0, 50.0),
        };
        let moved = layer.transform(Affine::scale(0.5));
        assert_eq!(moved.bounds, Rect::new(0.0, 0.0, 50.0, 25.0));
    }

    #[test]
    fn union_bounds_covers_all_layers() {
        let a = Layer::filled(Rect::new(0.0, 0.0, 10.0, 10.0).to_path(0.1), css::RED);
        let b = Layer::filled(Rect::new(20.0, -5.0, 30.0, 10.0).to_path(0.1), css::BLUE);
        assert_eq!(union_bounds(&[a, b]), Rect::new(0.0, -5.0, 30.0, 10.0));
        assert_eq!(union_bounds(&[]), Rect::ZERO);
    }

    #[test]
    fn linear_paint_resolves_against_bounds() {
        let paint = Paint::Linear {
            start: Point::new(0.0, 1.0),
            end: Point::new(0.0, 0.0),
            stops: smallvec::smallvec![(0.0, css::RED), (1.0, css::GREEN)],
        };
        let Brush::Gradient(g) = paint.brush(Rect::new(10.0, 10.0, 30.0, 50.0)) else {
            panic!("expected a gradient brush");
        };
        assert_eq!(g.stops.len(), 2);
    }
}
