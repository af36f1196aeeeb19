// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circos chart generation: concentric data rings around the node center.
//!
//! Each ring is an annular pie of its own series. Radii are fractions of
//! the node half-extent, so `firstarc=0.2 arcwidth=0.1` puts the first
//! ring at 20% out with 10%-thick rings after it.

use hashbrown::HashMap;
use kurbo::{Point, Rect, Shape};
use log::{error, warn};

use nodemark_core::{
    HeuristicTextMeasurer, Layer, Paint, StrokeStyle, TextAlign, TextBlock, TextSpan, leader_line,
    position_text,
};

use crate::arc;
use crate::chart::{ARC_BOX, DataSource, check_cardinality, node_transform, resolve_series};
use crate::color::resolve_colors;
use crate::config::{
    ARCDIRECTION, ARCSTART, ARCWIDTH, ATTRIBUTELIST, CIRCLELABELS, COLORS, ChartConfig,
    ConfigValue, FIRSTARC, FIRSTARCWIDTH, LABELCIRCLES, OUTLINEWIDTH, VALUES,
};
use crate::error::ChartError;
use crate::value::{Series, normalize, parse_ring_series, split_ring_spec, to_degrees};

/// Where ring names are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CircleLabelStyle {
    /// At the top of each ring.
    InRing,
    /// In a column to the right, with leader lines.
    East,
    /// In a column to the left, with leader lines.
    West,
}

/// A circos chart spec.
#[derive(Clone, Debug)]
pub struct CircosChartSpec {
    /// Shared settings.
    pub config: ChartConfig,
    /// Literal per-ring values, if supplied inline.
    pub values: Option<Vec<Series>>,
    /// Attribute names, one ring per attribute.
    pub attributes: Vec<String>,
    /// Color specification, either one for all rings or bracketed per ring.
    pub color_spec: Option<String>,
    /// Slice labels, drawn on the outermost ring only.
    pub labels: Option<Vec<String>>,
    /// Ring names.
    pub circle_labels: Option<Vec<String>>,
    /// Ring name placement, `None` to hide them.
    pub label_circles: Option<CircleLabelStyle>,
    /// Angle of the first slice edge in degrees.
    pub arc_start: f64,
    /// Sweep direction.
    pub clockwise: bool,
    /// Inner radius of the first ring, fraction of the half-extent.
    pub first_arc: f64,
    /// Ring thickness, fraction of the half-extent.
    pub arc_width: f64,
    /// Thickness of the first ring.
    pub first_arc_width: f64,
    /// Slice outline stroke width.
    pub outline_width: f64,
}

impl CircosChartSpec {
    /// Builds the spec from the configuration map.
    pub fn from_map(args: &HashMap<String, String>) -> Self {
        let config = ChartConfig::from_map(args).with_radial_default_scale(args);
        let values = args.get(VALUES).and_then(|s| match parse_ring_series(s) {
            Ok(v) => Some(v),
            Err(_) => {
                error!("Cannot parse {VALUES} from input '{s}'");
                None
            }
        });
        let labels = config.labels_from(args);
        let attributes = args
            .get(ATTRIBUTELIST)
            .map(|s| ConfigValue::list(s))
            .unwrap_or_default();
        let circle_labels = args.get(CIRCLELABELS).map(|s| ConfigValue::list(s));
        let label_circles = args.get(LABELCIRCLES).and_then(|s| {
            match s.trim().to_ascii_lowercase().as_str() {
                "east" | "e" => Some(CircleLabelStyle::East),
                "west" | "w" => Some(CircleLabelStyle::West),
                other => ConfigValue::flag(other).then_some(CircleLabelStyle::InRing),
            }
        });
        let arc_start = args
            .get(ARCSTART)
            .and_then(|s| ConfigValue::number(s).ok())
            .unwrap_or(0.0);
        let clockwise = args
            .get(ARCDIRECTION)
            .map(|d| matches!(d.trim().to_ascii_lowercase().as_str(), "clockwise" | "cw"))
            .unwrap_or(false);
        let first_arc = args
            .get(FIRSTARC)
            .and_then(|s| ConfigValue::number(s).ok())
            .unwrap_or(0.2);
        let arc_width = args
            .get(ARCWIDTH)
            .and_then(|s| ConfigValue::number(s).ok())
            .unwrap_or(0.1);
        let first_arc_width = args
            .get(FIRSTARCWIDTH)
            .and_then(|s| ConfigValue::number(s).ok())
            .unwrap_or(arc_width);
        let outline_width = args
            .get(OUTLINEWIDTH)
            .and_then(|s| ConfigValue::number(s).ok())
            .unwrap_or(config.border_width);
        Self {
            config,
            values,
            attributes,
            color_spec: args.get(COLORS).cloned(),
            labels,
            circle_labels,
            label_circles,
            arc_start,
            clockwise,
            first_arc,
            arc_width,
            first_arc_width,
            outline_width,
        }
    }

    /// Generates the chart's layers fitted to the node box.
    ///
    /// Fails closed: any error is logged and yields no layers.
    pub fn layers(&self, node_box: Rect, source: &dyn DataSource) -> Vec<Layer> {
        match self.build(source) {
            Ok(layers) => {
                let t = node_transform(ARC_BOX, node_box, &self.config);
                layers.iter().map(|l| l.transform(t)).collect()
            }
            Err(e) => {
                error!("circoschart: {e}");
                Vec::new()
            }
        }
    }

    /// Thickness of ring `circle`, fraction of the half-extent.
    fn ring_width(&self, circle: usize) -> f64 {
        if circle == 0 { self.first_arc_width } else { self.arc_width }
    }

    /// Outer radius fraction of the outermost ring.
    fn max_radius(&self, n_circles: usize) -> f64 {
        self.first_arc + self.first_arc_width + self.arc_width * (n_circles - 1) as f64
    }

    pub(crate) fn build(&self, source: &dyn DataSource) -> Result<Vec<Layer>, ChartError> {
        let rings = self.resolve_rings(source)?;
        let n_circles = rings.len();

        if let Some(circle_labels) = &self.circle_labels {
            if circle_labels.len() != n_circles {
                return Err(ChartError::CircleCardinality {
                    labels: circle_labels.len(),
                    circles: n_circles,
                });
            }
        }

        let normalized = self.config.range.is_some();
        let ring_specs = self.color_spec.as_deref().and_then(split_ring_spec);
        let half = ARC_BOX.width() / 2.0 * self.config.scale;

        let mut layers = Vec::new();
        let mut label_layers = Vec::new();
        let mut rad = self.first_arc;
        for (circle, ring) in rings.iter().enumerate() {
            let spec = match &ring_specs {
                Some(specs) => specs.get(circle).map(String::as_str),
                None => self.color_spec.as_deref(),
            };
            let values = normalize(ring, self.config.range);
            let colors = resolve_colors(spec, &values, self.config.range, normalized)?;

            let outermost = circle == n_circles - 1;
            let labels = if outermost { self.labels.as_deref() } else { None };
            check_cardinality(labels, values.len(), colors.len())?;

            // Negative slices have no angular meaning and are dropped.
            let cleaned: Series = values
                .iter()
                .enumerate()
                .map(|(i, v)| match v {
                    Some(v) if *v < 0.0 => {
                        warn!(
                            "The slice {i} of circle {circle} has a negative value: {v}. \
                             This slice is ignored."
                        );
                        None
                    }
                    other => *other,
                })
                .collect();
            let degrees = to_degrees(&cleaned);

            let width = self.ring_width(circle);
            let inner = rad * half;
            let outer = (rad + width) * half;

            let mut angle = self.arc_start;
            for (i, deg) in degrees.iter().enumerate() {
                let Some(deg) = deg else { continue };
                if *deg <= 0.0 || deg.is_nan() {
                    continue;
                }
                let path = arc::sector_path(outer, inner, angle, *deg, self.clockwise);
                layers.push(Layer::filled(path, colors[i]).with_stroke(StrokeStyle::solid(
                    self.config.border_color,
                    self.outline_width,
                )));

                if outermost {
                    if let Some(label) = self.labels.as_ref().and_then(|l| l.get(i)) {
                        if !label.is_empty() {
                            let mid = if self.clockwise {
                                angle - deg / 2.0
                            } else {
                                angle + deg / 2.0
                            };
                            label_layers.push(self.slice_label(label, mid, half, rad + width));
                        }
                    }
                }
                if self.clockwise {
                    angle -= deg;
                } else {
                    angle += deg;
                }
            }

            if self.label_circles == Some(CircleLabelStyle::InRing) {
                if let Some(name) = self.ring_name(circle) {
                    label_layers.push(self.ring_label(&name, rad, half));
                }
            }

            rad += width;
        }

        // Offset labels go outermost-first so their leader lines stack
        // from the outer rings inward.
        if let Some(style @ (CircleLabelStyle::East | CircleLabelStyle::West)) = self.label_circles
        {
            let max_radius = self.max_radius(n_circles);
            let mut rad = max_radius;
            for circle in (0..n_circles).rev() {
                let width = self.ring_width(circle);
                if let Some(name) = self.ring_name(circle) {
                    label_layers.push(self.offset_label(
                        &name, style, rad, width, max_radius, circle, n_circles, half,
                    ));
                }
                rad -= width;
            }
        }

        layers.extend(label_layers);
        Ok(layers)
    }

    /// Per-ring series from literals or one attribute per ring.
    fn resolve_rings(&self, source: &dyn DataSource) -> Result<Vec<Series>, ChartError> {
        if let Some(rings) = &self.values {
            if !rings.is_empty() {
                return Ok(rings.clone());
            }
        }
        let rings: Vec<Series> = self
            .attributes
            .iter()
            .filter_map(|attr| resolve_series(None, core::slice::from_ref(attr), source))
            .collect();
        if rings.is_empty() {
            return Err(ChartError::EmptySeries);
        }
        Ok(rings)
    }

    /// The display name of ring `circle`.
    fn ring_name(&self, circle: usize) -> Option<String> {
        if let Some(labels) = &self.circle_labels {
            return labels.get(circle).cloned();
        }
        self.attributes.get(circle).cloned()
    }

    /// A slice label outside the outermost ring, with a leader line.
    fn slice_label(&self, label: &str, mid_angle: f64, half: f64, outer_frac: f64) -> Layer {
        let measurer = HeuristicTextMeasurer;
        let block = TextBlock::new(label, self.config.label_size)
            .with_max_width(self.config.label_width)
            .with_line_spacing(self.config.label_spacing);
        let (lines, size) = block.layout(&measurer);

        let align = arc::label_alignment(mid_angle);
        let anchor = arc::label_position(mid_angle, half, half, outer_frac + self.arc_width);
        let origin = position_text(size, anchor, align, 0.0, self.config.label_offset);
        let text_bounds = Rect::from_origin_size(origin, size);

        let target = arc::label_position(mid_angle, half, half, outer_frac);
        let line = leader_line(arc::leader_origin(text_bounds, align), target);
        let bounds = text_bounds.union(line.bounding_box());

        Layer {
            shape: Some(line),
            text: Some(TextSpan {
                text: lines.join("\n"),
                origin,
                font_size: self.config.label_size,
                angle: 0.0,
            }),
            fill: Some(Paint::Solid(self.config.label_color)),
            stroke: Some(StrokeStyle::solid(self.config.label_color, 0.5)),
            bounds,
        }
    }

    /// A ring name drawn at 12 o'clock inside the ring band.
    fn ring_label(&self, name: &str, rad: f64, half: f64) -> Layer {
        let measurer = HeuristicTextMeasurer;
        let block = TextBlock::new(name, self.config.label_size)
            .with_max_width(self.config.label_width)
            .with_line_spacing(self.config.label_spacing);
        let (lines, size) = block.layout(&measurer);
        let origin = position_text(
            size,
            Point::new(0.0, -rad * half),
            TextAlign::Top,
            0.0,
            self.config.label_offset,
        );
        Layer::text(
            TextSpan {
                text: lines.join("\n"),
                origin,
                font_size: self.config.label_size,
                angle: 0.0,
            },
            self.config.label_color,
            Rect::from_origin_size(origin, size),
        )
    }

    /// A ring name in the east/west label column, with a leader line that
    /// ends in the middle of the ring band.
    fn offset_label(
        &self,
        name: &str,
        style: CircleLabelStyle,
        outer_frac: f64,
        width: f64,
        max_radius: f64,
        circle: usize,
        n_circles: usize,
        half: f64,
    ) -> Layer {
        let measurer = HeuristicTextMeasurer;
        let block = TextBlock::new(name, self.config.label_size)
            .with_max_width(self.config.label_width)
            .with_line_spacing(self.config.label_spacing);
        let (lines, size) = block.layout(&measurer);

        // The middle label sits on the horizontal axis of the node.
        let slot = (n_circles / 2) as f64 - circle as f64;
        let line_height = self.config.label_size;
        let y = slot * line_height * (1.0 + self.config.label_spacing);
        let (x, align) = match style {
            CircleLabelStyle::West => (-(max_radius + width) * half, TextAlign::Right),
            _ => ((max_radius + width) * half, TextAlign::Left),
        };

        let origin = position_text(size, Point::new(x, y), align, 0.0, self.config.label_offset);
        let text_bounds = Rect::from_origin_size(origin, size);
        let start = arc::leader_origin(text_bounds, align);

        // Leader line aims at the middle of the ring band: intersect the
        // circle of that radius with the ray through the line start.
        let target_radius = (outer_frac - width / 2.0) * half;
        let distance = start.to_vec2().hypot();
        let end = if distance > 0.0 {
            let t = target_radius / distance;
            Point::new(start.x * t, start.y * t)
        } else {
            Point::ZERO
        };
        let line = leader_line(start, end);
        let bounds = text_bounds.union(line.bounding_box());

        Layer {
            shape: Some(line),
            text: Some(TextSpan {
                text: lines.join("\n"),
                origin,
                font_size: self.config.label_size,
                angle: 0.0,
            }),
            fill: Some(Paint::Solid(self.config.label_color)),
            stroke: Some(StrokeStyle::solid(self.config.label_color, 0.5)),
            bounds,
        }
    }
}
