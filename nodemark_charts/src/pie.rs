// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pie chart generation.

use hashbrown::HashMap;
use kurbo::{Rect, Shape};
use log::error;
use peniko::Color;
use peniko::color::palette::css;

use nodemark_core::{
    HeuristicTextMeasurer, Layer, Paint, StrokeStyle, TextBlock, TextSpan, leader_line,
    position_text,
};

use crate::arc;
use crate::chart::{ARC_BOX, DataSource, check_cardinality, node_transform, resolve_series};
use crate::color::resolve_colors;
use crate::config::{
    ARCDIRECTION, ARCSTART, ATTRIBUTELIST, COLORS, ChartConfig, ConfigValue, MINIMUMSLICE,
    SORTSLICES, VALUES,
};
use crate::error::ChartError;
use crate::value::{Series, normalize, parse_series, to_degrees};

/// A pie chart: one filled sector per positive value.
#[derive(Clone, Debug)]
pub struct PieChartSpec {
    /// Shared settings.
    pub config: ChartConfig,
    /// Literal values, if supplied inline.
    pub values: Option<Series>,
    /// Attribute names resolved through the data source.
    pub attributes: Vec<String>,
    /// Raw color specification.
    pub color_spec: Option<String>,
    /// Slice labels.
    pub labels: Option<Vec<String>>,
    /// Angle of the first slice edge in degrees.
    pub arc_start: f64,
    /// Sweep direction.
    pub clockwise: bool,
    /// Sort slices by size, largest first.
    pub sort_slices: bool,
    /// Slices below this many degrees collapse into an "Other" slice.
    pub minimum_slice: f64,
}

impl PieChartSpec {
    /// Builds the spec from the configuration map.
    pub fn from_map(args: &HashMap<String, String>) -> Self {
        let config = ChartConfig::from_map(args).with_radial_default_scale(args);
        let values = args.get(VALUES).and_then(|s| match parse_series(s) {
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
        let arc_start = args
            .get(ARCSTART)
            .and_then(|s| ConfigValue::number(s).ok())
            .unwrap_or(0.0);
        let clockwise = args
            .get(ARCDIRECTION)
            .map(|d| matches!(d.trim().to_ascii_lowercase().as_str(), "clockwise" | "cw"))
            .unwrap_or(false);
        let sort_slices = args.get(SORTSLICES).map(|s| ConfigValue::flag(s)).unwrap_or(true);
        let minimum_slice = args
            .get(MINIMUMSLICE)
            .and_then(|s| ConfigValue::number(s).ok())
            .unwrap_or(2.0);
        Self {
            config,
            values,
            attributes,
            color_spec: args.get(COLORS).cloned(),
            labels,
            arc_start,
            clockwise,
            sort_slices,
            minimum_slice,
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
                error!("piechart: {e}");
                Vec::new()
            }
        }
    }

    /// Generates layers in reference-box coordinates.
    pub(crate) fn build(&self, source: &dyn DataSource) -> Result<Vec<Layer>, ChartError> {
        let raw = resolve_series(self.values.as_ref(), &self.attributes, source)
            .ok_or(ChartError::EmptySeries)?;
        let normalized = self.config.range.is_some();
        let values = normalize(&raw, self.config.range);
        let colors =
            resolve_colors(self.color_spec.as_deref(), &values, self.config.range, normalized)?;
        check_cardinality(self.labels.as_deref(), values.len(), colors.len())?;

        let degrees = to_degrees(&values);
        let mut slices: Vec<(f64, Color, String)> = degrees
            .iter()
            .enumerate()
            .filter_map(|(i, deg)| {
                let deg = (*deg)?;
                if deg <= 0.0 || deg.is_nan() {
                    return None;
                }
                let label = self
                    .labels
                    .as_ref()
                    .and_then(|l| l.get(i).cloned())
                    .unwrap_or_default();
                Some((deg, colors[i], label))
            })
            .collect();

        if self.sort_slices {
            slices.sort_by(|a, b| b.0.total_cmp(&a.0));
            if self.minimum_slice > 0.0 {
                let other: f64 = slices
                    .iter()
                    .filter(|(deg, _, _)| *deg < self.minimum_slice)
                    .map(|(deg, _, _)| deg)
                    .sum();
                if other > 0.0 {
                    slices.retain(|(deg, _, _)| *deg >= self.minimum_slice);
                    slices.push((other, css::LIGHT_GRAY, "Other".to_string()));
                }
            }
        }

        let radius = ARC_BOX.width() / 2.0 * self.config.scale;
        let mut layers = Vec::new();
        let mut label_layers = Vec::new();
        let mut arc = self.arc_start;
        for (deg, color, label) in &slices {
            let path = arc::sector_path(radius, 0.0, arc, *deg, self.clockwise);
            layers.push(Layer::filled(path, *color).with_stroke(StrokeStyle::solid(
                self.config.border_color,
                self.config.border_width,
            )));

            if !label.is_empty() {
                let mid = if self.clockwise { arc - deg / 2.0 } else { arc + deg / 2.0 };
                label_layers.push(self.slice_label(label, mid, radius));
            }
            if self.clockwise {
                arc -= deg;
            } else {
                arc += deg;
            }
        }

        layers.extend(label_layers);
        Ok(layers)
    }

    /// A slice label plus its leader line toward the arc edge.
    fn slice_label(&self, label: &str, mid_angle: f64, radius: f64) -> Layer {
        let measurer = HeuristicTextMeasurer;
        let block = TextBlock::new(label, self.config.label_size)
            .with_max_width(self.config.label_width)
            .with_line_spacing(self.config.label_spacing);
        let (lines, size) = block.layout(&measurer);

        let align = arc::label_alignment(mid_angle);
        let anchor = arc::label_position(mid_angle, radius, radius, 1.7);
        let origin = position_text(size, anchor, align, 0.0, self.config.label_offset);
        let text_bounds = Rect::from_origin_size(origin, size);

        let target = arc::label_position(mid_angle, radius, radius, 1.0);
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
}
