// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar chart generation.

use hashbrown::HashMap;
use kurbo::{Rect, Shape, Size};
use log::error;

use nodemark_core::{HeuristicTextMeasurer, Layer, StrokeStyle, TextMeasurer, TextSpan};

use crate::chart::{DataSource, SLOT_BOX, check_cardinality, node_transform, resolve_series};
use crate::color::resolve_colors;
use crate::config::{
    ATTRIBUTELIST, COLORS, ChartConfig, ConfigValue, SEPARATION, SHOWYAXIS, VALUES,
};
use crate::error::ChartError;
use crate::slot::SlotLayout;
use crate::value::{Series, normalize, parse_series};

/// Rotation applied to per-bar labels so long names do not collide.
const LABEL_ANGLE: f64 = 70.0;

/// A bar chart: one rectangle per value above or below a baseline.
#[derive(Clone, Debug)]
pub struct BarChartSpec {
    /// Shared settings.
    pub config: ChartConfig,
    /// Literal values, if supplied inline.
    pub values: Option<Series>,
    /// Attribute names resolved through the data source.
    pub attributes: Vec<String>,
    /// Raw color specification.
    pub color_spec: Option<String>,
    /// Per-bar labels.
    pub labels: Option<Vec<String>>,
    /// Gap between bars, reference units.
    pub separation: f64,
    /// Whether to draw the value axis with min/max labels.
    pub show_axis: bool,
}

impl BarChartSpec {
    /// Builds the spec from the configuration map.
    pub fn from_map(args: &HashMap<String, String>) -> Self {
        let config = ChartConfig::from_map(args);
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
        let separation = args
            .get(SEPARATION)
            .and_then(|s| ConfigValue::number(s).ok())
            .unwrap_or(0.0);
        let show_axis = args.get(SHOWYAXIS).map(|s| ConfigValue::flag(s)).unwrap_or(false);
        Self {
            config,
            values,
            attributes,
            color_spec: args.get(COLORS).cloned(),
            labels,
            separation,
            show_axis,
        }
    }

    /// Generates the chart's layers fitted to the node box.
    ///
    /// Fails closed: any error is logged and yields no layers.
    pub fn layers(&self, node_box: Rect, source: &dyn DataSource) -> Vec<Layer> {
        match self.build(source) {
            Ok(layers) => {
                let t = node_transform(SLOT_BOX, node_box, &self.config);
                layers.iter().map(|l| l.transform(t)).collect()
            }
            Err(e) => {
                error!("barchart: {e}");
                Vec::new()
            }
        }
    }

    pub(crate) fn build(&self, source: &dyn DataSource) -> Result<Vec<Layer>, ChartError> {
        let raw = resolve_series(self.values.as_ref(), &self.attributes, source)
            .ok_or(ChartError::EmptySeries)?;
        let normalized = self.config.range.is_some();
        let values = normalize(&raw, self.config.range);
        let colors =
            resolve_colors(self.color_spec.as_deref(), &values, self.config.range, normalized)?;
        check_cardinality(self.labels.as_deref(), values.len(), colors.len())?;

        // Bars always include zero in their extent.
        let (min, max) = if normalized {
            let (lo, hi) = self.config.range.unwrap_or((0.0, 0.0));
            (if lo < 0.0 { -1.0 } else { 0.0 }, if hi > 0.0 { 1.0 } else { 0.0 })
        } else {
            values
                .iter()
                .filter_map(|v| *v)
                .filter(|v| !v.is_nan())
                .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)))
        };

        let layout = SlotLayout::new(
            SLOT_BOX,
            self.config.scale,
            values.len(),
            self.separation,
            self.config.border_width,
            self.config.ybase,
            min,
            max,
        );

        let mut layers = Vec::new();
        for (i, value) in values.iter().enumerate() {
            let Some(v) = value else { continue };
            if v.is_nan() {
                continue;
            }
            let rect = layout.slot_rect(i, *v);
            layers.push(Layer::filled(rect.to_path(0.1), colors[i]).with_stroke(
                StrokeStyle::solid(self.config.border_color, self.config.border_width),
            ));
        }

        layers.push(Layer::stroked(
            layout.zero_line(),
            StrokeStyle::solid(self.config.border_color, self.config.border_width.max(0.5)),
        ));

        if self.show_axis {
            layers.extend(self.axis_layers(&layout, min, max));
        }

        if let Some(labels) = &self.labels {
            for (i, label) in labels.iter().enumerate() {
                if label.is_empty() || i >= values.len() {
                    continue;
                }
                layers.push(self.bar_label(label, &layout, i));
            }
        }

        Ok(layers)
    }

    /// Value axis on the left edge with min/max (and zero) tick labels.
    fn axis_layers(&self, layout: &SlotLayout, min: f64, max: f64) -> Vec<Layer> {
        let mut layers = vec![Layer::stroked(
            layout.axis_line(min, max),
            StrokeStyle::solid(self.config.border_color, self.config.border_width.max(0.5)),
        )];

        // When normalized, the ticks show the user's range rather than the
        // unit values the bars were scaled to.
        let (min_text, max_text) = match self.config.range {
            Some((lo, hi)) => (format!("{lo}"), format!("{hi}")),
            None => (format!("{min}"), format!("{max}")),
        };

        let top = layout.slot_rect(0, max);
        let bottom = layout.slot_rect(0, min);
        if max > 0.0 {
            layers.push(self.axis_label(&max_text, top.x0, top.y0));
        }
        if min < 0.0 {
            layers.push(self.axis_label(&min_text, bottom.x0, bottom.y1));
        }
        if min < 0.0 && max > 0.0 {
            layers.push(self.axis_label("0.0", top.x0, layout.baseline()));
        }
        layers
    }

    /// A right-aligned tick label left of the axis.
    fn axis_label(&self, text: &str, axis_x: f64, y: f64) -> Layer {
        let measurer = HeuristicTextMeasurer;
        let (w, h) = measurer.measure(text, self.config.label_size);
        let origin = kurbo::Point::new(
            axis_x - self.config.label_size - w,
            y - h / 2.0,
        );
        let bounds = Rect::from_origin_size(origin, Size::new(w, h));
        Layer::text(
            TextSpan {
                text: text.to_string(),
                origin,
                font_size: self.config.label_size,
                angle: 0.0,
            },
            self.config.label_color,
            bounds,
        )
    }

    /// A rotated bar label hanging below the chart box.
    fn bar_label(&self, text: &str, layout: &SlotLayout, index: usize) -> Layer {
        let measurer = HeuristicTextMeasurer;
        let (w, h) = measurer.measure(text, self.config.label_size);
        let slot = layout.slot_rect(index, 0.0);
        let origin = kurbo::Point::new(
            slot.center().x,
            SLOT_BOX.y1 * self.config.scale + self.config.label_size / 2.0,
        );
        // Bounds cover the unrotated extent; rotation only tilts the glyphs.
        let bounds = Rect::from_origin_size(origin, Size::new(w, h));
        Layer::text(
            TextSpan {
                text: text.to_string(),
                origin,
                font_size: self.config.label_size,
                angle: LABEL_ANGLE,
            },
            self.config.label_color,
            bounds,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::chart::NoData;

    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn node() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 50.0)
    }

    #[test]
    fn one_bar_per_value_plus_zero_line() {
        let spec = BarChartSpec::from_map(&map(&[("valuelist", "1,2,3")]));
        let layers = spec.layers(node(), &NoData);
        let filled = layers.iter().filter(|l| l.fill.is_some()).count();
        let stroked_only = layers.iter().filter(|l| l.fill.is_none()).count();
        assert_eq!(filled, 3);
        assert_eq!(stroked_only, 1, "the zero line");
    }

    #[test]
    fn missing_values_skip_their_slot() {
        let spec = BarChartSpec {
            values: Some(vec![Some(1.0), None, Some(3.0)]),
            ..BarChartSpec::from_map(&map(&[]))
        };
        let layers = spec.build(&NoData).unwrap();
        let filled = layers.iter().filter(|l| l.fill.is_some()).count();
        assert_eq!(filled, 2);
    }

    #[test]
    fn negative_bars_extend_below_the_baseline() {
        let spec = BarChartSpec::from_map(&map(&[("valuelist", "2,-2")]));
        let layers = spec.build(&NoData).unwrap();
        let up = layers[0].bounds;
        let down = layers[1].bounds;
        assert!(up.y0 < down.y0, "positive bar tops sit above negative bar tops");
        assert!(down.y1 > up.y1);
    }

    #[test]
    fn axis_labels_show_the_configured_range() {
        let spec = BarChartSpec::from_map(&map(&[
            ("valuelist", "1,-4,3"),
            ("range", "-5,5"),
            ("showyaxis", "true"),
        ]));
        let layers = spec.build(&NoData).unwrap();
        let texts: Vec<&str> = layers
            .iter()
            .filter_map(|l| l.text.as_ref().map(|t| t.text.as_str()))
            .collect();
        assert!(texts.contains(&"5"));
        assert!(texts.contains(&"-5"));
        assert!(texts.contains(&"0.0"), "straddling range gets a zero tick");
    }

    #[test]
    fn bar_labels_are_rotated() {
        let spec = BarChartSpec::from_map(&map(&[
            ("valuelist", "1,2"),
            ("labellist", "alpha,beta"),
        ]));
        let layers = spec.build(&NoData).unwrap();
        let angles: Vec<f64> = layers
            .iter()
            .filter_map(|l| l.text.as_ref().map(|t| t.angle))
            .collect();
        assert_eq!(angles, vec![LABEL_ANGLE, LABEL_ANGLE]);
    }

    #[test]
    fn cardinality_mismatch_fails_closed() {
        let spec = BarChartSpec::from_map(&map(&[
            ("valuelist", "1,2,3"),
            ("labellist", "only"),
        ]));
        assert!(spec.layers(node(), &NoData).is_empty());
    }

    #[test]
    fn short_color_list_fails_closed() {
        let spec = BarChartSpec::from_map(&map(&[
            ("valuelist", "1,2,3"),
            ("colorlist", "red,blue"),
        ]));
        assert!(spec.layers(node(), &NoData).is_empty());
    }
}
