// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Heat-strip chart generation.
//!
//! Geometry matches the bar chart; the fill is a vertical gradient from
//! the zero color at the baseline to the value's band color at the tip,
//! so a strip's tip color encodes its magnitude.

use hashbrown::HashMap;
use kurbo::{Point, Rect, Shape, Size};
use log::{error, warn};
use peniko::Color;
use smallvec::smallvec;

use nodemark_core::{HeuristicTextMeasurer, Layer, Paint, StrokeStyle, TextMeasurer, TextSpan};

use crate::chart::{DataSource, SLOT_BOX, check_cardinality, node_transform, resolve_series};
use crate::color::{UpDownColors, named_gradient, parse_up_down, up_down_colors};
use crate::config::{
    ATTRIBUTELIST, COLORS, ChartConfig, ConfigValue, SEPARATION, SHOWYAXIS, VALUES,
};
use crate::error::ChartError;
use crate::slot::SlotLayout;
use crate::value::{Series, normalize, parse_series};

const LABEL_ANGLE: f64 = 70.0;

/// A heat-strip chart: bar geometry with gradient-banded fills.
#[derive(Clone, Debug)]
pub struct HeatStripSpec {
    /// Shared settings.
    pub config: ChartConfig,
    /// Literal values, if supplied inline.
    pub values: Option<Series>,
    /// Attribute names resolved through the data source.
    pub attributes: Vec<String>,
    /// Color band for positive, negative, and zero values.
    pub band: UpDownColors,
    /// Per-strip labels.
    pub labels: Option<Vec<String>>,
    /// Gap between strips, reference units.
    pub separation: f64,
    /// Whether to draw the value axis with min/max labels.
    pub show_axis: bool,
}

/// Midpoint of two colors, used as the baseline color of two-stop bands.
fn midpoint(a: Color, b: Color) -> Color {
    let ca = a.to_rgba8();
    let cb = b.to_rgba8();
    let mid = |x: u8, y: u8| ((u16::from(x) + u16::from(y)) / 2) as u8;
    Color::from_rgba8(mid(ca.r, cb.r), mid(ca.g, cb.g), mid(ca.b, cb.b), mid(ca.a, cb.a))
}

/// Parses the color band: a named palette or an `up:`/`down:` list.
fn parse_band(spec: Option<&str>) -> UpDownColors {
    let fallback = band_from_palette(named_gradient("yellowblackcyan").unwrap_or_default());
    let Some(spec) = spec else {
        return fallback;
    };
    if let Some(palette) = named_gradient(spec) {
        return band_from_palette(palette);
    }
    let tokens: Vec<&str> = spec.split(',').collect();
    match parse_up_down(&tokens) {
        Ok(band) => band,
        Err(e) => {
            warn!("Unable to parse up/down color '{spec}': {e}");
            fallback
        }
    }
}

/// Builds a band from a `[down, up]` or `[down, zero, up]` palette.
fn band_from_palette(palette: Vec<Color>) -> UpDownColors {
    let grey = Color::from_rgba8(128, 128, 128, 255);
    match palette.as_slice() {
        [down, zero, up] => UpDownColors { up: *up, down: *down, zero: *zero, missing: grey },
        [down, up] => UpDownColors {
            up: *up,
            down: *down,
            zero: midpoint(*down, *up),
            missing: grey,
        },
        _ => UpDownColors {
            up: Color::from_rgba8(255, 255, 0, 255),
            down: Color::from_rgba8(0, 255, 255, 255),
            zero: Color::from_rgba8(0, 0, 0, 255),
            missing: grey,
        },
    }
}

impl HeatStripSpec {
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
        let band = parse_band(args.get(COLORS).map(String::as_str));
        let separation = args
            .get(SEPARATION)
            .and_then(|s| ConfigValue::number(s).ok())
            .unwrap_or(0.0);
        let show_axis = args.get(SHOWYAXIS).map(|s| ConfigValue::flag(s)).unwrap_or(false);
        Self {
            config,
            values,
            attributes,
            band,
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
                error!("heatstrip: {e}");
                Vec::new()
            }
        }
    }

    pub(crate) fn build(&self, source: &dyn DataSource) -> Result<Vec<Layer>, ChartError> {
        let raw = resolve_series(self.values.as_ref(), &self.attributes, source)
            .ok_or(ChartError::EmptySeries)?;
        let normalized = self.config.range.is_some();
        let values = normalize(&raw, self.config.range);
        let tips = up_down_colors(self.band, &values, self.config.range, normalized);
        check_cardinality(self.labels.as_deref(), values.len(), tips.len())?;

        // The seeds pull min down to at most ~0 and max up to at least
        // ~0, so zero stays inside the extent and the baseline lands in
        // the box.
        let (min, max) = if normalized {
            (-1.0, 1.0)
        } else {
            values
                .iter()
                .filter_map(|v| *v)
                .filter(|v| !v.is_nan())
                .fold((0.000_001_f64, -0.000_001_f64), |(lo, hi), v| (lo.min(v), hi.max(v)))
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
            if v.is_nan() || *v == 0.0 {
                continue;
            }
            let rect = layout.slot_rect(i, *v);
            // Baseline end gets the zero color, tip end the band color.
            let (start, end) = if *v > 0.0 {
                (Point::new(0.0, 1.0), Point::new(0.0, 0.0))
            } else {
                (Point::new(0.0, 0.0), Point::new(0.0, 1.0))
            };
            let fill = Paint::Linear {
                start,
                end,
                stops: smallvec![(0.0, self.band.zero), (1.0, tips[i])],
            };
            layers.push(Layer::filled(rect.to_path(0.1), fill).with_stroke(
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
                layers.push(self.strip_label(label, &layout, i));
            }
        }

        Ok(layers)
    }

    fn axis_layers(&self, layout: &SlotLayout, min: f64, max: f64) -> Vec<Layer> {
        let mut layers = vec![Layer::stroked(
            layout.axis_line(min, max),
            StrokeStyle::solid(self.config.border_color, self.config.border_width.max(0.5)),
        )];
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

    fn axis_label(&self, text: &str, axis_x: f64, y: f64) -> Layer {
        let measurer = HeuristicTextMeasurer;
        let (w, h) = measurer.measure(text, self.config.label_size);
        let origin = Point::new(axis_x - self.config.label_size - w, y - h / 2.0);
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

    fn strip_label(&self, text: &str, layout: &SlotLayout, index: usize) -> Layer {
        let measurer = HeuristicTextMeasurer;
        let (w, h) = measurer.measure(text, self.config.label_size);
        let slot = layout.slot_rect(index, 0.0);
        let origin = Point::new(
            slot.center().x,
            SLOT_BOX.y1 * self.config.scale + self.config.label_size / 2.0,
        );
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

    #[test]
    fn default_band_is_yellow_black_cyan() {
        let spec = HeatStripSpec::from_map(&map(&[("valuelist", "1,2")]));
        assert_eq!(spec.band.zero, Color::from_rgba8(0, 0, 0, 255));
        assert_eq!(spec.band.up, Color::from_rgba8(255, 255, 0, 255));
        assert_eq!(spec.band.down, Color::from_rgba8(0, 255, 255, 255));
    }

    #[test]
    fn named_palette_overrides_the_default() {
        let spec = HeatStripSpec::from_map(&map(&[
            ("valuelist", "1"),
            ("colorlist", "redgreen"),
        ]));
        assert_eq!(spec.band.up, Color::from_rgba8(255, 0, 0, 255));
        assert_eq!(spec.band.down, Color::from_rgba8(0, 255, 0, 255));
    }

    #[test]
    fn strips_are_gradient_filled() {
        let spec = HeatStripSpec::from_map(&map(&[("valuelist", "1,-2")]));
        let layers = spec.build(&NoData).unwrap();
        let gradients = layers
            .iter()
            .filter(|l| matches!(l.fill, Some(Paint::Linear { .. })))
            .count();
        assert_eq!(gradients, 2);
    }

    #[test]
    fn zero_values_draw_no_strip() {
        let spec = HeatStripSpec::from_map(&map(&[("valuelist", "1,0,3")]));
        let layers = spec.build(&NoData).unwrap();
        let filled = layers.iter().filter(|l| l.fill.is_some()).count();
        assert_eq!(filled, 2);
    }

    #[test]
    fn bad_band_spec_falls_back_to_the_default() {
        let band = parse_band(Some("up:nonsense#,down"));
        assert_eq!(band.zero, Color::from_rgba8(0, 0, 0, 255));
    }

    #[test]
    fn label_mismatch_fails_closed() {
        let spec = HeatStripSpec::from_map(&map(&[
            ("valuelist", "1,2,3"),
            ("labellist", "a,b"),
        ]));
        assert!(spec.layers(Rect::new(0.0, 0.0, 100.0, 50.0), &NoData).is_empty());
    }
}
