// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Standalone text labels with optional background, outline, and shadow.
//!
//! Unlike the data charts, a label is laid out directly in node-box
//! coordinates: the position/anchor pair picks its spot and there is no
//! reference-frame re-projection.

use hashbrown::HashMap;
use kurbo::{Rect, RoundedRect, Shape, Size, Vec2};
use log::error;
use peniko::Color;
use peniko::color::palette::css;

use nodemark_core::{
    Anchor, HeuristicTextMeasurer, Layer, Paint, StrokeStyle, TextBlock, TextSpan, anchor_point,
};

use crate::chart::DataSource;
use crate::color::parse_color;
use crate::config::{ChartConfig, ConfigValue, PositionSpec};
use crate::error::ChartError;

const LABEL: &str = "label";
const ATTRIBUTE: &str = "attribute";
const COLOR: &str = "color";
const ANGLE: &str = "angle";
const BACKGROUND: &str = "background";
const BGCOLOR: &str = "bgcolor";
const DROPSHADOW: &str = "dropshadow";
const OUTLINE: &str = "outline";
const OUTLINECOLOR: &str = "outlinecolor";
const OUTLINEWIDTH: &str = "outlinewidth";

/// A text label spec.
#[derive(Clone, Debug)]
pub struct LabelSpec {
    /// Shared settings.
    pub config: ChartConfig,
    /// Literal label text.
    pub text: Option<String>,
    /// Attribute to read the text from when no literal is given.
    pub attribute: Option<String>,
    /// Text color.
    pub color: Color,
    /// Rotation in degrees.
    pub angle: f64,
    /// Draw a rounded rectangle behind the text.
    pub background: bool,
    /// Background fill color.
    pub bg_color: Color,
    /// Draw a drop shadow behind the text.
    pub drop_shadow: bool,
    /// Stroke the glyph outlines.
    pub outline: bool,
    /// Outline stroke color.
    pub outline_color: Color,
    /// Outline width, scaled by font size.
    pub outline_width: f64,
}

impl LabelSpec {
    /// Builds the spec from the configuration map.
    pub fn from_map(args: &HashMap<String, String>) -> Self {
        let config = ChartConfig::from_map(args);
        let color = args
            .get(COLOR)
            .and_then(|s| parse_color(s).ok())
            .unwrap_or(config.label_color);
        let angle = args
            .get(ANGLE)
            .and_then(|s| ConfigValue::number(s).ok())
            .unwrap_or(0.0);
        Self {
            text: args.get(LABEL).cloned(),
            attribute: args.get(ATTRIBUTE).cloned(),
            color,
            angle,
            background: args.get(BACKGROUND).map(|s| ConfigValue::flag(s)).unwrap_or(false),
            bg_color: args
                .get(BGCOLOR)
                .and_then(|s| parse_color(s).ok())
                .unwrap_or(Color::from_rgba8(255, 255, 255, 125)),
            drop_shadow: args.get(DROPSHADOW).map(|s| ConfigValue::flag(s)).unwrap_or(false),
            outline: args.get(OUTLINE).map(|s| ConfigValue::flag(s)).unwrap_or(false),
            outline_color: args
                .get(OUTLINECOLOR)
                .and_then(|s| parse_color(s).ok())
                .unwrap_or(css::BLACK),
            outline_width: args
                .get(OUTLINEWIDTH)
                .and_then(|s| ConfigValue::number(s).ok())
                .unwrap_or(1.0),
            config,
        }
    }

    /// Generates the label layers positioned against the node box.
    ///
    /// Fails closed: a missing label is logged and yields no layers.
    pub fn layers(&self, node_box: Rect, source: &dyn DataSource) -> Vec<Layer> {
        match self.build(node_box, source) {
            Ok(layers) => layers,
            Err(e) => {
                error!("label: {e}");
                Vec::new()
            }
        }
    }

    fn build(&self, node_box: Rect, source: &dyn DataSource) -> Result<Vec<Layer>, ChartError> {
        let text = match (&self.text, &self.attribute) {
            (Some(text), _) => text.clone(),
            (None, Some(attr)) => source.label(attr).ok_or(ChartError::EmptySeries)?,
            (None, None) => return Err(ChartError::EmptySeries),
        };

        let measurer = HeuristicTextMeasurer;
        let block = TextBlock::new(&text, self.config.label_size)
            .with_max_width(self.config.label_width)
            .with_line_spacing(self.config.label_spacing);
        let (lines, size) = block.layout(&measurer);
        let pad = size.height * 0.3;
        let padded = Size::new(size.width + pad * 2.0, size.height + pad * 2.0);

        let position = match self.config.position {
            Some(PositionSpec::Compass(compass)) => compass,
            _ => Anchor::Center,
        };
        let grip = self.config.anchor.unwrap_or(Anchor::Center);
        let mut origin = anchor_point(node_box, padded, position, grip) + Vec2::new(pad, pad);
        if let Some(PositionSpec::Offset(v)) = self.config.position {
            origin += v;
        }
        if let Some(offset) = self.config.label_offset {
            origin += offset;
        }

        let text_bounds = Rect::from_origin_size(origin, size);
        let backdrop = RoundedRect::from_rect(text_bounds.inflate(pad, pad), pad);

        let mut layers = Vec::new();
        if self.drop_shadow {
            let shadow = backdrop + Vec2::new(pad / 2.0, pad / 2.0);
            layers.push(Layer::filled(
                shadow.to_path(0.1),
                Color::from_rgba8(0, 0, 0, 64),
            ));
        }
        if self.background {
            layers.push(Layer::filled(backdrop.to_path(0.1), self.bg_color));
        }

        let mut label = Layer {
            shape: None,
            text: Some(TextSpan {
                text: lines.join("\n"),
                origin,
                font_size: self.config.label_size,
                angle: self.angle,
            }),
            fill: Some(Paint::Solid(self.color)),
            stroke: None,
            bounds: text_bounds,
        };
        if self.outline {
            // Same ratio the glyph renderer uses for outline strokes.
            let width = self.outline_width * self.config.label_size / 20.0;
            label = label.with_stroke(StrokeStyle::solid(self.outline_color, width));
        }
        layers.push(label);
        Ok(layers)
    }
}

#[cfg(test)]
mod tests {
    use crate::chart::NoData;
    use crate::value::Series;

    use super::*;

    struct Attrs;

    impl DataSource for Attrs {
        fn values(&self, _attributes: &[String]) -> Option<Series> {
            None
        }

        fn label(&self, attribute: &str) -> Option<String> {
            (attribute == "name").then(|| "midpoint".to_string())
        }
    }

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn node() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn literal_label_centers_on_the_node() {
        let spec = LabelSpec::from_map(&map(&[("label", "hub")]));
        let layers = spec.layers(node(), &NoData);
        assert_eq!(layers.len(), 1);
        let c = layers[0].bounds.center();
        assert!((c.x - 50.0).abs() < 1.0);
        assert!((c.y - 50.0).abs() < 1.0);
    }

    #[test]
    fn attribute_label_reads_the_data_source() {
        let spec = LabelSpec::from_map(&map(&[("attribute", "name")]));
        let layers = spec.layers(node(), &Attrs);
        assert_eq!(layers[0].text.as_ref().map(|t| t.text.as_str()), Some("midpoint"));
    }

    #[test]
    fn missing_label_fails_closed() {
        let spec = LabelSpec::from_map(&map(&[("attribute", "absent")]));
        assert!(spec.layers(node(), &Attrs).is_empty());
        let spec = LabelSpec::from_map(&map(&[]));
        assert!(spec.layers(node(), &NoData).is_empty());
    }

    #[test]
    fn background_and_shadow_layers_stack_under_the_text() {
        let spec = LabelSpec::from_map(&map(&[
            ("label", "hub"),
            ("background", "true"),
            ("dropshadow", "true"),
            ("bgcolor", "yellow"),
        ]));
        let layers = spec.layers(node(), &NoData);
        assert_eq!(layers.len(), 3);
        assert!(layers[0].text.is_none(), "shadow first");
        assert!(layers[1].text.is_none(), "background second");
        assert!(layers[2].text.is_some(), "text last");
    }

    #[test]
    fn outline_strokes_the_glyphs() {
        let spec = LabelSpec::from_map(&map(&[
            ("label", "hub"),
            ("outline", "true"),
            ("outlinecolor", "red"),
            ("labelsize", "20"),
        ]));
        let layers = spec.layers(node(), &NoData);
        let stroke = layers[0].stroke.as_ref().unwrap();
        assert_eq!(stroke.stroke_width, 1.0);
    }

    #[test]
    fn position_moves_the_label() {
        let spec = LabelSpec::from_map(&map(&[("label", "hub"), ("position", "north")]));
        let layers = spec.layers(node(), &NoData);
        assert!(layers[0].bounds.center().y < 10.0);
    }
}
