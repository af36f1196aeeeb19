// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart dispatch and shared placement machinery.
//!
//! Every generator builds its layers in a fixed reference box centered on
//! the origin and the result is re-projected onto the node's bounding box.
//! Keeping the reference frame origin-centered means scale and position
//! adjustments compose as plain affine maps.

use hashbrown::HashMap;
use kurbo::{Affine, Rect};

use nodemark_core::{Anchor, Layer, fit_box};

use crate::bar::BarChartSpec;
use crate::circos::CircosChartSpec;
use crate::config::{ChartConfig, PositionSpec};
use crate::error::ChartError;
use crate::gradient::{LinearGradientSpec, RadialGradientSpec};
use crate::heatstrip::HeatStripSpec;
use crate::label::LabelSpec;
use crate::line::LineChartSpec;
use crate::pie::PieChartSpec;
use crate::stripe::StripeChartSpec;
use crate::value::Series;

/// Reference box for radial charts (pie, circos, radial gradient).
pub const ARC_BOX: Rect = Rect::new(-50.0, -50.0, 50.0, 50.0);

/// Reference box for slot charts (bar, heat-strip, line, stripe, linear
/// gradient).
pub const SLOT_BOX: Rect = Rect::new(-50.0, -25.0, 50.0, 25.0);

/// Supplies attribute-driven values and labels for a single node.
///
/// Charts first look at literal `valuelist`/`labellist` entries and fall
/// back to the data source for `attributelist` names.
pub trait DataSource {
    /// The value series for the named attributes, one entry per attribute.
    fn values(&self, attributes: &[String]) -> Option<Series>;

    /// A display string for a single attribute.
    fn label(&self, attribute: &str) -> Option<String>;
}

/// A data source with no attributes. Literal lists still work.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoData;

impl DataSource for NoData {
    fn values(&self, _attributes: &[String]) -> Option<Series> {
        None
    }

    fn label(&self, _attribute: &str) -> Option<String> {
        None
    }
}

/// Explicit labels and colors must agree with the value count.
///
/// An absent or empty label list counts as matching.
pub(crate) fn check_cardinality(
    labels: Option<&[String]>,
    values: usize,
    colors: usize,
) -> Result<(), ChartError> {
    let labels_len = labels
        .filter(|l| !l.is_empty())
        .map_or(values, <[String]>::len);
    if labels_len != values || colors != values {
        return Err(ChartError::Cardinality {
            labels: labels_len,
            values,
            colors,
        });
    }
    Ok(())
}

/// Literal values win over attribute lookup.
pub(crate) fn resolve_series(
    literal: Option<&Series>,
    attributes: &[String],
    source: &dyn DataSource,
) -> Option<Series> {
    if let Some(values) = literal {
        return Some(values.clone());
    }
    if attributes.is_empty() {
        return None;
    }
    source.values(attributes)
}

/// The affine that carries reference-box layers onto the node box.
///
/// Without a position the reference box maps exactly onto the node box.
/// A compass position slides the chart so its anchor grip lands on that
/// compass point of the box; a literal position is a plain offset.
pub(crate) fn node_transform(reference: Rect, node_box: Rect, config: &ChartConfig) -> Affine {
    let base = fit_box(reference, node_box);
    let Some(position) = config.position else {
        return base;
    };
    let delta = match position {
        PositionSpec::Compass(compass) => {
            let grip = config.anchor.unwrap_or(Anchor::Center).point_of(node_box);
            compass.point_of(node_box) - grip
        }
        PositionSpec::Offset(v) => v,
    };
    Affine::translate(delta) * base
}

/// A parsed chart of any kind.
///
/// The wrapping enum is the external entry point: parse once from the
/// identifier and argument map, then generate layers per node.
#[derive(Clone, Debug)]
pub enum Chart {
    /// Pie chart.
    Pie(PieChartSpec),
    /// Bar chart.
    Bar(BarChartSpec),
    /// Heat-strip chart.
    HeatStrip(HeatStripSpec),
    /// Concentric circos rings.
    Circos(CircosChartSpec),
    /// Line chart.
    Line(LineChartSpec),
    /// Equal-width color stripes.
    Stripe(StripeChartSpec),
    /// Linear gradient fill.
    LinearGradient(LinearGradientSpec),
    /// Radial gradient fill.
    RadialGradient(RadialGradientSpec),
    /// Standalone text label.
    Label(LabelSpec),
}

impl Chart {
    /// Parses a chart from its identifier and argument map.
    ///
    /// Returns `None` for unknown identifiers.
    pub fn from_identifier(identifier: &str, args: &HashMap<String, String>) -> Option<Self> {
        match identifier.trim().to_ascii_lowercase().as_str() {
            "pie" | "piechart" => Some(Self::Pie(PieChartSpec::from_map(args))),
            "bar" | "barchart" => Some(Self::Bar(BarChartSpec::from_map(args))),
            "heatstrip" | "heatstripchart" => Some(Self::HeatStrip(HeatStripSpec::from_map(args))),
            "circos" | "circoschart" => Some(Self::Circos(CircosChartSpec::from_map(args))),
            "line" | "linechart" => Some(Self::Line(LineChartSpec::from_map(args))),
            "stripe" | "stripechart" => Some(Self::Stripe(StripeChartSpec::from_map(args))),
            "lingrad" => Some(Self::LinearGradient(LinearGradientSpec::from_map(args))),
            "radgrad" => Some(Self::RadialGradient(RadialGradientSpec::from_map(args))),
            "label" => Some(Self::Label(LabelSpec::from_map(args))),
            _ => None,
        }
    }

    /// The canonical identifier, round-trippable through
    /// [`Self::from_identifier`].
    pub fn identifier(&self) -> &'static str {
        match self {
            Self::Pie(_) => "pie",
            Self::Bar(_) => "bar",
            Self::HeatStrip(_) => "heatstrip",
            Self::Circos(_) => "circos",
            Self::Line(_) => "line",
            Self::Stripe(_) => "stripe",
            Self::LinearGradient(_) => "lingrad",
            Self::RadialGradient(_) => "radgrad",
            Self::Label(_) => "label",
        }
    }

    /// Human-readable chart name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pie(_) => "Pie Chart",
            Self::Bar(_) => "Bar Chart",
            Self::HeatStrip(_) => "Heat Strip Chart",
            Self::Circos(_) => "Circos Chart",
            Self::Line(_) => "Line Chart",
            Self::Stripe(_) => "Stripe Chart",
            Self::LinearGradient(_) => "Linear Gradient",
            Self::RadialGradient(_) => "Radial Gradient",
            Self::Label(_) => "Label",
        }
    }

    /// Generates the chart's layers fitted to the node box.
    pub fn layers(&self, node_box: Rect, source: &dyn DataSource) -> Vec<Layer> {
        match self {
            Self::Pie(spec) => spec.layers(node_box, source),
            Self::Bar(spec) => spec.layers(node_box, source),
            Self::HeatStrip(spec) => spec.layers(node_box, source),
            Self::Circos(spec) => spec.layers(node_box, source),
            Self::Line(spec) => spec.layers(node_box, source),
            Self::Stripe(spec) => spec.layers(node_box, source),
            Self::LinearGradient(spec) => spec.layers(node_box),
            Self::RadialGradient(spec) => spec.layers(node_box),
            Self::Label(spec) => spec.layers(node_box, source),
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn identifier_round_trips() {
        let args = map(&[("valuelist", "1,2,3")]);
        for name in [
            "pie", "bar", "heatstrip", "circos", "line", "stripe", "lingrad", "radgrad", "label",
        ] {
            let chart = Chart::from_identifier(name, &args).unwrap();
            assert_eq!(chart.identifier(), name);
            assert!(Chart::from_identifier(chart.identifier(), &args).is_some());
        }
        assert!(Chart::from_identifier("sparkline", &args).is_none());
    }

    #[test]
    fn default_transform_maps_reference_onto_node_box() {
        let config = ChartConfig::default();
        let t = node_transform(ARC_BOX, Rect::new(10.0, 10.0, 30.0, 30.0), &config);
        let p = t * Point::new(0.0, 0.0);
        assert!((p - Point::new(20.0, 20.0)).hypot() < 1e-9);
    }

    #[test]
    fn compass_position_slides_the_chart() {
        let config = ChartConfig {
            position: Some(PositionSpec::Compass(Anchor::North)),
            ..ChartConfig::default()
        };
        let node = Rect::new(0.0, 0.0, 100.0, 100.0);
        let t = node_transform(ARC_BOX, node, &config);
        let center = t * Point::new(0.0, 0.0);
        assert!((center - Point::new(50.0, 0.0)).hypot() < 1e-9);
    }

    #[test]
    fn offset_position_is_a_plain_translation() {
        let config = ChartConfig {
            position: Some(PositionSpec::Offset(kurbo::Vec2::new(5.0, -3.0))),
            ..ChartConfig::default()
        };
        let node = Rect::new(0.0, 0.0, 100.0, 100.0);
        let t = node_transform(ARC_BOX, node, &config);
        let center = t * Point::new(0.0, 0.0);
        assert!((center - Point::new(55.0, 47.0)).hypot() < 1e-9);
    }
}
