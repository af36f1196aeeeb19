// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line chart generation: one stroked segment per adjacent value pair.

use hashbrown::HashMap;
use kurbo::{BezPath, Point, Rect};
use log::error;

use nodemark_core::{Layer, StrokeStyle};

use crate::chart::{DataSource, SLOT_BOX, check_cardinality, node_transform, resolve_series};
use crate::color::resolve_colors;
use crate::config::{ATTRIBUTELIST, COLORS, ChartConfig, ConfigValue, LINEWIDTH, VALUES};
use crate::error::ChartError;
use crate::value::{Series, normalize, parse_series};

/// A polyline over the slot box, colored per segment.
#[derive(Clone, Debug)]
pub struct LineChartSpec {
    /// Shared settings.
    pub config: ChartConfig,
    /// Literal values, if supplied inline.
    pub values: Option<Series>,
    /// Attribute names resolved through the data source.
    pub attributes: Vec<String>,
    /// Raw color specification.
    pub color_spec: Option<String>,
    /// Stroke width of the line.
    pub line_width: f64,
}

impl LineChartSpec {
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
        let attributes = args
            .get(ATTRIBUTELIST)
            .map(|s| ConfigValue::list(s))
            .unwrap_or_default();
        let line_width = args
            .get(LINEWIDTH)
            .and_then(|s| ConfigValue::number(s).ok())
            .unwrap_or(1.5);
        Self {
            config,
            values,
            attributes,
            color_spec: args.get(COLORS).cloned(),
            line_width,
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
                error!("linechart: {e}");
                Vec::new()
            }
        }
    }

    pub(crate) fn build(&self, source: &dyn DataSource) -> Result<Vec<Layer>, ChartError> {
        let raw = resolve_series(self.values.as_ref(), &self.attributes, source)
            .ok_or(ChartError::EmptySeries)?;
        if raw.len() < 2 {
            return Err(ChartError::EmptySeries);
        }
        let normalized = self.config.range.is_some();
        let values = normalize(&raw, self.config.range);
        let colors =
            resolve_colors(self.color_spec.as_deref(), &values, self.config.range, normalized)?;
        check_cardinality(None, values.len(), colors.len())?;

        let (min, max) = values
            .iter()
            .filter_map(|v| *v)
            .filter(|v| !v.is_nan())
            .fold((0.000_001_f64, -0.000_001_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

        let x = SLOT_BOX.x0 * self.config.scale;
        let y = SLOT_BOX.y0 * self.config.scale;
        let width = SLOT_BOX.width() * self.config.scale;
        let height = SLOT_BOX.height() * self.config.scale;

        let point_size = width / (values.len() - 1) as f64;
        let divisor = if max > min { (max - min) / (height - 1.0) } else { 1.0 };
        let project = |i: usize, v: f64| {
            Point::new(
                x + i as f64 * point_size,
                y + (height - (v - min) / divisor),
            )
        };

        let mut layers = Vec::new();
        for i in 0..values.len() - 1 {
            let (Some(v1), Some(v2)) = (values[i], values[i + 1]) else { continue };
            if v1.is_nan() || v2.is_nan() {
                continue;
            }
            let mut path = BezPath::new();
            path.move_to(project(i, v1));
            path.line_to(project(i + 1, v2));
            layers.push(Layer::stroked(
                path,
                StrokeStyle::solid(colors[i], self.line_width),
            ));
        }
        if layers.is_empty() {
            return Err(ChartError::EmptySeries);
        }
        Ok(layers)
    }
}
