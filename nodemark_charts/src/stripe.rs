// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stripe chart generation: equal-width vertical color bands.

use hashbrown::HashMap;
use kurbo::{Rect, Shape};
use log::error;
use peniko::Color;
use peniko::color::palette::css;

use nodemark_core::{Layer, StrokeStyle};

use crate::chart::{DataSource, SLOT_BOX, node_transform};
use crate::color::parse_color_list;
use crate::config::{COLORS, ChartConfig};
use crate::error::ChartError;

/// Hairline outline around each stripe.
const OUTLINE_WIDTH: f64 = 0.1;

/// A stripe chart. The color list alone determines the stripe count.
#[derive(Clone, Debug)]
pub struct StripeChartSpec {
    /// Shared settings.
    pub config: ChartConfig,
    /// Raw color specification.
    pub color_spec: Option<String>,
}

impl StripeChartSpec {
    /// Builds the spec from the configuration map.
    pub fn from_map(args: &HashMap<String, String>) -> Self {
        Self {
            config: ChartConfig::from_map(args),
            color_spec: args.get(COLORS).cloned(),
        }
    }

    /// Generates the chart's layers fitted to the node box.
    ///
    /// Fails closed: any error is logged and yields no layers.
    pub fn layers(&self, node_box: Rect, _source: &dyn DataSource) -> Vec<Layer> {
        match self.build() {
            Ok(layers) => {
                let t = node_transform(SLOT_BOX, node_box, &self.config);
                layers.iter().map(|l| l.transform(t)).collect()
            }
            Err(e) => {
                error!("stripechart: {e}");
                Vec::new()
            }
        }
    }

    pub(crate) fn build(&self) -> Result<Vec<Layer>, ChartError> {
        let spec = self
            .color_spec
            .as_deref()
            .ok_or_else(|| ChartError::BadColor(String::new()))?;
        let tokens: Vec<&str> = spec.split(',').collect();
        let colors = parse_color_list(&tokens)?;
        if colors.is_empty() {
            return Err(ChartError::BadColor(spec.to_string()));
        }
        Ok(Self::stripes(&colors, self.config.scale))
    }

    fn stripes(colors: &[Color], scale: f64) -> Vec<Layer> {
        let n = colors.len() as f64;
        let x = SLOT_BOX.x0 * scale;
        let y = SLOT_BOX.y0 * scale;
        let width = SLOT_BOX.width() * scale;
        let height = SLOT_BOX.height() * scale;
        let stripe_width = width / n;
        colors
            .iter()
            .enumerate()
            .map(|(i, color)| {
                let x0 = x + i as f64 * stripe_width;
                let rect = Rect::new(x0, y, x0 + stripe_width, y + height);
                Layer::filled(rect.to_path(0.1), *color)
                    .with_stroke(StrokeStyle::solid(css::BLACK, OUTLINE_WIDTH))
            })
            .collect()
    }
}
