// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear and radial gradient fills over the node box.
//!
//! Control geometry is given in unit coordinates relative to the box,
//! so `start=0,0 end=1,0` is a left-to-right sweep whatever the node
//! size. Stops use the `r,g,b[,a],fraction|...` list syntax or a named
//! palette spread evenly.

use hashbrown::HashMap;
use kurbo::{Point, Rect, Shape};
use log::error;
use peniko::Color;
use smallvec::smallvec;

use nodemark_core::{GradientStops, Layer, Paint};

use crate::chart::{ARC_BOX, node_transform};
use crate::color::named_gradient;
use crate::config::{CENTER, ChartConfig, ConfigValue, END, RADIUS, START, STOPLIST};
use crate::error::ChartError;

/// Default stop list: white fading to translucent grey.
fn default_stops() -> GradientStops {
    smallvec![
        (0.0, Color::from_rgba8(255, 255, 255, 255)),
        (1.0, Color::from_rgba8(100, 100, 100, 100)),
    ]
}

/// Resolves a stop list: a named palette spread evenly, or the literal
/// `r,g,b[,a],fraction|...` syntax.
pub(crate) fn stops_from_spec(text: &str) -> Result<GradientStops, ChartError> {
    if let Some(palette) = named_gradient(text) {
        let last = (palette.len() - 1).max(1) as f32;
        return Ok(palette
            .iter()
            .enumerate()
            .map(|(i, c)| (i as f32 / last, *c))
            .collect());
    }
    parse_stops(text)
}

/// Parses a `r,g,b[,a],fraction|...` stop list.
pub(crate) fn parse_stops(text: &str) -> Result<GradientStops, ChartError> {
    let mut stops = GradientStops::new();
    for entry in text.split('|') {
        let parts: Vec<&str> = entry.split(',').map(str::trim).collect();
        let (color, fraction) = match parts.as_slice() {
            [r, g, b, frac] => (parse_channels(r, g, b, "255")?, frac),
            [r, g, b, a, frac] => (parse_channels(r, g, b, a)?, frac),
            _ => return Err(ChartError::BadColor(entry.to_string())),
        };
        let fraction = fraction
            .parse::<f32>()
            .map_err(|_| ChartError::BadNumber((*fraction).to_string()))?;
        stops.push((fraction, color));
    }
    stops.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(stops)
}

fn parse_channels(r: &str, g: &str, b: &str, a: &str) -> Result<Color, ChartError> {
    let chan = |s: &str| {
        s.parse::<u8>()
            .map_err(|_| ChartError::BadColor(s.to_string()))
    };
    Ok(Color::from_rgba8(chan(r)?, chan(g)?, chan(b)?, chan(a)?))
}

/// A linear gradient filling the node box.
#[derive(Clone, Debug)]
pub struct LinearGradientSpec {
    /// Shared settings.
    pub config: ChartConfig,
    /// Gradient start, unit coordinates.
    pub start: Point,
    /// Gradient end, unit coordinates.
    pub end: Point,
    /// Color stops, or `None` for the default white-to-grey ramp.
    pub stops: Option<GradientStops>,
    /// Set when the stop list failed to parse.
    bad_stops: bool,
}

impl LinearGradientSpec {
    /// Builds the spec from the configuration map.
    pub fn from_map(args: &HashMap<String, String>) -> Self {
        let config = ChartConfig::from_map(args);
        let start = args
            .get(START)
            .and_then(|s| ConfigValue::point(s).ok())
            .unwrap_or(Point::new(0.0, 0.0));
        let end = args
            .get(END)
            .and_then(|s| ConfigValue::point(s).ok())
            .unwrap_or(Point::new(1.0, 0.0));
        let (stops, bad_stops) = match args.get(STOPLIST).map(|s| stops_from_spec(s)) {
            Some(Ok(stops)) => (Some(stops), false),
            Some(Err(e)) => {
                error!("lingrad: {e}");
                (None, true)
            }
            None => (None, false),
        };
        Self {
            config,
            start,
            end,
            stops,
            bad_stops,
        }
    }

    /// Generates the gradient layer fitted to the node box.
    ///
    /// Fails closed: a bad stop list yields no layers.
    pub fn layers(&self, node_box: Rect) -> Vec<Layer> {
        if self.bad_stops {
            return Vec::new();
        }
        let paint = Paint::Linear {
            start: self.start,
            end: self.end,
            stops: self.stops.clone().unwrap_or_else(default_stops),
        };
        let reference = ARC_BOX.scale_from_origin(self.config.scale);
        let layer = Layer::filled(reference.to_path(0.1), paint);
        let t = node_transform(ARC_BOX, node_box, &self.config);
        vec![layer.transform(t)]
    }
}

/// A radial gradient filling the node box.
#[derive(Clone, Debug)]
pub struct RadialGradientSpec {
    /// Shared settings.
    pub config: ChartConfig,
    /// Gradient center, unit coordinates.
    pub center: Point,
    /// Radius as a fraction of the smaller box side.
    pub radius: f64,
    /// Color stops, or `None` for the default white-to-grey ramp.
    pub stops: Option<GradientStops>,
    /// Set when the stop list failed to parse.
    bad_stops: bool,
}

impl RadialGradientSpec {
    /// Builds the spec from the configuration map.
    pub fn from_map(args: &HashMap<String, String>) -> Self {
        let config = ChartConfig::from_map(args);
        let center = args
            .get(CENTER)
            .and_then(|s| ConfigValue::point(s).ok())
            .unwrap_or(Point::new(0.5, 0.5));
        let radius = args
            .get(RADIUS)
            .and_then(|s| ConfigValue::number(s).ok())
            .unwrap_or(1.0);
        let (stops, bad_stops) = match args.get(STOPLIST).map(|s| stops_from_spec(s)) {
            Some(Ok(stops)) => (Some(stops), false),
            Some(Err(e)) => {
                error!("radgrad: {e}");
                (None, true)
            }
            None => (None, false),
        };
        Self {
            config,
            center,
            radius,
            stops,
            bad_stops,
        }
    }

    /// Generates the gradient layer fitted to the node box.
    ///
    /// Fails closed: a bad stop list yields no layers.
    pub fn layers(&self, node_box: Rect) -> Vec<Layer> {
        if self.bad_stops {
            return Vec::new();
        }
        let paint = Paint::Radial {
            center: self.center,
            radius: self.radius,
            stops: self.stops.clone().unwrap_or_else(default_stops),
        };
        let reference = ARC_BOX.scale_from_origin(self.config.scale);
        let layer = Layer::filled(reference.to_path(0.1), paint);
        let t = node_transform(ARC_BOX, node_box, &self.config);
        vec![layer.transform(t)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn stop_list_parses_rgb_and_rgba_entries() {
        let stops = parse_stops("255,0,0,0.0|0,0,255,128,1.0").unwrap();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].1, Color::from_rgba8(255, 0, 0, 255));
        assert_eq!(stops[1].1, Color::from_rgba8(0, 0, 255, 128));
        assert_eq!(stops[1].0, 1.0);
    }

    #[test]
    fn named_palette_spreads_stops_evenly() {
        let stops = stops_from_spec("yellowblackcyan").unwrap();
        assert_eq!(stops.len(), 3);
        assert_eq!(stops[0].0, 0.0);
        assert_eq!(stops[1].0, 0.5);
        assert_eq!(stops[2].0, 1.0);
    }

    #[test]
    fn stops_are_sorted_by_fraction() {
        let stops = parse_stops("0,0,0,1.0|255,255,255,0.0").unwrap();
        assert!(stops[0].0 < stops[1].0);
    }

    #[test]
    fn defaults_cover_the_box_left_to_right() {
        let spec = LinearGradientSpec::from_map(&map(&[]));
        assert_eq!(spec.start, Point::new(0.0, 0.0));
        assert_eq!(spec.end, Point::new(1.0, 0.0));
        let layers = spec.layers(Rect::new(0.0, 0.0, 80.0, 40.0));
        assert_eq!(layers.len(), 1);
        let b = layers[0].bounds;
        assert!((b.width() - 80.0).abs() < 1e-9);
        assert!((b.height() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn radial_defaults_center_the_gradient() {
        let spec = RadialGradientSpec::from_map(&map(&[]));
        assert_eq!(spec.center, Point::new(0.5, 0.5));
        assert_eq!(spec.radius, 1.0);
    }

    #[test]
    fn bad_stop_list_fails_closed() {
        let spec = LinearGradientSpec::from_map(&map(&[("stoplist", "mauve|teal")]));
        assert!(spec.layers(Rect::new(0.0, 0.0, 80.0, 40.0)).is_empty());
    }
}
