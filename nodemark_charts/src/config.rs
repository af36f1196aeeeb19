// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart configuration parsed from the external key/value map.
//!
//! The tokenizer that produces the map is upstream; this module turns the
//! string values into typed [`ConfigValue`]s and the shared [`ChartConfig`]
//! settings. Individual keys that fail to parse log a warning and keep
//! their default, so one bad token never disables the whole chart.

use hashbrown::HashMap;
use kurbo::{Point, Vec2};
use log::warn;
use peniko::Color;
use peniko::color::palette::css;

use nodemark_core::Anchor;

use crate::color::parse_color;
use crate::error::ChartError;

/// A typed configuration value.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    /// A numeric scalar.
    Number(f64),
    /// A bare string.
    Text(String),
    /// A comma-separated list.
    List(Vec<String>),
    /// An `x,y` pair.
    Point(Point),
    /// A hex or named color.
    Color(Color),
    /// A boolean flag.
    Flag(bool),
}

impl ConfigValue {
    /// Parses a numeric scalar.
    pub fn number(s: &str) -> Result<f64, ChartError> {
        s.trim()
            .parse::<f64>()
            .map_err(|_| ChartError::BadNumber(s.to_string()))
    }

    /// Parses an `x,y` pair.
    pub fn point(s: &str) -> Result<Point, ChartError> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err(ChartError::BadNumber(s.to_string()));
        }
        Ok(Point::new(Self::number(parts[0])?, Self::number(parts[1])?))
    }

    /// Parses a boolean flag (`true`/`false`, `yes`/`no`).
    pub fn flag(s: &str) -> bool {
        matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1")
    }

    /// Splits a comma-separated list into trimmed tokens.
    pub fn list(s: &str) -> Vec<String> {
        s.split(',').map(|t| t.trim().to_string()).collect()
    }
}

/// Where a chart or label sits relative to the node box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PositionSpec {
    /// A compass keyword resolved against the node box.
    Compass(Anchor),
    /// A literal pixel offset.
    Offset(Vec2),
}

/// Settings shared by every chart instance.
///
/// Parsed once from the configuration map and immutable afterwards; the
/// per-render values and colors are computed as call-local data.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
    /// Explicit value range, or `None` when normalization is disabled.
    pub range: Option<(f64, f64)>,
    /// Baseline fraction for slot charts: 0 = top, 0.5 = middle, 1 = bottom.
    pub ybase: f64,
    /// Uniform scale applied to the reference box.
    pub scale: f64,
    /// Outline stroke width for data shapes.
    pub border_width: f64,
    /// Outline stroke color for data shapes.
    pub border_color: Color,
    /// Label text color.
    pub label_color: Color,
    /// Label font size.
    pub label_size: f64,
    /// Maximum label width before wrapping.
    pub label_width: f64,
    /// Label line spacing multiplier.
    pub label_spacing: f64,
    /// Whether labels are drawn at all.
    pub show_labels: bool,
    /// Chart position relative to the node box.
    pub position: Option<PositionSpec>,
    /// Which part of the chart anchors at the position.
    pub anchor: Option<Anchor>,
    /// Extra pixel offset applied to labels.
    pub label_offset: Option<Vec2>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            range: None,
            ybase: 0.5,
            scale: 1.0,
            border_width: 0.1,
            border_color: css::BLACK,
            label_color: css::BLACK,
            label_size: 8.0,
            label_width: 25.0,
            label_spacing: 1.0,
            show_labels: true,
            position: None,
            anchor: None,
            label_offset: None,
        }
    }
}

// Shared configuration keys.
pub(crate) const ANCHOR: &str = "anchor";
pub(crate) const ARCDIRECTION: &str = "arcdirection";
pub(crate) const ARCSTART: &str = "arcstart";
pub(crate) const ARCWIDTH: &str = "arcwidth";
pub(crate) const ATTRIBUTELIST: &str = "attributelist";
pub(crate) const BORDERCOLOR: &str = "bordercolor";
pub(crate) const BORDERWIDTH: &str = "borderwidth";
pub(crate) const CENTER: &str = "center";
pub(crate) const CIRCLELABELS: &str = "circlelabels";
pub(crate) const COLORS: &str = "colorlist";
pub(crate) const END: &str = "end";
pub(crate) const FIRSTARC: &str = "firstarc";
pub(crate) const FIRSTARCWIDTH: &str = "firstarcwidth";
pub(crate) const LABELCIRCLES: &str = "labelcircles";
pub(crate) const LABELCOLOR: &str = "labelcolor";
pub(crate) const LABELOFFSET: &str = "labeloffset";
pub(crate) const LABELSIZE: &str = "labelsize";
pub(crate) const LABELSPACING: &str = "labelspacing";
pub(crate) const LABELWIDTH: &str = "labelwidth";
pub(crate) const LABELS: &str = "labellist";
pub(crate) const LINEWIDTH: &str = "linewidth";
pub(crate) const MINIMUMSLICE: &str = "minimumslice";
pub(crate) const OUTLINEWIDTH: &str = "outlinewidth";
pub(crate) const POSITION: &str = "position";
pub(crate) const RADIUS: &str = "radius";
pub(crate) const RANGE: &str = "range";
pub(crate) const SCALE: &str = "scale";
pub(crate) const SEPARATION: &str = "separation";
pub(crate) const SHOWLABELS: &str = "showlabels";
pub(crate) const SHOWYAXIS: &str = "showyaxis";
pub(crate) const SORTSLICES: &str = "sortslices";
pub(crate) const START: &str = "start";
pub(crate) const STOPLIST: &str = "stoplist";
pub(crate) const VALUES: &str = "valuelist";
pub(crate) const YBASE: &str = "ybase";

impl ChartConfig {
    /// Builds the shared settings from the configuration map.
    pub fn from_map(args: &HashMap<String, String>) -> Self {
        let mut cfg = Self::default();

        if let Some(range) = args.get(RANGE) {
            let parts: Vec<&str> = range.split(',').collect();
            let parsed = if parts.len() == 2 {
                ConfigValue::number(parts[0])
                    .and_then(|lo| ConfigValue::number(parts[1]).map(|hi| (lo, hi)))
                    .ok()
            } else {
                None
            };
            match parsed {
                Some((lo, hi)) if lo != 0.0 || hi != 0.0 => cfg.range = Some((lo, hi)),
                _ => warn!("Unable to parse min/max values from '{range}'"),
            }
        }

        if let Some(bw) = args.get(BORDERWIDTH) {
            match ConfigValue::number(bw) {
                Ok(v) => cfg.border_width = v,
                Err(_) => warn!("Unable to parse border width from '{bw}'"),
            }
        }

        if let Some(bc) = args.get(BORDERCOLOR) {
            match parse_color(bc) {
                Ok(c) => cfg.border_color = c,
                Err(e) => warn!("{e}"),
            }
        }

        if let Some(lc) = args.get(LABELCOLOR) {
            match parse_color(lc) {
                Ok(c) => cfg.label_color = c,
                Err(e) => warn!("{e}"),
            }
        }

        if let Some(ls) = args.get(LABELSIZE) {
            match ConfigValue::number(ls) {
                Ok(v) => cfg.label_size = v,
                Err(_) => warn!("Cannot parse {LABELSIZE} from input '{ls}'"),
            }
        }

        if let Some(lw) = args.get(LABELWIDTH) {
            match ConfigValue::number(lw) {
                Ok(v) => cfg.label_width = v,
                Err(_) => warn!("Cannot parse {LABELWIDTH} from input '{lw}'"),
            }
        }

        if let Some(ls) = args.get(LABELSPACING) {
            match ConfigValue::number(ls) {
                Ok(v) => cfg.label_spacing = v,
                Err(_) => warn!("Cannot parse {LABELSPACING} from input '{ls}'"),
            }
        }

        if let Some(show) = args.get(SHOWLABELS) {
            cfg.show_labels = ConfigValue::flag(show);
        }

        if let Some(scale) = args.get(SCALE) {
            match ConfigValue::number(scale) {
                Ok(v) => cfg.scale = v,
                Err(_) => warn!("Cannot parse {SCALE} from input '{scale}'"),
            }
        }

        if let Some(pos) = args.get(POSITION) {
            if let Ok(compass) = pos.trim().parse::<Anchor>() {
                cfg.position = Some(PositionSpec::Compass(compass));
            } else if let Ok(p) = ConfigValue::point(pos) {
                cfg.position = Some(PositionSpec::Offset(p.to_vec2()));
            } else {
                warn!("Cannot parse {POSITION} from input '{pos}'");
            }
        }

        if let Some(offset) = args.get(LABELOFFSET) {
            match ConfigValue::point(offset) {
                Ok(p) => cfg.label_offset = Some(p.to_vec2()),
                Err(_) => warn!("Cannot parse {LABELOFFSET} from input '{offset}'"),
            }
        }

        if let Some(anchor) = args.get(ANCHOR) {
            match anchor.trim().parse::<Anchor>() {
                Ok(a) => cfg.anchor = Some(a),
                Err(()) => warn!("Cannot parse {ANCHOR} from input '{anchor}'"),
            }
        }

        if let Some(yb) = args.get(YBASE) {
            cfg.ybase = match yb.trim().to_ascii_lowercase().as_str() {
                "bottom" => 1.0,
                "top" => 0.0,
                "middle" => 0.5,
                other => match ConfigValue::number(other) {
                    Ok(v) => v.clamp(0.0, 1.0),
                    Err(_) => {
                        warn!("Cannot parse {YBASE} from input '{yb}'");
                        0.5
                    }
                },
            };
        }

        cfg
    }

    /// Applies the radial-chart default scale when none was configured.
    ///
    /// Pie and circos charts leave a margin for slice outlines by default;
    /// slot charts fill their box.
    pub(crate) fn with_radial_default_scale(mut self, args: &HashMap<String, String>) -> Self {
        if !args.contains_key(SCALE) {
            self.scale = 0.9;
        }
        self
    }

    /// Comma-separated labels from the map, honoring `showlabels`.
    pub(crate) fn labels_from(&self, args: &HashMap<String, String>) -> Option<Vec<String>> {
        if !self.show_labels {
            return None;
        }
        args.get(LABELS).map(|s| ConfigValue::list(s))
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
    fn defaults_match_documented_values() {
        let cfg = ChartConfig::default();
        assert_eq!(cfg.ybase, 0.5);
        assert_eq!(cfg.scale, 1.0);
        assert_eq!(cfg.border_width, 0.1);
        assert!(cfg.range.is_none());
        assert!(cfg.show_labels);
    }

    #[test]
    fn range_parses_pairs_and_rejects_zero_zero() {
        let cfg = ChartConfig::from_map(&map(&[("range", "-5,5")]));
        assert_eq!(cfg.range, Some((-5.0, 5.0)));

        let cfg = ChartConfig::from_map(&map(&[("range", "0,0")]));
        assert!(cfg.range.is_none(), "0,0 means no explicit range");

        let cfg = ChartConfig::from_map(&map(&[("range", "bogus")]));
        assert!(cfg.range.is_none());
    }

    #[test]
    fn ybase_accepts_keywords_and_numbers() {
        assert_eq!(ChartConfig::from_map(&map(&[("ybase", "bottom")])).ybase, 1.0);
        assert_eq!(ChartConfig::from_map(&map(&[("ybase", "top")])).ybase, 0.0);
        assert_eq!(ChartConfig::from_map(&map(&[("ybase", "0.25")])).ybase, 0.25);
        assert_eq!(ChartConfig::from_map(&map(&[("ybase", "3")])).ybase, 1.0, "clamped");
        assert_eq!(ChartConfig::from_map(&map(&[("ybase", "junk")])).ybase, 0.5);
    }

    #[test]
    fn radial_default_scale_yields_a_margin() {
        let args = map(&[]);
        let cfg = ChartConfig::from_map(&args).with_radial_default_scale(&args);
        assert_eq!(cfg.scale, 0.9);

        let args = map(&[("scale", "1.0")]);
        let cfg = ChartConfig::from_map(&args).with_radial_default_scale(&args);
        assert_eq!(cfg.scale, 1.0, "an explicit scale wins");
    }

    #[test]
    fn position_takes_compass_or_point() {
        let cfg = ChartConfig::from_map(&map(&[("position", "north")]));
        assert_eq!(cfg.position, Some(PositionSpec::Compass(Anchor::North)));

        let cfg = ChartConfig::from_map(&map(&[("position", "10,-4")]));
        assert_eq!(cfg.position, Some(PositionSpec::Offset(Vec2::new(10.0, -4.0))));
    }

    #[test]
    fn bad_key_keeps_default_instead_of_failing() {
        let cfg = ChartConfig::from_map(&map(&[("borderwidth", "wide"), ("scale", "2.0")]));
        assert_eq!(cfg.border_width, 0.1);
        assert_eq!(cfg.scale, 2.0);
    }
}
