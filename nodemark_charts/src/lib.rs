// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data-driven chart generators for node-attached graphics.
//!
//! Each chart is parsed once from an identifier plus a key/value argument
//! map and then generates [`nodemark_core::Layer`]s per node:
//! - **Value series** come from literal lists or from a [`DataSource`].
//! - **Colors** are resolved from explicit lists, keyword generators, or
//!   up/down interpolation bands.
//! - **Geometry** is built in a fixed origin-centered reference box and
//!   re-projected onto the node's bounding box.
//!
//! Chart generation fails closed: configuration that cannot be honored is
//! logged and the chart draws nothing rather than something wrong.

mod arc;
mod bar;
mod chart;
mod circos;
mod color;
mod config;
mod error;
mod gradient;
mod heatstrip;
mod label;
mod line;
mod pie;
mod slot;
mod stripe;
mod value;

pub use bar::BarChartSpec;
pub use chart::{ARC_BOX, Chart, DataSource, NoData, SLOT_BOX};
pub use circos::{CircleLabelStyle, CircosChartSpec};
pub use color::{
    EPSILON, UpDownColors, contrasting_colors, hsb_color, modulated_rainbow_colors,
    named_gradient, parse_color, parse_color_list, parse_up_down, rainbow_colors, random_colors,
    resolve_colors, up_down_colors,
};
pub use config::{ChartConfig, ConfigValue, PositionSpec};
pub use error::ChartError;
pub use gradient::{LinearGradientSpec, RadialGradientSpec};
pub use heatstrip::HeatStripSpec;
pub use label::LabelSpec;
pub use line::LineChartSpec;
pub use pie::PieChartSpec;
pub use slot::SlotLayout;
pub use stripe::StripeChartSpec;
pub use value::{
    Series, normalize, normalize_value, parse_ring_series, parse_series, split_ring_spec,
    to_degrees,
};
