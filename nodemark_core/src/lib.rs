// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paintable-layer primitives for nodemark charts.
//!
//! This crate is the small, chart-agnostic base of the workspace:
//! - **Layers** are the unit of paintable output: a vector shape (or
//!   unshaped text), a fill paint, an optional stroke, and a bounding box.
//! - **Paints** store gradient control geometry in unit coordinates and
//!   resolve it against a target rectangle when a brush is built.
//! - **Text** is carried unshaped; shaping and rasterization are downstream.
//!   Guides accept a measurer callback for rough bounds estimation.
//!
//! Layers are laid out against a local reference box and re-projected by the
//! host with [`Layer::transform`]; the rebuild is immutable, so layers can be
//! shared across concurrent render passes for different nodes.

mod layer;
mod text;
mod transform;

pub use layer::{GradientStops, Layer, Paint, StrokeStyle, TextSpan, union_bounds};
pub use text::{
    Anchor, HeuristicTextMeasurer, TextAlign, TextBlock, TextMeasurer, anchor_point,
    leader_line, position_text,
};
pub use transform::{fit_box, min_scale};
