// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart-level error taxonomy.

use thiserror::Error;

/// Errors produced while turning configuration and data into layers.
///
/// These stay internal to the crate's `Result` plumbing; the public layer
/// surface logs them and fails closed by returning no layers.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChartError {
    /// A numeric token did not parse.
    #[error("cannot parse '{0}' as a number")]
    BadNumber(String),
    /// A color token did not resolve to a color.
    #[error("can't find color '{0}'")]
    BadColor(String),
    /// Explicit labels, values, and colors disagree on length.
    #[error("number of labels ({labels}), values ({values}), and colors ({colors}) don't match")]
    Cardinality {
        /// Label count.
        labels: usize,
        /// Value count.
        values: usize,
        /// Color count.
        colors: usize,
    },
    /// Per-ring labels disagree with the ring count.
    #[error("number of circle labels ({labels}) doesn't match the number of circles ({circles})")]
    CircleCardinality {
        /// Circle label count.
        labels: usize,
        /// Ring count.
        circles: usize,
    },
    /// No values were supplied for a chart that needs them.
    #[error("no values supplied")]
    EmptySeries,
}
