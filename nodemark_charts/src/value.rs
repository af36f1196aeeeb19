// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Series parsing and zero-centered normalization.

use crate::error::ChartError;

/// An ordered series of nullable values.
///
/// `None` is "missing" (no data for this slot); `NaN` is "undefined"
/// (unparseable or an undefined arithmetic result). The two are distinct:
/// missing values skip shapes entirely while `NaN` skips normalization but
/// may still take part in layout depending on the chart.
pub type Series = Vec<Option<f64>>;

/// Parses a comma-separated literal list into a series.
///
/// Any non-numeric element fails the whole parse.
pub fn parse_series(text: &str) -> Result<Series, ChartError> {
    text.split(',')
        .map(|tok| {
            let tok = tok.trim();
            tok.parse::<f64>()
                .map(Some)
                .map_err(|_| ChartError::BadNumber(tok.to_string()))
        })
        .collect()
}

/// Parses multi-ring bracket syntax: `[a,b],[c,d]`.
///
/// A bare list without brackets is a single ring.
pub fn parse_ring_series(text: &str) -> Result<Vec<Series>, ChartError> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return Ok(vec![parse_series(trimmed)?]);
    }
    let inner = &trimmed[1..trimmed.len() - 1];
    inner.split("],[").map(parse_series).collect()
}

/// Splits a bracketed per-ring color specification: `[spec],[spec]`.
///
/// Returns `None` when the input is not bracketed (one spec for all rings).
pub fn split_ring_spec(text: &str) -> Option<Vec<String>> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return None;
    }
    let inner = &trimmed[1..trimmed.len() - 1];
    Some(inner.split("],[").map(str::to_string).collect())
}

/// Zero-centered normalization of a single value.
///
/// Zero values must remain zero, negative values must stay negative, and
/// positive values must stay positive. If the caller gives unbalanced
/// ranges, this approach inflates the smaller of the two sides; that is
/// long-standing documented behavior the axis-label code relies on.
pub fn normalize_value(v: f64, range_min: f64, range_max: f64) -> f64 {
    if v.is_nan() {
        return v;
    }
    if range_min == 0.0 && range_max == 0.0 {
        return v;
    }
    let range = range_max - range_min;
    let v = v.clamp(range_min, range_max);

    if (range_min > 0.0 && range_max > 0.0) || (range_min < 0.0 && range_max < 0.0) {
        (v - range_min) / range
    } else if v < 0.0 && range_min < 0.0 {
        -(v / range_min)
    } else if v > 0.0 && range_max > 0.0 {
        v / range_max
    } else {
        0.0
    }
}

/// Normalizes a series against an optional explicit range.
///
/// `None` entries and `NaN`s pass through unchanged. With no range this is
/// the identity.
pub fn normalize(series: &[Option<f64>], range: Option<(f64, f64)>) -> Series {
    let Some((lo, hi)) = range else {
        return series.to_vec();
    };
    series
        .iter()
        .map(|v| v.map(|v| normalize_value(v, lo, hi)))
        .collect()
}

/// Converts a value series into angular widths in degrees.
///
/// Only positive values contribute to the denominator, so the positive
/// slices always sum to a full circle.
pub fn to_degrees(series: &[Option<f64>]) -> Series {
    let total: f64 = series
        .iter()
        .filter_map(|v| *v)
        .filter(|v| *v >= 0.0 && !v.is_nan())
        .sum();
    series
        .iter()
        .map(|v| v.map(|v| if total > 0.0 { v * 360.0 / total } else { 0.0 }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_list_parses_to_series() {
        assert_eq!(
            parse_series("1, 2,3.5").unwrap(),
            vec![Some(1.0), Some(2.0), Some(3.5)]
        );
    }

    #[test]
    fn one_bad_token_fails_the_whole_parse() {
        assert_eq!(
            parse_series("1,zwei,3"),
            Err(ChartError::BadNumber("zwei".to_string()))
        );
    }

    #[test]
    fn bracket_syntax_yields_rings() {
        let rings = parse_ring_series("[1,2],[3]").unwrap();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0], vec![Some(1.0), Some(2.0)]);
        assert_eq!(rings[1], vec![Some(3.0)]);

        let single = parse_ring_series("4,5").unwrap();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn normalize_is_sign_preserving_and_fixes_zero() {
        assert_eq!(normalize_value(0.0, -5.0, 10.0), 0.0);
        assert!(normalize_value(3.0, -5.0, 10.0) > 0.0);
        assert!(normalize_value(-3.0, -5.0, 10.0) < 0.0);
    }

    #[test]
    fn normalize_is_monotonic_over_a_straddling_range() {
        let vals = [-5.0, -2.0, 0.0, 1.0, 4.0, 5.0];
        let mapped: Vec<f64> = vals.iter().map(|v| normalize_value(*v, -5.0, 5.0)).collect();
        for pair in mapped.windows(2) {
            assert!(pair[0] <= pair[1], "normalization must be monotonic");
        }
    }

    #[test]
    fn asymmetric_range_inflates_the_smaller_side() {
        // [-1, 10]: -0.5 maps to -0.5 while 0.5 maps to 0.05.
        assert!((normalize_value(-0.5, -1.0, 10.0) + 0.5).abs() < 1e-12);
        assert!((normalize_value(0.5, -1.0, 10.0) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn normalize_clamps_to_the_range() {
        assert_eq!(normalize_value(20.0, -5.0, 5.0), 1.0);
        assert_eq!(normalize_value(-20.0, -5.0, 5.0), -1.0);
    }

    #[test]
    fn all_positive_range_maps_linearly() {
        assert_eq!(normalize_value(2.0, 2.0, 6.0), 0.0);
        assert_eq!(normalize_value(6.0, 2.0, 6.0), 1.0);
        assert_eq!(normalize_value(4.0, 2.0, 6.0), 0.5);
    }

    #[test]
    fn renormalizing_normalized_input_is_a_noop() {
        for v in [-1.0, -0.25, 0.0, 0.5, 1.0] {
            let once = normalize_value(v, -1.0, 1.0);
            assert!((once - v).abs() < 1e-12);
        }
    }

    #[test]
    fn nan_and_missing_pass_through() {
        let out = normalize(&[Some(f64::NAN), None, Some(1.0)], Some((-2.0, 2.0)));
        assert!(out[0].unwrap().is_nan());
        assert!(out[1].is_none());
        assert_eq!(out[2], Some(0.5));
    }

    #[test]
    fn degrees_sum_to_full_circle() {
        let degs = to_degrees(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        let total: f64 = degs.iter().filter_map(|v| *v).sum();
        assert!((total - 360.0).abs() < 1e-6, "slice angles must sum to 360");
    }

    #[test]
    fn negative_values_are_excluded_from_the_denominator() {
        let degs = to_degrees(&[Some(3.0), Some(-1.0), Some(1.0)]);
        assert!((degs[0].unwrap() - 270.0).abs() < 1e-9);
        assert!(degs[1].unwrap() < 0.0, "negative slices keep their sign");
        assert!((degs[2].unwrap() - 90.0).abs() < 1e-9);
    }
}
