// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Affine helpers for the reference-box contract.

use kurbo::{Affine, Rect};

/// The smaller of the two axis scale factors of `affine`.
///
/// Used wherever a single scalar must follow the transform (stroke widths,
/// font sizes, shadow blur) without picking up anisotropic distortion.
pub fn min_scale(affine: Affine) -> f64 {
    let [a, b, c, d, _, _] = affine.as_coeffs();
    let sx = a.hypot(b);
    let sy = c.hypot(d);
    sx.min(sy)
}

/// Maps a local reference box onto a target box with scale and translation.
///
/// Degenerate reference boxes map by translation only.
pub fn fit_box(reference: Rect, target: Rect) -> Affine {
    let sx = if reference.width() > 0.0 {
        target.width() / reference.width()
    } else {
        1.0
    };
    let sy = if reference.height() > 0.0 {
        target.height() / reference.height()
    } else {
        1.0
    };
    Affine::translate((target.x0, target.y0))
        * Affine::scale_non_uniform(sx, sy)
        * Affine::translate((-reference.x0, -reference.y0))
}
