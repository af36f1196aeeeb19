// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color resolution: keyword palettes, explicit lists, and value-keyed
//! up/down/zero/missing interpolation.

use peniko::Color;
use peniko::color::{Srgb, palette::css, parse_color as parse_css_color};
use rand::Rng;

use crate::error::ChartError;
use crate::value::normalize_value;

const UP: &str = "up:";
const DOWN: &str = "down:";
const ZERO: &str = "zero:";
const MISSING: &str = "missing:";
const RANDOM: &str = "random";
const RAINBOW: &str = "rainbow";
const MODULATED: &str = "modulated";
const CONTRASTING: &str = "contrasting";

/// Values closer to zero than this take the `zero` color unscaled.
pub const EPSILON: f64 = 1e-8;

/// Parses a single color token: `#RRGGBB`, `#RRGGBBAA`, or a CSS name.
pub fn parse_color(token: &str) -> Result<Color, ChartError> {
    let token = token.trim();
    if let Some(hex) = token.strip_prefix('#') {
        if (hex.len() == 6 || hex.len() == 8) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            let chan = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
            let a = if hex.len() == 8 { chan(6) } else { 255 };
            return Ok(Color::from_rgba8(chan(0), chan(2), chan(4), a));
        }
        return Err(ChartError::BadColor(token.to_string()));
    }
    // The CSS parser only knows the "gray" spellings; accept both.
    let name = token.to_ascii_lowercase().replace("grey", "gray");
    parse_css_color(&name)
        .map(|c| c.to_alpha_color::<Srgb>())
        .map_err(|_| ChartError::BadColor(token.to_string()))
}

/// Parses a positional color list; any unresolvable token fails the list.
pub fn parse_color_list(tokens: &[&str]) -> Result<Vec<Color>, ChartError> {
    tokens.iter().map(|t| parse_color(t)).collect()
}

/// Resolved endpoints of an up/down/zero/missing band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpDownColors {
    /// Color for positive normalized values.
    pub up: Color,
    /// Color for negative normalized values.
    pub down: Color,
    /// Color at (and near) zero.
    pub zero: Color,
    /// Color for missing or undefined values.
    pub missing: Color,
}

/// Parses `up:`/`down:`/`zero:`/`missing:` prefixed tokens.
///
/// `zero` defaults to black and `missing` to grey.
pub fn parse_up_down(tokens: &[&str]) -> Result<UpDownColors, ChartError> {
    let mut up = None;
    let mut down = None;
    let mut zero = "black".to_string();
    let mut missing = "grey".to_string();
    for token in tokens {
        let lower = token.trim().to_ascii_lowercase();
        if let Some(rest) = lower.strip_prefix(UP) {
            up = Some(rest.to_string());
        } else if let Some(rest) = lower.strip_prefix(DOWN) {
            down = Some(rest.to_string());
        } else if let Some(rest) = lower.strip_prefix(ZERO) {
            zero = rest.to_string();
        } else if let Some(rest) = lower.strip_prefix(MISSING) {
            missing = rest.to_string();
        }
    }
    let up = up.ok_or_else(|| ChartError::BadColor("up".to_string()))?;
    let down = down.ok_or_else(|| ChartError::BadColor("down".to_string()))?;
    Ok(UpDownColors {
        up: parse_color(&up)?,
        down: parse_color(&down)?,
        zero: parse_color(&zero)?,
        missing: parse_color(&missing)?,
    })
}

/// Per-channel linear blend between `zero` and `c` at fraction `v`.
///
/// With no explicit range the endpoint color is returned unscaled.
#[allow(
    clippy::cast_possible_truncation,
    reason = "channel math is clamped to [0, 255] by construction"
)]
fn scale_color(v: f64, zero: Color, c: Color, has_range: bool) -> Color {
    if !has_range {
        return c;
    }
    let cz = zero.to_rgba8();
    let cc = c.to_rgba8();
    let blend = |a: u8, b: u8| (f64::from(a) * v + f64::from(b) * (1.0 - v)) as u8;
    Color::from_rgba8(
        blend(cc.r, cz.r),
        blend(cc.g, cz.g),
        blend(cc.b, cz.b),
        blend(cc.a, cz.a),
    )
}

/// Maps each value onto the up/down band.
pub fn up_down_colors(
    band: UpDownColors,
    values: &[Option<f64>],
    range: Option<(f64, f64)>,
    normalized: bool,
) -> Vec<Color> {
    let (lo, hi) = range.unwrap_or((0.0, 0.0));
    values
        .iter()
        .map(|v| {
            let Some(v) = *v else {
                return band.missing;
            };
            if v.is_nan() {
                return band.missing;
            }
            let vn = if normalized {
                v
            } else {
                normalize_value(v, lo, hi)
            };
            if vn < -EPSILON {
                scale_color(-vn, band.zero, band.down, range.is_some())
            } else if vn > EPSILON {
                scale_color(vn, band.zero, band.up, range.is_some())
            } else {
                band.zero
            }
        })
        .collect()
}

/// Resolves a color specification string into one color per value.
///
/// Precedence: empty spec generates contrasting colors; 2-4 tokens led by
/// an `up:`/`down:` style prefix interpolate on the value sign; several
/// plain tokens form an explicit list; a single token is a palette keyword
/// or a literal color.
pub fn resolve_colors(
    spec: Option<&str>,
    values: &[Option<f64>],
    range: Option<(f64, f64)>,
    normalized: bool,
) -> Result<Vec<Color>, ChartError> {
    let n = values.len();
    let Some(spec) = spec else {
        return Ok(contrasting_colors(n));
    };
    if spec.trim().is_empty() {
        return Ok(contrasting_colors(n));
    }

    let tokens: Vec<&str> = spec.split(',').collect();
    let first = tokens[0].trim().to_ascii_lowercase();
    let banded = match tokens.len() {
        2 => first.starts_with(UP) || first.starts_with(DOWN),
        3 => first.starts_with(UP) || first.starts_with(DOWN) || first.starts_with(ZERO),
        4 => {
            first.starts_with(UP)
                || first.starts_with(DOWN)
                || first.starts_with(ZERO)
                || first.starts_with(MISSING)
        }
        _ => false,
    };
    if banded {
        let band = parse_up_down(&tokens)?;
        return Ok(up_down_colors(band, values, range, normalized));
    }
    if tokens.len() > 1 {
        return parse_color_list(&tokens);
    }

    match spec.trim() {
        RANDOM => Ok(random_colors(n, &mut rand::thread_rng())),
        RAINBOW => Ok(rainbow_colors(n)),
        MODULATED => Ok(modulated_rainbow_colors(n)),
        CONTRASTING => Ok(contrasting_colors(n)),
        literal => {
            let color = parse_color(literal)?;
            Ok(vec![color; n])
        }
    }
}

/// HSB to RGB conversion with full opacity.
#[allow(
    clippy::cast_possible_truncation,
    reason = "channel math is clamped to [0, 255] by construction"
)]
pub fn hsb_color(hue: f64, saturation: f64, brightness: f64) -> Color {
    let to_u8 = |v: f64| (v * 255.0 + 0.5) as u8;
    if saturation <= 0.0 {
        let v = to_u8(brightness);
        return Color::from_rgba8(v, v, v, 255);
    }
    let h = (hue - hue.floor()) * 6.0;
    let f = h - h.floor();
    let p = brightness * (1.0 - saturation);
    let q = brightness * (1.0 - saturation * f);
    let t = brightness * (1.0 - saturation * (1.0 - f));
    let (r, g, b) = match h as u32 {
        0 => (brightness, t, p),
        1 => (q, brightness, p),
        2 => (p, brightness, t),
        3 => (p, q, brightness),
        4 => (t, p, brightness),
        _ => (brightness, p, q),
    };
    Color::from_rgba8(to_u8(r), to_u8(g), to_u8(b), 255)
}

/// Divides the hue wheel into `n` fully saturated pieces.
pub fn rainbow_colors(n: usize) -> Vec<Color> {
    (0..n)
        .map(|i| hsb_color(i as f64 / n as f64, 1.0, 1.0))
        .collect()
}

/// Rainbow hues with cosine/sine modulated saturation and brightness.
pub fn modulated_rainbow_colors(n: usize) -> Vec<Color> {
    use core::f64::consts::PI;
    (0..n)
        .map(|i| {
            let i = i as f64;
            let sat = ((8.0 * i) / (2.0 * PI)).cos().abs() * 0.7 + 0.3;
            let br = (i / (2.0 * PI) + PI / 2.0).sin().abs() * 0.7 + 0.3;
            hsb_color(i / n as f64, sat, br)
        })
        .collect()
}

/// Like rainbow, but alternating sides of the color wheel so neighboring
/// slices contrast.
pub fn contrasting_colors(n: usize) -> Vec<Color> {
    (0..n)
        .map(|i| {
            let mut hue = i as f64 / n as f64;
            if i % 2 == 1 {
                hue += 0.5;
            }
            hsb_color(hue, 1.0, 1.0)
        })
        .collect()
}

/// Random RGB colors at alpha 200.
pub fn random_colors(n: usize, rng: &mut impl Rng) -> Vec<Color> {
    (0..n)
        .map(|_| {
            Color::from_rgba8(
                rng.gen_range(0..255),
                rng.gen_range(0..255),
                rng.gen_range(0..255),
                200,
            )
        })
        .collect()
}

/// Named heat-strip gradient palettes, in `[down, zero, up]` stop order.
///
/// Two-color palettes have no explicit zero stop.
pub fn named_gradient(name: &str) -> Option<Vec<Color>> {
    let red = Color::from_rgba8(255, 0, 0, 255);
    let green = Color::from_rgba8(0, 255, 0, 255);
    let blue = Color::from_rgba8(0, 0, 255, 255);
    let cyan = Color::from_rgba8(0, 255, 255, 255);
    let yellow = Color::from_rgba8(255, 255, 0, 255);
    let orange = Color::from_rgba8(255, 200, 0, 255);
    let magenta = Color::from_rgba8(255, 0, 255, 255);
    match name.trim().to_ascii_lowercase().as_str() {
        "redgreen" => Some(vec![green, red]),
        "redblue" => Some(vec![red, blue]),
        "yellowwhitecyan" => Some(vec![cyan, css::WHITE, yellow]),
        "yellowcyan" => Some(vec![cyan, yellow]),
        "yellowblackcyan" => Some(vec![cyan, css::BLACK, yellow]),
        "yellowblue" => Some(vec![blue, yellow]),
        "orangepurple" => Some(vec![orange, magenta]),
        "bluegreenyellow" => Some(vec![blue, green, yellow]),
        "purpleyellow" => Some(vec![magenta, yellow]),
        "greenpurple" => Some(vec![green, magenta]),
        "redyellow" => Some(vec![red, yellow]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_six_digits_defaults_to_opaque() {
        let c = parse_color("#336699").unwrap().to_rgba8();
        assert_eq!((c.r, c.g, c.b, c.a), (0x33, 0x66, 0x99, 255));
    }

    #[test]
    fn hex_eight_digits_carries_alpha() {
        let c = parse_color("#336699CC").unwrap().to_rgba8();
        assert_eq!((c.r, c.g, c.b, c.a), (0x33, 0x66, 0x99, 0xCC));
    }

    #[test]
    fn named_colors_resolve_and_junk_fails() {
        assert!(parse_color("red").is_ok());
        assert!(parse_color("grey").is_ok());
        assert_eq!(
            parse_color("no-such-color"),
            Err(ChartError::BadColor("no-such-color".to_string()))
        );
    }

    #[test]
    fn grey_spellings_alias_to_gray() {
        assert_eq!(parse_color("grey"), parse_color("gray"));
        assert_eq!(parse_color("lightgrey"), parse_color("lightgray"));
        assert_eq!(parse_color("DimGrey"), parse_color("dimgray"));
    }

    #[test]
    fn up_down_band_follows_value_signs() {
        let colors = resolve_colors(
            Some("up:#ff0000,down:#0000ff"),
            &[Some(2.0), Some(-3.0), Some(0.0), None],
            Some((-5.0, 5.0)),
            false,
        )
        .unwrap();
        assert_eq!(colors.len(), 4);

        let up = colors[0].to_rgba8();
        assert!(up.r > 0 && up.b == 0, "positive value trends toward red");
        let down = colors[1].to_rgba8();
        assert!(down.b > 0 && down.r == 0, "negative value trends toward blue");
        let zero = colors[2].to_rgba8();
        assert_eq!((zero.r, zero.g, zero.b), (0, 0, 0), "zero takes the zero color");
        let missing = colors[3].to_rgba8();
        assert_eq!(
            (missing.r, missing.g, missing.b),
            (128, 128, 128),
            "missing takes the default grey"
        );
    }

    #[test]
    fn up_down_without_range_returns_unscaled_endpoints() {
        let colors = resolve_colors(
            Some("up:#ff0000,down:#0000ff"),
            &[Some(0.4)],
            None,
            false,
        )
        .unwrap();
        let c = colors[0].to_rgba8();
        assert_eq!((c.r, c.g, c.b), (255, 0, 0));
    }

    #[test]
    fn blend_is_linear_and_truncating() {
        let half = scale_color(
            0.5,
            Color::from_rgba8(0, 0, 0, 255),
            Color::from_rgba8(255, 0, 0, 255),
            true,
        )
        .to_rgba8();
        assert_eq!((half.r, half.g, half.b), (127, 0, 0));
    }

    #[test]
    fn explicit_list_is_positional() {
        let colors = resolve_colors(
            Some("#ff0000,blue,#00ff00"),
            &[Some(1.0), Some(2.0), Some(3.0)],
            None,
            false,
        )
        .unwrap();
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[0].to_rgba8().r, 255);
        assert_eq!(colors[2].to_rgba8().g, 255);
    }

    #[test]
    fn empty_spec_generates_contrasting_colors() {
        let colors = resolve_colors(None, &[Some(1.0); 6], None, false).unwrap();
        assert_eq!(colors.len(), 6);
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn bad_keyword_propagates_as_color_failure() {
        assert!(resolve_colors(Some("sparkly"), &[Some(1.0)], None, false).is_err());
    }

    #[test]
    fn rainbow_walks_the_hue_wheel() {
        let colors = rainbow_colors(4);
        assert_eq!(colors.len(), 4);
        let first = colors[0].to_rgba8();
        assert_eq!((first.r, first.g, first.b), (255, 0, 0), "hue 0 is red");
    }

    #[test]
    fn named_gradients_resolve_with_default_available() {
        let g = named_gradient("yellowblackcyan").unwrap();
        assert_eq!(g.len(), 3);
        let g = named_gradient("redgreen").unwrap();
        assert_eq!(g.len(), 2);
        assert!(named_gradient("plaid").is_none());
    }

    #[test]
    fn random_palette_respects_count_and_alpha() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let colors = random_colors(5, &mut rng);
        assert_eq!(colors.len(), 5);
        assert!(colors.iter().all(|c| c.to_rgba8().a == 200));
    }
}
