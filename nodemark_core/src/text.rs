// Copyright 2025 the Nodemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement, wrapping, and placement.
//!
//! Shaping stays downstream, so placement works on estimated text boxes: a
//! measurer reports a `(width, height)` per line, a block wraps greedily to a
//! maximum width, and the alignment helpers translate the resulting box
//! relative to an anchor point.

use core::str::FromStr;

use kurbo::{BezPath, Point, Rect, Size, Vec2};

/// A minimal text measurement interface used by label placement.
///
/// Callers can plug in a real text measurement backend (e.g. based on
/// shaping), or use [`HeuristicTextMeasurer`].
pub trait TextMeasurer {
    /// Returns `(width, height)` of a single line in scene units.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// A tiny heuristic text measurer.
///
/// It assumes an average glyph width of ~0.6em and height of 1em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        let width = 0.6 * font_size * text.chars().count() as f64;
        (width, font_size)
    }
}

/// How a text box is translated relative to its anchor point.
///
/// The anchor point starts at the top-left of the text box; each policy
/// moves the box so the point lands on the named edge or center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// Point on the left edge, text extends right.
    Left,
    /// Point on the right edge, text extends left.
    Right,
    /// Point centered above the text. Same placement as [`Self::CenterTop`].
    Center,
    /// Point centered above the text.
    CenterTop,
    /// Point centered below the text.
    CenterBottom,
    /// Point at the exact center of the text.
    #[default]
    Middle,
    /// Alias for [`Self::CenterTop`].
    Top,
    /// Alias for [`Self::CenterBottom`].
    Bottom,
}

impl FromStr for TextAlign {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "center" => Ok(Self::Center),
            "center_top" => Ok(Self::CenterTop),
            "center_bottom" => Ok(Self::CenterBottom),
            "middle" => Ok(Self::Middle),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            _ => Err(()),
        }
    }
}

/// A wrappable block of text plus its font parameters.
#[derive(Clone, Debug)]
pub struct TextBlock {
    /// Text content; wrapped greedily at word boundaries.
    pub text: String,
    /// Font size in scene units.
    pub font_size: f64,
    /// Maximum line width before wrapping. Non-positive disables wrapping.
    pub max_width: f64,
    /// Line advance as a multiple of the font size.
    pub line_spacing: f64,
}

impl TextBlock {
    /// Creates an unwrapped single-spaced block.
    pub fn new(text: impl Into<String>, font_size: f64) -> Self {
        Self {
            text: text.into(),
            font_size,
            max_width: 0.0,
            line_spacing: 1.0,
        }
    }

    /// Sets the wrap width.
    pub fn with_max_width(mut self, max_width: f64) -> Self {
        self.max_width = max_width;
        self
    }

    /// Sets the line spacing multiplier.
    pub fn with_line_spacing(mut self, line_spacing: f64) -> Self {
        self.line_spacing = line_spacing;
        self
    }

    /// Wraps the text and returns the lines plus the block size.
    pub fn layout(&self, measurer: &dyn TextMeasurer) -> (Vec<String>, Size) {
        let mut lines = Vec::new();
        if self.max_width > 0.0 {
            for raw in self.text.split('\n') {
                let mut line = String::new();
                for word in raw.split_whitespace() {
                    let candidate = if line.is_empty() {
                        word.to_string()
                    } else {
                        format!("{line} {word}")
                    };
                    let (w, _) = measurer.measure(&candidate, self.font_size);
                    if w > self.max_width && !line.is_empty() {
                        lines.push(core::mem::take(&mut line));
                        line = word.to_string();
                    } else {
                        line = candidate;
                    }
                }
                lines.push(line);
            }
        } else {
            lines.extend(self.text.split('\n').map(str::to_string));
        }

        let width = lines
            .iter()
            .map(|l| measurer.measure(l, self.font_size).0)
            .fold(0.0, f64::max);
        let n = lines.len().max(1) as f64;
        let height = self.font_size * (1.0 + (n - 1.0) * self.line_spacing);
        (lines, Size::new(width, height))
    }
}

/// Returns the top-left of a text box of `size` placed against `point`.
///
/// `padding` separates the box from the point for the edge alignments and
/// `offset` is applied last, unconditionally.
pub fn position_text(
    size: Size,
    point: Point,
    align: TextAlign,
    padding: f64,
    offset: Option<Vec2>,
) -> Point {
    let mut origin = match align {
        TextAlign::Center | TextAlign::CenterTop | TextAlign::Top => {
            Point::new(point.x - size.width / 2.0, point.y + padding)
        }
        TextAlign::CenterBottom | TextAlign::Bottom => {
            Point::new(point.x - size.width / 2.0, point.y - size.height - padding)
        }
        TextAlign::Right => Point::new(point.x - size.width - padding, point.y + padding),
        TextAlign::Left => Point::new(point.x + padding, point.y + padding),
        TextAlign::Middle => Point::new(point.x - size.width / 2.0, point.y - size.height / 2.0),
    };
    if let Some(offset) = offset {
        origin += offset;
    }
    origin
}

/// Compass positions on a box, used for both label position and anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    /// Box center.
    #[default]
    Center,
    /// Top edge midpoint.
    North,
    /// Top-right corner.
    NorthEast,
    /// Right edge midpoint.
    East,
    /// Bottom-right corner.
    SouthEast,
    /// Bottom edge midpoint.
    South,
    /// Bottom-left corner.
    SouthWest,
    /// Left edge midpoint.
    West,
    /// Top-left corner.
    NorthWest,
}

impl Anchor {
    /// The compass point of `rect` for this anchor.
    pub fn point_of(self, rect: Rect) -> Point {
        let c = rect.center();
        match self {
            Self::Center => c,
            Self::North => Point::new(c.x, rect.y0),
            Self::NorthEast => Point::new(rect.x1, rect.y0),
            Self::East => Point::new(rect.x1, c.y),
            Self::SouthEast => Point::new(rect.x1, rect.y1),
            Self::South => Point::new(c.x, rect.y1),
            Self::SouthWest => Point::new(rect.x0, rect.y1),
            Self::West => Point::new(rect.x0, c.y),
            Self::NorthWest => Point::new(rect.x0, rect.y0),
        }
    }
}

impl FromStr for Anchor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "center" | "c" => Ok(Self::Center),
            "north" | "n" => Ok(Self::North),
            "northeast" | "ne" => Ok(Self::NorthEast),
            "east" | "e" => Ok(Self::East),
            "southeast" | "se" => Ok(Self::SouthEast),
            "south" | "s" => Ok(Self::South),
            "southwest" | "sw" => Ok(Self::SouthWest),
            "west" | "w" => Ok(Self::West),
            "northwest" | "nw" => Ok(Self::NorthWest),
            _ => Err(()),
        }
    }
}

/// Resolves a position/anchor pair against the node box.
///
/// `position` picks a point on the node box; `anchor` names the part of the
/// text box that should land on that point. The returned point is then fed
/// through [`position_text`] with the configured alignment.
pub fn anchor_point(node_box: Rect, text_size: Size, position: Anchor, anchor: Anchor) -> Point {
    let base = position.point_of(node_box);
    let text_rect = Rect::from_origin_size(Point::ZERO, text_size);
    let grip = anchor.point_of(text_rect);
    base - grip.to_vec2()
}

/// A straight leader line from a label edge toward a reference point.
pub fn leader_line(from: Point, to: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(from);
    path.line_to(to);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_measure_scales_with_length() {
        let m = HeuristicTextMeasurer;
        let (w1, h) = m.measure("ab", 10.0);
        let (w2, _) = m.measure("abcd", 10.0);
        assert!((w2 - 2.0 * w1).abs() < 1e-12, "width tracks glyph count");
        assert!((h - 10.0).abs() < 1e-12);
    }

    #[test]
    fn block_wraps_at_max_width() {
        let m = HeuristicTextMeasurer;
        let block = TextBlock::new("one two three four", 10.0).with_max_width(40.0);
        let (lines, size) = block.layout(&m);
        assert!(lines.len() > 1, "narrow block must wrap");
        assert!(size.width <= 40.0 + 1e-9);
    }

    #[test]
    fn middle_alignment_centers_the_box() {
        let origin = position_text(
            Size::new(20.0, 10.0),
            Point::new(50.0, 50.0),
            TextAlign::Middle,
            0.0,
            None,
        );
        assert_eq!(origin, Point::new(40.0, 45.0));
    }

    #[test]
    fn right_alignment_places_text_left_of_point() {
        let origin = position_text(
            Size::new(20.0, 10.0),
            Point::new(50.0, 50.0),
            TextAlign::Right,
            2.0,
            None,
        );
        assert_eq!(origin, Point::new(28.0, 52.0));
    }

    #[test]
    fn offset_applies_after_alignment() {
        let origin = position_text(
            Size::new(10.0, 10.0),
            Point::ZERO,
            TextAlign::Left,
            0.0,
            Some(Vec2::new(3.0, -4.0)),
        );
        assert_eq!(origin, Point::new(3.0, -4.0));
    }

    #[test]
    fn anchor_point_north_grips_text_south() {
        let node = Rect::new(0.0, 0.0, 100.0, 100.0);
        let p = anchor_point(node, Size::new(20.0, 10.0), Anchor::North, Anchor::South);
        assert_eq!(p, Point::new(40.0, -10.0));
    }

    #[test]
    fn anchor_parses_compass_keywords() {
        assert_eq!("ne".parse::<Anchor>(), Ok(Anchor::NorthEast));
        assert_eq!("WEST".parse::<Anchor>(), Ok(Anchor::West));
        assert!("upward".parse::<Anchor>().is_err());
    }
}
