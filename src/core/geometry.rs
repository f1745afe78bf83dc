use serde::{Deserialize, Serialize};

/// A position in drawing-surface coordinates (logical pixels, y grows down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    #[must_use]
    pub fn x_distance_to(self, other: Self) -> f64 {
        (self.x - other.x).abs()
    }

    #[must_use]
    pub fn y_distance_to(self, other: Self) -> f64 {
        (self.y - other.y).abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Componentwise comparison used by the layout negotiator's stability check.
    #[must_use]
    pub fn approx_eq(self, other: Self, epsilon: f64) -> bool {
        (self.width - other.width).abs() <= epsilon
            && (self.height - other.height).abs() <= epsilon
    }

    #[must_use]
    pub fn clamped_to(self, max: Self) -> Self {
        Self {
            width: self.width.min(max.width),
            height: self.height.min(max.height),
        }
    }
}

/// Axis-aligned rectangle in drawing-surface coordinates.
///
/// Stored edge-wise rather than origin+size because layout negotiation and
/// tooltip placement reason about edges directly.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: origin.x + size.width,
            bottom: origin.y + size.height,
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    #[must_use]
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    #[must_use]
    pub fn contains_rect(self, other: Self) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    #[must_use]
    pub fn intersects(self, other: Self) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    #[must_use]
    pub fn shrunk_by(self, padding: Padding) -> Self {
        Self {
            left: self.left + padding.left,
            top: self.top + padding.top,
            right: self.right - padding.right,
            bottom: self.bottom - padding.bottom,
        }
        .normalized()
    }

    /// Collapses an inverted rectangle to zero extent instead of a negative one.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            left: self.left,
            top: self.top,
            right: self.right.max(self.left),
            bottom: self.bottom.max(self.top),
        }
    }
}

/// Four-sided padding, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    #[must_use]
    pub fn horizontal(self) -> f64 {
        self.left + self.right
    }

    #[must_use]
    pub fn vertical(self) -> f64 {
        self.top + self.bottom
    }
}

/// The canvas edge a layout participant is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Boxes on the top and bottom edges consume vertical space and span
    /// horizontally; their unconstrained dimension is width.
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}
