#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

/// A point in board space (CSS pixels relative to the board's top-left corner).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of the board surface.
///
/// The host measures the board element and reports it; items are clamped
/// against it while dragging and placed inside it on upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardSize {
    pub width: f64,
    pub height: f64,
}

impl Default for BoardSize {
    fn default() -> Self {
        Self { width: 800.0, height: 400.0 }
    }
}

impl BoardSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width: width.max(0.0), height: height.max(0.0) }
    }

    /// Clamp an item's top-left corner so the item stays on the board.
    ///
    /// When the item is larger than the board on an axis, that axis is pinned
    /// to zero.
    #[must_use]
    pub fn clamp_position(&self, x: f64, y: f64, item_width: f64, item_height: f64) -> Point {
        Point {
            x: clamp_axis(x, self.width - item_width),
            y: clamp_axis(y, self.height - item_height),
        }
    }
}

/// Axis-aligned rectangle used for hit-testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }
}

fn clamp_axis(value: f64, max: f64) -> f64 {
    value.min(max).max(0.0)
}
