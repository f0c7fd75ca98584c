pub use kurbo::{Point, Rect, Size};

/// A point in the unit square, `(0, 0)` at the top-left and `(1, 1)` at the bottom-right.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UnitPoint {
    /// Horizontal coordinate in `[0, 1]`.
    pub x: f64,
    /// Vertical coordinate in `[0, 1]` (y-down).
    pub y: f64,
}

impl UnitPoint {
    /// Top-left corner.
    pub const TOP_LEADING: Self = Self::new(0.0, 0.0);
    /// Center of the top edge.
    pub const TOP: Self = Self::new(0.5, 0.0);
    /// Center of the bottom edge.
    pub const BOTTOM: Self = Self::new(0.5, 1.0);
    /// Bottom-right corner.
    pub const BOTTOM_TRAILING: Self = Self::new(1.0, 1.0);

    /// Construct a unit point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Map this point into `rect` (same convention: y grows downward).
    pub fn in_rect(self, rect: Rect) -> Point {
        Point::new(
            rect.x0 + self.x * rect.width(),
            rect.y0 + self.y * rect.height(),
        )
    }

    /// `true` when the point lies on the boundary of the unit square (within `eps`).
    pub fn is_on_unit_square_boundary(self, eps: f64) -> bool {
        let inside = (-eps..=1.0 + eps).contains(&self.x) && (-eps..=1.0 + eps).contains(&self.y);
        let on_edge = self.x.abs() <= eps
            || (self.x - 1.0).abs() <= eps
            || self.y.abs() <= eps
            || (self.y - 1.0).abs() <= eps;
        inside && on_edge
    }
}

/// Inset `rect` by `d` on every side; never produces a negative size.
pub(crate) fn inset_uniform(rect: Rect, d: f64) -> Rect {
    if !d.is_finite() || d <= 0.0 {
        return rect;
    }
    let cx = rect.center().x;
    let cy = rect.center().y;
    let x0 = (rect.x0 + d).min(cx);
    let y0 = (rect.y0 + d).min(cy);
    let x1 = (rect.x1 - d).max(cx);
    let y1 = (rect.y1 - d).max(cy);
    Rect::new(x0, y0, x1, y1)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
