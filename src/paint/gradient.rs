use crate::foundation::core::{Point, Rect, UnitPoint};
use crate::paint::color::Rgba;
use serde::Serialize;

/// A two-stop linear gradient with geometry already resolved into unit space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearGradient {
    /// Angle as written, in degrees clockwise from 6 o'clock.
    pub degrees: f64,
    /// Color at [`LinearGradient::start`].
    pub first: Rgba,
    /// Color at [`LinearGradient::end`].
    pub second: Rgba,
    /// Start point in the unit square.
    pub start: UnitPoint,
    /// End point in the unit square.
    pub end: UnitPoint,
}

impl LinearGradient {
    /// Build a gradient from an angle and two colors.
    pub fn from_angle(degrees: f64, first: Rgba, second: Rgba) -> Self {
        let (start, end) = angle_to_points(degrees);
        Self {
            degrees,
            first,
            second,
            start,
            end,
        }
    }

    /// Build a gradient between explicit unit points.
    pub fn between(start: UnitPoint, end: UnitPoint, first: Rgba, second: Rgba) -> Self {
        Self {
            degrees: 0.0,
            first,
            second,
            start,
            end,
        }
    }

    /// Sample the gradient at `p` when it is stretched over `rect`.
    pub fn color_at(&self, rect: Rect, p: Point) -> Rgba {
        let s = self.start.in_rect(rect);
        let e = self.end.in_rect(rect);
        let axis = e - s;
        let len2 = axis.hypot2();
        if len2 <= f64::EPSILON {
            return self.first;
        }
        let t = (p - s).dot(axis) / len2;
        self.first.lerp(self.second, t)
    }
}

/// Map a CSS-style gradient angle (degrees clockwise, 0 at 6 o'clock) to start/end points on
/// the boundary of the unit square (`(0, 0)` top-left).
///
/// Total over every input: the angle is normalized into `[0, 360)` first and non-finite
/// angles are treated as `0`.
pub fn angle_to_points(degrees: f64) -> (UnitPoint, UnitPoint) {
    let angle = normalize_degrees(degrees);
    let opposite = if angle >= 180.0 {
        angle - 180.0
    } else {
        angle + 180.0
    };
    (boundary_point(angle), boundary_point(opposite))
}

fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let d = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if d >= 360.0 { 0.0 } else { d }
}

// Works in a y-up square centered on the origin with 0 degrees at 3 o'clock, turning
// anticlockwise. Each 45 degree slot keeps the tangent bounded in [0, 1).
fn boundary_point(angle: f64) -> UnitPoint {
    let offset = angle % 45.0;
    let slot = (angle / 45.0).floor() as u8;
    let t = (offset.to_radians()).tan();

    let (x, y) = match slot {
        0 => (1.0, t),
        1 => (1.0 - t, 1.0),
        2 => (-t, 1.0),
        3 => (-1.0, 1.0 - t),
        4 => (-1.0, -t),
        5 => (-1.0 + t, -1.0),
        6 => (t, -1.0),
        _ => (1.0, -1.0 + t),
    };

    // y-down, then [-1, 1] -> [0, 1].
    let x = (x + 1.0) / 2.0;
    let y = (-y + 1.0) / 2.0;

    // Mirror across the main diagonal: CSS starts at 6 o'clock and turns clockwise.
    UnitPoint::new(y, x)
}

/// Parse `linear-gradient(<degrees>deg, <color1>, <color2>)`.
///
/// Any other shape yields `None`. Individual colors go through [`Rgba::parse_hex`].
pub fn parse_linear_gradient(s: &str) -> Option<LinearGradient> {
    let inner = s
        .trim()
        .strip_prefix("linear-gradient")?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?;

    let mut parts = inner.split(',');
    let (angle, first, second) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let degrees: f64 = angle.trim().strip_suffix("deg")?.trim_end().parse().ok()?;
    if !degrees.is_finite() {
        return None;
    }

    Some(LinearGradient::from_angle(
        degrees,
        Rgba::parse_hex(first.trim()),
        Rgba::parse_hex(second.trim()),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/paint/gradient.rs"]
mod tests;
