use crate::paint::gradient::{LinearGradient, parse_linear_gradient};
use serde::Serialize;

const GRADIENT_PREFIX: &str = "linear-gradient";

/// Straight-alpha color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha channel (not premultiplied).
    pub a: f64,
}

impl Rgba {
    /// Opaque black, also the fallback for unparseable color strings.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white, the default text color.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Construct from channel values.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the `#` is optional, hex digits are case-insensitive).
    ///
    /// Anything else yields [`Rgba::BLACK`]; color parsing never fails.
    pub fn parse_hex(s: &str) -> Self {
        match try_parse_hex(s) {
            Ok(c) => c,
            Err(msg) => {
                tracing::debug!(color = s, %msg, "falling back to opaque black");
                Self::BLACK
            }
        }
    }

    /// Linear interpolation between `self` and `other` at `t` in `[0, 1]`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Quantize to 8-bit straight-alpha RGBA.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }
}

pub(crate) fn try_parse_hex(s: &str) -> Result<Rgba, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(s: &str, at: usize) -> Result<u8, String> {
        let pair = s
            .get(at..at + 2)
            .ok_or_else(|| format!("truncated hex color \"{s}\""))?;
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    let (r, g, b, a) = match s.len() {
        6 => (hex_byte(s, 0)?, hex_byte(s, 2)?, hex_byte(s, 4)?, 255),
        8 => (
            hex_byte(s, 0)?,
            hex_byte(s, 2)?,
            hex_byte(s, 4)?,
            hex_byte(s, 6)?,
        ),
        _ => return Err("hex color must be #RRGGBB or #RRGGBBAA".to_owned()),
    };

    Ok(Rgba::new(
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
        f64::from(a) / 255.0,
    ))
}

/// A resolved color-style value: either a solid color or a two-stop linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorValue {
    /// A flat color.
    Solid(Rgba),
    /// A linear gradient between two colors.
    Gradient(LinearGradient),
}

impl ColorValue {
    /// Classify a color-style string.
    ///
    /// Strings starting with `linear-gradient` are parsed as gradients; when that parse fails
    /// the whole string goes through [`Rgba::parse_hex`], which degrades to opaque black.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.starts_with(GRADIENT_PREFIX) {
            if let Some(g) = parse_linear_gradient(trimmed) {
                return Self::Gradient(g);
            }
            tracing::debug!(color = s, "malformed gradient, using solid fallback");
        }
        Self::Solid(Rgba::parse_hex(trimmed))
    }

    /// `true` for [`ColorValue::Gradient`].
    pub fn is_gradient(&self) -> bool {
        matches!(self, Self::Gradient(_))
    }
}

impl From<Rgba> for ColorValue {
    fn from(value: Rgba) -> Self {
        Self::Solid(value)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/color.rs"]
mod tests;
