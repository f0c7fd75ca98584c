use serde::Serialize;

use crate::deeplink::DeepLink;
use crate::foundation::core::Rect;
use crate::paint::color::ColorValue;
use crate::schema::model::{FontWeight, Justification, Mask};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
/// One positioned, styled item for a host renderer. Lists are painted in order.
pub enum DrawPrimitive {
    /// Solid or gradient fill of a (possibly rounded) rectangle.
    Fill {
        /// Filled area.
        rect: Rect,
        /// Solid color or gradient stretched over `rect`.
        paint: ColorValue,
        /// Corner radius in pixels; `0` for square corners.
        corner_radius: f64,
    },
    /// Image placement.
    Image(ImagePlacement),
    /// Single text run.
    Text(TextRun),
    /// Activation area; the host turns `link` into a platform deep link.
    HitRegion {
        /// Active area.
        rect: Rect,
        /// Link to open.
        link: DeepLink,
    },
}

impl DrawPrimitive {
    /// Bounding rect of the primitive.
    pub fn rect(&self) -> Rect {
        match self {
            Self::Fill { rect, .. } | Self::HitRegion { rect, .. } => *rect,
            Self::Image(img) => img.frame,
            Self::Text(text) => text.rect,
        }
    }
}

/// Image placed with cover scaling.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImagePlacement {
    /// Area the image is scaled to cover (padding applied).
    pub frame: Rect,
    /// Cell frame; nothing is drawn outside it.
    pub clip: Rect,
    /// Resolved image URL.
    pub source: String,
    /// Mask shape applied inside `frame`.
    pub mask: ImageMask,
    /// Scaling mode.
    pub scaling: ImageScaling,
}

/// Mask shape for images.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageMask {
    /// Plain rectangle.
    Rectangle,
    /// Circle centered in the frame with diameter `min(w, h)`.
    Circle,
}

impl From<Option<Mask>> for ImageMask {
    fn from(value: Option<Mask>) -> Self {
        match value {
            Some(Mask::Circle) => Self::Circle,
            Some(Mask::Rectangle | Mask::Unknown) | None => Self::Rectangle,
        }
    }
}

/// How images fill their frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageScaling {
    /// Preserve aspect ratio and cover the frame, cropping overflow.
    Fill,
}

/// Single-style text run.
///
/// Renderers shrink the run (never wrap beyond the box) until it fits the rect width, but not
/// below `size * min_scale_factor`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextRun {
    /// Box the text is laid out in (padding applied).
    pub rect: Rect,
    /// Cell frame; nothing is drawn outside it.
    pub clip: Rect,
    /// Text content.
    pub text: String,
    /// Solid color, or a gradient used as a mask over the glyphs.
    pub paint: ColorValue,
    /// Font family.
    pub font: FontFamily,
    /// Font weight.
    pub weight: FontWeight,
    /// Point size.
    pub size: f64,
    /// Shrink-to-fit floor.
    pub min_scale_factor: f64,
    /// Alignment of lines within the text block.
    pub text_align: HAlign,
    /// Alignment of the text block within `rect` (vertically centered).
    pub box_align: HAlign,
}

/// Font family of a text run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "family", rename_all = "snake_case")]
pub enum FontFamily {
    /// Platform default font.
    System,
    /// Named family.
    Named(String),
}

/// Horizontal alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    /// Leading edge.
    Leading,
    /// Centered.
    Center,
    /// Trailing edge.
    Trailing,
}

impl From<Justification> for HAlign {
    fn from(value: Justification) -> Self {
        match value {
            Justification::Left => Self::Leading,
            Justification::Right => Self::Trailing,
            Justification::Center | Justification::Unknown => Self::Center,
        }
    }
}
