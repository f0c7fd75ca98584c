use crate::foundation::core::{Point, Rect, Size, UnitPoint, inset_uniform};
use crate::layout::engine::Appearance;
use crate::layout::primitive::{DrawPrimitive, FontFamily, HAlign, TextRun};
use crate::paint::color::{ColorValue, Rgba};
use crate::paint::gradient::LinearGradient;
use crate::schema::model::{FontWeight, SizeClass};

const FRAME_INSET: f64 = 8.0;
const FRAME_RADIUS: f64 = 8.0;
const GLYPH_SIZE: f64 = 72.0;

const CONFIGURE_BOTTOM: &str = "#1961DF";
const CONFIGURE_TOP: &str = "#16B2EA";
const CONFIGURE_INSET_X: f64 = 30.0;
const TITLE_SIZE: f64 = 28.0;
const HINT_SIZE: f64 = 16.0;
const LINE_HEIGHT: f64 = 1.2;

/// Text shown below the title of the configuration placeholder.
pub const CONFIGURE_HINT: &str = "Tap and hold and choose Edit Widget";

fn centered_text(rect: Rect, text: &str, paint: Rgba, weight: FontWeight, size: f64) -> TextRun {
    TextRun {
        rect,
        clip: rect,
        text: text.to_owned(),
        paint: ColorValue::Solid(paint),
        font: FontFamily::System,
        weight,
        size,
        min_scale_factor: 1.0,
        text_align: HAlign::Center,
        box_align: HAlign::Center,
    }
}

/// Two-tone frame with a bold `?`, drawn when a layout name does not resolve.
pub(crate) fn unknown_layout(target: Size, appearance: Appearance) -> Vec<DrawPrimitive> {
    let surface = Rect::from_origin_size(Point::ORIGIN, target);
    let (outer, inner) = match appearance {
        Appearance::Light => (Rgba::BLACK, Rgba::WHITE),
        Appearance::Dark => (Rgba::WHITE, Rgba::BLACK),
    };
    vec![
        DrawPrimitive::Fill {
            rect: surface,
            paint: ColorValue::Solid(outer),
            corner_radius: 0.0,
        },
        DrawPrimitive::Fill {
            rect: inset_uniform(surface, FRAME_INSET),
            paint: ColorValue::Solid(inner),
            corner_radius: FRAME_RADIUS,
        },
        DrawPrimitive::Text(centered_text(
            surface,
            "?",
            outer,
            FontWeight::Bold,
            GLYPH_SIZE,
        )),
    ]
}

/// The surface shown for an entry that has no layout chosen yet.
///
/// A bottom-to-top blue gradient with a title and the editing hint, both white and centered
/// with 30pt horizontal insets. Small surfaces get the short title.
pub fn render_configure_placeholder(size: SizeClass, target: Size) -> Vec<DrawPrimitive> {
    let surface = Rect::from_origin_size(Point::ORIGIN, target);
    let gradient = LinearGradient::between(
        UnitPoint::BOTTOM,
        UnitPoint::TOP,
        Rgba::parse_hex(CONFIGURE_BOTTOM),
        Rgba::parse_hex(CONFIGURE_TOP),
    );
    let title = match size {
        SizeClass::Small | SizeClass::Unknown => "Configure",
        _ => "Configure Widget",
    };

    // Title and hint are separated by three equal gaps.
    let title_h = TITLE_SIZE * LINE_HEIGHT;
    let hint_h = HINT_SIZE * LINE_HEIGHT;
    let gap = ((target.height - title_h - hint_h) / 3.0).max(0.0);
    let x0 = CONFIGURE_INSET_X.min(target.width / 2.0);
    let x1 = (target.width - CONFIGURE_INSET_X).max(target.width / 2.0);
    let title_rect = Rect::new(x0, gap, x1, gap + title_h);
    let hint_rect = Rect::new(x0, 2.0 * gap + title_h, x1, 2.0 * gap + title_h + hint_h);

    vec![
        DrawPrimitive::Fill {
            rect: surface,
            paint: ColorValue::Gradient(gradient),
            corner_radius: 0.0,
        },
        DrawPrimitive::Text(centered_text(
            title_rect,
            title,
            Rgba::WHITE,
            FontWeight::Medium,
            TITLE_SIZE,
        )),
        DrawPrimitive::Text(centered_text(
            hint_rect,
            CONFIGURE_HINT,
            Rgba::WHITE,
            FontWeight::Medium,
            HINT_SIZE,
        )),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/layout/placeholder.rs"]
mod tests;
