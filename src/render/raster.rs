use kurbo::{Circle, RoundedRect, Shape};

use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{WdgtError, WdgtResult};
use crate::layout::primitive::{DrawPrimitive, ImageMask, ImagePlacement};
use crate::paint::color::{ColorValue, Rgba};

/// Settings for [`rasterize`].
#[derive(Clone, Debug)]
pub struct RasterSettings {
    /// Canvas color before any primitive is painted. `None` leaves it transparent.
    pub clear_rgba: Option<[u8; 4]>,
    /// Color standing in for image content, which is never fetched.
    pub image_placeholder: Rgba,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            clear_rgba: None,
            image_placeholder: Rgba::new(0.55, 0.57, 0.6, 1.0),
        }
    }
}

/// Paint `primitives` onto a `width` x `height` straight-alpha RGBA canvas.
///
/// A debugging aid: fills (solid or gradient, rounded or not) are painted exactly, images are
/// painted as flat placeholders inside their mask, and text runs and hit regions are skipped.
/// Coverage is sampled once per pixel center, so edges are aliased.
pub fn rasterize(
    primitives: &[DrawPrimitive],
    width: u32,
    height: u32,
    settings: &RasterSettings,
) -> WdgtResult<image::RgbaImage> {
    if width == 0 || height == 0 {
        return Err(WdgtError::validation("raster size must be non-zero"));
    }

    let clear = settings
        .clear_rgba
        .map(|[r, g, b, a]| {
            Rgba::new(
                f64::from(r) / 255.0,
                f64::from(g) / 255.0,
                f64::from(b) / 255.0,
                f64::from(a) / 255.0,
            )
        })
        .unwrap_or(Rgba::new(0.0, 0.0, 0.0, 0.0));
    let mut canvas = Canvas {
        width,
        height,
        px: vec![clear; (width as usize) * (height as usize)],
    };

    for prim in primitives {
        match prim {
            DrawPrimitive::Fill {
                rect,
                paint,
                corner_radius,
            } => canvas.fill(*rect, paint, *corner_radius),
            DrawPrimitive::Image(img) => canvas.image(img, settings.image_placeholder),
            DrawPrimitive::Text(run) => {
                tracing::trace!(text = %run.text, "text runs are not rasterized");
            }
            DrawPrimitive::HitRegion { .. } => {}
        }
    }

    Ok(canvas.into_image())
}

struct Canvas {
    width: u32,
    height: u32,
    px: Vec<Rgba>,
}

impl Canvas {
    fn fill(&mut self, rect: Rect, paint: &ColorValue, corner_radius: f64) {
        let shape = RoundedRect::from_rect(rect, corner_radius.max(0.0));
        self.paint_where(rect, rect, |p| shape.contains(p), |p| match paint {
            ColorValue::Solid(c) => *c,
            ColorValue::Gradient(g) => g.color_at(rect, p),
        });
    }

    fn image(&mut self, img: &ImagePlacement, color: Rgba) {
        let frame = img.frame;
        match img.mask {
            ImageMask::Rectangle => {
                self.paint_where(frame, img.clip, |p| frame.contains(p), |_| color);
            }
            ImageMask::Circle => {
                let circle = Circle::new(frame.center(), frame.width().min(frame.height()) / 2.0);
                self.paint_where(frame, img.clip, |p| circle.contains(p), |_| color);
            }
        }
    }

    /// Blend `color(p)` over every pixel whose center is inside `bounds`, `clip` and `inside`.
    fn paint_where(
        &mut self,
        bounds: Rect,
        clip: Rect,
        inside: impl Fn(Point) -> bool,
        color: impl Fn(Point) -> Rgba,
    ) {
        let area = bounds.intersect(clip);
        if area.width() <= 0.0 || area.height() <= 0.0 {
            return;
        }
        let (x0, x1) = pixel_span(area.x0, area.x1, self.width);
        let (y0, y1) = pixel_span(area.y0, area.y1, self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if !clip.contains(p) || !inside(p) {
                    continue;
                }
                let idx = (y as usize) * (self.width as usize) + (x as usize);
                self.px[idx] = over(color(p), self.px[idx]);
            }
        }
    }

    fn into_image(self) -> image::RgbaImage {
        let mut out = image::RgbaImage::new(self.width, self.height);
        for (dst, src) in out.pixels_mut().zip(self.px) {
            *dst = image::Rgba(src.to_rgba8());
        }
        out
    }
}

fn pixel_span(lo: f64, hi: f64, limit: u32) -> (u32, u32) {
    let clamp = |v: f64| v.clamp(0.0, f64::from(limit)) as u32;
    (clamp(lo.floor()), clamp(hi.ceil()))
}

/// Straight-alpha source-over.
fn over(src: Rgba, dst: Rgba) -> Rgba {
    let sa = src.a.clamp(0.0, 1.0);
    let da = dst.a.clamp(0.0, 1.0) * (1.0 - sa);
    let a = sa + da;
    if a <= 0.0 {
        return Rgba::new(0.0, 0.0, 0.0, 0.0);
    }
    Rgba::new(
        (src.r * sa + dst.r * da) / a,
        (src.g * sa + dst.g * da) / a,
        (src.b * sa + dst.b * da) / a,
        a,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
