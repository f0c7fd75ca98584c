use indexmap::IndexMap;

use crate::deeplink::DeepLink;
use crate::foundation::core::{Point, Rect, Size, inset_uniform};
use crate::foundation::math::grid_to_px;
use crate::layout::placeholder::unknown_layout;
use crate::layout::primitive::{
    DrawPrimitive, FontFamily, HAlign, ImagePlacement, ImageScaling, TextRun,
};
use crate::paint::color::{ColorValue, Rgba};
use crate::schema::model::{Cell, Layout, Styles, WidgetDefinition};

/// Color scheme of the surrounding UI; only the unknown-layout placeholder depends on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Appearance {
    /// Light scheme.
    #[default]
    Light,
    /// Dark scheme.
    Dark,
}

/// Options for [`render_with`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOpts {
    /// Rendering an in-app preview: activation targets are not emitted.
    pub in_app: bool,
    /// Color scheme for placeholders.
    pub appearance: Appearance,
}

/// Lay out `layout_name` of `widget` at `target` size.
///
/// A name that does not resolve yields the unknown-layout placeholder. Pure and deterministic.
pub fn render(
    widget: &WidgetDefinition,
    layout_name: &str,
    target: Size,
    in_app: bool,
) -> Vec<DrawPrimitive> {
    render_with(
        widget,
        layout_name,
        target,
        &RenderOpts {
            in_app,
            ..RenderOpts::default()
        },
    )
}

/// [`render`] with explicit options.
pub fn render_with(
    widget: &WidgetDefinition,
    layout_name: &str,
    target: Size,
    opts: &RenderOpts,
) -> Vec<DrawPrimitive> {
    let surface = Rect::from_origin_size(Point::ORIGIN, target);
    let mut out = Vec::new();

    if !opts.in_app
        && let Some(url) = widget.content_url()
    {
        out.push(DrawPrimitive::HitRegion {
            rect: surface,
            link: DeepLink::LaunchUrl {
                url: url.to_owned(),
                id: widget.id().to_owned(),
            },
        });
    }

    match widget.layout(layout_name) {
        Some(layout) => {
            let ctx = CellCtx {
                widget,
                data: widget.data(),
                styles: &layout.styles,
                target,
                in_app: opts.in_app,
            };
            render_layers(&ctx, layout, &mut out);
        }
        None => {
            tracing::debug!(layout = layout_name, "layout not found, drawing placeholder");
            out.extend(unknown_layout(target, opts.appearance));
        }
    }
    out
}

struct CellCtx<'a> {
    widget: &'a WidgetDefinition,
    data: &'a IndexMap<String, String>,
    styles: &'a Styles,
    target: Size,
    in_app: bool,
}

/// Rows are stacked and centered vertically in each layer; cells are centered horizontally in
/// their row. Stacks that overflow the surface are centered too.
fn render_layers(ctx: &CellCtx<'_>, layout: &Layout, out: &mut Vec<DrawPrimitive>) {
    for layer in &layout.layers {
        let rows = layer.rows.as_deref().unwrap_or_default();
        let stack_units: f64 = rows.iter().map(|r| r.height.max(0.0)).sum();
        let mut y = centering_offset(stack_units, ctx.target.height);
        for row in rows {
            let row_h = grid_to_px(row.height, ctx.target.height).max(0.0);
            let cells = row.cells.as_deref().unwrap_or_default();
            let row_units: f64 = cells.iter().map(|c| c.width.max(0.0)).sum();
            let mut x = centering_offset(row_units, ctx.target.width);
            for (index, cell) in cells.iter().enumerate() {
                let cell_w = grid_to_px(cell.width, ctx.target.width).max(0.0);
                let frame = Rect::new(x, y, x + cell_w, y + row_h);
                render_cell(ctx, cell, index, frame, out);
                x += cell_w;
            }
            y += row_h;
        }
    }
}

/// Start of a run of `units` grid units centered along an axis of length `extent`.
fn centering_offset(units: f64, extent: f64) -> f64 {
    (extent - grid_to_px(units, extent)) / 2.0
}

fn render_cell(
    ctx: &CellCtx<'_>,
    cell: &Cell,
    index: usize,
    frame: Rect,
    out: &mut Vec<DrawPrimitive>,
) {
    if let Some(color) = cell
        .background_color_style
        .as_deref()
        .and_then(|name| ctx.styles.color(name))
    {
        out.push(DrawPrimitive::Fill {
            rect: frame,
            paint: ColorValue::parse(color),
            corner_radius: 0.0,
        });
    }

    // Padding is scaled by the surface width on every side.
    let padding = grid_to_px(cell.padding.unwrap_or(0.0), ctx.target.width);
    let content = inset_uniform(frame, padding);

    if let Some(source) = cell.image.as_ref().and_then(|img| img.resolve(ctx.data)) {
        out.push(DrawPrimitive::Image(ImagePlacement {
            frame: content,
            clip: frame,
            source: source.to_owned(),
            mask: cell.image.as_ref().and_then(|img| img.mask).into(),
            scaling: ImageScaling::Fill,
        }));
    }

    if let Some(text) = cell.text.as_ref()
        && let Some(s) = text.resolve(ctx.data)
        && !s.is_empty()
    {
        let paint = text
            .color_style
            .as_deref()
            .and_then(|name| ctx.styles.color(name))
            .map_or(ColorValue::Solid(Rgba::WHITE), ColorValue::parse);
        let font = text
            .font_style
            .as_deref()
            .and_then(|name| ctx.styles.font_family(name))
            .map_or(FontFamily::System, |f| FontFamily::Named(f.to_owned()));
        let align = HAlign::from(text.justification_or_default());
        out.push(DrawPrimitive::Text(TextRun {
            rect: content,
            clip: frame,
            text: s.to_owned(),
            paint,
            font,
            weight: text.weight_or_default(),
            size: text.size_or_default(),
            min_scale_factor: text.min_scale_factor_or_default(),
            text_align: align,
            box_align: align,
        }));
    }

    if !ctx.in_app
        && let Some(url) = cell.link_url(ctx.data)
    {
        out.push(DrawPrimitive::HitRegion {
            rect: frame,
            link: DeepLink::LinkUrl {
                url: url.to_owned(),
                id: ctx.widget.id().to_owned(),
                index: Some(index),
            },
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
