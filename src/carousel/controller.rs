use serde::Serialize;

use crate::foundation::math::signed_remainder;
use crate::schema::model::{SizeClass, WidgetDefinition};

/// Tuning constants for [`CarouselController`].
#[derive(Clone, Debug)]
pub struct CarouselOpts {
    /// Pixels of live drag per page.
    pub drag_divisor: f64,
    /// Pixels of predicted fling per page.
    pub fling_divisor: f64,
    /// Distance wraps modulo `page_count * wrap_factor`.
    pub wrap_factor: f64,
    /// Horizontal spacing between neighbouring pages, in pixels.
    pub page_spacing: f64,
}

impl Default for CarouselOpts {
    fn default() -> Self {
        Self {
            drag_divisor: 200.0,
            fling_divisor: 300.0,
            wrap_factor: 5.0,
            page_spacing: 200.0,
        }
    }
}

/// One carousel page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CarouselPage {
    /// Layout name.
    pub name: String,
    /// Size class, if the layout exists.
    pub size: Option<SizeClass>,
}

/// Derived per-page values for the host renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PageVisual {
    /// Signed distance from the drag position.
    pub distance: f64,
    /// Overall scale (distance falloff times the size-class preview scale).
    pub scale: f64,
    /// Stacking order; higher is closer to the viewer.
    pub z_order: f64,
    /// Horizontal offset in pixels.
    pub x_offset: f64,
}

/// Drag-to-snap paging over a fixed list of layouts.
///
/// Driven from a single input stream; not meant for concurrent mutation.
#[derive(Clone, Debug)]
pub struct CarouselController {
    pages: Vec<CarouselPage>,
    drag: f64,
    snap: f64,
    opts: CarouselOpts,
}

impl CarouselController {
    /// Controller over `pages`, positioned on the first page.
    pub fn new(pages: Vec<CarouselPage>, opts: CarouselOpts) -> Self {
        Self {
            pages,
            drag: 0.0,
            snap: 0.0,
            opts,
        }
    }

    /// Pages in display order of `widget`.
    pub fn from_definition(widget: &WidgetDefinition, opts: CarouselOpts) -> Self {
        let pages = widget
            .display_order()
            .into_iter()
            .map(|name| CarouselPage {
                name: name.to_owned(),
                size: widget.layout(name).map(|l| l.size),
            })
            .collect();
        Self::new(pages, opts)
    }

    /// All pages.
    pub fn pages(&self) -> &[CarouselPage] {
        &self.pages
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// `true` when there are no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Continuous drag position.
    pub fn drag_position(&self) -> f64 {
        self.drag
    }

    /// Last committed position.
    pub fn snap_position(&self) -> f64 {
        self.snap
    }

    fn count(&self) -> f64 {
        self.pages.len() as f64
    }

    /// Signed wrapped distance between the drag position and page `index`.
    pub fn distance(&self, index: usize) -> f64 {
        signed_remainder(
            self.drag - index as f64,
            self.count() * self.opts.wrap_factor,
        )
    }

    /// Live drag update with horizontal translation `dx` (pixels).
    pub fn drag_changed(&mut self, dx: f64) {
        let upper = self.count() - 0.5;
        self.drag = (self.snap - dx / self.opts.drag_divisor)
            .min(upper)
            .max(-0.5);
    }

    /// Drag release with the predicted final translation. Returns the new current page.
    pub fn drag_ended(&mut self, predicted_dx: f64) -> Option<usize> {
        if self.pages.is_empty() {
            self.drag = 0.0;
            self.snap = 0.0;
            return None;
        }
        let target = (self.snap - predicted_dx / self.opts.fling_divisor).round();
        self.drag = target.max(0.0).min(self.count() - 1.0);
        self.snap = self.drag;
        let current = self.current_item();
        tracing::debug!(snap = self.snap, ?current, "carousel snapped");
        current
    }

    /// Page closest to the drag position; ties go to the lowest index.
    pub fn current_item(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for i in 0..self.pages.len() {
            let d = self.distance(i).abs();
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Name of [`CarouselController::current_item`].
    pub fn current_name(&self) -> Option<&str> {
        self.current_item().map(|i| self.pages[i].name.as_str())
    }

    /// Jump straight to the page called `name`. Unknown names leave the state unchanged.
    pub fn scroll_to(&mut self, name: &str) -> Option<usize> {
        let index = self.pages.iter().position(|p| p.name == name)?;
        self.drag = index as f64;
        self.snap = self.drag;
        Some(index)
    }

    /// Scale, z-order and offset of page `index` at the current drag position.
    pub fn page_visual(&self, index: usize) -> PageVisual {
        let distance = self.distance(index);
        let preview = self
            .pages
            .get(index)
            .and_then(|p| p.size)
            .map_or(1.0, preview_scale);
        PageVisual {
            distance,
            scale: (1.0 - distance.abs() * 0.4) * preview,
            z_order: 1.0 - distance.abs() * 0.6,
            x_offset: -distance * self.opts.page_spacing,
        }
    }
}

/// Extra shrink so tall layouts fit the carousel band.
pub fn preview_scale(size: SizeClass) -> f64 {
    match size {
        SizeClass::Large => 0.7,
        SizeClass::ExtraLarge => 0.65,
        _ => 1.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/carousel/controller.rs"]
mod tests;
