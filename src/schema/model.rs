use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::foundation::core::Size;

/// Default point size for text runs.
pub const DEFAULT_TEXT_SIZE: f64 = 18.0;
/// Default shrink-to-fit floor for text runs.
pub const DEFAULT_MIN_SCALE_FACTOR: f64 = 1.0;

/// Key in [`WidgetDefinition::data`] whose value opens when the whole surface is activated.
pub const CONTENT_URL_KEY: &str = "content_url";

/// A decoded widget description that has not been stamped with its resolved id yet.
///
/// Produced by [`crate::decode`]; turned into an immutable [`WidgetDefinition`] with
/// [`DraftDefinition::finalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftDefinition {
    /// Human-readable name.
    pub name: String,
    /// Optional long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the producer last changed the content (ISO-8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_last_modified: Option<DateTime<Utc>>,
    /// Producer-defined version number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Content substitution values referenced by `data_ref` / `link_url_data_ref`.
    pub data: IndexMap<String, String>,
    /// Preferred layout name; may dangle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_layout: Option<String>,
    /// Layout used for thumbnails; may dangle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_layout: Option<String>,
    /// Presentation order of layouts; may reference missing layouts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_display_order: Option<Vec<String>>,
    /// Named layouts in source order.
    pub layouts: IndexMap<String, Layout>,
}

impl DraftDefinition {
    /// Drop every `extra_large` layout (and matching display-order entries) unless the target
    /// supports that size. Both collections are filtered together.
    pub fn retain_supported_sizes(&mut self, supports_extra_large: bool) {
        if supports_extra_large {
            return;
        }
        let before = self.layouts.len();
        self.layouts
            .retain(|_, layout| layout.size != SizeClass::ExtraLarge);
        let layouts = &self.layouts;
        if let Some(order) = self.layout_display_order.as_mut() {
            order.retain(|name| layouts.contains_key(name));
        }
        let dropped = before - self.layouts.len();
        if dropped > 0 {
            tracing::debug!(dropped, "filtered extra_large layouts");
        }
    }

    /// Stamp the resolved id and freeze the definition.
    pub fn finalize(self, id: impl Into<String>) -> WidgetDefinition {
        WidgetDefinition {
            id: id.into(),
            def: self,
        }
    }
}

/// An immutable widget description identified by its canonical source URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetDefinition {
    id: String,
    #[serde(flatten)]
    def: DraftDefinition,
}

impl WidgetDefinition {
    /// Canonical source URL (the final URL after redirects).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Optional long description.
    pub fn description(&self) -> Option<&str> {
        self.def.description.as_deref()
    }

    /// Producer-supplied last-modified timestamp.
    pub fn content_last_modified(&self) -> Option<DateTime<Utc>> {
        self.def.content_last_modified
    }

    /// Producer-supplied version.
    pub fn version(&self) -> Option<i64> {
        self.def.version
    }

    /// Content substitution map.
    pub fn data(&self) -> &IndexMap<String, String> {
        &self.def.data
    }

    /// Look up one `data` value.
    pub fn data_value(&self, key: &str) -> Option<&str> {
        self.def.data.get(key).map(String::as_str)
    }

    /// All layouts in source order.
    pub fn layouts(&self) -> &IndexMap<String, Layout> {
        &self.def.layouts
    }

    /// Look up a layout by name.
    pub fn layout(&self, name: &str) -> Option<&Layout> {
        self.def.layouts.get(name)
    }

    /// `layout_display_order` when present, else layout-map insertion order.
    ///
    /// Entries are returned as written and may name layouts that do not exist.
    pub fn display_order(&self) -> Vec<&str> {
        match &self.def.layout_display_order {
            Some(order) => order.iter().map(String::as_str).collect(),
            None => self.def.layouts.keys().map(String::as_str).collect(),
        }
    }

    /// `default_layout` when it resolves, else the first resolvable name in display order.
    pub fn default_layout_name(&self) -> Option<&str> {
        if let Some(name) = self.def.default_layout.as_deref()
            && self.def.layouts.contains_key(name)
        {
            return Some(name);
        }
        self.display_order()
            .into_iter()
            .find(|name| self.def.layouts.contains_key(*name))
    }

    /// Thumbnail layout: `thumbnail_layout` or the first layout, but only if it exists and is
    /// small.
    pub fn thumbnail_layout_name(&self) -> Option<&str> {
        let name = match self.def.thumbnail_layout.as_deref() {
            Some(name) => name,
            None => self.def.layouts.keys().next()?.as_str(),
        };
        match self.def.layouts.get(name) {
            Some(layout) if layout.size == SizeClass::Small => Some(name),
            _ => None,
        }
    }

    /// `data["content_url"]`, the whole-surface activation target.
    pub fn content_url(&self) -> Option<&str> {
        self.data_value(CONTENT_URL_KEY)
    }

    /// Borrow the underlying fields.
    pub fn as_draft(&self) -> &DraftDefinition {
        &self.def
    }
}

/// Size tag of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    /// 141 x 141.
    Small,
    /// 292 x 141.
    Medium,
    /// 292 x 311.
    Large,
    /// 634.5 x 305.5; filtered out on targets without extra-large support.
    ExtraLarge,
    /// Any unrecognized tag; laid out with the small footprint.
    #[serde(other)]
    Unknown,
}

impl SizeClass {
    /// Fixed pixel footprint for this size.
    pub fn footprint(self) -> Size {
        match self {
            Self::Small | Self::Unknown => Size::new(141.0, 141.0),
            Self::Medium => Size::new(292.0, 141.0),
            Self::Large => Size::new(292.0, 311.0),
            Self::ExtraLarge => Size::new(634.5, 305.5),
        }
    }

    /// Wire name of the size tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::ExtraLarge => "extra_large",
            Self::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for SizeClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            "extra_large" => Ok(Self::ExtraLarge),
            other => Err(format!("unknown size class \"{other}\"")),
        }
    }
}

/// One visual arrangement for one size class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Size class, which fixes the preview footprint.
    pub size: SizeClass,
    /// Named color and font styles.
    pub styles: Styles,
    /// Layers, back to front.
    pub layers: Vec<Layer>,
}

/// Per-layout style table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Styles {
    /// Named color styles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<IndexMap<String, ColorStyle>>,
    /// Named font styles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts: Option<IndexMap<String, FontStyle>>,
}

impl Styles {
    /// Raw color string of a named color style.
    pub fn color(&self, name: &str) -> Option<&str> {
        self.colors.as_ref()?.get(name).map(|c| c.color.as_str())
    }

    /// Font family of a named font style, if it names one.
    pub fn font_family(&self, name: &str) -> Option<&str> {
        self.fonts.as_ref()?.get(name)?.family.as_deref()
    }
}

/// A named color: `#RRGGBB[AA]` or `linear-gradient(...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStyle {
    /// Editor label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Color expression.
    pub color: String,
}

/// A named font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    /// Editor label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Font family; absent means the system font.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

/// A stack of rows covering the surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Rows, top to bottom.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Row>>,
}

/// A horizontal band of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Height in grid units.
    pub height: f64,
    /// Cells, left to right.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<Cell>>,
}

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Width in grid units.
    pub width: f64,
    /// Uniform padding in grid units (scaled by the surface width).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    /// Color style name for the cell background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color_style: Option<String>,
    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextNode>,
    /// Image content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageNode>,
    /// `data` key holding the URL opened when this cell is activated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url_data_ref: Option<String>,
}

impl Cell {
    /// Resolve the activation URL through `data`.
    pub fn link_url<'a>(&self, data: &'a IndexMap<String, String>) -> Option<&'a str> {
        data.get(self.link_url_data_ref.as_deref()?)
            .map(String::as_str)
    }
}

/// Text run description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    /// Literal text; takes precedence over `data_ref`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,
    /// `data` key holding the text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_ref: Option<String>,
    /// Color style name (default white).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_style: Option<String>,
    /// Font style name (default system font).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    /// Point size (default 18).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Weight (default medium).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<FontWeight>,
    /// Justification (default center).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<Justification>,
    /// Shrink-to-fit floor (default 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_scale_factor: Option<f64>,
}

impl TextNode {
    /// Literal string, else the `data` lookup.
    pub fn resolve<'a>(&'a self, data: &'a IndexMap<String, String>) -> Option<&'a str> {
        if let Some(s) = self.string.as_deref() {
            return Some(s);
        }
        data.get(self.data_ref.as_deref()?).map(String::as_str)
    }

    /// Point size with the default applied.
    pub fn size_or_default(&self) -> f64 {
        self.size.unwrap_or(DEFAULT_TEXT_SIZE)
    }

    /// Weight with the default applied.
    pub fn weight_or_default(&self) -> FontWeight {
        match self.weight {
            None | Some(FontWeight::Unknown) => FontWeight::Medium,
            Some(w) => w,
        }
    }

    /// Justification with the default applied.
    pub fn justification_or_default(&self) -> Justification {
        match self.justification {
            None | Some(Justification::Unknown) => Justification::Center,
            Some(j) => j,
        }
    }

    /// Minimum scale factor with the default applied.
    pub fn min_scale_factor_or_default(&self) -> f64 {
        self.min_scale_factor.unwrap_or(DEFAULT_MIN_SCALE_FACTOR)
    }
}

/// Font weight tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    /// Light.
    Light,
    /// Medium (default).
    Medium,
    /// Bold.
    Bold,
    /// Extra bold / heavy.
    ExtraBold,
    /// Unrecognized weight; treated as medium.
    #[serde(other)]
    Unknown,
}

/// Horizontal justification tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justification {
    /// Leading edge.
    Left,
    /// Centered (default).
    Center,
    /// Trailing edge.
    Right,
    /// Unrecognized value; treated as center.
    #[serde(other)]
    Unknown,
}

/// Image description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageNode {
    /// `data` key holding the image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_ref: Option<String>,
    /// Literal image URL; takes precedence over `data_ref`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Clip shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<Mask>,
}

impl ImageNode {
    /// Literal URL, else the `data` lookup.
    pub fn resolve<'a>(&'a self, data: &'a IndexMap<String, String>) -> Option<&'a str> {
        if let Some(url) = self.url.as_deref() {
            return Some(url);
        }
        data.get(self.data_ref.as_deref()?).map(String::as_str)
    }
}

/// Image mask tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mask {
    /// No mask (rectangle).
    #[serde(rename = "none", alias = "rectangle")]
    Rectangle,
    /// Circle inscribed in the content rect.
    Circle,
    /// Unrecognized mask; treated as a rectangle.
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
#[path = "../../tests/unit/schema/model.rs"]
mod tests;
