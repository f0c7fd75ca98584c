//! wdgt interprets remotely hosted JSON widget definitions.
//!
//! A definition names a set of layouts (a 12x12 grid of rows and cells), a style sheet and a
//! flat data dictionary. The crate is organised around the lifecycle of one widget:
//!
//! - [`decode`] bytes into a [`DraftDefinition`], rejecting missing required properties
//! - resolve ids through a [`FetchPipeline`] (cache first or live, Basic auth, final-URL stamping)
//! - [`render`] a layout into a flat list of [`DrawPrimitive`]s for a host renderer
//! - drive the in-app layout picker with a [`CarouselController`]
//! - assemble home-screen timeline [`Entry`]s with a [`TimelineAssembler`]
//!
//! [`rasterize`] paints primitive lists to an image for inspection.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

mod carousel;
mod deeplink;
mod fetch;
mod layout;
mod paint;
mod render;
mod schema;
mod timeline;

pub use crate::foundation::core::{Point, Rect, Size, UnitPoint};
pub use crate::foundation::error::{WdgtError, WdgtResult};

pub use crate::carousel::controller::{
    CarouselController, CarouselOpts, CarouselPage, PageVisual, preview_scale,
};
pub use crate::deeplink::{
    DeepLink, SCHEME, normalize_widget_input, percent_decode, percent_encode,
    percent_encode_path,
};
pub use crate::fetch::cache::{CacheStore, FsCacheStore, MemoryCacheStore};
pub use crate::fetch::error::{GENERIC_ERROR, ResolveError};
pub use crate::fetch::pipeline::{
    FetchPipeline, PipelineOpts, RequestToken, ResolveOutcome, Source, is_requestable,
    request_headers,
};
pub use crate::fetch::transport::{
    FileTransport, HttpResponse, Transport, file_url_to_path, path_to_file_url,
};
pub use crate::layout::engine::{Appearance, RenderOpts, render, render_with};
pub use crate::layout::placeholder::{CONFIGURE_HINT, render_configure_placeholder};
pub use crate::layout::primitive::{
    DrawPrimitive, FontFamily, HAlign, ImageMask, ImagePlacement, ImageScaling, TextRun,
};
pub use crate::paint::color::{ColorValue, Rgba};
pub use crate::paint::gradient::{LinearGradient, angle_to_points, parse_linear_gradient};
pub use crate::render::raster::{RasterSettings, rasterize};
pub use crate::schema::model::{
    CONTENT_URL_KEY, Cell, ColorStyle, DEFAULT_MIN_SCALE_FACTOR, DEFAULT_TEXT_SIZE,
    DraftDefinition, FontStyle, FontWeight, ImageNode, Justification, Layer, Layout, Mask, Row,
    SizeClass, Styles, TextNode, WidgetDefinition,
};
pub use crate::schema::validate::{DefinitionError, decode};
pub use crate::timeline::assembler::{
    Entry, Subscription, TimelineAssembler, TimelineOpts, WidgetOption, configurable_options,
    prune_dangling_cache, select_subscription,
};
