use super::*;
use crate::layout::primitive::{ImageMask, ImageScaling};
use crate::schema::model::{FontWeight, SizeClass};
use crate::schema::validate::decode;

fn hello() -> WidgetDefinition {
    decode(include_bytes!("../../data/hello_world.json"))
        .unwrap()
        .finalize("sample_id")
}

fn full() -> WidgetDefinition {
    decode(include_bytes!("../../data/full_widget.json"))
        .unwrap()
        .finalize("https://example.com/weather.json")
}

fn small() -> Size {
    SizeClass::Small.footprint()
}

#[test]
fn hello_world_in_app() {
    let prims = render(&hello(), "hello_small", small(), true);
    let surface = Rect::new(0.0, 0.0, 141.0, 141.0);
    assert_eq!(
        prims,
        vec![
            DrawPrimitive::Fill {
                rect: surface,
                paint: ColorValue::Solid(Rgba::parse_hex("#626DFF")),
                corner_radius: 0.0,
            },
            DrawPrimitive::Text(TextRun {
                rect: surface,
                clip: surface,
                text: "hello world".to_owned(),
                paint: ColorValue::Solid(Rgba::WHITE),
                font: FontFamily::System,
                weight: FontWeight::Medium,
                size: 18.0,
                min_scale_factor: 1.0,
                text_align: HAlign::Center,
                box_align: HAlign::Center,
            }),
        ]
    );
}

#[test]
fn home_screen_render_starts_with_launch_region() {
    let prims = render(&hello(), "hello_small", small(), false);
    assert_eq!(prims.len(), 3);
    assert_eq!(
        prims[0],
        DrawPrimitive::HitRegion {
            rect: Rect::new(0.0, 0.0, 141.0, 141.0),
            link: DeepLink::LaunchUrl {
                url: "https://wd.gt/".to_owned(),
                id: "sample_id".to_owned(),
            },
        }
    );
}

#[test]
fn grid_geometry_padding_and_links() {
    let w = full();
    let prims = render(&w, "board_small", small(), false);
    assert_eq!(prims.len(), 6, "{prims:#?}");

    // Background layer: full-surface gradient.
    match &prims[1] {
        DrawPrimitive::Fill { rect, paint, .. } => {
            assert_eq!(*rect, Rect::new(0.0, 0.0, 141.0, 141.0));
            assert!(paint.is_gradient());
        }
        other => panic!("expected gradient fill, got {other:?}"),
    }

    // Title row: 4/12 of the height, padding 0.5 grid units of the width.
    let DrawPrimitive::Text(title) = &prims[2] else {
        panic!("expected title text, got {:?}", prims[2]);
    };
    let pad = 0.5 * 141.0 / 12.0;
    assert_eq!(title.clip, Rect::new(0.0, 0.0, 141.0, 47.0));
    assert_eq!(title.rect, Rect::new(pad, pad, 141.0 - pad, 47.0 - pad));
    assert_eq!(title.text, "Lisbon");
    assert_eq!(title.font, FontFamily::Named("Avenir Next".to_owned()));
    assert_eq!(title.weight, FontWeight::Bold);
    assert_eq!(title.size, 20.0);
    assert_eq!(title.min_scale_factor, 0.5);
    assert_eq!(title.text_align, HAlign::Leading);
    assert_eq!(title.box_align, HAlign::Leading);
    assert_eq!(title.paint, ColorValue::Solid(Rgba::parse_hex("#FFFFFFCC")));

    // Second row: image cell then text cell with a link.
    let DrawPrimitive::Image(img) = &prims[3] else {
        panic!("expected image, got {:?}", prims[3]);
    };
    let pad = 141.0 / 12.0;
    assert_eq!(img.clip, Rect::new(0.0, 47.0, 70.5, 141.0));
    assert_eq!(img.frame, Rect::new(pad, 47.0 + pad, 70.5 - pad, 141.0 - pad));
    assert_eq!(img.source, "https://example.com/icons/sun.png");
    assert_eq!(img.mask, ImageMask::Circle);
    assert_eq!(img.scaling, ImageScaling::Fill);

    let DrawPrimitive::Text(temp) = &prims[4] else {
        panic!("expected text, got {:?}", prims[4]);
    };
    assert_eq!(temp.rect, Rect::new(70.5, 47.0, 141.0, 141.0));
    assert_eq!(temp.weight, FontWeight::ExtraBold);
    assert_eq!(temp.text_align, HAlign::Trailing);
    assert_eq!(temp.paint, ColorValue::Solid(Rgba::WHITE));

    assert_eq!(
        prims[5],
        DrawPrimitive::HitRegion {
            rect: Rect::new(70.5, 47.0, 141.0, 141.0),
            link: DeepLink::LinkUrl {
                url: "https://example.com/weather/lisbon?units=metric&lang=en".to_owned(),
                id: "https://example.com/weather.json".to_owned(),
                index: Some(1),
            },
        }
    );
}

#[test]
fn in_app_render_has_no_activation_targets() {
    let prims = render(&full(), "board_small", small(), true);
    assert!(
        prims
            .iter()
            .all(|p| !matches!(p, DrawPrimitive::HitRegion { .. }))
    );
    assert_eq!(prims.len(), 4);
}

#[test]
fn geometry_scales_with_target_size() {
    let prims = render(&full(), "board_medium", Size::new(584.0, 282.0), true);
    assert_eq!(prims[0].rect(), Rect::new(0.0, 0.0, 584.0 / 3.0, 282.0));
    let DrawPrimitive::Image(img) = &prims[2] else {
        panic!("expected image, got {:?}", prims[2]);
    };
    assert_eq!(img.frame.x0, 584.0 / 3.0);
    assert!((img.frame.x1 - 584.0).abs() < 1e-9);
    assert_eq!((img.frame.y0, img.frame.y1), (0.0, 282.0));
    assert_eq!(img.mask, ImageMask::Rectangle);
}

#[test]
fn render_is_deterministic() {
    let w = full();
    for name in ["board_small", "board_medium", "board_large", "nope"] {
        assert_eq!(
            render(&w, name, small(), false),
            render(&w, name, small(), false)
        );
    }
}

#[test]
fn missing_layout_yields_placeholder() {
    let prims = render(&hello(), "missing", small(), true);
    assert_eq!(prims, unknown_layout(small(), Appearance::Light));

    let prims = render(&hello(), "missing", small(), false);
    assert!(matches!(prims[0], DrawPrimitive::HitRegion { .. }));
    assert_eq!(&prims[1..], &unknown_layout(small(), Appearance::Light)[..]);
}

#[test]
fn unresolved_references_degrade_silently() {
    let json = serde_json::json!({
        "name": "refs",
        "data": { "empty": "" },
        "layouts": { "l": {
            "size": "small",
            "styles": { "colors": { "grad": { "color": "linear-gradient(90deg, #000000, #FFFFFF)" } } },
            "layers": [ { "rows": [ { "height": 12, "cells": [
                { "width": 3, "background_color_style": "nope", "link_url_data_ref": "nope" },
                { "width": 3, "text": { "data_ref": "missing" }, "image": { "data_ref": "missing" } },
                { "width": 3, "text": { "data_ref": "empty" } },
                { "width": 3, "text": { "string": "g", "color_style": "grad", "font_style": "nope" } }
            ] } ] } ]
        } }
    });
    let w = decode(&serde_json::to_vec(&json).unwrap()).unwrap().finalize("id");
    let prims = render(&w, "l", small(), false);
    assert_eq!(prims.len(), 1, "{prims:#?}");
    let DrawPrimitive::Text(run) = &prims[0] else {
        panic!("expected text");
    };
    assert!(run.paint.is_gradient());
    assert_eq!(run.font, FontFamily::System);
    assert_eq!(run.rect.x0, 3.0 * 141.0 / 12.0 * 3.0);
}

fn single_layer(rows: serde_json::Value) -> WidgetDefinition {
    let json = serde_json::json!({
        "name": "grid",
        "data": {},
        "layouts": { "l": {
            "size": "small",
            "styles": { "colors": { "c": { "color": "#FF0000" } } },
            "layers": [ { "rows": rows } ]
        } }
    });
    decode(&serde_json::to_vec(&json).unwrap())
        .unwrap()
        .finalize("id")
}

fn fill_rects(prims: &[DrawPrimitive]) -> Vec<Rect> {
    prims
        .iter()
        .filter(|p| matches!(p, DrawPrimitive::Fill { .. }))
        .map(DrawPrimitive::rect)
        .collect()
}

#[test]
fn underfilled_row_and_stack_are_centered() {
    let w = single_layer(serde_json::json!([
        { "height": 6, "cells": [ { "width": 6, "background_color_style": "c" } ] }
    ]));
    let prims = render(&w, "l", Size::new(120.0, 120.0), true);
    assert_eq!(fill_rects(&prims), vec![Rect::new(30.0, 30.0, 90.0, 90.0)]);
}

#[test]
fn rows_center_independently() {
    let w = single_layer(serde_json::json!([
        { "height": 3, "cells": [ { "width": 12, "background_color_style": "c" } ] },
        { "height": 3, "cells": [
            { "width": 2, "background_color_style": "c" },
            { "width": 4, "background_color_style": "c" }
        ] }
    ]));
    let prims = render(&w, "l", Size::new(120.0, 120.0), true);
    assert_eq!(
        fill_rects(&prims),
        vec![
            Rect::new(0.0, 30.0, 120.0, 60.0),
            Rect::new(30.0, 60.0, 50.0, 90.0),
            Rect::new(50.0, 60.0, 90.0, 90.0),
        ]
    );
}

#[test]
fn overflowing_row_is_centered_on_the_surface() {
    let w = single_layer(serde_json::json!([
        { "height": 12, "cells": [
            { "width": 8, "background_color_style": "c" },
            { "width": 8, "background_color_style": "c" }
        ] }
    ]));
    let prims = render(&w, "l", Size::new(120.0, 120.0), true);
    assert_eq!(
        fill_rects(&prims),
        vec![
            Rect::new(-20.0, 0.0, 60.0, 120.0),
            Rect::new(60.0, 0.0, 140.0, 120.0),
        ]
    );
}
