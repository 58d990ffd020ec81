//! Small web-sys helpers shared by the surface, overlays, and engine.
//!
//! Everything here degrades gracefully: a missing window/document yields a
//! `None`/identity value and a log line rather than an error that could
//! escape into the page.

use web_sys::{Document, HtmlElement, Window};

use crate::coords::Viewport;

pub(crate) fn window() -> Option<Window> {
    web_sys::window()
}

pub(crate) fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

pub(crate) fn body() -> Option<HtmlElement> {
    document().and_then(|d| d.body())
}

/// Milliseconds since the epoch, the engine's clock.
pub(crate) fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// The visible viewport: the visual-viewport API when available (it tracks
/// side panels and pinch zoom), else the document client dimensions.
pub(crate) fn visible_viewport() -> Viewport {
    if let Some(window) = window() {
        if let Some(vv) = window.visual_viewport() {
            return Viewport::new(vv.width(), vv.height());
        }
    }
    if let Some(root) = document().and_then(|d| d.document_element()) {
        return Viewport::new(f64::from(root.client_width()), f64::from(root.client_height()));
    }
    Viewport::new(0.0, 0.0)
}

pub(crate) fn device_pixel_ratio() -> f64 {
    window().map_or(1.0, |w| w.device_pixel_ratio())
}

/// Effective page zoom, composed from browser zoom and CSS pinch zoom.
/// Element-level zoom factors are not probed here; callers pass 1.0.
pub(crate) fn page_zoom() -> f64 {
    let Some(window) = window() else {
        return 1.0;
    };
    let outer = window
        .outer_width()
        .map_or(0.0, |v| v.as_f64().unwrap_or(0.0));
    let inner = window
        .inner_width()
        .map_or(0.0, |v| v.as_f64().unwrap_or(0.0));
    let visual = window.visual_viewport().map_or(inner, |vv| vv.width());
    crate::coords::page_zoom(outer, inner, visual, 1.0)
}

/// Mobile viewport scale from the viewport meta tag's `initial-scale`,
/// defaulting to 1.0.
pub(crate) fn viewport_scale() -> f64 {
    let Some(document) = document() else {
        return 1.0;
    };
    let meta = match document.query_selector("meta[name=\"viewport\"]") {
        Ok(found) => found,
        Err(err) => {
            log::warn!("viewport meta query failed: {err:?}");
            None
        }
    };
    meta.and_then(|el| el.get_attribute("content"))
        .and_then(|content| parse_initial_scale(&content))
        .unwrap_or(1.0)
}

/// Pull `initial-scale=<f64>` out of a viewport meta content string.
pub(crate) fn parse_initial_scale(content: &str) -> Option<f64> {
    content.split(',').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if key.trim() == "initial-scale" {
            value.trim().parse::<f64>().map_or(None, Some)
        } else {
            None
        }
    })
}

/// Apply a set of `!important` inline styles, logging any rejected property.
pub(crate) fn apply_styles(element: &HtmlElement, styles: &[(&str, &str)]) {
    let style = element.style();
    for (property, value) in styles {
        if let Err(err) = style.set_property_with_priority(property, value, "important") {
            log::warn!("failed to set style {property}: {err:?}");
        }
    }
}
