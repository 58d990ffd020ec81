#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use crate::consts::CANCEL_MARGIN_PX;
use crate::platform::InputKind;

/// A point in client or corrected ("real") coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.hypot(dy)
    }
}

/// The visible viewport in client pixels.
///
/// Sourced from the visual-viewport API when available, otherwise the
/// document client dimensions, so that a side panel shrinking the usable
/// width is reflected without explicit invalidation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether a client-space point lies in the cancellation zone: within
    /// [`CANCEL_MARGIN_PX`] of any viewport edge.
    #[must_use]
    pub fn in_cancel_zone(&self, x: f64, y: f64) -> bool {
        x < CANCEL_MARGIN_PX
            || x > self.width - CANCEL_MARGIN_PX
            || y < CANCEL_MARGIN_PX
            || y > self.height - CANCEL_MARGIN_PX
    }
}

/// Convert a raw client coordinate into a "real" coordinate.
///
/// Touch input reports coordinates in the scaled visual viewport, so they
/// are divided by the viewport scale; mouse and pointer input pass through.
#[must_use]
pub fn real_coordinate(client_coord: f64, input: InputKind, viewport_scale: f64) -> f64 {
    if input == InputKind::Touch && viewport_scale > 0.0 {
        client_coord / viewport_scale
    } else {
        client_coord
    }
}

/// Compose the effective page zoom from the browser zoom (outer vs inner
/// width) and the CSS pinch zoom (inner width vs visual viewport width).
///
/// Element-level `zoom`/`transform: scale` factors multiply on top; callers
/// that cannot read computed styles pass `1.0`.
#[must_use]
pub fn page_zoom(outer_width: f64, inner_width: f64, visual_width: f64, element_zoom: f64) -> f64 {
    let browser_zoom = if inner_width > 0.0 {
        outer_width / inner_width
    } else {
        1.0
    };
    let css_zoom = if visual_width > 0.0 {
        inner_width / visual_width
    } else {
        1.0
    };
    element_zoom * browser_zoom.max(css_zoom)
}
