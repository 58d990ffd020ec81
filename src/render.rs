//! The trail surface: a full-visible-viewport canvas that draws the live
//! gesture path and fades it out afterwards.
//!
//! This module is the only place that touches
//! [`web_sys::CanvasRenderingContext2d`]. Fallible Canvas2D/DOM calls are
//! trapped and logged here; recognition never depends on the surface, so a
//! page where canvas creation fails simply tracks without visual feedback.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{RESIZE_DEBOUNCE_MS, TRAIL_LINE_WIDTH};
use crate::dom;
use crate::trail::{FadeStatus, Trail};

/// Base stroke color of the trail at full opacity.
const STROKE_RGB: (u8, u8, u8) = (70, 130, 180);

/// Stroke alpha used while the gesture is live.
const LIVE_ALPHA: f64 = 0.8;

const CANVAS_ID: &str = "motiontrail-canvas";

/// Snapshot of the renderer, for debug accessors.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RendererStatus {
    pub active: bool,
    pub point_count: usize,
    pub width: f64,
    pub height: f64,
}

type FadeHandle = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

struct Surface {
    canvas: Option<HtmlCanvasElement>,
    ctx: Option<CanvasRenderingContext2d>,
    trail: Trail,
    /// CSS-pixel size of the surface, also the clear-rect extent.
    css_width: f64,
    css_height: f64,
    active: bool,
    fading: bool,
    raf_id: Option<i32>,
    fade_handle: Option<FadeHandle>,
    /// Zero-delay timer that drops the fade closure once it has returned.
    handle_release: Option<Timeout>,
    resize_listener: Option<Closure<dyn FnMut()>>,
    resize_debounce: Option<Timeout>,
}

impl Surface {
    fn new() -> Self {
        Self {
            canvas: None,
            ctx: None,
            trail: Trail::new(),
            css_width: 0.0,
            css_height: 0.0,
            active: false,
            fading: false,
            raf_id: None,
            fade_handle: None,
            handle_release: None,
            resize_listener: None,
            resize_debounce: None,
        }
    }

    fn setup_context(&self) {
        if let Some(ctx) = &self.ctx {
            ctx.set_line_cap("round");
            ctx.set_line_join("round");
            ctx.set_line_width(TRAIL_LINE_WIDTH);
            ctx.set_stroke_style_str(&stroke_style(LIVE_ALPHA));
        }
    }

    /// Size the backing store to the visible viewport at device resolution
    /// and counter page zoom with an inverse CSS scale.
    fn apply_dimensions(&mut self) -> Result<(), JsValue> {
        let (Some(canvas), Some(ctx)) = (&self.canvas, &self.ctx) else {
            return Ok(());
        };

        let viewport = dom::visible_viewport();
        let dpr = dom::device_pixel_ratio();
        let zoom = dom::page_zoom();

        self.css_width = viewport.width;
        self.css_height = viewport.height;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            canvas.set_width((viewport.width * dpr).max(1.0) as u32);
            canvas.set_height((viewport.height * dpr).max(1.0) as u32);
        }

        let mut styles = vec![
            ("position", "fixed".to_owned()),
            ("top", "0".to_owned()),
            ("left", "0".to_owned()),
            ("width", format!("{:.0}px", viewport.width)),
            ("height", format!("{:.0}px", viewport.height)),
            ("z-index", "2147483647".to_owned()),
            ("background", "transparent".to_owned()),
            ("pointer-events", "none".to_owned()),
        ];
        if (zoom - 1.0).abs() > f64::EPSILON && zoom > 0.0 {
            styles.push(("transform", format!("scale({})", 1.0 / zoom)));
            styles.push(("transform-origin", "0 0".to_owned()));
        }
        let style_refs: Vec<(&str, &str)> =
            styles.iter().map(|(k, v)| (*k, v.as_str())).collect();
        dom::apply_styles(canvas, &style_refs);

        // Draw in CSS pixels on the device-resolution backing store.
        ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        self.setup_context();
        Ok(())
    }

    fn clear(&self) {
        if let Some(ctx) = &self.ctx {
            ctx.clear_rect(0.0, 0.0, self.css_width, self.css_height);
        }
    }

    /// Redraw the full polyline through all retained points.
    fn draw_path(&self, alpha: f64) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        self.clear();

        let points = self.trail.points();
        if points.len() < 2 {
            return;
        }

        ctx.set_stroke_style_str(&stroke_style(alpha));
        ctx.set_line_width(TRAIL_LINE_WIDTH);
        ctx.begin_path();
        ctx.move_to(points[0].x, points[0].y);
        for point in &points[1..] {
            ctx.line_to(point.x, point.y);
        }
        ctx.stroke();
    }

    /// One fade frame: decrement alphas, redraw at the maximum remaining
    /// alpha, report whether another frame is needed.
    fn fade_frame(&mut self) -> FadeStatus {
        if !self.active {
            return FadeStatus::Finished;
        }
        let status = self.trail.fade_tick();
        if status == FadeStatus::Continue {
            self.draw_path(self.trail.max_alpha());
        }
        status
    }

    fn cancel_raf(&mut self) {
        if let Some(id) = self.raf_id.take() {
            if let Some(window) = dom::window() {
                if let Err(err) = window.cancel_animation_frame(id) {
                    log::warn!("cancel_animation_frame failed: {err:?}");
                }
            }
        }
    }

    /// Release everything except the fade closure itself. Called from inside
    /// the fade callback, which must not drop the closure it is running in.
    fn retire(&mut self) {
        self.active = false;
        self.fading = false;
        self.raf_id = None;
        self.resize_debounce = None;
        if let Some(listener) = self.resize_listener.take() {
            if let Some(window) = dom::window() {
                for event in ["resize", "orientationchange"] {
                    if let Err(err) = window.remove_event_listener_with_callback(
                        event,
                        listener.as_ref().unchecked_ref(),
                    ) {
                        log::warn!("failed to remove {event} listener: {err:?}");
                    }
                }
            }
        }
        if let Some(canvas) = self.canvas.take() {
            canvas.remove();
        }
        self.ctx = None;
        self.trail.clear();
    }

    /// Full teardown, including the fade closure. Only callable from outside
    /// the fade callback.
    fn teardown(&mut self) {
        self.cancel_raf();
        self.retire();
        self.handle_release = None;
        if let Some(handle) = self.fade_handle.take() {
            handle.borrow_mut().take();
        }
    }
}

/// Owns the trail canvas and its animation/resize callbacks.
///
/// Recreating while active tears the previous surface down first;
/// [`TrailRenderer::destroy`] is safe to call any number of times.
pub struct TrailRenderer {
    inner: Rc<RefCell<Surface>>,
}

impl Default for TrailRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrailRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Rc::new(RefCell::new(Surface::new())) }
    }

    /// Allocate the drawing surface. Returns `false` (after logging) when
    /// the document or a 2D context is unavailable; the caller continues
    /// without visual feedback.
    pub fn create(&self) -> bool {
        self.destroy();

        let Some(document) = dom::document() else {
            log::warn!("trail surface unavailable: no document");
            return false;
        };
        let Some(body) = document.body() else {
            log::warn!("trail surface unavailable: document body not ready");
            return false;
        };

        let canvas: HtmlCanvasElement = match document.create_element("canvas") {
            Ok(element) => element.unchecked_into(),
            Err(err) => {
                log::error!("failed to create trail canvas: {err:?}");
                return false;
            }
        };
        canvas.set_id(CANVAS_ID);

        let ctx = match canvas.get_context("2d") {
            Ok(Some(obj)) => match obj.dyn_into::<CanvasRenderingContext2d>() {
                Ok(ctx) => ctx,
                Err(_) => {
                    log::error!("trail canvas returned a non-2d context");
                    return false;
                }
            },
            Ok(None) => {
                log::error!("trail canvas has no 2d context");
                return false;
            }
            Err(err) => {
                log::error!("failed to get 2d context: {err:?}");
                return false;
            }
        };

        {
            let mut surface = self.inner.borrow_mut();
            surface.canvas = Some(canvas.clone());
            surface.ctx = Some(ctx);
            surface.trail.clear();
            surface.active = true;
            surface.fading = false;
            if let Err(err) = surface.apply_dimensions() {
                log::warn!("failed to size trail surface: {err:?}");
            }
        }

        if let Err(err) = body.append_child(&canvas) {
            log::error!("failed to attach trail canvas: {err:?}");
            self.destroy();
            return false;
        }

        self.install_resize_listener();
        true
    }

    /// Append a corrected point and redraw the live path.
    pub fn add_point(&self, x: f64, y: f64) {
        let mut surface = self.inner.borrow_mut();
        if !surface.active || surface.ctx.is_none() {
            return;
        }
        surface.trail.add_point(x, y, dom::now_ms());
        surface.draw_path(LIVE_ALPHA);
    }

    /// Begin the frame-driven fade-out. The loop decrements every point's
    /// alpha each frame and destroys the surface when nothing visible
    /// remains. A no-op when the surface is inactive or already fading.
    pub fn start_fade_out(&self) {
        {
            let mut surface = self.inner.borrow_mut();
            if !surface.active || surface.fading {
                return;
            }
            surface.fading = true;
        }

        let handle: FadeHandle = Rc::new(RefCell::new(None));
        let weak_surface = Rc::downgrade(&self.inner);
        let weak_handle = Rc::downgrade(&handle);

        let closure = Closure::<dyn FnMut()>::new(move || {
            let Some(inner) = weak_surface.upgrade() else {
                return;
            };
            let status = inner.borrow_mut().fade_frame();
            let finished = match status {
                FadeStatus::Continue => {
                    let again = weak_handle
                        .upgrade()
                        .and_then(|h| schedule_frame(&inner, &h));
                    again.is_none()
                }
                FadeStatus::Finished => true,
            };
            if finished {
                inner.borrow_mut().retire();
                release_fade_handle_later(&inner);
            }
        });
        *handle.borrow_mut() = Some(closure);

        {
            let mut surface = self.inner.borrow_mut();
            surface.fade_handle = Some(Rc::clone(&handle));
        }
        if schedule_frame(&self.inner, &handle).is_none() {
            self.inner.borrow_mut().teardown();
        }
    }

    /// Tear everything down: pending frames, timers, listeners, the canvas
    /// element, and all points. Idempotent.
    pub fn destroy(&self) {
        self.inner.borrow_mut().teardown();
    }

    /// Debug snapshot.
    #[must_use]
    pub fn status(&self) -> RendererStatus {
        let surface = self.inner.borrow();
        RendererStatus {
            active: surface.active,
            point_count: surface.trail.len(),
            width: surface.css_width,
            height: surface.css_height,
        }
    }

    /// Debounced resize/orientation handling: after a quiet period the
    /// surface re-measures the viewport and redraws any existing path.
    fn install_resize_listener(&self) {
        let Some(window) = dom::window() else {
            return;
        };
        let weak = Rc::downgrade(&self.inner);
        let listener = Closure::<dyn FnMut()>::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let weak_again = Rc::downgrade(&inner);
            let debounce = Timeout::new(RESIZE_DEBOUNCE_MS, move || {
                let Some(inner) = weak_again.upgrade() else {
                    return;
                };
                let mut surface = inner.borrow_mut();
                if !surface.active {
                    return;
                }
                if let Err(err) = surface.apply_dimensions() {
                    log::warn!("trail surface resize failed: {err:?}");
                }
                if !surface.trail.is_empty() {
                    surface.draw_path(LIVE_ALPHA);
                }
            });
            // Replacing the handle drops (cancels) the previous pending one.
            inner.borrow_mut().resize_debounce = Some(debounce);
        });

        for event in ["resize", "orientationchange"] {
            if let Err(err) = window
                .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
            {
                log::warn!("failed to add {event} listener: {err:?}");
            }
        }
        self.inner.borrow_mut().resize_listener = Some(listener);
    }
}

impl Drop for TrailRenderer {
    fn drop(&mut self) {
        self.inner.borrow_mut().teardown();
    }
}

/// Drop the fade closure on a zero-delay timer. The closure calls this from
/// its final invocation, so the actual drop has to happen after it returns.
fn release_fade_handle_later(inner: &Rc<RefCell<Surface>>) {
    let weak = Rc::downgrade(inner);
    let timer = Timeout::new(0, move || {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let handle = inner.borrow_mut().fade_handle.take();
        if let Some(handle) = handle {
            handle.borrow_mut().take();
        }
    });
    inner.borrow_mut().handle_release = Some(timer);
}

/// Request one animation frame running `handle`'s closure. Returns the frame
/// id, or `None` when scheduling is impossible.
fn schedule_frame(inner: &Rc<RefCell<Surface>>, handle: &FadeHandle) -> Option<i32> {
    let window = dom::window()?;
    let borrowed = handle.borrow();
    let closure = borrowed.as_ref()?;
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => {
            inner.borrow_mut().raf_id = Some(id);
            Some(id)
        }
        Err(err) => {
            log::warn!("request_animation_frame failed: {err:?}");
            None
        }
    }
}

fn stroke_style(alpha: f64) -> String {
    let (r, g, b) = STROKE_RGB;
    format!("rgba({r}, {g}, {b}, {:.3})", alpha.clamp(0.0, 1.0))
}
