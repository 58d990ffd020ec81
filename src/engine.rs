//! The browser shell: owns every native listener, feeds normalized samples
//! to [`TrackerCore`], and applies the effects it returns to the trail
//! surface, the overlays, and the host callbacks.
//!
//! The split mirrors the rest of the crate: everything decision-shaped lives
//! in [`crate::tracker`] where it runs under plain `cargo test`; this module
//! only moves data between the DOM and the core.
//!
//! Host protocol: the page constructs a [`GestureEngine`], registers a
//! gesture listener and (optionally) a settings provider, then calls
//! [`GestureEngine::attach`]. The settings provider is invoked with no
//! arguments whenever fresh configuration is wanted; it responds by calling
//! [`GestureEngine::set_settings`] with a JSON payload, at which point the
//! refresh is considered settled.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Once;

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Event, EventTarget, MouseEvent, TouchEvent};

use crate::config::Settings;
use crate::dom;
use crate::input::{Phase, PointerSample};
use crate::overlay::Overlays;
use crate::platform::{InputKind, Platform, PlatformProfile};
use crate::render::TrailRenderer;
use crate::tracker::{Effect, TrackerCore, TrackerState};

static INIT: Once = Once::new();

fn init_runtime() {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            log::debug!("host page already installed a logger");
        }
    });
}

/// One registered native listener, removable on teardown.
struct Subscription {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

struct Inner {
    core: TrackerCore,
    renderer: TrailRenderer,
    overlays: Overlays,
    platform: Platform,
    input: InputKind,
    profile: PlatformProfile,
    viewport_scale: f64,
    activation_timer: Option<Timeout>,
    gesture_listener: Option<js_sys::Function>,
    settings_provider: Option<js_sys::Function>,
    /// A provider call is outstanding; cleared by `set_settings`.
    refresh_in_flight: bool,
    subscriptions: Vec<Subscription>,
    attached: bool,
}

impl Inner {
    fn teardown(&mut self) {
        for sub in self.subscriptions.drain(..) {
            if let Err(err) = sub.target.remove_event_listener_with_callback_and_bool(
                sub.event,
                sub.callback.as_ref().unchecked_ref(),
                true,
            ) {
                log::warn!("failed to remove {} listener: {err:?}", sub.event);
            }
        }
        self.activation_timer = None;
        self.renderer.destroy();
        self.overlays.teardown();
        self.attached = false;
    }
}

/// Pointer-gesture engine exported to the host page.
#[wasm_bindgen]
pub struct GestureEngine {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl GestureEngine {
    /// Probe the environment and build a detached engine. No listeners are
    /// registered until [`GestureEngine::attach`].
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        init_runtime();

        let (platform, input) = probe_environment();
        let profile = PlatformProfile::select(platform, input);
        log::info!(
            "gesture engine ready: platform={} input={}",
            platform.name(),
            input.name()
        );

        Self {
            inner: Rc::new(RefCell::new(Inner {
                core: TrackerCore::new(),
                renderer: TrailRenderer::new(),
                overlays: Overlays::new(),
                platform,
                input,
                profile,
                viewport_scale: 1.0,
                activation_timer: None,
                gesture_listener: None,
                settings_provider: None,
                refresh_in_flight: false,
                subscriptions: Vec::new(),
                attached: false,
            })),
        }
    }

    /// Register the native listener set. Idempotent; a second call while
    /// attached is a no-op. On failure nothing stays registered and the
    /// engine remains detached, so the call can be retried.
    pub fn attach(&self) -> Result<(), JsValue> {
        if self.inner.borrow().attached {
            return Ok(());
        }
        self.inner.borrow_mut().viewport_scale = dom::viewport_scale();

        let document = dom::document()
            .ok_or_else(|| JsValue::from_str("gesture engine requires a document"))?;
        let window =
            dom::window().ok_or_else(|| JsValue::from_str("gesture engine requires a window"))?;
        let doc_target: EventTarget = document.into();
        let win_target: EventTarget = window.into();

        if let Err(err) = self.wire_listeners(&doc_target, &win_target) {
            // Drop whatever got registered before the failure.
            self.inner.borrow_mut().teardown();
            return Err(err);
        }
        self.inner.borrow_mut().attached = true;

        // Ask the host for settings up front.
        request_settings(&self.inner);
        Ok(())
    }

    /// Remove every listener, timer, and overlay. Safe to call repeatedly.
    pub fn detach(&self) {
        self.inner.borrow_mut().teardown();
    }

    /// Callback invoked with `{pattern, timestamp}` for each completed
    /// gesture.
    pub fn set_gesture_listener(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().gesture_listener = Some(callback);
    }

    /// Callback invoked (no arguments) whenever fresh settings are wanted;
    /// it answers by calling [`GestureEngine::set_settings`].
    pub fn set_settings_provider(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().settings_provider = Some(callback);
    }

    /// Host report of whether the action for the last completed gesture ran
    /// successfully. Drives the success/error variant of the outcome toast;
    /// ignored when no dispatch is outstanding.
    pub fn report_execution_result(&self, success: bool) {
        let effects = self.inner.borrow_mut().core.on_execution_result(success);
        apply_effects(&self.inner, effects);
    }

    /// Apply a settings payload. Also settles any outstanding refresh.
    pub fn set_settings(&self, json: &str) -> Result<(), JsValue> {
        let settings =
            Settings::from_json(json).map_err(|err| JsValue::from_str(&err.to_string()))?;
        let now = dom::now_ms();
        let effects = {
            let mut inner = self.inner.borrow_mut();
            inner.refresh_in_flight = false;
            inner.core.apply_settings(settings, now)
        };
        apply_effects(&self.inner, effects);
        Ok(())
    }

    // --- Debug accessors ---

    #[must_use]
    pub fn state_name(&self) -> String {
        self.inner.borrow().core.state().name().to_owned()
    }

    #[must_use]
    pub fn live_pattern(&self) -> String {
        self.inner.borrow().core.live_pattern().to_owned()
    }

    /// JSON snapshot of engine internals, for the host's debug panel.
    #[must_use]
    pub fn debug_snapshot(&self) -> String {
        let inner = self.inner.borrow();
        let snapshot = serde_json::json!({
            "state": inner.core.state().name(),
            "pattern": inner.core.live_pattern(),
            "platform": inner.platform.name(),
            "input": inner.input.name(),
            "attached": inner.attached,
            "renderer": inner.renderer.status(),
        });
        snapshot.to_string()
    }

    #[must_use]
    pub fn platform_name(&self) -> String {
        self.inner.borrow().platform.name().to_owned()
    }

    #[must_use]
    pub fn input_name(&self) -> String {
        self.inner.borrow().input.name().to_owned()
    }
}

impl GestureEngine {
    fn wire_listeners(
        &self,
        doc_target: &EventTarget,
        win_target: &EventTarget,
    ) -> Result<(), JsValue> {
        let profile = self.inner.borrow().profile;
        for &event in profile.start_events {
            self.subscribe(doc_target, event, handle_start)?;
        }
        for &event in profile.move_events {
            self.subscribe(doc_target, event, handle_move)?;
            self.subscribe(win_target, event, handle_move)?;
        }
        for &event in profile.end_events {
            self.subscribe(doc_target, event, handle_end)?;
            self.subscribe(win_target, event, handle_end)?;
        }
        for &event in profile.context_events {
            self.subscribe(doc_target, event, handle_contextmenu)?;
        }
        self.subscribe(doc_target, "visibilitychange", handle_visibility)?;
        self.subscribe(win_target, "blur", handle_blur)?;
        self.subscribe(win_target, "focus", handle_focus)?;
        Ok(())
    }

    fn subscribe(
        &self,
        target: &EventTarget,
        event: &'static str,
        handler: fn(&Rc<RefCell<Inner>>, &Event),
    ) -> Result<(), JsValue> {
        let weak = Rc::downgrade(&self.inner);
        let callback = Closure::<dyn FnMut(Event)>::new(move |native: Event| {
            if let Some(inner) = weak.upgrade() {
                handler(&inner, &native);
            }
        });

        // Capture phase so pages that stop propagation cannot starve the
        // tracker; non-passive so touch defaults stay preventable.
        let options = AddEventListenerOptions::new();
        options.set_capture(true);
        options.set_passive(false);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;

        self.inner.borrow_mut().subscriptions.push(Subscription {
            target: target.clone(),
            event,
            callback,
        });
        Ok(())
    }
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for GestureEngine {
    fn drop(&mut self) {
        self.inner.borrow_mut().teardown();
    }
}

// ===== Environment probing =====

fn probe_environment() -> (Platform, InputKind) {
    let Some(window) = dom::window() else {
        return (Platform::Unknown, InputKind::Mouse);
    };
    let navigator = window.navigator();
    let platform_str = navigator.platform().unwrap_or_default();
    let user_agent = navigator.user_agent().unwrap_or_default();
    let platform = Platform::detect(&platform_str, &user_agent);

    let touch_supported = navigator.max_touch_points() > 0
        || js_sys::Reflect::has(&window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
    let pointer_supported =
        js_sys::Reflect::has(&window, &JsValue::from_str("PointerEvent")).unwrap_or(false);
    let input = InputKind::detect(touch_supported, pointer_supported, platform);

    (platform, input)
}

// ===== Native event handlers =====

fn handle_start(inner: &Rc<RefCell<Inner>>, event: &Event) {
    let now = dom::now_ms();
    let (profile, platform, input, viewport_scale, state) = {
        let inner = inner.borrow();
        (
            inner.profile,
            inner.platform,
            inner.input,
            inner.viewport_scale,
            inner.core.state(),
        )
    };

    let (button, ctrl, touch_count) = start_qualifiers(event, input);
    if !profile.is_valid_start(button, ctrl, touch_count) {
        // A second finger landing mid-gesture aborts the session.
        if touch_count.is_some_and(|n| n > 1) && state != TrackerState::Idle {
            let effects = inner.borrow_mut().core.on_end(now);
            apply_effects(inner, effects);
        }
        return;
    }

    let Some((client_x, client_y)) = extract_client_coords(event, input, Phase::Start) else {
        return;
    };
    if profile.should_suppress_default(platform, input, ctrl) {
        event.prevent_default();
    }

    let sample = PointerSample::from_client(
        Phase::Start,
        client_x,
        client_y,
        platform,
        input,
        viewport_scale,
    );
    let effects = inner.borrow_mut().core.on_start(&sample, now);
    apply_effects(inner, effects);
}

fn handle_move(inner: &Rc<RefCell<Inner>>, event: &Event) {
    let now = dom::now_ms();
    let (platform, input, viewport_scale, state) = {
        let inner = inner.borrow();
        (inner.platform, inner.input, inner.viewport_scale, inner.core.state())
    };
    if state == TrackerState::Idle || state == TrackerState::Cancelled {
        return;
    }

    let Some((client_x, client_y)) = extract_client_coords(event, input, Phase::Move) else {
        return;
    };
    // Stop the page scrolling under an active touch gesture.
    if input == InputKind::Touch && state == TrackerState::Tracking {
        event.prevent_default();
    }

    let sample = PointerSample::from_client(
        Phase::Move,
        client_x,
        client_y,
        platform,
        input,
        viewport_scale,
    );
    let viewport = dom::visible_viewport();
    let effects = inner.borrow_mut().core.on_move(&sample, viewport, now);
    apply_effects(inner, effects);
}

fn handle_end(inner: &Rc<RefCell<Inner>>, event: &Event) {
    let now = dom::now_ms();
    {
        let inner = inner.borrow();
        // A release of a non-activation button is not the end of anything.
        if inner.core.state() == TrackerState::Idle {
            return;
        }
        if inner.input == InputKind::Touch {
            // Only the last finger leaving ends the session.
            if let Some(touch_event) = event.dyn_ref::<TouchEvent>() {
                if touch_event.touches().length() > 0 {
                    return;
                }
            }
        }
    }

    let effects = inner.borrow_mut().core.on_end(now);
    apply_effects(inner, effects);
}

fn handle_contextmenu(inner: &Rc<RefCell<Inner>>, event: &Event) {
    let now = dom::now_ms();
    if inner.borrow().core.should_suppress_context_menu(now) {
        event.prevent_default();
        event.stop_propagation();
    }
}

fn handle_visibility(inner: &Rc<RefCell<Inner>>, _event: &Event) {
    let Some(document) = dom::document() else {
        return;
    };
    let now = dom::now_ms();
    let effects = inner.borrow_mut().core.on_visibility_change(document.hidden(), now);
    apply_effects(inner, effects);
}

fn handle_blur(inner: &Rc<RefCell<Inner>>, _event: &Event) {
    let now = dom::now_ms();
    let effects = inner.borrow_mut().core.on_window_blur(now);
    apply_effects(inner, effects);
}

fn handle_focus(inner: &Rc<RefCell<Inner>>, _event: &Event) {
    let now = dom::now_ms();
    let effects = inner.borrow_mut().core.on_window_focus(now);
    apply_effects(inner, effects);
}

/// Button/modifier/touch-count triple used by the activation rule.
fn start_qualifiers(event: &Event, input: InputKind) -> (Option<i16>, bool, Option<u32>) {
    if input == InputKind::Touch {
        let count = event
            .dyn_ref::<TouchEvent>()
            .map(|touch_event| touch_event.touches().length());
        (None, false, count)
    } else {
        event.dyn_ref::<MouseEvent>().map_or((None, false, None), |mouse| {
            (Some(mouse.button()), mouse.ctrl_key(), None)
        })
    }
}

/// Client coordinates of a native event, or `None` when the event carries no
/// usable position. Events without coordinates are dropped, never
/// zero-filled.
fn extract_client_coords(event: &Event, input: InputKind, phase: Phase) -> Option<(f64, f64)> {
    if input == InputKind::Touch {
        let touch_event = event.dyn_ref::<TouchEvent>()?;
        let list = if phase == Phase::End {
            touch_event.changed_touches()
        } else {
            touch_event.touches()
        };
        let touch = list.get(0)?;
        Some((f64::from(touch.client_x()), f64::from(touch.client_y())))
    } else {
        let mouse = event.dyn_ref::<MouseEvent>()?;
        Some((f64::from(mouse.client_x()), f64::from(mouse.client_y())))
    }
}

// ===== Effect interpreter =====

fn apply_effects(inner: &Rc<RefCell<Inner>>, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::ScheduleActivationCheck { delay_ms } => {
                schedule_activation_check(inner, delay_ms);
            }
            Effect::TrailCreate => {
                let created = inner.borrow().renderer.create();
                if !created {
                    log::warn!("tracking continues without a visible trail");
                }
            }
            Effect::TrailPoint { x, y } => inner.borrow().renderer.add_point(x, y),
            Effect::TrailFadeOut => inner.borrow().renderer.start_fade_out(),
            Effect::TrailDestroy => inner.borrow().renderer.destroy(),
            Effect::ShowCancelZone => inner.borrow_mut().overlays.show_cancel_zone(),
            Effect::HideCancelZone => inner.borrow_mut().overlays.hide_cancel_zone(),
            Effect::ShowHint(hint) => inner.borrow_mut().overlays.show_hint(&hint),
            Effect::HideHint => inner.borrow_mut().overlays.hide_hint(),
            Effect::GestureCompleted { pattern, timestamp_ms } => {
                dispatch_gesture(inner, &pattern, timestamp_ms);
            }
            Effect::FlashResult { pattern, outcome } => {
                inner.borrow_mut().overlays.flash_result(&pattern, outcome);
            }
            Effect::RefreshSettings => request_settings(inner),
        }
    }
}

fn schedule_activation_check(inner: &Rc<RefCell<Inner>>, delay_ms: f64) {
    let weak: Weak<RefCell<Inner>> = Rc::downgrade(inner);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let delay = delay_ms.max(0.0) as u32;
    let timer = Timeout::new(delay, move || {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let now = dom::now_ms();
        let effects = inner.borrow_mut().core.on_activation_deadline(now);
        apply_effects(&inner, effects);
    });
    // Replacing the handle cancels any previously armed check.
    inner.borrow_mut().activation_timer = Some(timer);
}

/// Notify the host listener of a completed gesture. The listener call
/// happens with no borrow held, so the host may re-enter the engine; the
/// outcome toast waits for [`GestureEngine::report_execution_result`].
fn dispatch_gesture(inner: &Rc<RefCell<Inner>>, pattern: &str, timestamp_ms: f64) {
    let listener = inner.borrow().gesture_listener.clone();
    let Some(listener) = listener else {
        return;
    };
    let payload = js_sys::Object::new();
    let fields = [
        ("pattern", JsValue::from_str(pattern)),
        ("timestamp", JsValue::from_f64(timestamp_ms)),
    ];
    for (key, value) in fields {
        if let Err(err) = js_sys::Reflect::set(&payload, &JsValue::from_str(key), &value) {
            log::warn!("failed to build gesture payload: {err:?}");
            return;
        }
    }
    if let Err(err) = listener.call1(&JsValue::NULL, &payload) {
        log::warn!("gesture listener threw: {err:?}");
    }
}

/// Single-flight settings refresh through the host-provided callback.
fn request_settings(inner: &Rc<RefCell<Inner>>) {
    let provider = {
        let mut inner = inner.borrow_mut();
        if inner.refresh_in_flight {
            None
        } else if let Some(provider) = inner.settings_provider.clone() {
            inner.refresh_in_flight = true;
            Some(provider)
        } else {
            None
        }
    };
    let Some(provider) = provider else {
        return;
    };
    if let Err(err) = provider.call0(&JsValue::NULL) {
        log::warn!("settings provider threw: {err:?}");
        inner.borrow_mut().refresh_in_flight = false;
    }
}
