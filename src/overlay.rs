//! DOM overlays shown around a gesture: the direction hint, the
//! cancellation-zone frame, and the transient execution toast.
//!
//! Overlays are feedback only. Every DOM failure is logged and swallowed so
//! a locked-down page degrades to gestures without visuals.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use gloo_timers::callback::Timeout;
use web_sys::HtmlElement;

use crate::consts::EXECUTION_HINT_DURATION_MS;
use crate::dom;
use crate::pattern;
use crate::tracker::{ExecutionOutcome, Hint};

const HINT_ID: &str = "motiontrail-hint";
const ZONE_ID: &str = "motiontrail-cancel-zone";
const TOAST_ID: &str = "motiontrail-toast";

const HINT_BASE_STYLES: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "30%"),
    ("left", "50%"),
    ("transform", "translate(-50%, -50%)"),
    ("padding", "12px 20px"),
    ("border-radius", "8px"),
    ("background", "rgba(0, 0, 0, 0.8)"),
    ("color", "#fff"),
    ("font-family", "system-ui, sans-serif"),
    ("text-align", "center"),
    ("z-index", "2147483647"),
    ("pointer-events", "none"),
    ("user-select", "none"),
];

const ZONE_STYLES: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("right", "0"),
    ("bottom", "0"),
    ("border", "25px solid rgba(220, 53, 69, 0.25)"),
    ("box-sizing", "border-box"),
    ("z-index", "2147483646"),
    ("pointer-events", "none"),
];

/// Owns the hint, cancel-zone, and toast elements. All show/hide calls are
/// idempotent and [`Overlays::teardown`] removes whatever currently exists.
#[derive(Default)]
pub struct Overlays {
    hint: Option<HtmlElement>,
    zone: Option<HtmlElement>,
    toast: Option<HtmlElement>,
    toast_timer: Option<Timeout>,
}

impl Overlays {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show (or update in place) the direction hint for the current state.
    pub fn show_hint(&mut self, hint: &Hint) {
        let (arrows, label) = hint_content(hint);
        let element = match &self.hint {
            Some(element) => element.clone(),
            None => {
                let Some(element) = create_overlay(HINT_ID, HINT_BASE_STYLES) else {
                    return;
                };
                self.hint = Some(element.clone());
                element
            }
        };
        render_hint_text(&element, &arrows, &label);
    }

    pub fn hide_hint(&mut self) {
        if let Some(element) = self.hint.take() {
            element.remove();
        }
    }

    /// Frame the visible viewport to mark the 25px cancellation margin.
    pub fn show_cancel_zone(&mut self) {
        if self.zone.is_some() {
            return;
        }
        if let Some(element) = create_overlay(ZONE_ID, ZONE_STYLES) {
            self.zone = Some(element);
        }
    }

    pub fn hide_cancel_zone(&mut self) {
        if let Some(element) = self.zone.take() {
            element.remove();
        }
    }

    /// Flash the outcome of a completed gesture, auto-hiding after
    /// [`EXECUTION_HINT_DURATION_MS`]. A new toast replaces the old one and
    /// restarts the clock; a failure report gets the error styling.
    pub fn flash_result(&mut self, completed_pattern: &str, outcome: ExecutionOutcome) {
        if let Some(previous) = self.toast.take() {
            previous.remove();
        }

        let Some(element) = create_overlay(TOAST_ID, HINT_BASE_STYLES) else {
            self.toast_timer = None;
            return;
        };
        if outcome == ExecutionOutcome::Failed {
            dom::apply_styles(&element, &[("background", "rgba(160, 30, 40, 0.85)")]);
        }
        let (arrows, label) = toast_content(completed_pattern, outcome);
        render_hint_text(&element, &arrows, &label);

        let captured = element.clone();
        self.toast = Some(element);
        // Dropping the previous handle cancels its pending hide.
        self.toast_timer = Some(Timeout::new(EXECUTION_HINT_DURATION_MS, move || {
            captured.remove();
        }));
    }

    /// Remove every overlay element and pending timer.
    pub fn teardown(&mut self) {
        self.hide_hint();
        self.hide_cancel_zone();
        self.toast_timer = None;
        if let Some(element) = self.toast.take() {
            element.remove();
        }
    }

    #[must_use]
    pub fn hint_visible(&self) -> bool {
        self.hint.is_some()
    }

    #[must_use]
    pub fn cancel_zone_visible(&self) -> bool {
        self.zone.is_some()
    }
}

impl Drop for Overlays {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Arrow row and label for the outcome toast.
fn toast_content(pattern: &str, outcome: ExecutionOutcome) -> (String, String) {
    let arrows = pattern::arrows_for_pattern(pattern);
    let label = match outcome {
        ExecutionOutcome::Succeeded => pattern::describe(pattern),
        ExecutionOutcome::Failed => format!("{} failed", pattern::describe(pattern)),
        ExecutionOutcome::NoAction => format!("{} (no action)", pattern::describe(pattern)),
    };
    (arrows, label)
}

/// Arrow row and label for each hint variant.
fn hint_content(hint: &Hint) -> (String, String) {
    match hint {
        Hint::Drawing => (String::new(), "Drawing gesture...".to_owned()),
        Hint::Pattern(pattern) => {
            (pattern::arrows_for_pattern(pattern), pattern::describe(pattern))
        }
        Hint::Cancelled => ("\u{2715}".to_owned(), "Gesture cancelled".to_owned()),
        Hint::Disabled => (String::new(), "Gestures are disabled".to_owned()),
    }
}

fn create_overlay(id: &str, styles: &[(&str, &str)]) -> Option<HtmlElement> {
    let document = dom::document()?;
    let body = dom::body()?;
    let element: HtmlElement = match document.create_element("div") {
        Ok(element) => wasm_bindgen::JsCast::unchecked_into(element),
        Err(err) => {
            log::warn!("failed to create overlay element: {err:?}");
            return None;
        }
    };
    element.set_id(id);
    dom::apply_styles(&element, styles);
    if let Err(err) = body.append_child(&element) {
        log::warn!("failed to attach overlay element: {err:?}");
        return None;
    }
    Some(element)
}

/// Two stacked lines: big arrows, small label. Arrows line is omitted when
/// empty so text-only hints stay compact.
fn render_hint_text(element: &HtmlElement, arrows: &str, label: &str) {
    element.set_text_content(None);
    let Some(document) = dom::document() else {
        return;
    };

    if !arrows.is_empty() {
        if let Ok(row) = document.create_element("div") {
            let row: HtmlElement = wasm_bindgen::JsCast::unchecked_into(row);
            row.set_text_content(Some(arrows));
            dom::apply_styles(&row, &[("font-size", "28px"), ("letter-spacing", "6px")]);
            if let Err(err) = element.append_child(&row) {
                log::warn!("failed to render hint arrows: {err:?}");
            }
        }
    }
    if let Ok(row) = document.create_element("div") {
        let row: HtmlElement = wasm_bindgen::JsCast::unchecked_into(row);
        row.set_text_content(Some(label));
        dom::apply_styles(&row, &[("font-size", "13px"), ("opacity", "0.85")]);
        if let Err(err) = element.append_child(&row) {
            log::warn!("failed to render hint label: {err:?}");
        }
    }
}
