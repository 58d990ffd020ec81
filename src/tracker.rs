//! The gesture state machine.
//!
//! [`TrackerCore`] is pure: every handler takes the caller-supplied clock and
//! viewport and returns [`Effect`]s for the shell to apply (create/feed the
//! trail, show overlays, schedule the activation check, emit the completed
//! gesture). All time-window logic (activation delay, context-menu cooldown,
//! tab-switch expiry, disabled-hint rate limit) is timestamp comparison, so
//! the machine is deterministic under test.
//!
//! States: `Idle` → `PendingActivation` → `Tracking` → `Idle`, with a
//! `Cancelled` side exit taken when the pointer enters the cancellation zone
//! or the page is interrupted. Exactly one session value exists at a time; it
//! is replaced wholesale, never field-by-field reset.

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tracker_test;

use crate::config::Settings;
use crate::consts::{
    ACTIVATION_DELAY_MS, CONTEXT_MENU_COOLDOWN_MS, CONTEXT_MENU_COOLDOWN_TAB_SWITCH_MS,
    DEFAULT_SENSITIVITY_PX, DISABLED_HINT_COOLDOWN_MS, MOVE_THRESHOLD_PX, TAB_SWITCH_CLEAR_MS,
    TOUCH_SENSITIVITY_FACTOR,
};
use crate::coords::{Point, Viewport};
use crate::input::PointerSample;
use crate::pattern::{self, PathPoint};
use crate::platform::InputKind;

/// Current state of the gesture machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Activation button is down; waiting for movement or the delay.
    PendingActivation,
    /// Gesture UI is live and the pattern is accumulating.
    Tracking,
    /// Session aborted; further moves are ignored until release.
    Cancelled,
}

impl TrackerState {
    /// Stable lowercase name, for debug accessors.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PendingActivation => "pending-activation",
            Self::Tracking => "tracking",
            Self::Cancelled => "cancelled",
        }
    }
}

/// The live gesture session, created at start and replaced wholesale.
#[derive(Debug, Clone)]
pub struct Session {
    /// Corrected coordinates of the initial press.
    pub origin: Point,
    /// Last committed anchor; segments are measured from here.
    pub anchor: Point,
    /// Every corrected point seen this session, append-only.
    pub path: Vec<PathPoint>,
    /// Accumulated direction symbols; never two equal neighbors.
    pub pattern: String,
    /// Clock reading at the press.
    pub started_at_ms: f64,
    /// Clock reading at activation, once tracking UI engaged.
    pub activated_at_ms: Option<f64>,
    /// Still a candidate for an ordinary click (no activation yet).
    pub button_only: bool,
    /// A move event crossed the activation condition this session.
    pub moved: bool,
    /// Input kind of the starting event; touch widens the sensitivity.
    pub input: InputKind,
}

impl Session {
    fn new(origin: Point, input: InputKind, now_ms: f64) -> Self {
        Self {
            origin,
            anchor: origin,
            path: Vec::new(),
            pattern: String::new(),
            started_at_ms: now_ms,
            activated_at_ms: None,
            button_only: true,
            moved: false,
            input,
        }
    }
}

/// What the hint overlay should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hint {
    /// Tracking is live but no symbol has been committed yet.
    Drawing,
    /// The pattern so far, rendered as arrows by the overlay.
    Pattern(String),
    /// The gesture was cancelled.
    Cancelled,
    /// Gesture execution is disabled by configuration.
    Disabled,
}

/// Outcome of a completed gesture, shown as a transient toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The host dispatched the action successfully.
    Succeeded,
    /// The host reported a dispatch failure.
    Failed,
    /// The pattern has no configured action; nothing was dispatched.
    NoAction,
}

/// Side effects the shell must apply after a handler call.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Arm the one-shot activation check.
    ScheduleActivationCheck { delay_ms: f64 },
    /// Create the trail surface.
    TrailCreate,
    /// Append a corrected point to the trail.
    TrailPoint { x: f64, y: f64 },
    /// Begin the trail fade-out loop.
    TrailFadeOut,
    /// Tear the trail surface down immediately.
    TrailDestroy,
    ShowCancelZone,
    HideCancelZone,
    ShowHint(Hint),
    HideHint,
    /// The finished gesture, for the external action resolver.
    GestureCompleted { pattern: String, timestamp_ms: f64 },
    /// Flash the transient outcome toast for a completed gesture.
    FlashResult { pattern: String, outcome: ExecutionOutcome },
    /// Re-fetch settings from the host (visibility/focus regain).
    RefreshSettings,
}

/// The gesture state machine. One instance per attached engine.
#[derive(Debug, Default)]
pub struct TrackerCore {
    state: TrackerState,
    session: Option<Session>,
    settings: Option<Settings>,
    /// Start of the most recent context-menu suppression window.
    context_menu_prevent_at: Option<f64>,
    tab_switch_detected: bool,
    /// Once set, the tab-switch flag expires at this clock reading.
    tab_switch_clear_at: Option<f64>,
    last_disabled_hint_at: Option<f64>,
    last_hidden: bool,
    /// Pattern dispatched to the host whose outcome report is still awaited.
    pending_dispatch: Option<String>,
}

impl TrackerCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// The live pattern string, empty outside a session.
    #[must_use]
    pub fn live_pattern(&self) -> &str {
        self.session.as_ref().map_or("", |s| s.pattern.as_str())
    }

    #[must_use]
    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    fn execution_enabled(&self) -> bool {
        self.settings.as_ref().is_none_or(|s| s.execution_enabled)
    }

    fn trail_enabled(&self) -> bool {
        self.settings.as_ref().is_none_or(|s| s.trail_enabled)
    }

    /// Effective segment sensitivity: configured (clamped) when settings are
    /// present, the built-in default otherwise; widened for touch input.
    fn sensitivity_for(&self, input: InputKind) -> f64 {
        let base = self
            .settings
            .as_ref()
            .map_or(DEFAULT_SENSITIVITY_PX, Settings::effective_sensitivity);
        if input == InputKind::Touch {
            base * TOUCH_SENSITIVITY_FACTOR
        } else {
            base
        }
    }

    fn tab_switch_active(&self, now_ms: f64) -> bool {
        self.tab_switch_detected && self.tab_switch_clear_at.is_none_or(|t| now_ms < t)
    }

    // --- Event handlers ---

    /// Handle a valid start event (the normalizer has already applied the
    /// platform's activation rule).
    pub fn on_start(&mut self, ev: &PointerSample, now_ms: f64) -> Vec<Effect> {
        let mut effects = Vec::new();

        if !self.execution_enabled() {
            self.push_disabled_hint(now_ms, &mut effects);
            return effects;
        }

        // Clear any stale session before starting fresh.
        if self.state != TrackerState::Idle || self.session.is_some() {
            self.reset(now_ms, &mut effects);
            effects.push(Effect::TrailDestroy);
        }

        self.tab_switch_detected = false;
        self.tab_switch_clear_at = None;

        let origin = Point::new(ev.x, ev.y);
        self.session = Some(Session::new(origin, ev.input, now_ms));
        self.state = TrackerState::PendingActivation;
        log::debug!("tracking started at ({:.1}, {:.1})", origin.x, origin.y);

        effects.push(Effect::ScheduleActivationCheck { delay_ms: ACTIVATION_DELAY_MS });
        effects
    }

    /// The one-shot delayed check armed at start: if the session is still
    /// pending when the delay elapses, tracking UI engages unconditionally.
    pub fn on_activation_deadline(&mut self, now_ms: f64) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.state == TrackerState::PendingActivation {
            let due = self
                .session
                .as_ref()
                .is_some_and(|s| now_ms - s.started_at_ms >= ACTIVATION_DELAY_MS);
            if due {
                self.activate(now_ms, &mut effects);
            }
        }
        effects
    }

    /// Handle a move event.
    pub fn on_move(&mut self, ev: &PointerSample, viewport: Viewport, now_ms: f64) -> Vec<Effect> {
        let mut effects = Vec::new();
        if matches!(self.state, TrackerState::Idle | TrackerState::Cancelled) {
            return effects;
        }
        let Some(session) = self.session.as_ref() else {
            return effects;
        };

        let point = Point::new(ev.x, ev.y);
        let from_origin = session.origin.distance_to(point);
        let elapsed = now_ms - session.started_at_ms;
        let should_activate = from_origin > MOVE_THRESHOLD_PX || elapsed >= ACTIVATION_DELAY_MS;

        if should_activate {
            // Idempotent: a no-op when the delayed check already won.
            self.activate(now_ms, &mut effects);
            if let Some(session) = self.session.as_mut() {
                if !session.moved {
                    session.moved = true;
                    self.context_menu_prevent_at = Some(now_ms);
                }
            }
        }

        if self.state != TrackerState::Tracking {
            return effects;
        }

        // Cancellation zone is tested in raw client coordinates against the
        // then-current visible viewport.
        if viewport.in_cancel_zone(ev.client_x, ev.client_y) {
            log::debug!("pointer entered cancel zone, cancelling session");
            self.state = TrackerState::Cancelled;
            self.session = None;
            effects.push(Effect::HideHint);
            effects.push(Effect::TrailFadeOut);
            effects.push(Effect::ShowHint(Hint::Cancelled));
            return effects;
        }

        if self.trail_enabled() {
            effects.push(Effect::TrailPoint { x: point.x, y: point.y });
        }

        let sensitivity = self.sensitivity_for(ev.input);
        if let Some(session) = self.session.as_mut() {
            session.path.push(PathPoint::new(point.x, point.y, now_ms));

            let dx = point.x - session.anchor.x;
            let dy = point.y - session.anchor.y;
            let segment = dx.hypot(dy);
            if segment > sensitivity {
                let direction = pattern::dominant_direction(dx, dy);
                if session.pattern.chars().last() != Some(direction.symbol()) {
                    session.pattern.push(direction.symbol());
                    effects.push(Effect::ShowHint(Hint::Pattern(session.pattern.clone())));
                }
                session.anchor = point;
            }
        }
        effects
    }

    /// Handle a release event.
    pub fn on_end(&mut self, now_ms: f64) -> Vec<Effect> {
        let mut effects = vec![Effect::HideCancelZone];

        if self.tab_switch_active(now_ms) {
            self.context_menu_prevent_at = Some(now_ms);
        }

        match self.state {
            TrackerState::Idle => {}
            TrackerState::Cancelled => {
                // Trail fade-out already started when the cancel hit.
                self.reset(now_ms, &mut effects);
            }
            TrackerState::PendingActivation => {
                // Button-only click: not a gesture, default behavior allowed.
                log::debug!("button-only click, allowing default");
                self.reset(now_ms, &mut effects);
            }
            TrackerState::Tracking => {
                let completed = self.session.as_ref().and_then(|session| {
                    (session.moved && !session.pattern.is_empty())
                        .then(|| session.pattern.clone())
                });
                let moved = self.session.as_ref().is_some_and(|s| s.moved);
                if moved {
                    self.context_menu_prevent_at = Some(now_ms);
                }
                if let Some(pattern) = completed {
                    log::info!("gesture completed: {pattern}");
                    let matched = self
                        .settings
                        .as_ref()
                        .is_some_and(|s| s.has_action_for(&pattern));
                    if matched {
                        // The toast waits for the host's outcome report.
                        self.pending_dispatch = Some(pattern.clone());
                    } else {
                        self.pending_dispatch = None;
                        effects.push(Effect::FlashResult {
                            pattern: pattern.clone(),
                            outcome: ExecutionOutcome::NoAction,
                        });
                    }
                    effects.push(Effect::GestureCompleted { pattern, timestamp_ms: now_ms });
                }
                self.reset(now_ms, &mut effects);
                effects.push(Effect::TrailFadeOut);
            }
        }
        effects
    }

    /// Visibility change: hiding the page aborts any open session; regaining
    /// visibility re-reads settings and notes a tab switch that happened
    /// mid-session.
    pub fn on_visibility_change(&mut self, hidden: bool, now_ms: f64) -> Vec<Effect> {
        let mut effects = Vec::new();
        if hidden {
            if self.session.is_some() {
                log::debug!("page hidden during tracking, cancelling");
                self.tab_switch_detected = true;
                self.tab_switch_clear_at = None;
                self.interrupt(now_ms, &mut effects);
            }
        } else {
            effects.push(Effect::RefreshSettings);
            if self.last_hidden && self.session.is_some() {
                self.tab_switch_detected = true;
                self.tab_switch_clear_at = None;
            }
        }
        self.last_hidden = hidden;
        effects
    }

    /// Window blur with an open session is an interruption, like hiding.
    pub fn on_window_blur(&mut self, now_ms: f64) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.session.is_some() {
            log::debug!("window blur during tracking, cancelling");
            self.tab_switch_detected = true;
            self.tab_switch_clear_at = None;
            self.interrupt(now_ms, &mut effects);
        }
        effects
    }

    /// Window focus: re-read settings; after a tab switch, keep the native
    /// context menu suppressed a little longer.
    pub fn on_window_focus(&mut self, now_ms: f64) -> Vec<Effect> {
        if self.tab_switch_active(now_ms) {
            self.context_menu_prevent_at = Some(now_ms);
        }
        vec![Effect::RefreshSettings]
    }

    /// Replace the active settings. A disable arriving mid-session resets the
    /// session and surfaces the disabled hint.
    pub fn apply_settings(&mut self, settings: Settings, now_ms: f64) -> Vec<Effect> {
        let mut effects = Vec::new();
        let disabling = !settings.execution_enabled;
        self.settings = Some(settings);
        if disabling && self.session.is_some() {
            self.interrupt(now_ms, &mut effects);
            self.push_disabled_hint(now_ms, &mut effects);
        }
        effects
    }

    /// Host report of the dispatch outcome for the last completed gesture.
    /// Ignored when no dispatch is outstanding; each dispatch is reported at
    /// most once.
    pub fn on_execution_result(&mut self, success: bool) -> Vec<Effect> {
        let Some(pattern) = self.pending_dispatch.take() else {
            return Vec::new();
        };
        let outcome = if success {
            ExecutionOutcome::Succeeded
        } else {
            ExecutionOutcome::Failed
        };
        vec![Effect::FlashResult { pattern, outcome }]
    }

    // --- Context-menu policy ---

    /// Whether the native context menu should be suppressed right now.
    #[must_use]
    pub fn should_suppress_context_menu(&self, now_ms: f64) -> bool {
        if let Some(session) = &self.session {
            // A fresh button-only press may still become an ordinary click.
            if session.button_only && now_ms - session.started_at_ms < ACTIVATION_DELAY_MS {
                return false;
            }
            if session.moved {
                return true;
            }
        }

        let window = if self.tab_switch_active(now_ms) {
            CONTEXT_MENU_COOLDOWN_TAB_SWITCH_MS
        } else {
            CONTEXT_MENU_COOLDOWN_MS
        };
        self.context_menu_prevent_at
            .is_some_and(|at| now_ms - at < window)
    }

    // --- Internals ---

    /// The single PendingActivation→Tracking transition. Guarded by state so
    /// the delayed check and the move path race safely: whichever arrives
    /// second is a no-op.
    fn activate(&mut self, now_ms: f64, effects: &mut Vec<Effect>) {
        if self.state != TrackerState::PendingActivation {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        self.state = TrackerState::Tracking;
        session.button_only = false;
        session.activated_at_ms = Some(now_ms);
        let origin = session.origin;

        effects.push(Effect::ShowCancelZone);
        effects.push(Effect::ShowHint(Hint::Drawing));
        if self.trail_enabled() {
            effects.push(Effect::TrailCreate);
            effects.push(Effect::TrailPoint { x: origin.x, y: origin.y });
        }
        log::debug!("tracking activated");
    }

    /// Return to `Idle`, dropping the session and hiding session UI. The
    /// trail is left to the caller (fade out on normal ends, destroy on
    /// interruptions).
    fn reset(&mut self, now_ms: f64, effects: &mut Vec<Effect>) {
        self.session = None;
        self.state = TrackerState::Idle;
        if self.tab_switch_detected && self.tab_switch_clear_at.is_none() {
            self.tab_switch_clear_at = Some(now_ms + TAB_SWITCH_CLEAR_MS);
        }
        effects.push(Effect::HideHint);
        effects.push(Effect::HideCancelZone);
    }

    /// Forced reset for interruptions: session UI and trail go away at once.
    fn interrupt(&mut self, now_ms: f64, effects: &mut Vec<Effect>) {
        self.context_menu_prevent_at = Some(now_ms);
        self.reset(now_ms, effects);
        effects.push(Effect::TrailDestroy);
    }

    fn push_disabled_hint(&mut self, now_ms: f64, effects: &mut Vec<Effect>) {
        let cooled_down = self
            .last_disabled_hint_at
            .is_none_or(|at| now_ms - at > DISABLED_HINT_COOLDOWN_MS);
        if cooled_down {
            self.last_disabled_hint_at = Some(now_ms);
            effects.push(Effect::ShowHint(Hint::Disabled));
        }
    }
}
