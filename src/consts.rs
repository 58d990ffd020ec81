//! Shared numeric constants for the gesture engine.

// ── Activation ──────────────────────────────────────────────────

/// How long a press must be held before tracking UI engages, absent movement.
pub const ACTIVATION_DELAY_MS: f64 = 150.0;

/// Movement past this distance (real px) activates tracking before the delay.
pub const MOVE_THRESHOLD_PX: f64 = 5.0;

// ── Quantization ────────────────────────────────────────────────

/// Built-in segment sensitivity when no configuration is available.
pub const DEFAULT_SENSITIVITY_PX: f64 = 30.0;

/// Configured sensitivity is clamped into this range.
pub const SENSITIVITY_RANGE_PX: (f64, f64) = (5.0, 50.0);

/// Touch input multiplies the effective sensitivity to absorb jitter.
pub const TOUCH_SENSITIVITY_FACTOR: f64 = 1.5;

/// Batch analysis considers at most this many sub-sampled segments.
pub const SAMPLE_RATE_FACTOR: usize = 20;

/// Batch analysis ignores paths with fewer points than this.
pub const MIN_PATH_POINTS: usize = 5;

// ── Cancellation ────────────────────────────────────────────────

/// Width of the viewport-edge margin that cancels a gesture, in client px.
pub const CANCEL_MARGIN_PX: f64 = 25.0;

// ── Trail ───────────────────────────────────────────────────────

/// Stroke width of the trail polyline.
pub const TRAIL_LINE_WIDTH: f64 = 3.0;

/// Alpha removed from every trail point per fade frame.
pub const TRAIL_FADE_STEP: f64 = 0.02;

/// Gaps wider than this between consecutive trail points get interpolated.
pub const TRAIL_INTERPOLATION_GAP_PX: f64 = 10.0;

/// Spacing of synthesized interpolation points.
pub const TRAIL_INTERPOLATION_STEP_PX: f64 = 5.0;

/// Debounce applied to resize/orientation events before the surface resizes.
pub const RESIZE_DEBOUNCE_MS: u32 = 100;

// ── Cooldowns ───────────────────────────────────────────────────

/// Context-menu suppression window after a gesture produced movement.
pub const CONTEXT_MENU_COOLDOWN_MS: f64 = 500.0;

/// Extended suppression window when a tab switch happened mid-session.
pub const CONTEXT_MENU_COOLDOWN_TAB_SWITCH_MS: f64 = 2000.0;

/// The tab-switch flag expires this long after a session reset.
pub const TAB_SWITCH_CLEAR_MS: f64 = 3000.0;

/// Minimum spacing between "gestures disabled" hints.
pub const DISABLED_HINT_COOLDOWN_MS: f64 = 5000.0;

/// How long transient execution hints stay on screen.
pub const EXECUTION_HINT_DURATION_MS: u32 = 3000;
