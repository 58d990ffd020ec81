//! Runtime settings supplied by the host, with conservative built-in
//! defaults used when configuration cannot be loaded.
//!
//! The core never blocks gesture capture on configuration: a missing or
//! malformed settings payload falls back to [`Settings::default`], and the
//! host may push fresh settings at any time (they are re-read on
//! visibility/focus regain).

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_SENSITIVITY_PX, SENSITIVITY_RANGE_PX};

/// Gesture-engine settings as provided by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Master switch; when false, starts show a rate-limited disabled hint.
    pub execution_enabled: bool,
    /// Minimum real-pixel distance between committed points before a new
    /// direction symbol can be appended. Clamped to 5–50 on use.
    pub sensitivity_px: f64,
    /// Whether the visual trail is drawn at all.
    pub trail_enabled: bool,
    /// Nominal trail fade duration hint, in milliseconds.
    pub trail_fade_duration_ms: f64,
    /// Completed-pattern → host action name. The engine only consults this
    /// for existence; dispatch happens on the host side.
    pub pattern_to_action: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            execution_enabled: true,
            sensitivity_px: 10.0,
            trail_enabled: true,
            trail_fade_duration_ms: 500.0,
            pattern_to_action: HashMap::new(),
        }
    }
}

/// Why a settings payload could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings payload is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl Settings {
    /// Parse a JSON settings payload. Unknown fields are ignored and missing
    /// fields take their defaults, so older hosts keep working.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] when the payload is not JSON.
    pub fn from_json(payload: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// The sensitivity actually applied by the tracker: the configured value
    /// clamped into range, or the built-in default when the configured value
    /// is not finite.
    #[must_use]
    pub fn effective_sensitivity(&self) -> f64 {
        let (min, max) = SENSITIVITY_RANGE_PX;
        if self.sensitivity_px.is_finite() {
            self.sensitivity_px.clamp(min, max)
        } else {
            DEFAULT_SENSITIVITY_PX
        }
    }

    /// Whether a completed pattern has a configured action.
    #[must_use]
    pub fn has_action_for(&self, pattern: &str) -> bool {
        self.pattern_to_action.contains_key(pattern)
    }
}
