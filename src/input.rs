//! The unified event shape every native input source normalizes into.
//!
//! A [`PointerSample`] is created per native event and handed to the tracker;
//! it is never stored. Coordinates come in two flavors: `x`/`y` are corrected
//! ("real") coordinates used for quantization and the trail, while
//! `client_x`/`client_y` are the raw client coordinates used for
//! viewport-relative tests like the cancellation zone.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::platform::{InputKind, Platform};

/// Lifecycle phase of a unified pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Press of the activation button / first touch contact.
    Start,
    /// Drag while the button/contact is held.
    Move,
    /// Release or cancellation of the contact.
    End,
}

/// One normalized pointer event.
#[derive(Debug, Clone, Copy)]
pub struct PointerSample {
    pub phase: Phase,
    /// Corrected x, in real page pixels.
    pub x: f64,
    /// Corrected y, in real page pixels.
    pub y: f64,
    /// Raw client x as reported by the native event.
    pub client_x: f64,
    /// Raw client y as reported by the native event.
    pub client_y: f64,
    pub platform: Platform,
    pub input: InputKind,
}

impl PointerSample {
    /// Build a sample from raw client coordinates, applying the touch
    /// viewport-scale correction.
    #[must_use]
    pub fn from_client(
        phase: Phase,
        client_x: f64,
        client_y: f64,
        platform: Platform,
        input: InputKind,
        viewport_scale: f64,
    ) -> Self {
        Self {
            phase,
            x: crate::coords::real_coordinate(client_x, input, viewport_scale),
            y: crate::coords::real_coordinate(client_y, input, viewport_scale),
            client_x,
            client_y,
            platform,
            input,
        }
    }
}
