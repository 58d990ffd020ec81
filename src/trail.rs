//! Trail model: retained points, interpolation, and fade-out math.
//!
//! Pure so the fade and interpolation behavior is testable on the host; the
//! canvas surface in [`crate::render`] owns a `Trail` and draws it.

#[cfg(test)]
#[path = "trail_test.rs"]
mod trail_test;

use crate::consts::{TRAIL_FADE_STEP, TRAIL_INTERPOLATION_GAP_PX, TRAIL_INTERPOLATION_STEP_PX};

/// One retained point of the rendered trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: f64,
    /// Stroke opacity contribution; monotonically non-increasing once
    /// fade-out begins.
    pub alpha: f64,
}

/// Outcome of one fade frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeStatus {
    /// Points remain visible; schedule another frame.
    Continue,
    /// Nothing visible is left; the surface should tear down.
    Finished,
}

/// The retained trail of the current (or just-finished) gesture.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: Vec<TrailPoint>,
}

impl Trail {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a point at full alpha. When the gap from the previous point
    /// exceeds [`TRAIL_INTERPOLATION_GAP_PX`], evenly spaced intermediate
    /// points are synthesized first so fast drags still draw a continuous
    /// stroke.
    pub fn add_point(&mut self, x: f64, y: f64, timestamp_ms: f64) {
        if let Some(last) = self.points.last().copied() {
            let dx = x - last.x;
            let dy = y - last.y;
            let distance = dx.hypot(dy);
            if distance > TRAIL_INTERPOLATION_GAP_PX {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let steps = (distance / TRAIL_INTERPOLATION_STEP_PX).floor() as usize;
                for i in 1..steps {
                    #[allow(clippy::cast_precision_loss)]
                    let ratio = i as f64 / steps as f64;
                    self.points.push(TrailPoint {
                        x: last.x + dx * ratio,
                        y: last.y + dy * ratio,
                        timestamp_ms,
                        alpha: 1.0,
                    });
                }
            }
        }
        self.points.push(TrailPoint { x, y, timestamp_ms, alpha: 1.0 });
    }

    /// Decrement every point's alpha by [`TRAIL_FADE_STEP`].
    ///
    /// Returns [`FadeStatus::Finished`] once no point is visible or fewer
    /// than two points remain, which bounds the loop at `1/fade_step` frames
    /// regardless of point count.
    pub fn fade_tick(&mut self) -> FadeStatus {
        let mut any_visible = false;
        for point in &mut self.points {
            point.alpha -= TRAIL_FADE_STEP;
            if point.alpha > 0.0 {
                any_visible = true;
            }
        }
        if any_visible && self.points.len() >= 2 {
            FadeStatus::Continue
        } else {
            FadeStatus::Finished
        }
    }

    /// The maximum remaining alpha, used as the uniform stroke alpha while
    /// fading. Zero for an empty trail.
    #[must_use]
    pub fn max_alpha(&self) -> f64 {
        self.points.iter().fold(0.0, |acc, p| acc.max(p.alpha))
    }

    /// Drop all points.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}
