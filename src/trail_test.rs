#![allow(clippy::float_cmp)]

use super::*;

fn trail_with(points: &[(f64, f64)]) -> Trail {
    let mut trail = Trail::new();
    for (i, &(x, y)) in points.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        trail.add_point(x, y, i as f64 * 16.0);
    }
    trail
}

// --- Point retention ---

#[test]
fn starts_empty() {
    let trail = Trail::new();
    assert!(trail.is_empty());
    assert_eq!(trail.len(), 0);
}

#[test]
fn add_point_retains_full_alpha() {
    let trail = trail_with(&[(10.0, 10.0)]);
    assert_eq!(trail.len(), 1);
    assert_eq!(trail.points()[0].alpha, 1.0);
}

#[test]
fn close_points_are_not_interpolated() {
    // 8px apart, under the interpolation gap.
    let trail = trail_with(&[(0.0, 0.0), (8.0, 0.0)]);
    assert_eq!(trail.len(), 2);
}

#[test]
fn wide_gap_is_interpolated() {
    // 40px apart: floor(40/5) = 8 steps, 7 synthesized + 2 endpoints.
    let trail = trail_with(&[(0.0, 0.0), (40.0, 0.0)]);
    assert_eq!(trail.len(), 9);
}

#[test]
fn interpolated_points_are_evenly_spaced() {
    let trail = trail_with(&[(0.0, 0.0), (40.0, 0.0)]);
    let points = trail.points();
    for pair in points.windows(2) {
        assert!((pair[1].x - pair[0].x - 5.0).abs() < 1e-9);
    }
}

#[test]
fn interpolated_points_carry_full_alpha() {
    let trail = trail_with(&[(0.0, 0.0), (100.0, 0.0)]);
    assert!(trail.points().iter().all(|p| p.alpha == 1.0));
}

#[test]
fn interpolation_preserves_endpoints() {
    let trail = trail_with(&[(0.0, 0.0), (30.0, 40.0)]);
    let points = trail.points();
    assert_eq!((points[0].x, points[0].y), (0.0, 0.0));
    let last = points[points.len() - 1];
    assert_eq!((last.x, last.y), (30.0, 40.0));
}

#[test]
fn clear_drops_everything() {
    let mut trail = trail_with(&[(0.0, 0.0), (8.0, 0.0)]);
    trail.clear();
    assert!(trail.is_empty());
}

// --- Fade ---

#[test]
fn fade_tick_decrements_alpha() {
    let mut trail = trail_with(&[(0.0, 0.0), (8.0, 0.0)]);
    assert_eq!(trail.fade_tick(), FadeStatus::Continue);
    assert!((trail.points()[0].alpha - 0.98).abs() < 1e-9);
}

#[test]
fn fade_finishes_within_bounded_frames() {
    // Alpha 1.0 at step 0.02 cannot outlive 1/0.02 = 50 frames.
    let mut trail = trail_with(&[(0.0, 0.0), (8.0, 0.0), (16.0, 0.0)]);
    let mut frames = 0;
    while trail.fade_tick() == FadeStatus::Continue {
        frames += 1;
        assert!(frames <= 50, "fade loop exceeded its bound");
    }
    assert!(frames <= 50);
}

#[test]
fn fade_bound_is_independent_of_point_count() {
    let points: Vec<(f64, f64)> = (0..200).map(|i| (f64::from(i) * 4.0, 0.0)).collect();
    let mut trail = trail_with(&points);
    let mut frames = 0;
    while trail.fade_tick() == FadeStatus::Continue {
        frames += 1;
        assert!(frames <= 50, "fade loop exceeded its bound");
    }
}

#[test]
fn single_point_finishes_immediately() {
    let mut trail = trail_with(&[(0.0, 0.0)]);
    assert_eq!(trail.fade_tick(), FadeStatus::Finished);
}

#[test]
fn empty_trail_finishes_immediately() {
    let mut trail = Trail::new();
    assert_eq!(trail.fade_tick(), FadeStatus::Finished);
}

#[test]
fn max_alpha_tracks_fade() {
    let mut trail = trail_with(&[(0.0, 0.0), (8.0, 0.0)]);
    assert_eq!(trail.max_alpha(), 1.0);
    trail.fade_tick();
    assert!((trail.max_alpha() - 0.98).abs() < 1e-9);
}

#[test]
fn max_alpha_of_empty_trail_is_zero() {
    let trail = Trail::new();
    assert_eq!(trail.max_alpha(), 0.0);
}
