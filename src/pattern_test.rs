#![allow(clippy::float_cmp)]

use super::*;

/// Straight-line path of `n` points from `(x0, y0)` stepping by `(dx, dy)`.
fn line(x0: f64, y0: f64, dx: f64, dy: f64, n: usize) -> Vec<PathPoint> {
    (0..n)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64;
            PathPoint::new(x0 + dx * t, y0 + dy * t, t * 16.0)
        })
        .collect()
}

// --- Direction ---

#[test]
fn symbol_round_trip() {
    for d in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
        assert_eq!(Direction::from_symbol(d.symbol()), Some(d));
    }
}

#[test]
fn arrow_round_trip() {
    for d in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
        assert_eq!(Direction::from_arrow(d.arrow()), Some(d));
    }
}

#[test]
fn from_symbol_rejects_lowercase() {
    assert_eq!(Direction::from_symbol('u'), None);
    assert_eq!(Direction::from_symbol('x'), None);
}

// --- Dominant axis ---

#[test]
fn dominant_right() {
    assert_eq!(dominant_direction(10.0, 3.0), Direction::Right);
}

#[test]
fn dominant_left() {
    assert_eq!(dominant_direction(-10.0, 3.0), Direction::Left);
}

#[test]
fn dominant_down() {
    assert_eq!(dominant_direction(3.0, 10.0), Direction::Down);
}

#[test]
fn dominant_up() {
    assert_eq!(dominant_direction(3.0, -10.0), Direction::Up);
}

#[test]
fn dominant_tie_goes_vertical() {
    // A perfect diagonal resolves on the vertical axis.
    assert_eq!(dominant_direction(10.0, 10.0), Direction::Down);
    assert_eq!(dominant_direction(10.0, -10.0), Direction::Up);
}

// --- Angle quadrants ---

#[test]
fn angle_cardinals() {
    assert_eq!(angle_to_direction(0.0), Direction::Right);
    assert_eq!(angle_to_direction(std::f64::consts::FRAC_PI_2), Direction::Down);
    assert_eq!(angle_to_direction(std::f64::consts::PI), Direction::Left);
    assert_eq!(angle_to_direction(-std::f64::consts::FRAC_PI_2), Direction::Up);
}

#[test]
fn angle_quadrant_boundaries() {
    assert_eq!(angle_to_direction(45.0_f64.to_radians()), Direction::Down);
    assert_eq!(angle_to_direction(44.9_f64.to_radians()), Direction::Right);
    assert_eq!(angle_to_direction(135.0_f64.to_radians()), Direction::Left);
    assert_eq!(angle_to_direction((-45.0_f64).to_radians()), Direction::Right);
    assert_eq!(angle_to_direction((-45.1_f64).to_radians()), Direction::Up);
}

// --- analyze_path ---

#[test]
fn straight_drag_is_single_symbol() {
    let path = line(100.0, 100.0, 10.0, 0.0, 15);
    assert_eq!(analyze_path(&path, 5.0), Some("R".to_owned()));
}

#[test]
fn right_then_down() {
    let mut path = line(100.0, 100.0, 10.0, 0.0, 10);
    let turn = path[path.len() - 1];
    path.extend(line(turn.x, turn.y, 0.0, 10.0, 10));
    assert_eq!(analyze_path(&path, 5.0), Some("RD".to_owned()));
}

#[test]
fn long_straight_drag_collapses_runs() {
    // 200 points to the right must still be one symbol, not 200.
    let path = line(0.0, 0.0, 8.0, 0.0, 200);
    assert_eq!(analyze_path(&path, 5.0), Some("R".to_owned()));
}

#[test]
fn no_adjacent_duplicate_symbols() {
    let mut path = line(100.0, 100.0, 12.0, 0.0, 30);
    let turn = path[path.len() - 1];
    path.extend(line(turn.x, turn.y, 0.0, 12.0, 30));
    let back = path[path.len() - 1];
    path.extend(line(back.x, back.y, 12.0, 0.0, 30));

    let pattern = analyze_path(&path, 5.0).map_or_else(String::new, |p| p);
    assert!(!pattern.is_empty());
    for pair in pattern.as_bytes().windows(2) {
        assert_ne!(pair[0], pair[1], "adjacent duplicate in {pattern}");
    }
}

#[test]
fn too_few_points_is_none() {
    let path = line(0.0, 0.0, 50.0, 0.0, 4);
    assert_eq!(analyze_path(&path, 5.0), None);
}

#[test]
fn jitter_below_min_distance_is_none() {
    // Points wobble by 1px; nothing crosses the noise floor.
    let path = line(100.0, 100.0, 1.0, 0.0, 10);
    assert_eq!(analyze_path(&path, 5.0), None);
}

#[test]
fn empty_path_is_none() {
    assert_eq!(analyze_path(&[], 5.0), None);
}

// --- Similarity ---

#[test]
fn identical_patterns_score_one() {
    assert_eq!(similarity("RDL", "RDL"), 1.0);
}

#[test]
fn disjoint_patterns_score_zero() {
    assert_eq!(similarity("RRR", "LLL"), 0.0);
}

#[test]
fn empty_pattern_scores_zero() {
    assert_eq!(similarity("", "RD"), 0.0);
    assert_eq!(similarity("RD", ""), 0.0);
}

#[test]
fn one_edit_off() {
    // One substitution across three symbols.
    let s = similarity("RDL", "RDR");
    assert!((s - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn levenshtein_basics() {
    assert_eq!(levenshtein("", ""), 0);
    assert_eq!(levenshtein("R", ""), 1);
    assert_eq!(levenshtein("RD", "RD"), 0);
    assert_eq!(levenshtein("RD", "RL"), 1);
    assert_eq!(levenshtein("RDLU", "DLUR"), 2);
}

// --- Validation ---

#[test]
fn validate_accepts_clean_pattern() {
    assert_eq!(validate("RDLU", 1, 8), Ok(()));
}

#[test]
fn validate_rejects_empty() {
    assert_eq!(validate("", 1, 8), Err(PatternError::Empty));
}

#[test]
fn validate_rejects_too_long() {
    assert_eq!(
        validate("RDRDRDRDR", 1, 8),
        Err(PatternError::TooLong { len: 9, max: 8 })
    );
}

#[test]
fn validate_rejects_bad_symbol() {
    assert_eq!(validate("RXD", 1, 8), Err(PatternError::InvalidSymbol('X')));
}

#[test]
fn validate_rejects_adjacent_repeat() {
    assert_eq!(validate("RRD", 1, 8), Err(PatternError::AdjacentRepeat('R')));
}

// --- Display helpers ---

#[test]
fn arrows_for_pattern_maps_symbols() {
    assert_eq!(arrows_for_pattern("RDLU"), "→↓←↑");
}

#[test]
fn pattern_for_arrows_is_inverse() {
    assert_eq!(pattern_for_arrows("→↓←↑"), "RDLU");
}

#[test]
fn describe_joins_names() {
    assert_eq!(describe("RD"), "Right-Down");
    assert_eq!(describe("U"), "Up");
    assert_eq!(describe(""), "");
}
