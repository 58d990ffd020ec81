//! Direction quantization and pattern utilities.
//!
//! The hot path (incremental classification during a drag) uses
//! [`dominant_direction`]; the batch reducer [`analyze_path`] re-derives a
//! pattern from a captured path, sub-sampling and noise-filtering first. Both
//! collapse runs of the same symbol, which is the invariant that keeps a long
//! straight drag a single symbol.
//!
//! Patterns are plain strings over `U`/`D`/`L`/`R`. An analysis that yields
//! zero surviving symbols is a failed recognition (`None`), never an
//! empty-string gesture.

#[cfg(test)]
#[path = "pattern_test.rs"]
mod pattern_test;

use thiserror::Error;

use crate::consts::{MIN_PATH_POINTS, SAMPLE_RATE_FACTOR};

/// One of the four cardinal gesture directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The pattern symbol for this direction.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Up => 'U',
            Self::Down => 'D',
            Self::Left => 'L',
            Self::Right => 'R',
        }
    }

    /// Parse a pattern symbol.
    #[must_use]
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'U' => Some(Self::Up),
            'D' => Some(Self::Down),
            'L' => Some(Self::Left),
            'R' => Some(Self::Right),
            _ => None,
        }
    }

    /// Arrow glyph used by the tracking hint.
    #[must_use]
    pub fn arrow(self) -> char {
        match self {
            Self::Up => '↑',
            Self::Down => '↓',
            Self::Left => '←',
            Self::Right => '→',
        }
    }

    /// Reverse of [`Direction::arrow`].
    #[must_use]
    pub fn from_arrow(c: char) -> Option<Self> {
        match c {
            '↑' => Some(Self::Up),
            '↓' => Some(Self::Down),
            '←' => Some(Self::Left),
            '→' => Some(Self::Right),
            _ => None,
        }
    }

    /// English name, for descriptions and logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

/// Classify a displacement by its dominant axis: `|dx| > |dy|` is horizontal
/// (sign picks Right/Left), anything else vertical (sign picks Down/Up).
///
/// This is the incremental rule the tracker applies per committed segment.
#[must_use]
pub fn dominant_direction(dx: f64, dy: f64) -> Direction {
    if dx.abs() > dy.abs() {
        if dx > 0.0 { Direction::Right } else { Direction::Left }
    } else {
        if dy > 0.0 { Direction::Down } else { Direction::Up }
    }
}

/// Map a displacement angle (radians, screen coordinates with y growing
/// downward) to a direction using axis-aligned quadrants: ±45° around each
/// cardinal.
#[must_use]
pub fn angle_to_direction(angle_rad: f64) -> Direction {
    let degrees = angle_rad.to_degrees();
    if (-45.0..45.0).contains(&degrees) {
        Direction::Right
    } else if (45.0..135.0).contains(&degrees) {
        Direction::Down
    } else if degrees >= 135.0 || degrees < -135.0 {
        Direction::Left
    } else {
        Direction::Up
    }
}

/// A captured path point, as recorded by the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: f64,
}

impl PathPoint {
    #[must_use]
    pub fn new(x: f64, y: f64, timestamp_ms: f64) -> Self {
        Self { x, y, timestamp_ms }
    }
}

/// Reduce a captured path to a pattern string.
///
/// The path is sub-sampled at a stride so that at most
/// [`SAMPLE_RATE_FACTOR`] segments are considered, segments shorter than
/// `min_distance` are dropped as noise, the rest are quantized by angle, and
/// runs of equal symbols collapse. Returns `None` for paths with fewer than
/// [`MIN_PATH_POINTS`] points or with no surviving symbols.
#[must_use]
pub fn analyze_path(path: &[PathPoint], min_distance: f64) -> Option<String> {
    if path.len() < MIN_PATH_POINTS {
        return None;
    }

    let stride = (path.len() / SAMPLE_RATE_FACTOR).max(1);
    let mut pattern = String::new();
    let mut last: Option<Direction> = None;

    let mut i = 0;
    while i + stride < path.len() {
        let current = path[i];
        let next = path[i + stride];
        let dx = next.x - current.x;
        let dy = next.y - current.y;

        if dx.hypot(dy) >= min_distance {
            let direction = angle_to_direction(dy.atan2(dx));
            if last != Some(direction) {
                pattern.push(direction.symbol());
                last = Some(direction);
            }
        }
        i += stride;
    }

    if pattern.is_empty() { None } else { Some(pattern) }
}

/// Similarity of two patterns in `[0, 1]`, from their edit distance.
/// Empty input on either side scores `0.0`.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let max_len = a.chars().count().max(b.chars().count());
    #[allow(clippy::cast_precision_loss)]
    {
        1.0 - (levenshtein(a, b) as f64 / max_len as f64)
    }
}

/// Levenshtein edit distance between two strings.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut row: Vec<usize> = (0..=a.len()).collect();
    for (i, &bc) in b.iter().enumerate() {
        let mut prev_diag = row[0];
        row[0] = i + 1;
        for (j, &ac) in a.iter().enumerate() {
            let cost = if ac == bc { prev_diag } else { prev_diag + 1 };
            prev_diag = row[j + 1];
            row[j + 1] = cost.min(row[j] + 1).min(prev_diag + 1);
        }
    }
    row[a.len()]
}

/// Why a pattern string failed structural validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,
    #[error("pattern length {len} is below the minimum {min}")]
    TooShort { len: usize, min: usize },
    #[error("pattern length {len} exceeds the maximum {max}")]
    TooLong { len: usize, max: usize },
    #[error("pattern contains invalid symbol {0:?}")]
    InvalidSymbol(char),
    #[error("pattern repeats symbol {0:?} at adjacent positions")]
    AdjacentRepeat(char),
}

/// Validate that a pattern contains only legal symbols, has no adjacent
/// duplicates, and falls within `[min_len, max_len]`.
///
/// # Errors
///
/// Returns the first [`PatternError`] encountered, checking emptiness, then
/// length bounds, then symbols.
pub fn validate(pattern: &str, min_len: usize, max_len: usize) -> Result<(), PatternError> {
    if pattern.is_empty() {
        return Err(PatternError::Empty);
    }
    let len = pattern.chars().count();
    if len < min_len {
        return Err(PatternError::TooShort { len, min: min_len });
    }
    if len > max_len {
        return Err(PatternError::TooLong { len, max: max_len });
    }

    let mut prev: Option<char> = None;
    for c in pattern.chars() {
        if Direction::from_symbol(c).is_none() {
            return Err(PatternError::InvalidSymbol(c));
        }
        if prev == Some(c) {
            return Err(PatternError::AdjacentRepeat(c));
        }
        prev = Some(c);
    }
    Ok(())
}

/// Render a pattern as arrow glyphs (`"RD"` → `"→↓"`). Unknown characters
/// pass through unchanged.
#[must_use]
pub fn arrows_for_pattern(pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| Direction::from_symbol(c).map_or(c, Direction::arrow))
        .collect()
}

/// Reverse of [`arrows_for_pattern`].
#[must_use]
pub fn pattern_for_arrows(arrows: &str) -> String {
    arrows
        .chars()
        .map(|c| Direction::from_arrow(c).map_or(c, Direction::symbol))
        .collect()
}

/// Human-readable description of a pattern (`"RD"` → `"Right-Down"`).
#[must_use]
pub fn describe(pattern: &str) -> String {
    pattern
        .chars()
        .filter_map(Direction::from_symbol)
        .map(Direction::name)
        .collect::<Vec<_>>()
        .join("-")
}
