//! Piecewise-linear rubric interpolation.

/// Ascending `(threshold, score)` points; scores are in `[0, 1]`.
pub type Rubric = [(f64, f64)];

/// Map `value` through `rubric`.
///
/// Below the first threshold clamps to the first score, above the last clamps
/// to the last score, in between interpolates linearly between the two
/// bracketing points. An empty rubric or NaN input scores 0.
pub fn interpolate(value: f64, rubric: &Rubric) -> f64 {
    let (Some(&(first_t, first_s)), Some(&(last_t, last_s))) = (rubric.first(), rubric.last())
    else {
        return 0.0;
    };
    if value.is_nan() {
        return 0.0;
    }
    let raw = if value <= first_t {
        first_s
    } else if value >= last_t {
        last_s
    } else {
        rubric
            .windows(2)
            .find(|w| value >= w[0].0 && value <= w[1].0)
            .map(|w| {
                let (t0, s0) = w[0];
                let (t1, s1) = w[1];
                if t1 == t0 {
                    s1
                } else {
                    s0 + (value - t0) / (t1 - t0) * (s1 - s0)
                }
            })
            .unwrap_or(last_s)
    };
    raw.clamp(0.0, 1.0)
}

// ── Rubric tables ──

/// Modules shipped in one session.
pub const FEATURES_RUBRIC: [(f64, f64); 6] = [
    (0.0, 0.0),
    (1.0, 0.3),
    (2.0, 0.5),
    (3.0, 0.7),
    (5.0, 0.9),
    (8.0, 1.0),
];

/// Tests added in one session.
pub const TESTS_RUBRIC: [(f64, f64); 5] = [
    (0.0, 0.0),
    (20.0, 0.3),
    (50.0, 0.5),
    (100.0, 0.75),
    (200.0, 1.0),
];

/// CLI commands added in one session.
pub const CLI_RUBRIC: [(f64, f64); 5] = [
    (0.0, 0.0),
    (1.0, 0.4),
    (2.0, 0.6),
    (4.0, 0.85),
    (6.0, 1.0),
];

/// API endpoints added in one session.
pub const API_RUBRIC: [(f64, f64); 5] = [
    (0.0, 0.0),
    (1.0, 0.4),
    (3.0, 0.7),
    (5.0, 0.9),
    (8.0, 1.0),
];

/// Change in health score over the session; regressions pull below neutral 0.5.
pub const HEALTH_RUBRIC: [(f64, f64); 5] = [
    (-5.0, 0.0),
    (0.0, 0.5),
    (2.0, 0.7),
    (5.0, 0.9),
    (10.0, 1.0),
];
