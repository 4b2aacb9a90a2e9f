//! Productivity streak detection over per-session series.

use nightshift_core::{Streak, StreakKind};
use std::collections::{BTreeMap, BTreeSet};

/// Module delta a session must exceed to count toward a feature burst.
pub const FEATURE_BURST_THRESHOLD: i64 = 3;
pub const MIN_BURST_LEN: usize = 2;
pub const MIN_TEST_GROWTH_LEN: usize = 3;
pub const MIN_CONSISTENCY_SESSIONS: usize = 3;
/// Maximum coefficient of variation of PR counts for a consistency streak.
pub const MAX_CONSISTENCY_CV: f64 = 0.5;

/// Detect every streak kind. Order: peak, burst, growth, consistency.
pub fn detect_streaks(
    prs: &BTreeMap<u32, i64>,
    module_deltas: &BTreeMap<u32, i64>,
    test_deltas: &BTreeMap<u32, i64>,
) -> Vec<Streak> {
    [
        peak_session(prs),
        feature_burst(module_deltas),
        test_growth(test_deltas),
        consistency(prs),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn peak_session(prs: &BTreeMap<u32, i64>) -> Option<Streak> {
    let mut peak: Option<(u32, i64)> = None;
    for (&s, &v) in prs {
        if peak.map_or(true, |(_, best)| v > best) {
            peak = Some((s, v));
        }
    }
    let (session, value) = peak.filter(|&(_, v)| v > 0)?;
    Some(Streak {
        kind: StreakKind::PeakSession,
        sessions: BTreeSet::from([session]),
        description: format!("Session {session} merged {value} PRs, the most of any session"),
        metric_value: value as f64,
    })
}

/// Longest run of consecutive sessions each adding more than the threshold of modules.
pub fn feature_burst(module_deltas: &BTreeMap<u32, i64>) -> Option<Streak> {
    let points: Vec<(u32, i64)> = module_deltas.iter().map(|(&s, &v)| (s, v)).collect();
    let run = longest_run(&points, |v| v > FEATURE_BURST_THRESHOLD)?;
    if run.len() < MIN_BURST_LEN {
        return None;
    }
    let total: i64 = run.iter().map(|(_, v)| v).sum();
    let (first, last) = (run[0].0, run[run.len() - 1].0);
    Some(Streak {
        kind: StreakKind::FeatureBurst,
        sessions: run.iter().map(|(s, _)| *s).collect(),
        description: format!(
            "Sessions {first}\u{2013}{last} each added more than {FEATURE_BURST_THRESHOLD} modules ({total} total)"
        ),
        metric_value: total as f64,
    })
}

/// Longest run where each session adds strictly more tests than the one before.
pub fn test_growth(test_deltas: &BTreeMap<u32, i64>) -> Option<Streak> {
    let points: Vec<(u32, i64)> = test_deltas.iter().map(|(&s, &v)| (s, v)).collect();
    let mut best: &[(u32, i64)] = &[];
    let mut start = 0;
    for i in 1..=points.len() {
        let continues = i < points.len() && points[i].1 > points[i - 1].1;
        if !continues {
            if i - start > best.len() {
                best = &points[start..i];
            }
            start = i;
        }
    }
    if best.len() < MIN_TEST_GROWTH_LEN {
        return None;
    }
    let (first, last) = (best[0], best[best.len() - 1]);
    Some(Streak {
        kind: StreakKind::TestGrowth,
        sessions: best.iter().map(|(s, _)| *s).collect(),
        description: format!(
            "Test additions grew every session from {} to {} (sessions {}\u{2013}{})",
            first.1, last.1, first.0, last.0
        ),
        metric_value: last.1 as f64,
    })
}

/// Steady PR output across the whole history.
pub fn consistency(prs: &BTreeMap<u32, i64>) -> Option<Streak> {
    if prs.len() < MIN_CONSISTENCY_SESSIONS {
        return None;
    }
    let n = prs.len() as f64;
    let mean = prs.values().sum::<i64>() as f64 / n;
    if mean <= 0.0 {
        return None;
    }
    let variance = prs
        .values()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    let cv = variance.sqrt() / mean;
    if cv > MAX_CONSISTENCY_CV {
        return None;
    }
    Some(Streak {
        kind: StreakKind::Consistency,
        sessions: prs.keys().copied().collect(),
        description: format!(
            "Steady output of {mean:.1} PRs per session across {} sessions (variation {cv:.2})",
            prs.len()
        ),
        metric_value: mean,
    })
}

/// Longest contiguous run of points satisfying `keep`; earliest wins ties.
fn longest_run(
    points: &[(u32, i64)],
    keep: impl Fn(i64) -> bool,
) -> Option<&[(u32, i64)]> {
    let mut best: Option<&[(u32, i64)]> = None;
    let mut start: Option<usize> = None;
    for i in 0..=points.len() {
        let ok = i < points.len() && keep(points[i].1);
        match (ok, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if best.map_or(true, |b| i - s > b.len()) {
                    best = Some(&points[s..i]);
                }
                start = None;
            }
            _ => {}
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[(u32, i64)]) -> BTreeMap<u32, i64> {
        values.iter().copied().collect()
    }

    #[test]
    fn peak_session_picks_max_prs() {
        let s = peak_session(&series(&[(1, 1), (2, 4), (3, 4)])).unwrap();
        assert_eq!(s.sessions, BTreeSet::from([2]));
        assert_eq!(s.metric_value, 4.0);
    }

    #[test]
    fn no_peak_without_prs() {
        assert!(peak_session(&series(&[(1, 0), (2, 0)])).is_none());
        assert!(peak_session(&BTreeMap::new()).is_none());
    }

    #[test]
    fn feature_burst_needs_two_big_sessions() {
        assert!(feature_burst(&series(&[(1, 5), (2, 1), (3, 6)])).is_none());
        let s = feature_burst(&series(&[(1, 1), (2, 4), (3, 6), (4, 2), (5, 9)])).unwrap();
        assert_eq!(s.sessions, BTreeSet::from([2, 3]));
        assert_eq!(s.metric_value, 10.0);
    }

    #[test]
    fn burst_threshold_is_exclusive() {
        assert!(feature_burst(&series(&[(1, 3), (2, 3)])).is_none());
    }

    #[test]
    fn test_growth_needs_strict_increase() {
        let s = test_growth(&series(&[(1, 10), (2, 20), (3, 35), (4, 35)])).unwrap();
        assert_eq!(s.sessions, BTreeSet::from([1, 2, 3]));
        assert_eq!(s.metric_value, 35.0);
        assert!(test_growth(&series(&[(1, 10), (2, 20), (3, 20)])).is_none());
    }

    #[test]
    fn consistency_accepts_low_variation() {
        let s = consistency(&series(&[(1, 2), (2, 3), (3, 2), (4, 3)])).unwrap();
        assert_eq!(s.kind, StreakKind::Consistency);
        assert_eq!(s.sessions.len(), 4);
    }

    #[test]
    fn consistency_rejects_spiky_or_short_histories() {
        assert!(consistency(&series(&[(1, 0), (2, 10), (3, 0)])).is_none());
        assert!(consistency(&series(&[(1, 2), (2, 2)])).is_none());
        assert!(consistency(&series(&[(1, 0), (2, 0), (3, 0)])).is_none());
    }

    #[test]
    fn every_streak_names_sessions() {
        let prs = series(&[(1, 2), (2, 3), (3, 2)]);
        let modules = series(&[(1, 4), (2, 5), (3, 0)]);
        let tests = series(&[(1, 5), (2, 10), (3, 20)]);
        let streaks = detect_streaks(&prs, &modules, &tests);
        assert_eq!(streaks.len(), 4);
        assert!(streaks.iter().all(|s| !s.sessions.is_empty()));
    }
}
