//! Per-session value series: resolution, cumulative totals and deltas.

use crate::seed::SeedSource;
use nightshift_core::{Counter, Origin, SessionRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A counter value for one session, with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolved {
    pub value: i64,
    pub origin: Origin,
}

impl Resolved {
    pub fn is_known(&self) -> bool {
        self.origin != Origin::Missing
    }
}

/// Records ordered by session number.
pub(crate) fn sorted(records: &[SessionRecord]) -> Vec<&SessionRecord> {
    let mut out: Vec<&SessionRecord> = records.iter().collect();
    out.sort_by_key(|r| r.number);
    out
}

/// Live snapshot value, then the seed table. No interpolation.
pub(crate) fn direct(
    seed: &dyn SeedSource,
    record: &SessionRecord,
    counter: Counter,
) -> Option<Resolved> {
    if let Some(value) = record.snapshot_value(counter) {
        return Some(Resolved { value, origin: Origin::Live });
    }
    seed.lookup(record.number, counter)
        .map(|value| Resolved { value, origin: Origin::Seeded })
}

/// Resolve one counter for `session`: live, seeded, interpolated, or missing.
///
/// Interpolation draws on the nearest directly-known sessions on either side;
/// with only one side known its value is carried.
pub fn resolve(
    seed: &dyn SeedSource,
    records: &[SessionRecord],
    session: u32,
    counter: Counter,
) -> Resolved {
    let ordered = sorted(records);
    if let Some(record) = ordered.iter().rev().find(|r| r.number == session) {
        if let Some(found) = direct(seed, record, counter) {
            return found;
        }
    } else if let Some(value) = seed.lookup(session, counter) {
        return Resolved { value, origin: Origin::Seeded };
    }

    let known: Vec<(u32, i64)> = ordered
        .iter()
        .filter(|r| r.number != session)
        .filter_map(|r| direct(seed, r, counter).map(|v| (r.number, v.value)))
        .collect();
    let below = known.iter().rev().find(|(n, _)| *n < session).copied();
    let above = known.iter().find(|(n, _)| *n > session).copied();

    let value = match (below, above) {
        (Some((n0, v0)), Some((n1, v1))) => {
            let t = f64::from(session - n0) / f64::from(n1 - n0);
            (v0 as f64 + t * (v1 - v0) as f64).round() as i64
        }
        (Some((_, v)), None) | (None, Some((_, v))) => v,
        (None, None) => {
            return Resolved { value: 0, origin: Origin::Missing };
        }
    };
    Resolved { value, origin: Origin::Interpolated }
}

/// Running value of `counter` at every logged session.
///
/// Sessions with no live or seeded value carry the previous value forward;
/// sessions before the first known value read 0.
pub fn cumulative_series(
    seed: &dyn SeedSource,
    records: &[SessionRecord],
    counter: Counter,
) -> BTreeMap<u32, i64> {
    let mut out = BTreeMap::new();
    let mut last = 0;
    for record in sorted(records) {
        if let Some(found) = direct(seed, record, counter) {
            last = found.value;
        }
        out.insert(record.number, last);
    }
    out
}

/// Per-session increase of a cumulative series.
///
/// Each delta is `max(0, current - previous)`, so a regression in the log
/// reads as zero progress rather than negative. The first session's delta
/// is its own value.
pub fn deltas_from_cumulative(series: &BTreeMap<u32, i64>) -> BTreeMap<u32, i64> {
    let mut out = BTreeMap::new();
    let mut prev: Option<i64> = None;
    for (&session, &value) in series {
        out.insert(session, prev.map_or(value.max(0), |p| (value - p).max(0)));
        prev = Some(value);
    }
    out
}

/// Session-to-session change of a gauge series (health, dead code). May be negative.
pub fn gauge_changes(series: &BTreeMap<u32, i64>) -> BTreeMap<u32, i64> {
    let mut out = BTreeMap::new();
    let mut prev: Option<i64> = None;
    for (&session, &value) in series {
        out.insert(session, prev.map_or(0, |p| value - p));
        prev = Some(value);
    }
    out
}

/// Distinct PRs referenced by each session.
pub fn pr_counts(records: &[SessionRecord]) -> BTreeMap<u32, i64> {
    records
        .iter()
        .map(|r| (r.number, r.pr_count() as i64))
        .collect()
}

pub fn task_counts(records: &[SessionRecord]) -> BTreeMap<u32, i64> {
    records
        .iter()
        .map(|r| (r.number, r.tasks_completed() as i64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{NoSeed, SeedRow, StaticSeed};

    fn rec(number: u32, counter: &str, value: i64) -> SessionRecord {
        let mut r = SessionRecord::new(number);
        r.stats_snapshot.insert(counter.into(), value);
        r
    }

    #[test]
    fn live_beats_seed() {
        let seed = StaticSeed::from_rows(vec![SeedRow::new(1, 5, 50, 1, 70)]);
        let records = vec![rec(1, "tests", 60)];
        let r = resolve(&seed, &records, 1, Counter::Tests);
        assert_eq!(r, Resolved { value: 60, origin: Origin::Live });
    }

    #[test]
    fn seed_fills_missing_snapshot() {
        let seed = StaticSeed::from_rows(vec![SeedRow::new(1, 5, 50, 1, 70)]);
        let records = vec![SessionRecord::new(1)];
        let r = resolve(&seed, &records, 1, Counter::Tests);
        assert_eq!(r, Resolved { value: 50, origin: Origin::Seeded });
    }

    #[test]
    fn interpolates_between_neighbours() {
        let records = vec![rec(1, "tests", 100), SessionRecord::new(2), rec(3, "tests", 200)];
        let r = resolve(&NoSeed, &records, 2, Counter::Tests);
        assert_eq!(r, Resolved { value: 150, origin: Origin::Interpolated });
    }

    #[test]
    fn carries_one_sided_neighbour() {
        let records = vec![rec(1, "tests", 100), SessionRecord::new(2)];
        let r = resolve(&NoSeed, &records, 2, Counter::Tests);
        assert_eq!(r.value, 100);
        assert_eq!(r.origin, Origin::Interpolated);
    }

    #[test]
    fn nothing_known_is_missing() {
        let r = resolve(&NoSeed, &[SessionRecord::new(1)], 1, Counter::Modules);
        assert_eq!(r, Resolved { value: 0, origin: Origin::Missing });
        assert!(!r.is_known());
    }

    #[test]
    fn cumulative_carries_forward() {
        let records = vec![rec(1, "modules", 4), SessionRecord::new(2), rec(3, "modules", 9)];
        let series = cumulative_series(&NoSeed, &records, Counter::Modules);
        assert_eq!(series.into_iter().collect::<Vec<_>>(), vec![(1, 4), (2, 4), (3, 9)]);
    }

    #[test]
    fn first_delta_is_own_value_and_sum_matches_last() {
        let series: BTreeMap<u32, i64> = [(1, 10), (2, 15), (3, 22)].into_iter().collect();
        let deltas = deltas_from_cumulative(&series);
        assert_eq!(deltas[&1], 10);
        assert_eq!(deltas.values().sum::<i64>(), 22);
    }

    #[test]
    fn regressions_clamp_to_zero() {
        let series: BTreeMap<u32, i64> = [(1, 10), (2, 7), (3, 12)].into_iter().collect();
        let deltas = deltas_from_cumulative(&series);
        assert_eq!(deltas.into_iter().collect::<Vec<_>>(), vec![(1, 10), (2, 0), (3, 5)]);
    }

    #[test]
    fn gauge_changes_can_go_negative() {
        let series: BTreeMap<u32, i64> = [(1, 80), (2, 75), (3, 79)].into_iter().collect();
        let changes = gauge_changes(&series);
        assert_eq!(changes.into_iter().collect::<Vec<_>>(), vec![(1, 0), (2, -5), (3, 4)]);
    }

    #[test]
    fn pr_counts_use_distinct_numbers() {
        let mut r = SessionRecord::new(2);
        r.pr_numbers.extend([2, 3, 3]);
        assert_eq!(pr_counts(&[r])[&2], 2);
    }
}
