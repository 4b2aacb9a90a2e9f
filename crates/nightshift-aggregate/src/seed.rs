//! Historical per-session figures used when the log has no stats snapshot.

use nightshift_core::Counter;

/// Fallback figures for sessions the live log cannot answer for.
pub trait SeedSource {
    fn lookup(&self, session: u32, counter: Counter) -> Option<i64>;
}

/// One row of the seed table. Counters a row doesn't carry are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedRow {
    pub session: u32,
    pub modules: Option<i64>,
    pub tests: Option<i64>,
    pub total_prs: Option<i64>,
    pub health: Option<i64>,
}

impl SeedRow {
    pub const fn new(session: u32, modules: i64, tests: i64, total_prs: i64, health: i64) -> Self {
        Self {
            session,
            modules: Some(modules),
            tests: Some(tests),
            total_prs: Some(total_prs),
            health: Some(health),
        }
    }

    fn value(&self, counter: Counter) -> Option<i64> {
        match counter {
            Counter::Modules => self.modules,
            Counter::Tests => self.tests,
            Counter::TotalPrs => self.total_prs,
            Counter::Health => self.health,
            Counter::CliCommands | Counter::ApiEndpoints | Counter::DeadCode => None,
        }
    }
}

/// Figures for the sessions logged before stats snapshots were kept.
pub const BUILTIN_SEED: [SeedRow; 6] = [
    SeedRow::new(0, 3, 0, 0, 60),
    SeedRow::new(1, 6, 24, 2, 64),
    SeedRow::new(2, 9, 58, 5, 68),
    SeedRow::new(3, 12, 97, 8, 71),
    SeedRow::new(4, 16, 140, 11, 73),
    SeedRow::new(5, 19, 210, 15, 76),
];

/// A seed table held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSeed {
    rows: Vec<SeedRow>,
}

impl StaticSeed {
    pub fn builtin() -> Self {
        Self::from_rows(BUILTIN_SEED.to_vec())
    }

    pub fn from_rows(rows: Vec<SeedRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[SeedRow] {
        &self.rows
    }
}

impl SeedSource for StaticSeed {
    fn lookup(&self, session: u32, counter: Counter) -> Option<i64> {
        self.rows
            .iter()
            .rev()
            .find(|r| r.session == session)
            .and_then(|r| r.value(counter))
    }
}

/// A seed source that knows nothing; every value must come from the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSeed;

impl SeedSource for NoSeed {
    fn lookup(&self, _session: u32, _counter: Counter) -> Option<i64> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_seed_answers_known_sessions() {
        let seed = StaticSeed::builtin();
        assert_eq!(seed.lookup(4, Counter::Tests), Some(140));
        assert_eq!(seed.lookup(2, Counter::Health), Some(68));
        assert_eq!(seed.lookup(99, Counter::Tests), None);
    }

    #[test]
    fn builtin_seed_has_no_cli_figures() {
        assert_eq!(StaticSeed::builtin().lookup(1, Counter::CliCommands), None);
    }

    #[test]
    fn builtin_seed_is_monotonic_for_cumulative_counters() {
        for pair in BUILTIN_SEED.windows(2) {
            assert!(pair[0].session < pair[1].session);
            assert!(pair[0].modules <= pair[1].modules);
            assert!(pair[0].tests <= pair[1].tests);
            assert!(pair[0].total_prs <= pair[1].total_prs);
        }
    }

    #[test]
    fn later_rows_override_earlier_duplicates() {
        let seed = StaticSeed::from_rows(vec![
            SeedRow::new(1, 1, 10, 1, 50),
            SeedRow::new(1, 2, 20, 2, 55),
        ]);
        assert_eq!(seed.lookup(1, Counter::Tests), Some(20));
    }

    #[test]
    fn no_seed_is_empty() {
        assert_eq!(NoSeed.lookup(0, Counter::Modules), None);
    }
}
