//! Cross-session analysis over parsed session records.
//!
//! Functions that only need the records are free functions; anything that
//! resolves stats-snapshot counters goes through an [`Aggregator`], which
//! owns the seed source used to fill gaps in the live log.

mod compare;
mod health;
mod insights;
mod maturity;
pub mod seed;
mod series;
mod stats;
mod story;
pub mod streaks;
pub mod themes;
mod velocity;

pub use compare::{compare, SessionDiffReport, ValueOrigin};
pub use health::{health_trend, HealthPoint, HealthTrendHistory, TrendLabel};
pub use insights::generate_insights;
pub use maturity::{
    estimate_age, estimate_age_with_git, maturity_report, parse_log_date, AgeEstimate, AgeSource,
    MaturityDimension, MaturityReport, MaturityStage,
};
pub use seed::{NoSeed, SeedRow, SeedSource, StaticSeed};
pub use series::{
    cumulative_series, deltas_from_cumulative, gauge_changes, pr_counts, resolve, task_counts,
    Resolved,
};
pub use stats::{stats_report, SessionSummary, StatsReport};
pub use story::{build_story, Chapter, Story};
pub use streaks::detect_streaks;
pub use themes::Theme;
pub use velocity::{velocity, window_average, VelocityReport, VelocityStats, WindowPoint, DEFAULT_WINDOW};

use nightshift_core::{Counter, Insight, SessionRecord, Streak};
use nightshift_score::ScoreInputs;
use std::collections::BTreeMap;
use tracing::debug;

/// Seed-aware analysis entry point.
pub struct Aggregator {
    seed: Box<dyn SeedSource>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::with_builtin_seed()
    }
}

impl Aggregator {
    pub fn new(seed: impl SeedSource + 'static) -> Self {
        Self {
            seed: Box::new(seed),
        }
    }

    pub fn with_builtin_seed() -> Self {
        Self::new(StaticSeed::builtin())
    }

    /// Live log values only.
    pub fn without_seed() -> Self {
        Self::new(NoSeed)
    }

    pub fn seed(&self) -> &dyn SeedSource {
        self.seed.as_ref()
    }

    pub fn resolve(&self, records: &[SessionRecord], session: u32, counter: Counter) -> Resolved {
        resolve(self.seed(), records, session, counter)
    }

    pub fn cumulative(&self, records: &[SessionRecord], counter: Counter) -> BTreeMap<u32, i64> {
        cumulative_series(self.seed(), records, counter)
    }

    /// Per-session increase of a cumulative counter, or the session-to-session
    /// change of a gauge such as health.
    pub fn per_session_deltas(
        &self,
        records: &[SessionRecord],
        counter: Counter,
    ) -> BTreeMap<u32, i64> {
        let series = self.cumulative(records, counter);
        if counter.is_cumulative() {
            deltas_from_cumulative(&series)
        } else {
            gauge_changes(&series)
        }
    }

    pub fn velocity_report(&self, records: &[SessionRecord], window: usize) -> VelocityReport {
        let prs = pr_counts(records);
        VelocityReport {
            prs: velocity(&prs),
            tasks: velocity(&task_counts(records)),
            modules: velocity(&self.per_session_deltas(records, Counter::Modules)),
            tests: velocity(&self.per_session_deltas(records, Counter::Tests)),
            window,
            pr_window: window_average(&prs, window),
        }
    }

    pub fn streaks(&self, records: &[SessionRecord]) -> Vec<Streak> {
        detect_streaks(
            &pr_counts(records),
            &self.per_session_deltas(records, Counter::Modules),
            &self.per_session_deltas(records, Counter::Tests),
        )
    }

    pub fn compare(&self, records: &[SessionRecord], a: u32, b: u32) -> SessionDiffReport {
        compare(self.seed(), records, a, b)
    }

    pub fn insights(&self, records: &[SessionRecord]) -> Vec<Insight> {
        generate_insights(records, &self.cumulative(records, Counter::Tests))
    }

    pub fn health_trend(&self, records: &[SessionRecord]) -> HealthTrendHistory {
        health_trend(self.seed(), records)
    }

    pub fn maturity(&self, records: &[SessionRecord], age: Option<AgeEstimate>) -> MaturityReport {
        let tests = self
            .cumulative(records, Counter::Tests)
            .values()
            .last()
            .copied()
            .unwrap_or(0);
        maturity_report(records, tests, age)
    }

    /// Rubric inputs for `session`, derived from its counter deltas.
    ///
    /// An unlogged session scores on zeros.
    pub fn score_inputs(&self, records: &[SessionRecord], session: u32) -> ScoreInputs {
        let delta = |counter: Counter| {
            let value = self
                .per_session_deltas(records, counter)
                .get(&session)
                .copied()
                .unwrap_or(0);
            u32::try_from(value.max(0)).unwrap_or(u32::MAX)
        };
        let health_delta = self
            .per_session_deltas(records, Counter::Health)
            .get(&session)
            .copied()
            .unwrap_or(0) as f64;
        let inputs = ScoreInputs {
            features: delta(Counter::Modules),
            tests: delta(Counter::Tests),
            cli_commands: delta(Counter::CliCommands),
            api_endpoints: delta(Counter::ApiEndpoints),
            health_delta,
        };
        debug!(session, ?inputs, "derived score inputs");
        inputs
    }
}
