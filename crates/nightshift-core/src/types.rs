use crate::counter::{snapshot_key, Counter};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ── Session record ──

/// One parsed `## Session N — <date>` block.
///
/// Every field defaults to empty when its sub-section is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub number: u32,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<String>,
    #[serde(default)]
    pub pr_numbers: BTreeSet<u32>,
    #[serde(default)]
    pub decisions: Vec<String>,
    #[serde(default)]
    pub notes: String,
    /// Normalized snapshot key (see [`snapshot_key`]) → value.
    #[serde(default)]
    pub stats_snapshot: BTreeMap<String, i64>,
}

impl SessionRecord {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    pub fn tasks_completed(&self) -> usize {
        self.tasks.len()
    }

    pub fn pr_count(&self) -> usize {
        self.pr_numbers.len()
    }

    /// Look up a tracked counter in the stats snapshot, trying each alias in order.
    pub fn snapshot_value(&self, counter: Counter) -> Option<i64> {
        counter
            .aliases()
            .iter()
            .find_map(|alias| self.stats_snapshot.get(*alias).copied())
    }

    /// Raw lookup by any label (`"Total PRs"` and `"total_prs"` are equivalent).
    pub fn snapshot_label(&self, label: &str) -> Option<i64> {
        self.stats_snapshot.get(&snapshot_key(label)).copied()
    }

    /// `"Session 3 — January 20, 2025"` style heading text.
    pub fn heading(&self) -> String {
        if self.date.is_empty() {
            format!("Session {}", self.number)
        } else {
            format!("Session {} \u{2014} {}", self.number, self.date)
        }
    }
}

// ── Value provenance ──

/// Where a resolved per-session value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// The session's own stats snapshot.
    Live,
    /// The historical seed table.
    Seeded,
    /// Linear interpolation between neighbouring known sessions.
    Interpolated,
    /// Nothing known; value is a zero placeholder.
    Missing,
}

// ── Metric deltas ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Neutral,
}

/// Whether a delta is good news once `higher_is_better` is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Improved,
    Regressed,
    Unchanged,
}

/// A named two-point comparison of one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub name: String,
    pub value_a: f64,
    pub value_b: f64,
    pub delta: f64,
    pub direction: Direction,
    pub higher_is_better: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pct_change: Option<f64>,
}

impl MetricDelta {
    pub fn new(name: impl Into<String>, value_a: f64, value_b: f64, higher_is_better: bool) -> Self {
        let delta = value_b - value_a;
        let direction = if delta > 0.0 {
            Direction::Up
        } else if delta < 0.0 {
            Direction::Down
        } else {
            Direction::Neutral
        };
        let pct_change = if value_a != 0.0 {
            Some(delta / value_a.abs() * 100.0)
        } else {
            None
        };
        Self {
            name: name.into(),
            value_a,
            value_b,
            delta,
            direction,
            higher_is_better,
            pct_change,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match (self.direction, self.higher_is_better) {
            (Direction::Neutral, _) => Outcome::Unchanged,
            (Direction::Up, true) | (Direction::Down, false) => Outcome::Improved,
            (Direction::Up, false) | (Direction::Down, true) => Outcome::Regressed,
        }
    }
}

// ── Pattern detection outputs ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakKind {
    /// Single most productive session by PR count.
    PeakSession,
    /// Consecutive sessions each shipping more than the burst threshold of modules.
    FeatureBurst,
    /// Consecutive sessions with strictly increasing test additions.
    TestGrowth,
    /// PR counts with bounded variance across the whole history.
    Consistency,
}

impl StreakKind {
    pub fn label(self) -> &'static str {
        match self {
            StreakKind::PeakSession => "Peak session",
            StreakKind::FeatureBurst => "Feature burst",
            StreakKind::TestGrowth => "Test growth",
            StreakKind::Consistency => "Consistency",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    pub kind: StreakKind,
    pub sessions: BTreeSet<u32>,
    pub description: String,
    pub metric_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Productivity,
    Pattern,
    Milestone,
    Anomaly,
}

impl InsightCategory {
    pub fn label(self) -> &'static str {
        match self {
            InsightCategory::Productivity => "Productivity",
            InsightCategory::Pattern => "Pattern",
            InsightCategory::Milestone => "Milestone",
            InsightCategory::Anomaly => "Anomaly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub category: InsightCategory,
    pub title: String,
    pub description: String,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub sessions_involved: Vec<u32>,
}
