use crate::seed::SeedSource;
use crate::series::resolve;
use nightshift_core::{Counter, JsonReport, MetricDelta, Origin, SessionRecord};
use serde::{Deserialize, Serialize};

/// Provenance of both sides of one compared counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueOrigin {
    pub name: String,
    pub origin_a: Origin,
    pub origin_b: Origin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDiffReport {
    pub session_a: u32,
    pub session_b: u32,
    /// Whether each session appears in the log at all.
    pub a_known: bool,
    pub b_known: bool,
    pub metrics: Vec<MetricDelta>,
    pub origins: Vec<ValueOrigin>,
    pub tasks_added: Vec<String>,
    pub tasks_removed: Vec<String>,
    pub tasks_common: Vec<String>,
}

impl JsonReport for SessionDiffReport {}

impl SessionDiffReport {
    pub fn metric(&self, name: &str) -> Option<&MetricDelta> {
        self.metrics.iter().find(|m| m.name == name)
    }
}

/// Compare two sessions metric by metric.
///
/// Unknown sessions compare as empty records, so their counters fall back
/// to seed or interpolation like any other gap.
pub fn compare(
    seed: &dyn SeedSource,
    records: &[SessionRecord],
    a: u32,
    b: u32,
) -> SessionDiffReport {
    let find = |n: u32| records.iter().rev().find(|r| r.number == n);
    let rec_a = find(a);
    let rec_b = find(b);
    let empty_a = SessionRecord::new(a);
    let empty_b = SessionRecord::new(b);
    let ra = rec_a.unwrap_or(&empty_a);
    let rb = rec_b.unwrap_or(&empty_b);

    let mut metrics = vec![
        MetricDelta::new(
            "Tasks completed",
            ra.tasks_completed() as f64,
            rb.tasks_completed() as f64,
            true,
        ),
        MetricDelta::new("PRs", ra.pr_count() as f64, rb.pr_count() as f64, true),
        MetricDelta::new(
            "Decisions",
            ra.decisions.len() as f64,
            rb.decisions.len() as f64,
            true,
        ),
    ];
    let mut origins = Vec::new();
    for counter in Counter::ALL {
        let va = resolve(seed, records, a, counter);
        let vb = resolve(seed, records, b, counter);
        metrics.push(MetricDelta::new(
            counter.label(),
            va.value as f64,
            vb.value as f64,
            counter.higher_is_better(),
        ));
        origins.push(ValueOrigin {
            name: counter.label().to_string(),
            origin_a: va.origin,
            origin_b: vb.origin,
        });
    }

    let tasks_added = rb
        .tasks
        .iter()
        .filter(|t| !ra.tasks.contains(t))
        .cloned()
        .collect();
    let tasks_removed = ra
        .tasks
        .iter()
        .filter(|t| !rb.tasks.contains(t))
        .cloned()
        .collect();
    let tasks_common = ra
        .tasks
        .iter()
        .filter(|t| rb.tasks.contains(t))
        .cloned()
        .collect();

    SessionDiffReport {
        session_a: a,
        session_b: b,
        a_known: rec_a.is_some(),
        b_known: rec_b.is_some(),
        metrics,
        origins,
        tasks_added,
        tasks_removed,
        tasks_common,
    }
}
