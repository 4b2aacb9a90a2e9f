use crate::series::sorted;
use nightshift_core::{JsonReport, SessionRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub number: u32,
    pub date: String,
    pub title: String,
    pub tasks: usize,
    pub prs: usize,
    pub decisions: usize,
}

/// Whole-log totals plus one summary row per session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    pub total_sessions: usize,
    /// Distinct PR numbers across every session.
    pub total_prs: usize,
    pub total_tasks: usize,
    pub total_decisions: usize,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub sessions: Vec<SessionSummary>,
}

impl JsonReport for StatsReport {}

impl StatsReport {
    pub fn is_empty(&self) -> bool {
        self.total_sessions == 0
    }
}

pub fn stats_report(records: &[SessionRecord]) -> StatsReport {
    let ordered = sorted(records);
    let prs: BTreeSet<u32> = ordered
        .iter()
        .flat_map(|r| r.pr_numbers.iter().copied())
        .collect();
    let non_empty = |d: &String| (!d.is_empty()).then(|| d.clone());

    StatsReport {
        total_sessions: ordered.len(),
        total_prs: prs.len(),
        total_tasks: ordered.iter().map(|r| r.tasks_completed()).sum(),
        total_decisions: ordered.iter().map(|r| r.decisions.len()).sum(),
        first_date: ordered.first().and_then(|r| non_empty(&r.date)),
        last_date: ordered.last().and_then(|r| non_empty(&r.date)),
        sessions: ordered
            .iter()
            .map(|r| SessionSummary {
                number: r.number,
                date: r.date.clone(),
                title: r.title.clone(),
                tasks: r.tasks_completed(),
                prs: r.pr_count(),
                decisions: r.decisions.len(),
            })
            .collect(),
    }
}
