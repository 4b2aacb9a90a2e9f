//! A retrospective assembled from the other reports.

use crate::{Markdown, NO_SESSIONS};
use nightshift_aggregate::{HealthTrendHistory, StatsReport, TrendLabel, VelocityReport};
use nightshift_core::{Insight, InsightCategory, SessionRecord, Streak};

/// Decisions quoted from the most recent sessions.
pub const RECENT_DECISIONS: usize = 5;

pub struct Reflection<'a> {
    pub stats: &'a StatsReport,
    pub velocity: &'a VelocityReport,
    pub streaks: &'a [Streak],
    pub insights: &'a [Insight],
    pub health: &'a HealthTrendHistory,
    pub recent_decisions: Vec<String>,
}

/// Newest decisions first, across sessions.
pub fn recent_decisions(records: &[SessionRecord], limit: usize) -> Vec<String> {
    let mut ordered: Vec<&SessionRecord> = records.iter().collect();
    ordered.sort_by_key(|r| std::cmp::Reverse(r.number));
    ordered
        .iter()
        .flat_map(|r| r.decisions.iter().map(move |d| format!("Session {}: {d}", r.number)))
        .take(limit)
        .collect()
}

fn is_concern(i: &Insight) -> bool {
    i.category == InsightCategory::Anomaly || i.title.contains("slowing")
}

impl Markdown for Reflection<'_> {
    fn to_markdown(&self) -> String {
        let mut out = String::from("# Reflection\n\n");
        if self.stats.is_empty() {
            out.push_str(NO_SESSIONS);
            out.push('\n');
            return out;
        }

        out.push_str("## By the numbers\n\n");
        out.push_str(&format!(
            "- {} sessions, {} PRs, {} tasks\n- {:.1} PRs and {:.1} tasks per session on average\n",
            self.stats.total_sessions,
            self.stats.total_prs,
            self.stats.total_tasks,
            self.velocity.prs.mean,
            self.velocity.tasks.mean
        ));

        out.push_str("\n## What went well\n\n");
        let wins: Vec<String> = self
            .streaks
            .iter()
            .map(|s| format!("- {}: {}", s.kind.label(), s.description))
            .chain(
                self.insights
                    .iter()
                    .filter(|i| i.category == InsightCategory::Milestone)
                    .map(|i| format!("- {}", i.description)),
            )
            .collect();
        if wins.is_empty() {
            out.push_str("Nothing stands out yet.\n");
        } else {
            out.push_str(&wins.join("\n"));
            out.push('\n');
        }

        out.push_str("\n## What to watch\n\n");
        let mut concerns: Vec<String> = self
            .insights
            .iter()
            .filter(|i| is_concern(i))
            .map(|i| format!("- {}", i.description))
            .collect();
        if self.health.trend == TrendLabel::Declining {
            concerns.push(format!(
                "- Health is declining ({:+.2} per session)",
                self.health.slope
            ));
        }
        if concerns.is_empty() {
            out.push_str("No concerns detected.\n");
        } else {
            out.push_str(&concerns.join("\n"));
            out.push('\n');
        }

        if !self.recent_decisions.is_empty() {
            out.push_str("\n## Recent decisions\n\n");
            for d in &self.recent_decisions {
                out.push_str(&format!("- {d}\n"));
            }
        }
        out
    }
}
