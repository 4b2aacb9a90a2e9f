//! Markdown renderers for the aggregate reports.

use crate::sparkline::{sparkline_i64, trim_float};
use crate::table::{cell, table};
use crate::{Markdown, NO_SESSIONS};
use nightshift_aggregate::{
    HealthTrendHistory, SessionDiffReport, StatsReport, TrendLabel, VelocityReport, VelocityStats,
};
use nightshift_core::{Insight, InsightCategory, MetricDelta, Origin, Outcome, Streak};
use nightshift_score::SessionQualityScore;

// ── Stats ──

impl Markdown for StatsReport {
    fn to_markdown(&self) -> String {
        let mut out = String::from("# Session Stats\n\n");
        if self.is_empty() {
            out.push_str(NO_SESSIONS);
            out.push('\n');
            return out;
        }
        let summary = vec![
            vec!["Sessions".into(), self.total_sessions.to_string()],
            vec!["PRs merged".into(), self.total_prs.to_string()],
            vec!["Tasks completed".into(), self.total_tasks.to_string()],
            vec!["Decisions".into(), self.total_decisions.to_string()],
            vec!["First session".into(), self.first_date.clone().unwrap_or_else(|| "-".into())],
            vec!["Last session".into(), self.last_date.clone().unwrap_or_else(|| "-".into())],
        ];
        out.push_str(&table(&["Metric", "Value"], &summary));
        out.push_str("\n## Sessions\n\n");
        let rows: Vec<Vec<String>> = self
            .sessions
            .iter()
            .map(|s| {
                vec![
                    s.number.to_string(),
                    s.date.clone(),
                    s.title.clone(),
                    s.tasks.to_string(),
                    s.prs.to_string(),
                ]
            })
            .collect();
        out.push_str(&table(&["#", "Date", "Title", "Tasks", "PRs"], &rows));
        out
    }
}

// ── Compare ──

fn origin_note(origin: Origin) -> &'static str {
    match origin {
        Origin::Live => "",
        Origin::Seeded => " (seed)",
        Origin::Interpolated => " (est.)",
        Origin::Missing => " (n/a)",
    }
}

/// `+4 (+40.0%) improved` style change cell.
pub fn format_change(m: &MetricDelta) -> String {
    let verdict = match m.outcome() {
        Outcome::Unchanged => return "no change".to_string(),
        Outcome::Improved => "improved",
        Outcome::Regressed => "regressed",
    };
    let sign = if m.delta > 0.0 { "+" } else { "" };
    match m.pct_change {
        Some(pct) => format!("{sign}{} ({pct:+.1}%) {verdict}", trim_float(m.delta)),
        None => format!("{sign}{} {verdict}", trim_float(m.delta)),
    }
}

fn task_list(out: &mut String, heading: &str, tasks: &[String]) {
    out.push_str(&format!("\n### {heading}\n\n"));
    if tasks.is_empty() {
        out.push_str("None.\n");
    }
    for t in tasks {
        out.push_str(&format!("- {t}\n"));
    }
}

impl Markdown for SessionDiffReport {
    fn to_markdown(&self) -> String {
        let (a, b) = (self.session_a, self.session_b);
        let mut out = format!("# Session {a} vs Session {b}\n\n");
        for (n, known) in [(a, self.a_known), (b, self.b_known)] {
            if !known {
                out.push_str(&format!("_Session {n} is not in the log._\n\n"));
            }
        }
        let rows: Vec<Vec<String>> = self
            .metrics
            .iter()
            .map(|m| {
                let origin = self.origins.iter().find(|o| o.name == m.name);
                vec![
                    m.name.clone(),
                    format!(
                        "{}{}",
                        trim_float(m.value_a),
                        origin.map_or("", |o| origin_note(o.origin_a))
                    ),
                    format!(
                        "{}{}",
                        trim_float(m.value_b),
                        origin.map_or("", |o| origin_note(o.origin_b))
                    ),
                    format_change(m),
                ]
            })
            .collect();
        let head_a = format!("Session {a}");
        let head_b = format!("Session {b}");
        out.push_str(&table(&["Metric", &head_a, &head_b, "Change"], &rows));
        out.push_str("\n## Tasks\n");
        task_list(&mut out, &format!("New in Session {b}"), &self.tasks_added);
        task_list(&mut out, &format!("Only in Session {a}"), &self.tasks_removed);
        task_list(&mut out, "In both", &self.tasks_common);
        out
    }
}

// ── Velocity ──

fn velocity_row(name: &str, v: &VelocityStats) -> Vec<String> {
    vec![
        name.to_string(),
        format!("{:.2}", v.mean),
        v.peak_session.map_or("-".into(), |s| format!("Session {s}")),
        v.peak_value.to_string(),
    ]
}

impl Markdown for VelocityReport {
    fn to_markdown(&self) -> String {
        let mut out = String::from("# Velocity\n\n");
        if self.prs.sessions == 0 {
            out.push_str(NO_SESSIONS);
            out.push('\n');
            return out;
        }
        let rows = vec![
            velocity_row("PRs", &self.prs),
            velocity_row("Tasks", &self.tasks),
            velocity_row("Modules added", &self.modules),
            velocity_row("Tests added", &self.tests),
        ];
        out.push_str(&table(&["Metric", "Mean / session", "Peak", "Peak value"], &rows));
        let averages: Vec<f64> = self.pr_window.iter().map(|p| p.average).collect();
        out.push_str(&format!(
            "\nPRs, {}-session moving average: `{}`\n",
            self.window,
            crate::sparkline::sparkline(&averages, None)
        ));
        out
    }
}

// ── Streaks & insights ──

impl Markdown for [Streak] {
    fn to_markdown(&self) -> String {
        let mut out = String::from("# Streaks\n\n");
        if self.is_empty() {
            out.push_str("No streaks detected.\n");
            return out;
        }
        for s in self {
            let sessions: Vec<String> = s.sessions.iter().map(u32::to_string).collect();
            out.push_str(&format!(
                "- **{}** (sessions {}): {}\n",
                s.kind.label(),
                sessions.join(", "),
                s.description
            ));
        }
        out
    }
}

impl Markdown for [Insight] {
    fn to_markdown(&self) -> String {
        let mut out = String::from("# Insights\n");
        if self.is_empty() {
            out.push_str("\nNo insights yet.\n");
            return out;
        }
        for category in [
            InsightCategory::Milestone,
            InsightCategory::Productivity,
            InsightCategory::Pattern,
            InsightCategory::Anomaly,
        ] {
            let items: Vec<&Insight> = self.iter().filter(|i| i.category == category).collect();
            if items.is_empty() {
                continue;
            }
            out.push_str(&format!("\n## {}\n\n", category.label()));
            for i in items {
                out.push_str(&format!(
                    "- **{}**: {} ({:.0}% confidence)\n",
                    i.title,
                    i.description,
                    i.confidence * 100.0
                ));
            }
        }
        out
    }
}

// ── Health ──

impl Markdown for HealthTrendHistory {
    fn to_markdown(&self) -> String {
        let mut out = String::from("# Health Trend\n\n");
        if self.points.is_empty() {
            out.push_str("No health data found.\n");
            return out;
        }
        let scores: Vec<i64> = self.points.iter().map(|p| p.score).collect();
        out.push_str(&format!("Trend: **{}**", self.trend.as_str()));
        if self.trend != TrendLabel::InsufficientData {
            out.push_str(&format!(" ({:+.2} per session)", self.slope));
        }
        out.push_str(&format!("\n\n`{}`\n\n", sparkline_i64(&scores, None)));
        let rows: Vec<Vec<String>> = self
            .points
            .iter()
            .map(|p| {
                vec![
                    p.session.to_string(),
                    p.score.to_string(),
                    match p.origin {
                        Origin::Live => "log",
                        Origin::Seeded => "seed",
                        Origin::Interpolated => "estimate",
                        Origin::Missing => "n/a",
                    }
                    .to_string(),
                ]
            })
            .collect();
        out.push_str(&table(&["Session", "Health", "Source"], &rows));
        out
    }
}

// ── Session score ──

impl Markdown for SessionQualityScore {
    fn to_markdown(&self) -> String {
        let mut out = format!(
            "# Session {} Quality\n\n**{:.1}/100 ({})**\n\n",
            self.session, self.total, self.grade
        );
        let rows: Vec<Vec<String>> = self
            .dimensions
            .iter()
            .map(|d| {
                vec![
                    d.name.clone(),
                    format!("{:.2}", d.weight),
                    format!("{:.1}", d.weighted),
                    cell(&d.evidence),
                ]
            })
            .collect();
        out.push_str(&table(&["Dimension", "Weight", "Points", "Evidence"], &rows));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nightshift_aggregate::{stats_report, Aggregator, HealthPoint};
    use nightshift_core::{SessionRecord, StreakKind};
    use nightshift_score::score_session;
    use std::collections::BTreeSet;

    fn records() -> Vec<SessionRecord> {
        let mut one = SessionRecord::new(1);
        one.date = "January 10, 2025".into();
        one.tasks = vec!["Init repo".into()];
        one.pr_numbers.insert(1);
        let mut two = SessionRecord::new(2);
        two.date = "January 15, 2025".into();
        two.tasks = vec!["Add health check".into(), "Write tests".into()];
        two.pr_numbers.extend([2, 3]);
        vec![one, two]
    }

    #[test]
    fn empty_stats_says_no_sessions() {
        let md = stats_report(&[]).to_markdown();
        assert!(md.contains(NO_SESSIONS));
        assert!(!md.contains('|'));
    }

    #[test]
    fn stats_table_lists_sessions() {
        let md = stats_report(&records()).to_markdown();
        assert!(md.contains("| PRs merged | 3 |"));
        assert!(md.contains("| 2 | January 15, 2025 |  | 2 | 2 |"));
    }

    #[test]
    fn compare_marks_unknown_and_changes() {
        let agg = Aggregator::without_seed();
        let md = agg.compare(&records(), 1, 2).to_markdown();
        assert!(md.contains("| PRs | 1 | 2 | +1 (+100.0%) improved |"));
        assert!(md.contains("- Add health check"));
        let md = agg.compare(&records(), 1, 7).to_markdown();
        assert!(md.contains("_Session 7 is not in the log._"));
    }

    #[test]
    fn change_cell_for_lower_is_better() {
        let m = MetricDelta::new("Dead code", 10.0, 8.0, false);
        assert_eq!(format_change(&m), "-2 (-20.0%) improved");
        let flat = MetricDelta::new("Tests", 3.0, 3.0, true);
        assert_eq!(format_change(&flat), "no change");
    }

    #[test]
    fn empty_lists_have_messages() {
        let streaks: Vec<Streak> = Vec::new();
        assert!(streaks.to_markdown().contains("No streaks detected."));
        let insights: Vec<Insight> = Vec::new();
        assert!(insights.to_markdown().contains("No insights yet."));
        let velocity = Aggregator::default().velocity_report(&[], 3);
        assert!(velocity.to_markdown().contains(NO_SESSIONS));
    }

    #[test]
    fn streak_lines_name_sessions() {
        let streaks = vec![Streak {
            kind: StreakKind::PeakSession,
            sessions: BTreeSet::from([2]),
            description: "Session 2 merged 2 PRs".into(),
            metric_value: 2.0,
        }];
        assert!(streaks
            .to_markdown()
            .contains("- **Peak session** (sessions 2): Session 2 merged 2 PRs"));
    }

    #[test]
    fn health_renders_label_and_sparkline() {
        let history = HealthTrendHistory {
            points: vec![
                HealthPoint { session: 1, score: 70, origin: Origin::Seeded },
                HealthPoint { session: 2, score: 70, origin: Origin::Live },
            ],
            slope: 0.0,
            trend: TrendLabel::InsufficientData,
        };
        let md = history.to_markdown();
        assert!(md.contains("**INSUFFICIENT_DATA**"));
        assert!(md.contains("`▄▄`"));
        assert!(md.contains("| 1 | 70 | seed |"));
    }

    #[test]
    fn score_markdown_has_grade() {
        let md = score_session(18, 4, 140, 4, 4, 4.0).to_markdown();
        assert!(md.contains("**82.5/100 (B+)**"));
        assert!(md.contains("| Features | 0.30 |"));
    }
}
