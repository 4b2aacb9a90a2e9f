//! Natural-language insights over the whole history.

use crate::series::sorted;
use crate::themes::{themes_of, Theme};
use nightshift_core::{Insight, InsightCategory, SessionRecord};
use std::collections::{BTreeMap, BTreeSet};

/// Cumulative test counts worth calling out.
pub const TEST_MILESTONES: [i64; 4] = [100, 500, 1000, 2000];
/// A theme needs this many tasks before it is reported as a pattern.
pub const MIN_THEME_TASKS: usize = 3;
pub const MIN_TREND_SESSIONS: usize = 4;

/// Every insight category in order: milestones, productivity, patterns, anomalies.
///
/// `tests` is the cumulative test count per session.
pub fn generate_insights(records: &[SessionRecord], tests: &BTreeMap<u32, i64>) -> Vec<Insight> {
    let ordered = sorted(records);
    let mut out = Vec::new();
    out.extend(milestone_insights(&ordered, tests));
    out.extend(productivity_insight(&ordered));
    out.extend(pattern_insights(&ordered));
    out.extend(anomaly_insights(&ordered));
    out
}

fn milestone_insights(ordered: &[&SessionRecord], tests: &BTreeMap<u32, i64>) -> Vec<Insight> {
    let mut out = Vec::new();

    let mut peak: Option<&SessionRecord> = None;
    for &r in ordered {
        if peak.map_or(true, |p| r.pr_count() > p.pr_count()) {
            peak = Some(r);
        }
    }
    if let Some(p) = peak.filter(|p| p.pr_count() > 0) {
        out.push(Insight {
            category: InsightCategory::Milestone,
            title: format!("Peak session: Session {}", p.number),
            description: format!(
                "Session {} shipped {} PRs, more than any other session",
                p.number,
                p.pr_count()
            ),
            confidence: 0.9,
            sessions_involved: vec![p.number],
        });
    }

    for threshold in TEST_MILESTONES {
        if let Some((&session, &count)) = tests.iter().find(|&(_, &v)| v >= threshold) {
            out.push(Insight {
                category: InsightCategory::Milestone,
                title: format!("{threshold} tests reached"),
                description: format!(
                    "The test suite passed {threshold} tests in Session {session} ({count} total)"
                ),
                confidence: 0.85,
                sessions_involved: vec![session],
            });
        }
    }
    out
}

/// Task output of the later half of the history against the earlier half.
fn productivity_insight(ordered: &[&SessionRecord]) -> Option<Insight> {
    let n = ordered.len();
    if n < MIN_TREND_SESSIONS {
        return None;
    }
    let output = |r: &&SessionRecord| (r.tasks_completed() + r.pr_count()) as f64;
    let (early, late) = ordered.split_at(n / 2);
    let early_avg = early.iter().map(output).sum::<f64>() / early.len() as f64;
    let late_avg = late.iter().map(output).sum::<f64>() / late.len() as f64;

    let (title, description) = if early_avg == 0.0 && late_avg == 0.0 {
        return None;
    } else if early_avg == 0.0 || late_avg / early_avg >= 1.2 {
        (
            "Output is accelerating",
            format!("Recent sessions average {late_avg:.1} tasks and PRs, up from {early_avg:.1}"),
        )
    } else if late_avg / early_avg <= 0.8 {
        (
            "Output is slowing",
            format!("Recent sessions average {late_avg:.1} tasks and PRs, down from {early_avg:.1}"),
        )
    } else {
        (
            "Output is steady",
            format!("Sessions hold at roughly {late_avg:.1} tasks and PRs each"),
        )
    };
    Some(Insight {
        category: InsightCategory::Productivity,
        title: title.to_string(),
        description,
        confidence: (0.5 + 0.05 * n as f64).min(0.95),
        sessions_involved: ordered.iter().map(|r| r.number).collect(),
    })
}

/// Recurring themes in completed task text.
fn pattern_insights(ordered: &[&SessionRecord]) -> Vec<Insight> {
    let mut tasks_per_theme: BTreeMap<Theme, usize> = BTreeMap::new();
    let mut sessions_per_theme: BTreeMap<Theme, BTreeSet<u32>> = BTreeMap::new();
    for r in ordered {
        for task in &r.tasks {
            for theme in themes_of(task) {
                *tasks_per_theme.entry(theme).or_default() += 1;
                sessions_per_theme.entry(theme).or_default().insert(r.number);
            }
        }
    }

    let mut ranked: Vec<(Theme, usize)> = tasks_per_theme
        .into_iter()
        .filter(|&(_, count)| count >= MIN_THEME_TASKS)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    ranked
        .into_iter()
        .map(|(theme, count)| {
            let sessions: Vec<u32> = sessions_per_theme
                .remove(&theme)
                .unwrap_or_default()
                .into_iter()
                .collect();
            Insight {
                category: InsightCategory::Pattern,
                title: format!("Recurring theme: {theme}"),
                description: format!(
                    "{count} tasks across {} sessions involve {theme} work",
                    sessions.len()
                ),
                confidence: (0.3 + 0.1 * count as f64).min(0.9),
                sessions_involved: sessions,
            }
        })
        .collect()
}

/// Sessions with no tasks and no PRs sitting between productive neighbours.
fn anomaly_insights(ordered: &[&SessionRecord]) -> Vec<Insight> {
    let idle = |r: &SessionRecord| r.tasks_completed() == 0 && r.pr_count() == 0;
    ordered
        .windows(3)
        .filter(|w| idle(w[1]) && !idle(w[0]) && !idle(w[2]))
        .map(|w| Insight {
            category: InsightCategory::Anomaly,
            title: format!("Quiet session: Session {}", w[1].number),
            description: format!(
                "Session {} recorded no tasks or PRs between active sessions {} and {}",
                w[1].number, w[0].number, w[2].number
            ),
            confidence: 0.7,
            sessions_involved: vec![w[0].number, w[1].number, w[2].number],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(number: u32, tasks: &[&str], prs: &[u32]) -> SessionRecord {
        let mut r = SessionRecord::new(number);
        r.tasks = tasks.iter().map(|t| t.to_string()).collect();
        r.pr_numbers.extend(prs.iter().copied());
        r
    }

    #[test]
    fn empty_history_has_no_insights() {
        assert!(generate_insights(&[], &BTreeMap::new()).is_empty());
    }

    #[test]
    fn confidence_in_range_and_sessions_named() {
        let records = vec![
            session(1, &["Add tests"], &[1]),
            session(2, &["More tests", "Fix bug"], &[2, 3]),
            session(3, &[], &[]),
            session(4, &["Test parser", "Docs"], &[4]),
            session(5, &["Add report", "Chart", "Badge"], &[5, 6, 7]),
        ];
        let tests: BTreeMap<u32, i64> = [(1, 40), (2, 90), (3, 90), (4, 130), (5, 520)].into();
        let insights = generate_insights(&records, &tests);
        assert!(!insights.is_empty());
        for i in &insights {
            assert!((0.0..=1.0).contains(&i.confidence), "{i:?}");
            assert!(!i.sessions_involved.is_empty(), "{i:?}");
        }
    }

    #[test]
    fn milestones_name_first_crossing() {
        let records = vec![session(1, &[], &[1]), session(2, &[], &[2, 3])];
        let tests: BTreeMap<u32, i64> = [(1, 120), (2, 600)].into();
        let insights = generate_insights(&records, &tests);
        let titles: Vec<&str> = insights.iter().map(|i| i.title.as_str()).collect();
        assert!(titles.contains(&"Peak session: Session 2"));
        assert!(titles.contains(&"100 tests reached"));
        assert!(titles.contains(&"500 tests reached"));
        let hundred = insights.iter().find(|i| i.title == "100 tests reached").unwrap();
        assert_eq!(hundred.sessions_involved, vec![1]);
    }

    #[test]
    fn productivity_detects_acceleration() {
        let records = vec![
            session(1, &["a"], &[]),
            session(2, &["b"], &[]),
            session(3, &["c", "d", "e"], &[1]),
            session(4, &["f", "g"], &[2, 3]),
        ];
        let insight = productivity_insight(&sorted(&records)).unwrap();
        assert_eq!(insight.title, "Output is accelerating");
        assert_eq!(insight.sessions_involved, vec![1, 2, 3, 4]);
    }

    #[test]
    fn productivity_needs_enough_sessions() {
        let records = vec![session(1, &["a"], &[]), session(2, &["b"], &[])];
        assert!(productivity_insight(&sorted(&records)).is_none());
    }

    #[test]
    fn recurring_theme_needs_three_tasks() {
        let records = vec![
            session(1, &["Add tests", "Fix bug"], &[]),
            session(2, &["More tests"], &[]),
            session(3, &["Test the parser"], &[]),
        ];
        let patterns = pattern_insights(&sorted(&records));
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].title, "Recurring theme: testing");
        assert_eq!(patterns[0].sessions_involved, vec![1, 2, 3]);
    }

    #[test]
    fn idle_session_between_active_ones_is_anomalous() {
        let records = vec![
            session(1, &["a"], &[1]),
            session(2, &[], &[]),
            session(3, &["b"], &[]),
        ];
        let anomalies = anomaly_insights(&sorted(&records));
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].sessions_involved, vec![1, 2, 3]);
    }
}
