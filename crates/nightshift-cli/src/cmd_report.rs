use crate::cmd_project::{latest_score, project_age};
use crate::workspace::{emit, Workspace};
use nightshift_aggregate::{
    stats_report, HealthTrendHistory, MaturityReport, StatsReport, VelocityReport, DEFAULT_WINDOW,
};
use nightshift_core::{Insight, Streak};
use nightshift_render::{recent_decisions, Markdown, Reflection, RECENT_DECISIONS};
use nightshift_score::SessionQualityScore;
use serde::Serialize;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const REPORT_FILE: &str = "nightshift-report.md";

/// Every report over the log, as written to the JSON sidecar.
#[derive(Debug, Serialize)]
pub struct FullReport {
    pub generated_at: String,
    pub stats: StatsReport,
    pub velocity: VelocityReport,
    pub streaks: Vec<Streak>,
    pub insights: Vec<Insight>,
    pub health: HealthTrendHistory,
    pub latest_score: Option<SessionQualityScore>,
    pub maturity: MaturityReport,
}

impl FullReport {
    pub fn collect(ws: &Workspace) -> anyhow::Result<Self> {
        Ok(Self {
            generated_at: OffsetDateTime::now_utc().format(&Rfc3339)?,
            stats: stats_report(&ws.records),
            velocity: ws.aggregator.velocity_report(&ws.records, DEFAULT_WINDOW),
            streaks: ws.aggregator.streaks(&ws.records),
            insights: ws.aggregator.insights(&ws.records),
            health: ws.aggregator.health_trend(&ws.records),
            latest_score: latest_score(ws),
            maturity: ws.aggregator.maturity(&ws.records, project_age(ws)?),
        })
    }

    fn reflection(&self, ws: &Workspace) -> Reflection<'_> {
        Reflection {
            stats: &self.stats,
            velocity: &self.velocity,
            streaks: &self.streaks,
            insights: &self.insights,
            health: &self.health,
            recent_decisions: recent_decisions(&ws.records, RECENT_DECISIONS),
        }
    }
}

impl Markdown for FullReport {
    fn to_markdown(&self) -> String {
        let mut out = format!("# Nightshift Report\n\n_Generated {}_\n", self.generated_at);
        let mut sections = vec![
            self.stats.to_markdown(),
            self.velocity.to_markdown(),
            self.streaks.to_markdown(),
            self.insights.to_markdown(),
            self.health.to_markdown(),
        ];
        if let Some(score) = &self.latest_score {
            sections.push(score.to_markdown());
        }
        sections.push(self.maturity.to_markdown());
        for section in sections {
            out.push('\n');
            out.push_str(&demote_headings(&section));
        }
        out
    }
}

/// Nest a standalone report under the top-level title.
fn demote_headings(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() + 8);
    let mut fenced = false;
    for line in markdown.lines() {
        if line.starts_with("```") {
            fenced = !fenced;
        }
        if !fenced && line.starts_with('#') {
            out.push('#');
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

// ── Commands ──

/// `nightshift reflect`
pub fn reflect(ws: &Workspace, json: bool) -> anyhow::Result<()> {
    let report = FullReport::collect(ws)?;
    let reflection = report.reflection(ws);
    let value = serde_json::json!({
        "stats": &report.stats,
        "streaks": &report.streaks,
        "insights": &report.insights,
        "health": &report.health,
        "recent_decisions": &reflection.recent_decisions,
    });
    emit(json, &value, || reflection.to_markdown())
}

/// `nightshift report`: write the Markdown report and its JSON sidecar.
pub fn report(ws: &Workspace, out_dir: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let dir: PathBuf = match out_dir {
        Some(dir) => ws.repo_root.join(dir),
        None => ws.repo_root.join(&ws.settings.report_dir),
    };
    std::fs::create_dir_all(&dir)?;
    let report = FullReport::collect(ws)?;
    let paths = nightshift_store::save_report(&dir.join(REPORT_FILE), &report.to_markdown(), &report)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "markdown": paths.markdown,
                "json": paths.json,
            }))?
        );
    } else {
        println!("Wrote {}", paths.markdown.display());
        println!("Wrote {}", paths.json.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demotes_headings_outside_fences() {
        let md = "# Title\n\n```\n# not a heading\n```\n## Sub\n";
        assert_eq!(
            demote_headings(md),
            "## Title\n\n```\n# not a heading\n```\n### Sub\n"
        );
    }
}
