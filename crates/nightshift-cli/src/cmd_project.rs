use crate::workspace::{emit, Workspace};
use nightshift_aggregate::{build_story, estimate_age, estimate_age_with_git, AgeEstimate};
use nightshift_render::{project_badges, render_badges, Markdown};
use nightshift_score::{score_inputs, SessionQualityScore};
use time::OffsetDateTime;
use tracing::debug;

// ── Shared helpers ──

/// Age from the log, or from the first git commit when no log date parses.
pub(crate) fn project_age(ws: &Workspace) -> anyhow::Result<Option<AgeEstimate>> {
    if let Some(age) = estimate_age(&ws.records) {
        return Ok(Some(age));
    }
    debug!("no parsable session dates; asking git for the first commit");
    let rt = tokio::runtime::Runtime::new()?;
    let first_commit = rt.block_on(ws.git_probe().first_commit_date());
    Ok(estimate_age_with_git(
        &ws.records,
        first_commit.as_deref(),
        OffsetDateTime::now_utc().date(),
    ))
}

/// Quality score of the newest logged session.
pub(crate) fn latest_score(ws: &Workspace) -> Option<SessionQualityScore> {
    let session = ws.latest_session()?;
    let inputs = ws.aggregator.score_inputs(&ws.records, session);
    Some(score_inputs(session, &inputs))
}

pub(crate) fn latest_tests(ws: &Workspace) -> Option<i64> {
    ws.aggregator
        .cumulative(&ws.records, nightshift_core::Counter::Tests)
        .values()
        .last()
        .copied()
}

// ── Commands ──

/// `nightshift maturity`
pub fn maturity(ws: &Workspace, json: bool) -> anyhow::Result<()> {
    let report = ws.aggregator.maturity(&ws.records, project_age(ws)?);
    emit(json, &report, || report.to_markdown())
}

/// `nightshift story`
pub fn story(ws: &Workspace, json: bool) -> anyhow::Result<()> {
    let story = build_story(&ws.records);
    emit(json, &story, || story.to_markdown())
}

/// `nightshift badges`
pub fn badges(ws: &Workspace, json: bool) -> anyhow::Result<()> {
    let stats = nightshift_aggregate::stats_report(&ws.records);
    let health = ws.aggregator.health_trend(&ws.records);
    let score = latest_score(ws);
    let badges = project_badges(&stats, latest_tests(ws), score.as_ref(), &health);
    emit(json, &badges, || render_badges(&badges))
}

/// `nightshift git`: commit count, history span and merged PRs.
pub fn git(ws: &Workspace, json: bool) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let facts = rt.block_on(ws.git_probe().facts());
    emit(json, &facts, || {
        if facts.is_empty() {
            return "No git history found.\n".to_string();
        }
        let mut out = String::new();
        out.push_str(&format!("Commits:        {}\n", facts.commit_count));
        if let (Some(first), Some(last)) = (&facts.first_commit_date, &facts.last_commit_date) {
            out.push_str(&format!("History:        {first} to {last}\n"));
        }
        out.push_str(&format!("Commits/day:    {:.2}\n", facts.commits_per_day));
        out.push_str(&format!("Merged PRs:     {}\n", facts.merged_prs.len()));
        out
    })
}
