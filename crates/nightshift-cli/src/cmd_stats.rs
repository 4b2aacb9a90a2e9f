use crate::workspace::{emit, Workspace};
use nightshift_aggregate::stats_report;
use nightshift_render::{render_timeline, Markdown};

/// `nightshift stats`: whole-log totals and per-session summary.
pub fn stats(ws: &Workspace, json: bool) -> anyhow::Result<()> {
    let report = stats_report(&ws.records);
    emit(json, &report, || report.to_markdown())
}

/// `nightshift timeline`: one rail node per session.
pub fn timeline(ws: &Workspace, max_tasks: usize, json: bool) -> anyhow::Result<()> {
    emit(json, &ws.records, || render_timeline(&ws.records, max_tasks))
}

/// `nightshift compare <a> <b>`
pub fn compare(ws: &Workspace, a: u32, b: u32, json: bool) -> anyhow::Result<()> {
    let report = ws.aggregator.compare(&ws.records, a, b);
    emit(json, &report, || report.to_markdown())
}
