use crate::workspace::{emit, Workspace};
use nightshift_aggregate::pr_counts;
use nightshift_core::Counter;
use nightshift_render::{bar_chart, sparkline_i64, Markdown};
use serde::Serialize;

/// `nightshift velocity`: per-session means and peaks with a PR bar chart.
pub fn velocity(ws: &Workspace, window: usize, json: bool) -> anyhow::Result<()> {
    let report = ws.aggregator.velocity_report(&ws.records, window);
    emit(json, &report, || {
        let mut out = report.to_markdown();
        let rows: Vec<(String, f64)> = pr_counts(&ws.records)
            .into_iter()
            .map(|(n, prs)| (format!("Session {n}"), prs as f64))
            .collect();
        if !rows.is_empty() {
            out.push_str("\n## PRs per session\n\n```\n");
            out.push_str(&bar_chart(&rows, ws.settings.sparkline_width));
            out.push_str("```\n");
        }
        out
    })
}

/// `nightshift streaks`
pub fn streaks(ws: &Workspace, json: bool) -> anyhow::Result<()> {
    let streaks = ws.aggregator.streaks(&ws.records);
    emit(json, &streaks, || streaks.to_markdown())
}

/// `nightshift insights`
pub fn insights(ws: &Workspace, json: bool) -> anyhow::Result<()> {
    let insights = ws.aggregator.insights(&ws.records);
    emit(json, &insights, || insights.to_markdown())
}

/// `nightshift health`
pub fn health(ws: &Workspace, json: bool) -> anyhow::Result<()> {
    let history = ws.aggregator.health_trend(&ws.records);
    emit(json, &history, || history.to_markdown())
}

#[derive(Serialize)]
struct SparklineOutput {
    counter: Counter,
    deltas: bool,
    values: Vec<(u32, i64)>,
    sparkline: String,
}

/// `nightshift sparkline <counter>`: running value, or per-session deltas.
pub fn sparkline(
    ws: &Workspace,
    counter: &str,
    deltas: bool,
    width: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let counter: Counter = counter.parse()?;
    let series = if deltas {
        ws.aggregator.per_session_deltas(&ws.records, counter)
    } else {
        ws.aggregator.cumulative(&ws.records, counter)
    };
    let values: Vec<(u32, i64)> = series.into_iter().collect();
    let raw: Vec<i64> = values.iter().map(|(_, v)| *v).collect();
    let line = sparkline_i64(&raw, Some(width.unwrap_or(ws.settings.sparkline_width)));
    let output = SparklineOutput {
        counter,
        deltas,
        values,
        sparkline: line,
    };
    emit(json, &output, || {
        if output.values.is_empty() {
            format!("{}: {}\n", counter.label(), nightshift_render::NO_SESSIONS)
        } else {
            format!("{}: {}\n", counter.label(), output.sparkline)
        }
    })
}
