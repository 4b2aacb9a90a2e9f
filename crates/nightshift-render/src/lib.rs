//! Text renderers over the structured reports.
//!
//! Every renderer is a pure function of its input. Empty input renders an
//! explicit message instead of an empty table.

pub mod badge;
mod maturity;
mod reflect;
mod reports;
mod sparkline;
mod story;
pub mod table;
mod timeline;

pub use badge::{badge_url, grade_color, project_badges, render_badges, shields_escape, Badge};
pub use maturity::stars;
pub use reflect::{recent_decisions, Reflection, RECENT_DECISIONS};
pub use reports::format_change;
pub use sparkline::{bar_chart, sparkline, sparkline_i64, FLAT_CHAR, SPARK_CHARS};
pub use timeline::render_timeline;

/// Shown wherever a report has no sessions to describe.
pub const NO_SESSIONS: &str = "No sessions found.";

/// Markdown rendering for a report.
pub trait Markdown {
    fn to_markdown(&self) -> String;
}
