//! shields.io static badges.

use nightshift_aggregate::{HealthTrendHistory, StatsReport, TrendLabel};
use nightshift_core::Grade;
use nightshift_score::SessionQualityScore;
use serde::{Deserialize, Serialize};

const SHIELDS_BASE: &str = "https://img.shields.io/badge";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub label: String,
    pub message: String,
    pub color: String,
    pub url: String,
}

impl Badge {
    pub fn new(label: &str, message: &str, color: &str) -> Self {
        Self {
            label: label.to_string(),
            message: message.to_string(),
            color: color.to_string(),
            url: badge_url(label, message, color),
        }
    }

    pub fn markdown(&self) -> String {
        format!("![{}]({})", self.label, self.url)
    }
}

/// Escape one path segment of a static badge URL.
///
/// Dashes and underscores are doubled, spaces become underscores, and
/// anything outside unreserved ASCII is percent-encoded.
pub fn shields_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '-' => out.push_str("--"),
            '_' => out.push_str("__"),
            ' ' => out.push('_'),
            c if c.is_ascii_alphanumeric() || c == '.' || c == '~' => out.push(c),
            c => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{b:02X}"));
                }
            }
        }
    }
    out
}

pub fn badge_url(label: &str, message: &str, color: &str) -> String {
    format!(
        "{SHIELDS_BASE}/{}-{}-{}",
        shields_escape(label),
        shields_escape(message),
        shields_escape(color)
    )
}

/// Badge colour for a grade letter.
pub fn grade_color(grade: Grade) -> &'static str {
    match grade.letter() {
        'A' => "brightgreen",
        'B' => "green",
        'C' => "yellow",
        'D' => "orange",
        _ => "red",
    }
}

fn trend_color(trend: TrendLabel) -> &'static str {
    match trend {
        TrendLabel::Improving => "brightgreen",
        TrendLabel::Stable => "blue",
        TrendLabel::Declining => "orange",
        TrendLabel::InsufficientData => "lightgrey",
    }
}

/// Project badges: sessions, PRs, tests, latest quality grade and health.
pub fn project_badges(
    stats: &StatsReport,
    tests: Option<i64>,
    score: Option<&SessionQualityScore>,
    health: &HealthTrendHistory,
) -> Vec<Badge> {
    let mut badges = vec![
        Badge::new("sessions", &stats.total_sessions.to_string(), "blue"),
        Badge::new("PRs merged", &stats.total_prs.to_string(), "blue"),
    ];
    if let Some(tests) = tests {
        badges.push(Badge::new("tests", &tests.to_string(), "brightgreen"));
    }
    if let Some(score) = score {
        badges.push(Badge::new(
            "session quality",
            &format!("{} ({:.1})", score.grade, score.total),
            grade_color(score.grade),
        ));
    }
    let health_message = match health.latest() {
        Some(p) => format!("{} {}", p.score, health.trend.as_str().to_lowercase().replace('_', " ")),
        None => "unknown".to_string(),
    };
    badges.push(Badge::new("health", &health_message, trend_color(health.trend)));
    badges
}

pub fn render_badges(badges: &[Badge]) -> String {
    let lines: Vec<String> = badges.iter().map(Badge::markdown).collect();
    format!("{}\n", lines.join(" "))
}
