use nightshift_core::JsonReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of a per-session series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityStats {
    pub mean: f64,
    /// Lowest-numbered session holding the maximum; `None` for an empty series.
    pub peak_session: Option<u32>,
    pub peak_value: i64,
    pub sessions: usize,
}

/// One point of a trailing moving average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowPoint {
    pub session: u32,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityReport {
    pub prs: VelocityStats,
    pub tasks: VelocityStats,
    pub modules: VelocityStats,
    pub tests: VelocityStats,
    pub window: usize,
    pub pr_window: Vec<WindowPoint>,
}

impl JsonReport for VelocityReport {}

/// Default width of the PR moving average.
pub const DEFAULT_WINDOW: usize = 3;

pub fn velocity(values: &BTreeMap<u32, i64>) -> VelocityStats {
    if values.is_empty() {
        return VelocityStats::default();
    }
    let total: i64 = values.values().sum();
    // BTreeMap iterates ascending, so the first max wins ties.
    let mut peak: Option<(u32, i64)> = None;
    for (&session, &value) in values {
        if peak.map_or(true, |(_, best)| value > best) {
            peak = Some((session, value));
        }
    }
    VelocityStats {
        mean: total as f64 / values.len() as f64,
        peak_session: peak.map(|(s, _)| s),
        peak_value: peak.map_or(0, |(_, v)| v),
        sessions: values.len(),
    }
}

/// Trailing mean over the last `window` sessions at each point.
///
/// The first points average over however many sessions exist so far.
pub fn window_average(values: &BTreeMap<u32, i64>, window: usize) -> Vec<WindowPoint> {
    if window == 0 {
        return Vec::new();
    }
    let points: Vec<(u32, i64)> = values.iter().map(|(&s, &v)| (s, v)).collect();
    points
        .iter()
        .enumerate()
        .map(|(i, &(session, _))| {
            let start = (i + 1).saturating_sub(window);
            let slice = &points[start..=i];
            let sum: i64 = slice.iter().map(|(_, v)| v).sum();
            WindowPoint {
                session,
                average: sum as f64 / slice.len() as f64,
            }
        })
        .collect()
}
