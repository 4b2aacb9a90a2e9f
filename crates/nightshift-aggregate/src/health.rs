use crate::seed::SeedSource;
use crate::series::{direct, sorted};
use nightshift_core::{Counter, JsonReport, Origin, SessionRecord};
use serde::{Deserialize, Serialize};

/// Minimum points before a trend is called.
pub const MIN_TREND_POINTS: usize = 3;
/// Health points per logged point the fitted slope must exceed.
pub const TREND_SLOPE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendLabel {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

impl TrendLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendLabel::Improving => "IMPROVING",
            TrendLabel::Declining => "DECLINING",
            TrendLabel::Stable => "STABLE",
            TrendLabel::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthPoint {
    pub session: u32,
    pub score: i64,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthTrendHistory {
    pub points: Vec<HealthPoint>,
    /// Least-squares slope in health points per logged point; 0 when too few points.
    pub slope: f64,
    pub trend: TrendLabel,
}

impl JsonReport for HealthTrendHistory {}

impl HealthTrendHistory {
    pub fn latest(&self) -> Option<&HealthPoint> {
        self.points.last()
    }
}

/// Health per session from live snapshots and the seed. Gaps are left out.
pub fn health_trend(seed: &dyn SeedSource, records: &[SessionRecord]) -> HealthTrendHistory {
    let points: Vec<HealthPoint> = sorted(records)
        .into_iter()
        .filter_map(|r| {
            direct(seed, r, Counter::Health).map(|v| HealthPoint {
                session: r.number,
                score: v.value,
                origin: v.origin,
            })
        })
        .collect();

    if points.len() < MIN_TREND_POINTS {
        return HealthTrendHistory {
            points,
            slope: 0.0,
            trend: TrendLabel::InsufficientData,
        };
    }
    let slope = least_squares_slope(
        &points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.score as f64))
            .collect::<Vec<_>>(),
    );
    let trend = if slope > TREND_SLOPE {
        TrendLabel::Improving
    } else if slope < -TREND_SLOPE {
        TrendLabel::Declining
    } else {
        TrendLabel::Stable
    };
    HealthTrendHistory { points, slope, trend }
}

fn least_squares_slope(xy: &[(f64, f64)]) -> f64 {
    let n = xy.len() as f64;
    let mean_x = xy.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = xy.iter().map(|p| p.1).sum::<f64>() / n;
    let num: f64 = xy.iter().map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();
    let den: f64 = xy.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}
