use crate::rubric::{
    interpolate, Rubric, API_RUBRIC, CLI_RUBRIC, FEATURES_RUBRIC, HEALTH_RUBRIC, TESTS_RUBRIC,
};
use nightshift_core::{Grade, JsonReport};
use serde::{Deserialize, Serialize};

/// One rubric dimension's contribution to a session score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub name: String,
    /// Rubric output in `[0, 1]`.
    pub raw: f64,
    pub weight: f64,
    /// `raw * weight * 100`.
    pub weighted: f64,
    pub evidence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionQualityScore {
    pub session: u32,
    pub dimensions: Vec<DimensionScore>,
    pub total: f64,
    pub grade: Grade,
}

impl JsonReport for SessionQualityScore {}

/// Raw per-session figures the five rubrics consume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreInputs {
    pub features: u32,
    pub tests: u32,
    pub cli_commands: u32,
    pub api_endpoints: u32,
    pub health_delta: f64,
}

struct Dimension {
    name: &'static str,
    weight: f64,
    rubric: &'static Rubric,
    unit: &'static str,
}

/// The five scored dimensions. Weights sum to 1.0.
const DIMENSIONS: [Dimension; 5] = [
    Dimension { name: "Features", weight: 0.30, rubric: &FEATURES_RUBRIC, unit: "modules" },
    Dimension { name: "Tests", weight: 0.25, rubric: &TESTS_RUBRIC, unit: "tests" },
    Dimension { name: "CLI", weight: 0.15, rubric: &CLI_RUBRIC, unit: "commands" },
    Dimension { name: "API", weight: 0.15, rubric: &API_RUBRIC, unit: "endpoints" },
    Dimension { name: "Health", weight: 0.15, rubric: &HEALTH_RUBRIC, unit: "health" },
];

/// Dimension weights in scoring order.
pub fn dimension_weights() -> [f64; 5] {
    DIMENSIONS.map(|d| d.weight)
}

/// Score one session from its raw output figures.
pub fn score_session(
    session: u32,
    features: u32,
    tests: u32,
    cli_commands: u32,
    api_endpoints: u32,
    health_delta: f64,
) -> SessionQualityScore {
    let values = [
        f64::from(features),
        f64::from(tests),
        f64::from(cli_commands),
        f64::from(api_endpoints),
        health_delta,
    ];

    let dimensions: Vec<DimensionScore> = DIMENSIONS
        .iter()
        .zip(values)
        .map(|(dim, value)| {
            let raw = interpolate(value, dim.rubric);
            let evidence = if dim.unit == "health" {
                format!("{value:+.1} health \u{2192} {raw:.2}")
            } else {
                format!("{value} {} \u{2192} {raw:.2}", dim.unit)
            };
            DimensionScore {
                name: dim.name.to_string(),
                raw,
                weight: dim.weight,
                weighted: raw * dim.weight * 100.0,
                evidence,
            }
        })
        .collect();

    let total: f64 = dimensions.iter().map(|d| d.weighted).sum();
    SessionQualityScore {
        session,
        dimensions,
        total,
        grade: Grade::from_score(total),
    }
}

/// [`score_session`] over a [`ScoreInputs`] bundle.
pub fn score_inputs(session: u32, inputs: &ScoreInputs) -> SessionQualityScore {
    score_session(
        session,
        inputs.features,
        inputs.tests,
        inputs.cli_commands,
        inputs.api_endpoints,
        inputs.health_delta,
    )
}

/// Plain-text rendering for terminal output.
pub fn format_session_score(score: &SessionQualityScore) -> String {
    let mut out = format!(
        "Session {} quality: {:.1}/100 ({})\n",
        score.session, score.total, score.grade
    );
    for d in &score.dimensions {
        out.push_str(&format!(
            "  {:<9} {:>5.1}  (weight {:.2}; {})\n",
            d.name, d.weighted, d.weight, d.evidence
        ));
    }
    out
}

pub fn session_score_to_json(score: &SessionQualityScore) -> nightshift_core::Result<String> {
    score.to_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        let sum: f64 = dimension_weights().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "weights sum to {sum}");
    }

    #[test]
    fn weights_are_conserved_in_every_score() {
        for (f, t, h) in [(0, 0, -10.0), (4, 140, 4.0), (50, 5_000, 99.0)] {
            let s = score_session(1, f, t, 2, 2, h);
            let sum: f64 = s.dimensions.iter().map(|d| d.weight).sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn reference_session_scores_b_plus_or_better() {
        let s = score_session(18, 4, 140, 4, 4, 4.0);
        assert!((70.0..=90.0).contains(&s.total), "total {}", s.total);
        assert!((s.total - 82.5).abs() < 1e-6);
        assert_eq!(s.grade, Grade::BPlus);
    }

    #[test]
    fn grade_matches_total() {
        for (f, t, c, a, h) in [(0, 0, 0, 0, -5.0), (1, 20, 1, 1, 0.0), (3, 80, 2, 3, 2.0), (9, 300, 7, 9, 12.0)] {
            let s = score_session(2, f, t, c, a, h);
            assert_eq!(s.grade, Grade::from_score(s.total));
        }
    }

    #[test]
    fn saturates_at_rubric_max() {
        let s = score_session(3, 1_000, 1_000_000, 500, 500, 1_000.0);
        assert!((s.total - 100.0).abs() < 1e-9);
        assert_eq!(s.grade, Grade::APlus);
    }

    #[test]
    fn zero_output_with_regression_is_f() {
        let s = score_session(3, 0, 0, 0, 0, -8.0);
        assert_eq!(s.total, 0.0);
        assert_eq!(s.grade, Grade::F);
    }

    #[test]
    fn weighted_is_raw_times_weight() {
        let s = score_session(5, 2, 50, 1, 1, 0.0);
        for d in &s.dimensions {
            assert!((d.weighted - d.raw * d.weight * 100.0).abs() < 1e-12);
        }
        assert_eq!(s.dimensions[0].evidence, "2 modules \u{2192} 0.50");
        assert_eq!(s.dimensions[4].evidence, "+0.0 health \u{2192} 0.50");
    }

    #[test]
    fn format_lists_every_dimension() {
        let text = format_session_score(&score_session(18, 4, 140, 4, 4, 4.0));
        assert!(text.starts_with("Session 18 quality: 82.5/100 (B+)"));
        for name in ["Features", "Tests", "CLI", "API", "Health"] {
            assert!(text.contains(name), "missing {name}: {text}");
        }
    }

    #[test]
    fn json_round_trip() {
        let s = score_session(7, 3, 60, 2, 1, -1.5);
        let json = session_score_to_json(&s).unwrap();
        let back = SessionQualityScore::from_json(&json).unwrap();
        assert_eq!(back, s);
        assert!(json.contains("\"grade\""));
    }

    #[test]
    fn score_inputs_matches_positional() {
        let inputs = ScoreInputs {
            features: 4,
            tests: 140,
            cli_commands: 4,
            api_endpoints: 4,
            health_delta: 4.0,
        };
        assert_eq!(score_inputs(18, &inputs), score_session(18, 4, 140, 4, 4, 4.0));
    }
}
