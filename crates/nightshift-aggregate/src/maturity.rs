//! Project maturity and age estimation.

use crate::series::sorted;
use nightshift_core::{JsonReport, SessionRecord};
use nightshift_score::{interpolate, Rubric};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;

const LONG_DATE: &[FormatItem<'static>] =
    format_description!("[month repr:long case_sensitive:false] [day padding:none], [year]");
const SHORT_DATE: &[FormatItem<'static>] =
    format_description!("[month repr:short case_sensitive:false] [day padding:none], [year]");
const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a session or git date: `January 10, 2025`, `Jan 10, 2025` or `2025-01-10`.
///
/// Trailing text after the date (`"January 10, 2025 (late)"`, a git time
/// component) is ignored.
pub fn parse_log_date(raw: &str) -> Option<Date> {
    let text = raw.trim();
    let leading_words = text.split_whitespace().take(3).collect::<Vec<_>>().join(" ");
    for candidate in [text, leading_words.as_str()] {
        for format in [LONG_DATE, SHORT_DATE, ISO_DATE] {
            if let Ok(date) = Date::parse(candidate, format) {
                return Some(date);
            }
        }
    }
    let iso_prefix = text.get(..10)?;
    Date::parse(iso_prefix, ISO_DATE).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeSource {
    SessionLog,
    GitHistory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeEstimate {
    /// ISO `YYYY-MM-DD`.
    pub first: String,
    pub last: String,
    pub days: i64,
    pub source: AgeSource,
}

/// Span between the earliest and latest parsable session dates.
pub fn estimate_age(records: &[SessionRecord]) -> Option<AgeEstimate> {
    let dates: Vec<Date> = sorted(records)
        .iter()
        .filter_map(|r| parse_log_date(&r.date))
        .collect();
    let first = dates.iter().min()?;
    let last = dates.iter().max()?;
    Some(AgeEstimate {
        first: first.to_string(),
        last: last.to_string(),
        days: (*last - *first).whole_days(),
        source: AgeSource::SessionLog,
    })
}

/// Log-based age, falling back to the first git commit through `today`.
pub fn estimate_age_with_git(
    records: &[SessionRecord],
    git_first_commit: Option<&str>,
    today: Date,
) -> Option<AgeEstimate> {
    if let Some(age) = estimate_age(records) {
        return Some(age);
    }
    let first = parse_log_date(git_first_commit?)?;
    Some(AgeEstimate {
        first: first.to_string(),
        last: today.to_string(),
        days: (today - first).whole_days().max(0),
        source: AgeSource::GitHistory,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityStage {
    Prototype,
    Emerging,
    Established,
    Mature,
}

impl MaturityStage {
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            MaturityStage::Mature
        } else if score >= 50.0 {
            MaturityStage::Established
        } else if score >= 25.0 {
            MaturityStage::Emerging
        } else {
            MaturityStage::Prototype
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MaturityStage::Prototype => "Prototype",
            MaturityStage::Emerging => "Emerging",
            MaturityStage::Established => "Established",
            MaturityStage::Mature => "Mature",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaturityDimension {
    pub name: String,
    pub value: i64,
    /// Rubric output in `[0, 1]`.
    pub raw: f64,
    /// `0..=5`.
    pub stars: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaturityReport {
    pub sessions: usize,
    pub total_prs: usize,
    pub tests: i64,
    pub age: Option<AgeEstimate>,
    pub dimensions: Vec<MaturityDimension>,
    /// Mean of the dimension rubrics, `0..=100`.
    pub score: f64,
    pub stage: MaturityStage,
}

impl JsonReport for MaturityReport {}

const SESSIONS_RUBRIC: [(f64, f64); 5] = [(0.0, 0.0), (5.0, 0.2), (15.0, 0.5), (30.0, 0.8), (60.0, 1.0)];
const PRS_RUBRIC: [(f64, f64); 4] = [(0.0, 0.0), (10.0, 0.3), (50.0, 0.7), (150.0, 1.0)];
const TESTS_RUBRIC: [(f64, f64); 4] = [(0.0, 0.0), (100.0, 0.3), (500.0, 0.6), (1500.0, 1.0)];
const AGE_RUBRIC: [(f64, f64); 5] = [(0.0, 0.0), (7.0, 0.2), (30.0, 0.5), (90.0, 0.8), (365.0, 1.0)];

/// Score project maturity from history size, test count and age.
pub fn maturity_report(records: &[SessionRecord], tests: i64, age: Option<AgeEstimate>) -> MaturityReport {
    let total_prs = records
        .iter()
        .flat_map(|r| r.pr_numbers.iter())
        .collect::<BTreeSet<_>>()
        .len();
    let days = age.as_ref().map_or(0, |a| a.days);

    let dims: [(&str, i64, &Rubric); 4] = [
        ("Sessions", records.len() as i64, &SESSIONS_RUBRIC),
        ("PRs", total_prs as i64, &PRS_RUBRIC),
        ("Tests", tests, &TESTS_RUBRIC),
        ("Age (days)", days, &AGE_RUBRIC),
    ];
    let dimensions: Vec<MaturityDimension> = dims
        .iter()
        .map(|&(name, value, rubric)| {
            let raw = interpolate(value as f64, rubric);
            MaturityDimension {
                name: name.to_string(),
                value,
                raw,
                stars: (raw * 5.0).round() as u8,
            }
        })
        .collect();

    let score = dimensions.iter().map(|d| d.raw).sum::<f64>() / dimensions.len() as f64 * 100.0;
    MaturityReport {
        sessions: records.len(),
        total_prs,
        tests,
        age,
        dimensions,
        score,
        stage: MaturityStage::from_score(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn dated(number: u32, date: &str) -> SessionRecord {
        let mut r = SessionRecord::new(number);
        r.date = date.into();
        r
    }

    #[test]
    fn parses_supported_date_shapes() {
        assert_eq!(parse_log_date("January 10, 2025"), Some(date!(2025 - 01 - 10)));
        assert_eq!(parse_log_date("Jan 5, 2025"), Some(date!(2025 - 01 - 05)));
        assert_eq!(parse_log_date("2025-02-03"), Some(date!(2025 - 02 - 03)));
        assert_eq!(parse_log_date("march 3, 2025 (late)"), Some(date!(2025 - 03 - 03)));
        assert_eq!(parse_log_date("2025-02-03 14:22:01 +0000"), Some(date!(2025 - 02 - 03)));
        assert_eq!(parse_log_date("someday"), None);
        assert_eq!(parse_log_date(""), None);
    }

    #[test]
    fn age_spans_parsable_dates() {
        let records = vec![
            dated(1, "January 10, 2025"),
            dated(2, "whenever"),
            dated(3, "February 9, 2025"),
        ];
        let age = estimate_age(&records).unwrap();
        assert_eq!(age.days, 30);
        assert_eq!(age.first, "2025-01-10");
        assert_eq!(age.source, AgeSource::SessionLog);
    }

    #[test]
    fn git_fallback_when_log_has_no_dates() {
        let records = vec![dated(1, "")];
        assert!(estimate_age(&records).is_none());
        let age = estimate_age_with_git(&records, Some("2025-01-01"), date!(2025 - 01 - 31)).unwrap();
        assert_eq!(age.days, 30);
        assert_eq!(age.source, AgeSource::GitHistory);
        assert!(estimate_age_with_git(&records, None, date!(2025 - 01 - 31)).is_none());
    }

    #[test]
    fn empty_history_is_prototype() {
        let report = maturity_report(&[], 0, None);
        assert_eq!(report.score, 0.0);
        assert_eq!(report.stage, MaturityStage::Prototype);
        assert!(report.dimensions.iter().all(|d| d.stars == 0));
    }

    #[test]
    fn large_history_is_mature() {
        let records: Vec<SessionRecord> = (1..=60)
            .map(|n| {
                let mut r = SessionRecord::new(n);
                r.pr_numbers.extend([n * 3, n * 3 + 1, n * 3 + 2]);
                r
            })
            .collect();
        let age = AgeEstimate {
            first: "2024-01-01".into(),
            last: "2025-01-01".into(),
            days: 366,
            source: AgeSource::SessionLog,
        };
        let report = maturity_report(&records, 2_000, Some(age));
        assert!((report.score - 100.0).abs() < 1e-9);
        assert_eq!(report.stage, MaturityStage::Mature);
        assert!(report.dimensions.iter().all(|d| d.stars == 5));
    }
}
