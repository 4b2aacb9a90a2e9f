//! Letter-grade threshold table shared by session scores, health scores and audits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter grade, ordered best-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "F")]
    F,
}

/// Descending `(minimum score, grade)` thresholds. Anything below the last is `F`.
pub const GRADE_THRESHOLDS: [(f64, Grade); 12] = [
    (95.0, Grade::APlus),
    (90.0, Grade::A),
    (85.0, Grade::AMinus),
    (80.0, Grade::BPlus),
    (75.0, Grade::B),
    (70.0, Grade::BMinus),
    (65.0, Grade::CPlus),
    (60.0, Grade::C),
    (55.0, Grade::CMinus),
    (50.0, Grade::DPlus),
    (45.0, Grade::D),
    (40.0, Grade::DMinus),
];

impl Grade {
    /// Map a 0–100 score to a grade. NaN grades as `F`.
    pub fn from_score(score: f64) -> Grade {
        GRADE_THRESHOLDS
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|(_, g)| *g)
            .unwrap_or(Grade::F)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::DMinus => "D-",
            Grade::F => "F",
        }
    }

    /// The bare letter without `+`/`-` granularity.
    pub fn letter(self) -> char {
        match self {
            Grade::APlus | Grade::A | Grade::AMinus => 'A',
            Grade::BPlus | Grade::B | Grade::BMinus => 'B',
            Grade::CPlus | Grade::C | Grade::CMinus => 'C',
            Grade::DPlus | Grade::D | Grade::DMinus => 'D',
            Grade::F => 'F',
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grade string for a score, with or without `+`/`-` granularity.
pub fn letter_grade(score: f64, granular: bool) -> String {
    let grade = Grade::from_score(score);
    if granular {
        grade.as_str().to_string()
    } else {
        grade.letter().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(Grade::from_score(95.0), Grade::APlus);
        assert_eq!(Grade::from_score(94.999), Grade::A);
        assert_eq!(Grade::from_score(80.0), Grade::BPlus);
        assert_eq!(Grade::from_score(40.0), Grade::DMinus);
    }

    #[test]
    fn examples_from_the_table() {
        assert_eq!(Grade::from_score(96.0), Grade::APlus);
        assert_eq!(Grade::from_score(72.5), Grade::BMinus);
        assert_eq!(Grade::from_score(39.0), Grade::F);
        assert_eq!(Grade::from_score(0.0), Grade::F);
    }

    #[test]
    fn above_hundred_is_still_a_plus() {
        assert_eq!(Grade::from_score(140.0), Grade::APlus);
    }

    #[test]
    fn nan_is_f() {
        assert_eq!(Grade::from_score(f64::NAN), Grade::F);
    }

    #[test]
    fn coarse_letters() {
        assert_eq!(letter_grade(88.0, false), "A");
        assert_eq!(letter_grade(88.0, true), "A-");
        assert_eq!(letter_grade(10.0, false), "F");
    }

    #[test]
    fn serde_uses_symbolic_names() {
        let json = serde_json::to_string(&Grade::BPlus).unwrap();
        assert_eq!(json, "\"B+\"");
        let back: Grade = serde_json::from_str("\"C-\"").unwrap();
        assert_eq!(back, Grade::CMinus);
    }

    #[test]
    fn thresholds_descend() {
        for pair in GRADE_THRESHOLDS.windows(2) {
            assert!(pair[0].0 > pair[1].0);
        }
    }
}
