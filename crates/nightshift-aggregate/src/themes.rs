//! Keyword classifier for task and title text.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Analysis,
    Testing,
    Fixes,
    Documentation,
    Refactoring,
    Reporting,
    Cli,
    Health,
    Infrastructure,
}

/// Word prefixes that mark each theme. A word matches when it starts with a prefix.
const THEME_KEYWORDS: [(Theme, &[&str]); 9] = [
    (Theme::Analysis, &["analy", "insight", "metric", "stat", "velocity", "streak"]),
    (Theme::Testing, &["test", "coverage", "fixture", "assert"]),
    (Theme::Fixes, &["fix", "bug", "regression", "crash", "patch"]),
    (Theme::Documentation, &["doc", "readme", "guide", "changelog"]),
    (Theme::Refactoring, &["refactor", "cleanup", "rename", "extract", "simplif"]),
    (Theme::Reporting, &["report", "dashboard", "render", "badge", "chart", "sparkline", "timeline"]),
    (Theme::Cli, &["cli", "command", "subcommand", "flag"]),
    (Theme::Health, &["health", "lint", "complexity", "dead"]),
    (Theme::Infrastructure, &["ci", "setup", "init", "config", "build", "release", "deploy"]),
];

impl Theme {
    pub fn label(self) -> &'static str {
        match self {
            Theme::Analysis => "analysis",
            Theme::Testing => "testing",
            Theme::Fixes => "fixes",
            Theme::Documentation => "documentation",
            Theme::Refactoring => "refactoring",
            Theme::Reporting => "reporting",
            Theme::Cli => "cli",
            Theme::Health => "health",
            Theme::Infrastructure => "infrastructure",
        }
    }

    /// Chapter-style title, e.g. `"Testing"`.
    pub fn title(self) -> &'static str {
        match self {
            Theme::Analysis => "Analysis",
            Theme::Testing => "Testing",
            Theme::Fixes => "Fixes",
            Theme::Documentation => "Documentation",
            Theme::Refactoring => "Refactoring",
            Theme::Reporting => "Reporting",
            Theme::Cli => "CLI",
            Theme::Health => "Health",
            Theme::Infrastructure => "Infrastructure",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Every theme mentioned in `text`, in declaration order, each at most once.
pub fn themes_of(text: &str) -> Vec<Theme> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    THEME_KEYWORDS
        .iter()
        .filter(|(_, prefixes)| {
            words
                .iter()
                .any(|w| prefixes.iter().any(|p| w.starts_with(p)))
        })
        .map(|(theme, _)| *theme)
        .collect()
}

/// Most frequently mentioned theme across `texts`; earlier themes win ties.
pub fn dominant_theme<'a>(texts: impl IntoIterator<Item = &'a str>) -> Option<Theme> {
    let mut counts = [0usize; THEME_KEYWORDS.len()];
    for text in texts {
        for theme in themes_of(text) {
            counts[theme as usize] += 1;
        }
    }
    let mut best: Option<(usize, usize)> = None;
    for (i, &c) in counts.iter().enumerate() {
        if c > 0 && best.map_or(true, |(_, bc)| c > bc) {
            best = Some((i, c));
        }
    }
    best.map(|(i, _)| THEME_KEYWORDS[i].0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_word_prefixes() {
        assert_eq!(themes_of("Write tests for parser"), vec![Theme::Testing]);
        assert_eq!(themes_of("Fix crash in CLI"), vec![Theme::Fixes, Theme::Cli]);
        assert!(themes_of("Lunch").is_empty());
    }

    #[test]
    fn prefix_must_start_the_word() {
        // "latest" contains "test" but does not start with it
        assert!(themes_of("latest").is_empty());
    }

    #[test]
    fn dominant_counts_across_texts() {
        let texts = ["Add tests", "More tests", "Fix bug"];
        assert_eq!(dominant_theme(texts), Some(Theme::Testing));
        assert_eq!(dominant_theme(["nothing here"]), None);
    }

    #[test]
    fn dominant_tie_prefers_declaration_order() {
        assert_eq!(dominant_theme(["Fix bug", "Add tests"]), Some(Theme::Testing));
    }

    #[test]
    fn enum_order_matches_keyword_table() {
        for (i, (theme, _)) in THEME_KEYWORDS.iter().enumerate() {
            assert_eq!(*theme as usize, i);
        }
    }
}
