//! Tracked stats-snapshot counters and their label aliases.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A numeric field recorded in session stats snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    Modules,
    Tests,
    TotalPrs,
    CliCommands,
    ApiEndpoints,
    Health,
    DeadCode,
}

impl Counter {
    pub const ALL: [Counter; 7] = [
        Counter::Modules,
        Counter::Tests,
        Counter::TotalPrs,
        Counter::CliCommands,
        Counter::ApiEndpoints,
        Counter::Health,
        Counter::DeadCode,
    ];

    /// Stable slug used in JSON, config and on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Counter::Modules => "modules",
            Counter::Tests => "tests",
            Counter::TotalPrs => "total_prs",
            Counter::CliCommands => "cli_commands",
            Counter::ApiEndpoints => "api_endpoints",
            Counter::Health => "health",
            Counter::DeadCode => "dead_code",
        }
    }

    /// Human label for tables.
    pub fn label(self) -> &'static str {
        match self {
            Counter::Modules => "Modules",
            Counter::Tests => "Tests",
            Counter::TotalPrs => "Total PRs",
            Counter::CliCommands => "CLI commands",
            Counter::ApiEndpoints => "API endpoints",
            Counter::Health => "Health",
            Counter::DeadCode => "Dead code",
        }
    }

    /// Normalized snapshot keys that feed this counter, most specific first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Counter::Modules => &["modules", "total_modules", "source_modules", "python_modules"],
            Counter::Tests => &["tests", "test_suite", "total_tests", "test_count"],
            Counter::TotalPrs => &["total_prs", "prs_merged", "prs"],
            Counter::CliCommands => &["cli_commands", "commands", "cli_subcommands"],
            Counter::ApiEndpoints => &["api_endpoints", "endpoints", "routes"],
            Counter::Health => &["health", "health_score"],
            Counter::DeadCode => &["dead_code", "dead_code_items", "unused_symbols"],
        }
    }

    /// Recorded as a running total rather than a per-session gauge.
    pub fn is_cumulative(self) -> bool {
        !matches!(self, Counter::Health | Counter::DeadCode)
    }

    pub fn higher_is_better(self) -> bool {
        !matches!(self, Counter::DeadCode)
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Counter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = snapshot_key(s);
        Counter::ALL
            .into_iter()
            .find(|c| c.slug() == key || c.aliases().contains(&key.as_str()))
            .ok_or_else(|| {
                let valid: Vec<&str> = Counter::ALL.iter().map(|c| c.slug()).collect();
                Error::UnknownCounter(s.to_string(), valid.join(", "))
            })
    }
}

/// Normalize a snapshot label: `"Total PRs"` → `"total_prs"`.
///
/// Lowercases, collapses every run of non-alphanumerics into one `_`, and
/// trims leading/trailing underscores.
pub fn snapshot_key(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_sep = false;
    for ch in label.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_key_normalizes_labels() {
        assert_eq!(snapshot_key("Total PRs"), "total_prs");
        assert_eq!(snapshot_key("  Test suite "), "test_suite");
        assert_eq!(snapshot_key("CLI-commands (total)"), "cli_commands_total");
        assert_eq!(snapshot_key("**Health**"), "health");
        assert_eq!(snapshot_key(""), "");
    }

    #[test]
    fn parse_counter_from_slug_and_alias() {
        assert_eq!("tests".parse::<Counter>().unwrap(), Counter::Tests);
        assert_eq!("Test suite".parse::<Counter>().unwrap(), Counter::Tests);
        assert_eq!("Total PRs".parse::<Counter>().unwrap(), Counter::TotalPrs);
    }

    #[test]
    fn parse_unknown_counter_lists_valid_names() {
        let err = "velocity".parse::<Counter>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("velocity"));
        assert!(msg.contains("modules"));
    }

    #[test]
    fn dead_code_is_lower_is_better_gauge() {
        assert!(!Counter::DeadCode.higher_is_better());
        assert!(!Counter::DeadCode.is_cumulative());
        assert!(Counter::Modules.is_cumulative());
        assert!(!Counter::Health.is_cumulative());
    }
}
