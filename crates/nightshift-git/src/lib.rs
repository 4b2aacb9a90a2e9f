//! Git history facts, queried through the `git` binary with a timeout.
//!
//! Every query degrades to an empty answer: no git, not a repository, or a
//! hung subprocess all produce [`GitFacts::default`]-style values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use time::macros::format_description;
use time::Date;
use tokio::process::Command;
use tracing::{debug, warn};

/// Default per-command timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

static MERGE_PR: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"Merge pull request #(\d+)").unwrap());
static SQUASH_PR: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\(#(\d+)\)\s*$").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitFacts {
    pub commit_count: u64,
    /// `YYYY-MM-DD`.
    pub first_commit_date: Option<String>,
    pub last_commit_date: Option<String>,
    /// Commits over the inclusive day span of the history; 0 when unknown.
    pub commits_per_day: f64,
    /// PR numbers from merge-commit and squash-merge subjects.
    pub merged_prs: BTreeSet<u32>,
}

impl GitFacts {
    pub fn is_empty(&self) -> bool {
        self.commit_count == 0
    }
}

pub struct GitProbe {
    repo: PathBuf,
    timeout: Duration,
}

impl GitProbe {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    /// Run `git <args>` in the repo. `None` on spawn failure, non-zero exit or timeout.
    pub async fn run(&self, args: &[&str]) -> Option<String> {
        let result = Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(self.timeout, result).await {
            Ok(Ok(output)) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(Ok(output)) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                debug!("git {} failed: {}", args.join(" "), stderr.trim());
                None
            }
            Ok(Err(e)) => {
                warn!("git not available: {e}");
                None
            }
            Err(_) => {
                warn!(
                    "git {} timed out after {}s",
                    args.join(" "),
                    self.timeout.as_secs()
                );
                None
            }
        }
    }

    pub async fn commit_count(&self) -> u64 {
        self.run(&["rev-list", "--count", "HEAD"])
            .await
            .map_or(0, |out| parse_commit_count(&out))
    }

    pub async fn first_commit_date(&self) -> Option<String> {
        let out = self
            .run(&["log", "--reverse", "--format=%ad", "--date=short"])
            .await?;
        first_line(&out)
    }

    pub async fn last_commit_date(&self) -> Option<String> {
        let out = self
            .run(&["log", "-1", "--format=%ad", "--date=short"])
            .await?;
        first_line(&out)
    }

    pub async fn merged_prs(&self) -> BTreeSet<u32> {
        self.run(&["log", "--format=%s"])
            .await
            .map(|out| parse_merged_prs(&out))
            .unwrap_or_default()
    }

    pub async fn facts(&self) -> GitFacts {
        let commit_count = self.commit_count().await;
        if commit_count == 0 {
            return GitFacts::default();
        }
        let first_commit_date = self.first_commit_date().await;
        let last_commit_date = self.last_commit_date().await;
        let commits_per_day = commits_per_day(
            commit_count,
            first_commit_date.as_deref(),
            last_commit_date.as_deref(),
        );
        GitFacts {
            commit_count,
            first_commit_date,
            last_commit_date,
            commits_per_day,
            merged_prs: self.merged_prs().await,
        }
    }
}

// ── Output parsing ──

fn first_line(out: &str) -> Option<String> {
    out.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

pub fn parse_commit_count(out: &str) -> u64 {
    out.trim().parse().unwrap_or(0)
}

/// PR numbers from `git log --format=%s` output.
pub fn parse_merged_prs(subjects: &str) -> BTreeSet<u32> {
    subjects
        .lines()
        .filter_map(|line| {
            MERGE_PR
                .captures(line)
                .or_else(|| SQUASH_PR.captures(line))
                .and_then(|c| c[1].parse().ok())
        })
        .collect()
}

/// Commits per calendar day, counting both end days.
pub fn commits_per_day(count: u64, first: Option<&str>, last: Option<&str>) -> f64 {
    let format = format_description!("[year]-[month]-[day]");
    let (Some(first), Some(last)) = (first, last) else {
        return 0.0;
    };
    let (Ok(first), Ok(last)) = (Date::parse(first, format), Date::parse(last, format)) else {
        return 0.0;
    };
    let days = (last - first).whole_days().abs() + 1;
    count as f64 / days as f64
}
