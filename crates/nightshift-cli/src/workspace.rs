use crate::settings::{SeedMode, Settings};
use nightshift_aggregate::Aggregator;
use nightshift_core::SessionRecord;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Everything a data command needs: settings, parsed log and aggregator.
pub struct Workspace {
    pub repo_root: PathBuf,
    pub settings: Settings,
    pub records: Vec<SessionRecord>,
    pub aggregator: Aggregator,
}

impl Workspace {
    /// Load settings and the session log. `log_override` beats config and env.
    pub fn open(repo_root: &Path, log_override: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = Settings::load(repo_root)?;
        if let Some(log) = log_override {
            settings.log_path = repo_root.join(log);
        }
        let records = nightshift_log::by_number(nightshift_log::load_log(&settings.log_path));
        debug!(
            log = %settings.log_path.display(),
            sessions = records.len(),
            "session log loaded"
        );
        let aggregator = match settings.seed {
            SeedMode::Builtin => Aggregator::with_builtin_seed(),
            SeedMode::None => Aggregator::without_seed(),
        };
        Ok(Self {
            repo_root: repo_root.to_path_buf(),
            settings,
            records,
            aggregator,
        })
    }

    pub fn latest_session(&self) -> Option<u32> {
        self.records.iter().map(|r| r.number).max()
    }

    pub fn git_probe(&self) -> nightshift_git::GitProbe {
        nightshift_git::GitProbe::new(&self.repo_root)
            .with_timeout(Duration::from_secs(self.settings.git_timeout_secs))
    }
}

/// Print `value` as pretty JSON, or the human rendering.
pub fn emit<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    human: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", human());
    }
    Ok(())
}
