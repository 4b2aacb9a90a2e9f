use crate::settings::{config_path, parse_value, read_config, write_config, Settings, KNOWN_KEYS};
use clap::Subcommand;
use std::path::Path;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Store a value in .nightshift/config.json
    Set {
        /// One of: log_path, seed, git_timeout_secs, sparkline_width, report_dir
        key: String,
        /// Value; booleans and numbers are stored typed
        value: String,
    },
    /// Show the effective value of a key
    Get {
        /// Config key
        key: String,
    },
    /// Show every key with its effective value
    List,
}

fn check_key(key: &str) -> anyhow::Result<()> {
    if !KNOWN_KEYS.contains(&key) {
        anyhow::bail!("unknown config key `{key}` (known: {})", KNOWN_KEYS.join(", "));
    }
    Ok(())
}

// ── Command Implementations ──

/// `nightshift config set <key> <value>`
///
/// The updated config must still resolve before it is written.
pub fn set(repo_root: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    check_key(key)?;
    let path = config_path(repo_root);
    let mut config = read_config(&path)?;
    config.insert(key.to_string(), parse_value(value));
    Settings::resolve(repo_root, &config, |_| None)?;
    write_config(&path, &config)?;
    println!("{key} = {}", config[key]);
    Ok(())
}

/// `nightshift config get <key>`
pub fn get(repo_root: &Path, key: &str) -> anyhow::Result<()> {
    check_key(key)?;
    let settings = Settings::load(repo_root)?;
    if let Some(value) = settings.value_of(key) {
        println!("{value}");
    }
    Ok(())
}

/// `nightshift config list`: stored keys are marked, the rest show defaults.
pub fn list(repo_root: &Path) -> anyhow::Result<()> {
    let stored = read_config(&config_path(repo_root))?;
    let settings = Settings::load(repo_root)?;
    for key in KNOWN_KEYS {
        let value = settings.value_of(key).unwrap_or_default();
        let source = if stored.contains_key(key) { "config" } else { "default" };
        println!("{key:<18} {value}  ({source})");
    }
    Ok(())
}
