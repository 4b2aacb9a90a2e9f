//! `.nightshift/config.json` plus environment overrides.

use nightshift_core::Error;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = ".nightshift";
pub const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_LOG: &str = "SESSION_LOG.md";
pub const DEFAULT_REPORT_DIR: &str = "reports";
pub const DEFAULT_SPARKLINE_WIDTH: usize = 20;

pub const ENV_LOG: &str = "NIGHTSHIFT_LOG";
pub const ENV_GIT_TIMEOUT: &str = "NIGHTSHIFT_GIT_TIMEOUT";
pub const ENV_SPARKLINE_WIDTH: &str = "NIGHTSHIFT_SPARKLINE_WIDTH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    Builtin,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_path: PathBuf,
    pub seed: SeedMode,
    pub git_timeout_secs: u64,
    pub sparkline_width: usize,
    pub report_dir: PathBuf,
}

pub fn config_path(repo_root: &Path) -> PathBuf {
    repo_root.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Keys `Settings::resolve` understands, in display order.
pub const KNOWN_KEYS: [&str; 5] = [
    "log_path",
    "seed",
    "git_timeout_secs",
    "sparkline_width",
    "report_dir",
];

/// Read the config object. A missing file is an empty config; anything but
/// a JSON object is rejected.
pub fn read_config(path: &Path) -> anyhow::Result<Map<String, Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Config(format!(
            "{}: expected a JSON object, got {other}",
            path.display()
        ))
        .into()),
    }
}

pub fn write_config(path: &Path, config: &Map<String, Value>) -> anyhow::Result<()> {
    let mut json = serde_json::to_string_pretty(config)?;
    json.push('\n');
    nightshift_store::write_atomic(path, json.as_bytes())?;
    Ok(())
}

/// Infer a JSON type for a command-line value: bool, integer, float, else string.
pub fn parse_value(raw: &str) -> Value {
    if let Ok(b) = raw.parse::<bool>() {
        return Value::Bool(b);
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::from(n);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::from(f),
        _ => Value::String(raw.to_string()),
    }
}

fn config_error(key: &str, expected: &str, got: impl std::fmt::Display) -> Error {
    Error::Config(format!("{key}: expected {expected}, got {got}"))
}

fn positive(key: &str, value: &Value) -> Result<u64, Error> {
    value
        .as_u64()
        .filter(|n| *n > 0)
        .ok_or_else(|| config_error(key, "a positive integer", value))
}

fn positive_env(key: &str, raw: &str) -> Result<u64, Error> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| config_error(key, "a positive integer", raw))
}

impl Settings {
    /// Defaults, then the config file, then the environment.
    pub fn load(repo_root: &Path) -> anyhow::Result<Self> {
        let config = read_config(&config_path(repo_root))?;
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Ok(Self::resolve(repo_root, &config, env)?)
    }

    pub(crate) fn resolve(
        repo_root: &Path,
        config: &Map<String, Value>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Error> {
        let mut settings = Settings {
            log_path: repo_root.join(DEFAULT_LOG),
            seed: SeedMode::Builtin,
            git_timeout_secs: nightshift_git::DEFAULT_TIMEOUT_SECS,
            sparkline_width: DEFAULT_SPARKLINE_WIDTH,
            report_dir: repo_root.join(DEFAULT_REPORT_DIR),
        };

        for (key, value) in config {
            match key.as_str() {
                "log_path" => {
                    let s = value
                        .as_str()
                        .ok_or_else(|| config_error(key, "a path string", value))?;
                    settings.log_path = repo_root.join(s);
                }
                "seed" => {
                    settings.seed = match value.as_str() {
                        Some("builtin") => SeedMode::Builtin,
                        Some("none") => SeedMode::None,
                        _ => return Err(config_error(key, "\"builtin\" or \"none\"", value)),
                    };
                }
                "git_timeout_secs" => settings.git_timeout_secs = positive(key, value)?,
                "sparkline_width" => settings.sparkline_width = positive(key, value)? as usize,
                "report_dir" => {
                    let s = value
                        .as_str()
                        .ok_or_else(|| config_error(key, "a path string", value))?;
                    settings.report_dir = repo_root.join(s);
                }
                other => tracing::warn!("ignoring unknown config key: {other}"),
            }
        }

        if let Some(log) = env(ENV_LOG) {
            settings.log_path = repo_root.join(log);
        }
        if let Some(raw) = env(ENV_GIT_TIMEOUT) {
            settings.git_timeout_secs = positive_env(ENV_GIT_TIMEOUT, &raw)?;
        }
        if let Some(raw) = env(ENV_SPARKLINE_WIDTH) {
            settings.sparkline_width = positive_env(ENV_SPARKLINE_WIDTH, &raw)? as usize;
        }
        Ok(settings)
    }

    /// The resolved value of a known key, for display.
    pub fn value_of(&self, key: &str) -> Option<String> {
        let value = match key {
            "log_path" => self.log_path.display().to_string(),
            "seed" => match self.seed {
                SeedMode::Builtin => "builtin".to_string(),
                SeedMode::None => "none".to_string(),
            },
            "git_timeout_secs" => self.git_timeout_secs.to_string(),
            "sparkline_width" => self.sparkline_width.to_string(),
            "report_dir" => self.report_dir.display().to_string(),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn parse_value_types() {
        assert_eq!(parse_value("true"), Value::Bool(true));
        assert_eq!(parse_value("42"), serde_json::json!(42));
        assert_eq!(parse_value("1.5"), serde_json::json!(1.5));
        assert_eq!(parse_value("none"), serde_json::json!("none"));
    }

    #[test]
    fn defaults_without_config() {
        let s = Settings::resolve(Path::new("/repo"), &Map::new(), no_env).unwrap();
        assert_eq!(s.log_path, PathBuf::from("/repo/SESSION_LOG.md"));
        assert_eq!(s.seed, SeedMode::Builtin);
        assert_eq!(s.git_timeout_secs, 10);
        assert_eq!(s.sparkline_width, 20);
    }

    #[test]
    fn config_then_env() {
        let mut config = Map::new();
        config.insert("log_path".into(), parse_value("docs/LOG.md"));
        config.insert("seed".into(), parse_value("none"));
        config.insert("sparkline_width".into(), parse_value("8"));
        let env = |key: &str| (key == ENV_SPARKLINE_WIDTH).then(|| "12".to_string());
        let s = Settings::resolve(Path::new("/repo"), &config, env).unwrap();
        assert_eq!(s.log_path, PathBuf::from("/repo/docs/LOG.md"));
        assert_eq!(s.seed, SeedMode::None);
        assert_eq!(s.sparkline_width, 12);
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = Map::new();
        config.insert("seed".into(), parse_value("sometimes"));
        let err = Settings::resolve(Path::new("/repo"), &config, no_env).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let env = |key: &str| (key == ENV_GIT_TIMEOUT).then(|| "0".to_string());
        assert!(Settings::resolve(Path::new("/repo"), &Map::new(), env).is_err());
    }

    #[test]
    fn config_file_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = config_path(tmp.path());
        let mut config = Map::new();
        config.insert("git_timeout_secs".into(), parse_value("3"));
        write_config(&path, &config).unwrap();
        assert_eq!(read_config(&path).unwrap(), config);
        assert_eq!(Settings::load(tmp.path()).unwrap().git_timeout_secs, 3);
    }
}
