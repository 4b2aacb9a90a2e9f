pub mod counter;
pub mod error;
pub mod grade;
pub mod types;

pub use counter::{snapshot_key, Counter};
pub use error::{Error, Result};
pub use grade::{letter_grade, Grade};
pub use types::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// `to_dict` / `to_json` / `from_json` for every structured report.
///
/// The Markdown leg of the triple lives in `nightshift-render`.
pub trait JsonReport: Serialize + DeserializeOwned {
    fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

impl JsonReport for SessionRecord {}
impl JsonReport for MetricDelta {}
impl JsonReport for Streak {}
impl JsonReport for Insight {}
