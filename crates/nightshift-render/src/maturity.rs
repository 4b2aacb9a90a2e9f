use crate::table::table;
use crate::{Markdown, NO_SESSIONS};
use nightshift_aggregate::{AgeSource, MaturityReport};

/// `★★★☆☆` for 3 of 5. Values above 5 are capped.
pub fn stars(filled: u8) -> String {
    let filled = usize::from(filled.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

impl Markdown for MaturityReport {
    fn to_markdown(&self) -> String {
        let mut out = String::from("# Project Maturity\n\n");
        if self.sessions == 0 {
            out.push_str(NO_SESSIONS);
            out.push('\n');
            return out;
        }
        out.push_str(&format!(
            "**{}** ({:.0}/100)\n\n",
            self.stage.label(),
            self.score
        ));
        match &self.age {
            Some(age) => {
                let source = match age.source {
                    AgeSource::SessionLog => "session log",
                    AgeSource::GitHistory => "git history",
                };
                out.push_str(&format!(
                    "Age: {} days ({} to {}, from {source})\n\n",
                    age.days, age.first, age.last
                ));
            }
            None => out.push_str("Age: unknown\n\n"),
        }
        let rows: Vec<Vec<String>> = self
            .dimensions
            .iter()
            .map(|d| vec![d.name.clone(), d.value.to_string(), stars(d.stars)])
            .collect();
        out.push_str(&table(&["Dimension", "Value", "Rating"], &rows));
        out
    }
}
