use crate::NO_SESSIONS;
use nightshift_core::SessionRecord;

const NODE: char = '●';
const RAIL: char = '│';

/// Vertical rail with one node per session, oldest first.
///
/// ```text
/// ● Session 1 — January 10, 2025
/// │   Init repo
/// │   PRs: #1
/// │
/// ● Session 2 — January 15, 2025
/// ```
pub fn render_timeline(records: &[SessionRecord], max_tasks: usize) -> String {
    let mut ordered: Vec<&SessionRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.number);
    let mut out = String::from("# Timeline\n\n");
    if ordered.is_empty() {
        out.push_str(NO_SESSIONS);
        out.push('\n');
        return out;
    }
    out.push_str("```\n");
    for (i, r) in ordered.iter().enumerate() {
        out.push_str(&format!("{NODE} {}", r.heading()));
        if !r.title.is_empty() {
            out.push_str(&format!(": {}", r.title));
        }
        out.push('\n');
        for task in r.tasks.iter().take(max_tasks) {
            out.push_str(&format!("{RAIL}   {task}\n"));
        }
        if r.tasks.len() > max_tasks {
            out.push_str(&format!("{RAIL}   … {} more\n", r.tasks.len() - max_tasks));
        }
        if !r.pr_numbers.is_empty() {
            let prs: Vec<String> = r.pr_numbers.iter().map(|n| format!("#{n}")).collect();
            out.push_str(&format!("{RAIL}   PRs: {}\n", prs.join(", ")));
        }
        if i + 1 < ordered.len() {
            out.push_str(&format!("{RAIL}\n"));
        }
    }
    out.push_str("```\n");
    out
}
