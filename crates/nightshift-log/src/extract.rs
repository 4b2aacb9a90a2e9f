//! Typed extraction from one session block.
//!
//! Every field is extracted independently and falls back to its empty
//! default; nothing in here fails.

use crate::number::parse_count;
use crate::tokenize::header_parts;
use nightshift_core::{snapshot_key, SessionRecord};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

// ── Patterns ──

/// `**Something:**` or `**Something**:` with optional inline text after it.
static BOLD_SUBHEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*\*\*([^*\r\n]+?)(?::\*\*|\*\*[ \t]*:)[ \t]*(.*)$").unwrap()
});

/// Task patterns in priority order. The first that matches anything wins.
///
/// 1. `- ✅ **Init repo** → PR #1`
/// 2. `- Init repo → PR #1`
/// 3. `- Init repo` (only inside an explicit tasks section)
static CHECKMARK_TASK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*[-*+][ \t]*(?:\u{2705}|\u{2714}\u{FE0F}?|\u{2611}\u{FE0F}?)[ \t]*\*\*(.+?)\*\*").unwrap()
});
static ARROW_TASK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*[-*+][ \t]+(.+?)[ \t]*(?:\u{2192}|\u{27F6}|->)").unwrap()
});
static GENERIC_TASK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-*+][ \t]+([^\r\n]+?)[ \t]*\r?$").unwrap());

/// `PR #12` / `pr#12` and `[#12](https://...)`.
static PR_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bPR\s*#(\d+)").unwrap());
static PR_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[#(\d+)\]\([^)]*\)").unwrap());

/// Leading list marker: `-`, `*`, `+` or `1.`.
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*(?:[-*+]|\d+[.)])[ \t]+").unwrap());

const TASK_SECTION: &[&str] = &["task", "completed", "shipped", "work done", "accomplish"];
const DECISION_SECTION: &[&str] = &["decision"];
const NOTES_SECTION: &[&str] = &["note", "observation", "learning"];
const STATS_SECTION: &[&str] = &["stats", "statistic", "snapshot", "metric", "numbers"];

// ── Sections ──

/// A bold sub-header and the lines under it, up to the next bold sub-header
/// or `---` separator.
#[derive(Debug)]
struct Section<'a> {
    name: String,
    lines: Vec<&'a str>,
}

fn split_sections(body: &str) -> Vec<Section<'_>> {
    let mut sections = Vec::new();
    let mut current: Option<Section<'_>> = None;

    for line in body.lines() {
        if let Some(caps) = BOLD_SUBHEADER.captures(line) {
            sections.extend(current.take());
            let name = caps.get(1).map(|m| m.as_str().to_lowercase()).unwrap_or_default();
            let mut lines = Vec::new();
            if let Some(inline) = caps.get(2).map(|m| m.as_str().trim()) {
                if !inline.is_empty() {
                    lines.push(inline);
                }
            }
            current = Some(Section { name, lines });
            continue;
        }
        if line.trim() == "---" {
            sections.extend(current.take());
            continue;
        }
        if let Some(section) = current.as_mut() {
            section.lines.push(line);
        }
    }
    sections.extend(current);
    sections
}

fn find_section<'s, 'a>(sections: &'s [Section<'a>], keywords: &[&str]) -> Option<&'s Section<'a>> {
    sections
        .iter()
        .find(|s| keywords.iter().any(|k| s.name.contains(k)))
}

/// Block text minus the header line.
fn body_of(block_text: &str) -> &str {
    match block_text.split_once('\n') {
        Some((_, rest)) => rest,
        None => "",
    }
}

fn strip_bullet(line: &str) -> &str {
    match BULLET.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line.trim(),
    }
}

// ── Field extractors ──

/// Extract a [`SessionRecord`] from one block as produced by [`crate::tokenize`].
pub fn extract(number: u32, block_text: &str) -> SessionRecord {
    let (date, title) = header_parts(block_text);
    let body = body_of(block_text);
    let sections = split_sections(body);

    SessionRecord {
        number,
        date,
        title,
        tasks: extract_tasks(body, &sections),
        pr_numbers: extract_pr_numbers(block_text),
        decisions: find_section(&sections, DECISION_SECTION)
            .map(list_items)
            .unwrap_or_default(),
        notes: find_section(&sections, NOTES_SECTION)
            .map(free_text)
            .unwrap_or_default(),
        stats_snapshot: find_section(&sections, STATS_SECTION)
            .map(stats_pairs)
            .unwrap_or_default(),
    }
}

fn extract_tasks(body: &str, sections: &[Section<'_>]) -> Vec<String> {
    let task_section = find_section(sections, TASK_SECTION);
    let region = match task_section {
        Some(s) => s.lines.join("\n"),
        None => body.to_string(),
    };

    let checkmarks = capture_all(&CHECKMARK_TASK, &region);
    if !checkmarks.is_empty() {
        return checkmarks;
    }
    let arrows = capture_all(&ARROW_TASK, &region);
    if !arrows.is_empty() {
        return arrows;
    }
    if task_section.is_some() {
        return capture_all(&GENERIC_TASK, &region);
    }
    Vec::new()
}

fn capture_all(re: &Regex, text: &str) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| clean_task(m.as_str()))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Drop bold markers and a leading checkmark from a captured task.
fn clean_task(raw: &str) -> String {
    raw.replace("**", "")
        .trim()
        .trim_start_matches(['\u{2705}', '\u{2714}', '\u{2611}', '\u{FE0F}'])
        .trim()
        .to_string()
}

/// Every PR referenced anywhere in the block, deduplicated.
pub fn extract_pr_numbers(text: &str) -> BTreeSet<u32> {
    PR_REF
        .captures_iter(text)
        .chain(PR_LINK.captures_iter(text))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .collect()
}

fn list_items(section: &Section<'_>) -> Vec<String> {
    section
        .lines
        .iter()
        .map(|l| strip_bullet(l))
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn free_text(section: &Section<'_>) -> String {
    section
        .lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Key/value pairs from `- Key: value` bullets or a `| Key | Value |` table.
fn stats_pairs(section: &Section<'_>) -> BTreeMap<String, i64> {
    let mut out = BTreeMap::new();
    let lines: Vec<&str> = section
        .lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    for (i, line) in lines.iter().enumerate() {
        if line.starts_with('|') {
            let cells = table_cells(line);
            if is_separator_row(&cells) {
                continue;
            }
            // Header row: the row right above a separator row.
            let next_is_separator = lines
                .get(i + 1)
                .map(|n| n.starts_with('|') && is_separator_row(&table_cells(n)))
                .unwrap_or(false);
            if next_is_separator {
                continue;
            }
            if let [key, value, ..] = cells.as_slice() {
                insert_pair(&mut out, key, value);
            }
            continue;
        }
        if let Some((key, value)) = strip_bullet(line).split_once(':') {
            insert_pair(&mut out, key, value);
        }
    }
    out
}

fn insert_pair(out: &mut BTreeMap<String, i64>, key: &str, value: &str) {
    let key = snapshot_key(key);
    if key.is_empty() {
        return;
    }
    out.insert(key, parse_count(value));
}

fn table_cells(row: &str) -> Vec<&str> {
    let inner = row.trim().trim_start_matches('|').trim_end_matches('|');
    inner.split('|').map(str::trim).collect()
}

fn is_separator_row(cells: &[&str]) -> bool {
    !cells.is_empty()
        && cells
            .iter()
            .all(|c| !c.is_empty() && c.chars().all(|ch| matches!(ch, '-' | ':' | ' ')))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_BLOCK: &str = "## Session 4 \u{2014} February 2, 2025 \u{2014} Insights engine\n\
**Tasks completed:**\n\
- \u{2705} **Add insights module** \u{2192} PR #7 \u{2014} Pattern detection\n\
- \u{2705} **Wire CLI** \u{2192} [#8](https://github.com/o/r/pull/8)\n\
\n\
**Pull requests:**\n\
- PR #7 merged\n\
- PR #9 opened\n\
\n\
**Decisions:**\n\
- Keep parsing regex-based\n\
- Seed table stays injectable\n\
\n\
**Stats snapshot:**\n\
- Total PRs: 9\n\
- Test suite: 1,260 tests\n\
- Modules: ~45\n\
- Coverage: n/a\n\
\n\
**Notes:** Long session.\n\
Parser needed two passes.\n\
---\n\
Trailing text outside any section\n";

    #[test]
    fn extracts_header_fields() {
        let r = extract(4, FULL_BLOCK);
        assert_eq!(r.number, 4);
        assert_eq!(r.date, "February 2, 2025");
        assert_eq!(r.title, "Insights engine");
    }

    #[test]
    fn checkmark_tasks_take_priority() {
        let r = extract(4, FULL_BLOCK);
        assert_eq!(r.tasks, vec!["Add insights module", "Wire CLI"]);
    }

    #[test]
    fn pr_numbers_union_both_forms_and_dedupe() {
        let r = extract(4, FULL_BLOCK);
        assert_eq!(r.pr_numbers.into_iter().collect::<Vec<_>>(), vec![7, 8, 9]);
    }

    #[test]
    fn decisions_are_section_scoped() {
        let r = extract(4, FULL_BLOCK);
        assert_eq!(
            r.decisions,
            vec!["Keep parsing regex-based", "Seed table stays injectable"]
        );
    }

    #[test]
    fn notes_stop_at_separator() {
        let r = extract(4, FULL_BLOCK);
        assert_eq!(r.notes, "Long session.\nParser needed two passes.");
        assert!(!r.notes.contains("Trailing"));
    }

    #[test]
    fn stats_snapshot_normalizes_values() {
        let r = extract(4, FULL_BLOCK);
        assert_eq!(r.stats_snapshot.get("total_prs"), Some(&9));
        assert_eq!(r.stats_snapshot.get("test_suite"), Some(&1260));
        assert_eq!(r.stats_snapshot.get("modules"), Some(&45));
        assert_eq!(r.stats_snapshot.get("coverage"), Some(&0));
    }

    #[test]
    fn stats_snapshot_from_table() {
        let block = "## Session 2 \u{2014} x\n\
**Stats:**\n\
| Metric | Value |\n\
|--------|------:|\n\
| Total PRs | 6 |\n\
| Tests | 1,024 |\n";
        let r = extract(2, block);
        assert_eq!(r.stats_snapshot.len(), 2);
        assert_eq!(r.stats_snapshot["total_prs"], 6);
        assert_eq!(r.stats_snapshot["tests"], 1024);
    }

    #[test]
    fn arrow_tasks_when_no_checkmarks() {
        let block = "## Session 1 \u{2014} x\n\
- Set up CI \u{2192} PR #2\n\
- **Write README** -> PR #3\n\
- Unrelated bullet\n";
        let r = extract(1, block);
        assert_eq!(r.tasks, vec!["Set up CI", "Write README"]);
        assert_eq!(r.pr_numbers.len(), 2);
    }

    #[test]
    fn generic_bullets_only_inside_tasks_section() {
        let in_section = "## Session 1 \u{2014} x\n**Tasks:**\n- Plain task\n* Another\n**Decisions:**\n- Not a task\n";
        assert_eq!(extract(1, in_section).tasks, vec!["Plain task", "Another"]);

        let no_section = "## Session 1 \u{2014} x\n- Plain bullet\n";
        assert!(extract(1, no_section).tasks.is_empty());
    }

    #[test]
    fn bullets_in_other_sections_are_not_tasks() {
        let block = "## Session 2 \u{2014} x\n\
Intro line\n\
- Loose bullet\n\
**Decisions:**\n\
- Keep the seed table\n\
**Notes:**\n\
- Slow day\n";
        let r = extract(2, block);
        assert!(r.tasks.is_empty());
        assert_eq!(r.tasks_completed(), 0);
        assert_eq!(r.decisions, vec!["Keep the seed table"]);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let r = extract(9, "## Session 9 \u{2014} March 1, 2025\nJust prose.\n");
        assert!(r.tasks.is_empty());
        assert!(r.decisions.is_empty());
        assert!(r.notes.is_empty());
        assert!(r.stats_snapshot.is_empty());
        assert!(r.pr_numbers.is_empty());
        assert_eq!(r.date, "March 1, 2025");
    }

    #[test]
    fn malformed_pr_refs_contribute_nothing() {
        let prs = extract_pr_numbers("PR # and PR #abc and [#](x) and PR #99999999999");
        assert!(prs.is_empty());
    }

    #[test]
    fn decisions_stop_at_next_bold_subheader() {
        let block = "## Session 3 \u{2014} x\n**Decisions:**\n- Use serde\n**Next steps:**\n- Ship it\n";
        assert_eq!(extract(3, block).decisions, vec!["Use serde"]);
    }

    #[test]
    fn inline_decision_text_is_kept() {
        let block = "## Session 3 \u{2014} x\n**Decisions**: adopt rubric scoring\n";
        assert_eq!(extract(3, block).decisions, vec!["adopt rubric scoring"]);
    }

    #[test]
    fn header_only_block() {
        let r = extract(5, "## Session 5 \u{2014} April 4, 2025");
        assert_eq!(r.date, "April 4, 2025");
        assert!(r.tasks.is_empty());
    }
}
