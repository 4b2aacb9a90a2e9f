//! Session log parsing: one tokenizer, one extractor, shared by every report.

mod extract;
mod number;
mod tokenize;

pub use extract::{extract, extract_pr_numbers};
pub use number::parse_count;
pub use tokenize::{header_parts, tokenize, SessionBlock, SessionLog};

use nightshift_core::SessionRecord;
use std::path::Path;
use tracing::{debug, warn};

/// Parse a full log into records, in document order.
pub fn parse_log(full_text: &str) -> Vec<SessionRecord> {
    tokenize(full_text)
        .into_iter()
        .map(|block| extract(block.number, &block.text))
        .collect()
}

/// Read and parse a log file. A missing or unreadable file is an empty log.
pub fn load_log(path: &Path) -> Vec<SessionRecord> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_log(&text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("session log not found: {}", path.display());
            Vec::new()
        }
        Err(e) => {
            warn!("cannot read session log {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// Records sorted by session number, for the aggregator.
pub fn by_number(mut records: Vec<SessionRecord>) -> Vec<SessionRecord> {
    records.sort_by_key(|r| r.number);
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SESSIONS: &str = "# Session Log\n\n\
## Session 1 \u{2014} January 10, 2025\n\
**Tasks completed:**\n\
- \u{2705} **Init repo** \u{2192} PR #1 \u{2014} Set up the project\n\
## Session 2 \u{2014} January 15, 2025\n\
**Tasks completed:**\n\
- \u{2705} **Add health check** \u{2192} PR #2 \u{2014} Health module\n\
- \u{2705} **Write tests** \u{2192} PR #3 \u{2014} Test suite\n";

    #[test]
    fn parses_two_session_log() {
        let records = parse_log(TWO_SESSIONS);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tasks_completed(), 1);
        assert_eq!(records[1].tasks_completed(), 2);
        assert_eq!(records[0].pr_numbers.iter().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(records[1].pr_numbers.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(records[1].date, "January 15, 2025");
    }

    #[test]
    fn empty_text_parses_to_nothing() {
        assert!(parse_log("").is_empty());
    }

    #[test]
    fn load_missing_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_log(&tmp.path().join("nope.md")).is_empty());
    }

    #[test]
    fn load_reads_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("SESSION_LOG.md");
        std::fs::write(&path, TWO_SESSIONS).unwrap();
        assert_eq!(load_log(&path).len(), 2);
    }

    #[test]
    fn by_number_sorts() {
        let records = parse_log("## Session 5 \u{2014} b\n## Session 1 \u{2014} a\n");
        let sorted = by_number(records);
        assert_eq!(sorted.iter().map(|r| r.number).collect::<Vec<_>>(), vec![1, 5]);
    }
}
