//! Split a session log into per-session blocks.

use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// `## Session 12 — January 10, 2025 — Title`
///
/// Accepts em-dash, en-dash or hyphen as the separator.
static SESSION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^##[ \t]*Session[ \t]+(\d+)[ \t]*[\u{2014}\u{2013}-][ \t]*([^\r\n]*)").unwrap()
});

/// Raw text of one session, header line included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionBlock {
    pub number: u32,
    pub text: String,
}

/// Session blocks in document order, unique by number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionLog {
    blocks: Vec<SessionBlock>,
}

impl SessionLog {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionBlock> {
        self.blocks.iter()
    }

    pub fn get(&self, number: u32) -> Option<&SessionBlock> {
        self.blocks.iter().find(|b| b.number == number)
    }

    /// Session numbers in document order.
    pub fn numbers(&self) -> Vec<u32> {
        self.blocks.iter().map(|b| b.number).collect()
    }

    /// Last block in document order, used as "latest" when numbering is ambiguous.
    pub fn latest(&self) -> Option<&SessionBlock> {
        self.blocks.last()
    }

    /// Insert a block; an existing block with the same number is dropped so
    /// the last occurrence wins and sits at its own position.
    fn push(&mut self, block: SessionBlock) {
        if let Some(pos) = self.blocks.iter().position(|b| b.number == block.number) {
            warn!(
                session = block.number,
                "duplicate session header; keeping the later block"
            );
            self.blocks.remove(pos);
        }
        self.blocks.push(block);
    }
}

impl IntoIterator for SessionLog {
    type Item = SessionBlock;
    type IntoIter = std::vec::IntoIter<SessionBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.into_iter()
    }
}

/// Split `full_text` at every session header.
///
/// A block runs from its header to just before the next header (or end of
/// document). Text before the first header is ignored. Headers whose number
/// does not fit a `u32` are treated as ordinary text.
pub fn tokenize(full_text: &str) -> SessionLog {
    let mut headers: Vec<(usize, u32)> = Vec::new();
    for caps in SESSION_HEADER.captures_iter(full_text) {
        let Some(whole) = caps.get(0) else { continue };
        let Some(number) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) else {
            continue;
        };
        headers.push((whole.start(), number));
    }

    let mut log = SessionLog::default();
    for (i, (start, number)) in headers.iter().enumerate() {
        let end = headers
            .get(i + 1)
            .map(|(next, _)| *next)
            .unwrap_or(full_text.len());
        log.push(SessionBlock {
            number: *number,
            text: full_text[*start..end].to_string(),
        });
    }
    log
}

/// Date and title from a block's header line.
///
/// `"## Session 3 — January 20, 2025 — Health"` → `("January 20, 2025", "Health")`.
/// A header with only one segment yields an empty title.
pub fn header_parts(block_text: &str) -> (String, String) {
    let Some(caps) = block_text.lines().next().and_then(|l| SESSION_HEADER.captures(l)) else {
        return (String::new(), String::new());
    };
    let suffix = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
    split_date_title(suffix)
}

/// Split `"<date> — <title>"` on the first spaced dash separator.
fn split_date_title(suffix: &str) -> (String, String) {
    for sep in [" \u{2014} ", " \u{2013} ", " - "] {
        if let Some((date, title)) = suffix.split_once(sep) {
            return (date.trim().to_string(), title.trim().to_string());
        }
    }
    (suffix.to_string(), String::new())
}
