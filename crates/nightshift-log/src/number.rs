use regex::Regex;
use std::sync::LazyLock;

/// First numeric token, allowing thousands separators and an approx prefix.
static NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~?\s*\d[\d,_]*").unwrap());

/// Parse a stats-snapshot value into an integer count.
///
/// `"1,260 tests"` → 1260, `"~700"` → 700, `"92.5%"` → 92. Separators and the
/// `~` prefix are stripped; a value with no digits is 0. Overlong values
/// saturate at `i64::MAX`.
pub fn parse_count(raw: &str) -> i64 {
    let Some(token) = NUMBER_TOKEN.find(raw) else {
        return 0;
    };
    let digits: String = token
        .as_str()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(i64::MAX)
}
