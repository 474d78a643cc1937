//! Context extraction around a detected error line.

use regex::Regex;
use std::sync::LazyLock;

use crate::record::{ErrorRecord, LogLine};

/// Timestamp layouts, tried in order. Only these three are recognized;
/// ISO-8601 variants with `T`, fractions or offsets are not.
static TIMESTAMP_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}",
        r"\d{2}/\d{2}/\d{4} \d{2}:\d{2}:\d{2}",
        r"\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("timestamp pattern is valid"))
    .collect()
});

/// Return the first timestamp found in `line`, checking patterns in priority
/// order.
pub fn extract_timestamp(line: &str) -> Option<String> {
    TIMESTAMP_PATTERNS
        .iter()
        .find_map(|re| re.find(line))
        .map(|m| m.as_str().to_string())
}

/// Build the record for the error at `index`, with up to `window` lines of
/// context on each side, clipped at the file boundaries.
///
/// # Panics
/// Panics if `index` is out of bounds for `lines`.
pub fn extract_record(lines: &[LogLine], index: usize, window: usize) -> ErrorRecord {
    let line = &lines[index];
    let start = index.saturating_sub(window);
    let end = index.saturating_add(window).saturating_add(1).min(lines.len());

    ErrorRecord {
        error_line: line.content.clone(),
        line_number: line.line_number,
        context_before: lines[start..index].to_vec(),
        context_after: lines[index + 1..end].to_vec(),
        timestamp: extract_timestamp(&line.content),
    }
}
