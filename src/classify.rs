//! Line classification: does a log line report an error?

/// Substrings that mark a line as error level. Matched against the
/// lower-cased line padded with a space on each side, so the unbracketed
/// forms also hit a level word at the very start or end of the line.
pub const ERROR_MARKERS: &[&str] = &[
    "[error]",
    "[exception]",
    "[fail]",
    "[fatal]",
    "[critical]",
    " error ",
    " exception ",
    " fail ",
    " fatal ",
    " critical ",
];

/// Substrings that override an error marker, e.g. a warning whose message
/// mentions "error".
pub const SUPPRESSION_MARKERS: &[&str] = &["[warning]", "[info]", "[debug]", "[notice]"];

/// Check if a line is an error-level log entry.
///
/// Suppression wins when a line carries both kinds of marker.
pub fn is_error_line(content: &str) -> bool {
    let padded = format!(" {} ", content.to_lowercase());

    if SUPPRESSION_MARKERS.iter().any(|m| padded.contains(m)) {
        return false;
    }

    ERROR_MARKERS.iter().any(|m| padded.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracketed_markers() {
        assert!(is_error_line("[ERROR] connection refused"));
        assert!(is_error_line("2024-01-01 00:00:00 [Exception] NullReference"));
        assert!(is_error_line("[FAIL] health check"));
        assert!(is_error_line("[fatal] out of memory"));
        assert!(is_error_line("[CRITICAL] disk full"));
    }

    #[test]
    fn test_unbracketed_markers() {
        assert!(is_error_line("2023-09-04 10:10:00 ERROR Database connection failed"));
        assert!(is_error_line("worker 3 FATAL shutting down"));
        assert!(is_error_line("job critical path exceeded"));
    }

    #[test]
    fn test_level_word_at_line_start() {
        assert!(is_error_line("ERROR b"));
        assert!(is_error_line("exception in thread main"));
    }

    #[test]
    fn test_level_word_at_line_end() {
        assert!(is_error_line("request ended in error"));
    }

    #[test]
    fn test_word_inside_other_word_is_not_a_marker() {
        assert!(!is_error_line("errors=0 failures=0"));
        assert!(!is_error_line("no_error_flag set"));
        assert!(!is_error_line("failover complete"));
    }

    #[test]
    fn test_suppression_wins() {
        assert!(!is_error_line("[WARNING] error rate high"));
        assert!(!is_error_line("[INFO] retrying after error "));
        assert!(!is_error_line("[debug] [error] simulated"));
        assert!(!is_error_line("[NOTICE] fatal flag cleared"));
    }

    #[test]
    fn test_suppression_markers_never_error() {
        for marker in SUPPRESSION_MARKERS {
            for error in ERROR_MARKERS {
                let line = format!("{marker}{error}something");
                assert!(!is_error_line(&line), "{line:?} should be suppressed");
            }
        }
    }

    #[test]
    fn test_every_error_marker_detected() {
        for error in ERROR_MARKERS {
            let line = format!("prefix{error}suffix");
            assert!(is_error_line(&line), "{line:?} should be an error");
        }
    }

    #[test]
    fn test_plain_lines() {
        assert!(!is_error_line("INFO a"));
        assert!(!is_error_line(""));
        assert!(!is_error_line("2023-09-04 10:00:00 INFO User login successful"));
    }
}
