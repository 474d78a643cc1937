//! Choosing which log file to analyze.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Extension of log files picked up from the logs directory
pub const LOG_EXTENSION: &str = "txt";

/// Find the most recently modified `.txt` file directly inside `dir`.
///
/// Returns `None` when the directory is missing, unreadable or has no
/// matching files. Ties on modification time go to the lexically last name.
pub fn latest_log_file(dir: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;

    let mut best: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_log = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(LOG_EXTENSION));
        if !is_log {
            continue;
        }

        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        let newer = match &best {
            None => true,
            Some((time, best_path)) => (modified, &path) > (*time, best_path),
        };
        if newer {
            best = Some((modified, path));
        }
    }

    debug!(dir = %dir.display(), found = ?best.as_ref().map(|(_, p)| p), "scanned logs directory");
    best.map(|(_, path)| path)
}

/// Ask the user to confirm `default` or type another path.
///
/// An empty answer (or end of input) keeps the default.
pub fn prompt_for_override<R: BufRead, W: Write>(
    default: Option<&Path>,
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<PathBuf>> {
    match default {
        Some(path) => write!(
            output,
            "Analyze {}? Press Enter to accept or type another path: ",
            path.display()
        )?,
        None => write!(output, "No log file found. Enter a path to analyze: ")?,
    }
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();

    if answer.is_empty() {
        Ok(default.map(Path::to_path_buf))
    } else {
        Ok(Some(PathBuf::from(answer)))
    }
}
