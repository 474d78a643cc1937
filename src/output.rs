//! Terminal output: the colored run summary and the rendered LLM analysis.

use colored::Colorize;
use std::path::PathBuf;

use crate::analyzer::LevelSummary;
use crate::record::{AnalysisResult, ErrorRecord};

/// Banner written at the top of the saved LLM analysis
pub const ANALYSIS_BANNER: &str = "Gemini Log Analysis\n===================\n\n";

/// File the LLM analysis is saved to
pub const ANALYSIS_FILE_NAME: &str = "gemini_analysis.txt";

/// File the level report is saved to
pub const REPORT_FILE_NAME: &str = "report.txt";

/// Longest error line shown in the summary before it is cut
const MAX_SUMMARY_LINE: usize = 120;

/// Format an error with an optional tip, for printing to stdout
pub fn format_error(message: &str, tip: Option<&str>) -> String {
    let mut output = format!("{} {}", "Error:".red().bold(), message);
    if let Some(tip) = tip {
        output.push('\n');
        output.push_str(&format!("{} {}", "Tip:".blue().bold(), tip));
    }
    output
}

/// Text saved to the analysis file for the given response lines
pub fn analysis_file_contents(lines: &[String]) -> String {
    format!("{ANALYSIS_BANNER}{}\n", lines.join("\n"))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

fn print_error_entry(record: &ErrorRecord) {
    let location = format!("line {}", record.line_number);
    match &record.timestamp {
        Some(ts) => println!(
            "  {} {} {}",
            "●".red(),
            location.yellow(),
            ts.as_str().dimmed()
        ),
        None => println!("  {} {}", "●".red(), location.yellow()),
    }
    println!("    {}", truncate(&record.error_line, MAX_SUMMARY_LINE).bright_white());
}

/// Print the run summary: errors found, level counts, files written.
pub fn print_summary(result: &AnalysisResult, levels: &LevelSummary, written: &[PathBuf]) {
    println!();
    println!(
        "{} {}",
        "▸".cyan(),
        format!("Analyzed {}", result.source_identifier()).cyan().bold()
    );
    println!();

    if result.is_empty() {
        println!("  {} {}", "✓".green(), "No errors found".green().bold());
    } else {
        println!(
            "  {}",
            format!("{} error(s) found", result.total_errors_found())
                .red()
                .bold()
        );
        println!();
        for record in result.errors() {
            print_error_entry(record);
        }
    }
    println!();

    println!("{} {}", "▸".magenta(), "Levels".magenta().bold());
    println!(
        "  {} {}",
        "Lines:".blue().bold(),
        levels.total_lines.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Counts:".blue().bold(),
        format!(
            "error {}, warning {}, info {}, other {}",
            levels.errors, levels.warnings, levels.info, levels.other
        )
        .bright_white()
    );
    println!();

    print_written(written);
}

/// List files written during the run
pub fn print_written(written: &[PathBuf]) {
    if written.is_empty() {
        return;
    }
    println!("{} {}", "▸".green(), "Written".green().bold());
    for path in written {
        println!("  {}", path.display().to_string().cyan());
    }
    println!();
}

/// Print the LLM analysis with light markdown rendering
pub fn print_analysis(lines: &[String]) {
    let width = textwrap::termwidth().min(100);
    println!("{} {}", "▸".blue(), "LLM Analysis".blue().bold());
    render_markdown(&lines.join("\n"), width, "  ");
    println!();
}

/// Render markdown text to terminal with colored output.
pub fn render_markdown(text: &str, width: usize, indent: &str) {
    let mut in_code_block = false;

    for line in text.lines() {
        if line.trim().starts_with("```") {
            in_code_block = !in_code_block;
            continue;
        }

        if in_code_block {
            println!("{indent}  {}", line.cyan());
            continue;
        }

        let processed = render_inline_markdown(line);
        for wrapped in textwrap::wrap(&processed, width.saturating_sub(indent.len())) {
            println!("{indent}{wrapped}");
        }
    }
}

/// Process inline markdown: `code`, **bold**, *italic*, and `#` headings
pub fn render_inline_markdown(text: &str) -> String {
    let trimmed = text.trim_start();
    if trimmed.starts_with('#') {
        let heading = trimmed.trim_start_matches('#').trim();
        return heading.bold().underline().to_string();
    }

    let mut result = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '`' => {
                let code: String = chars.by_ref().take_while(|&n| n != '`').collect();
                result.push_str(&code.cyan().to_string());
            }
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut bold = String::new();
                while let Some(n) = chars.next() {
                    if n == '*' {
                        if chars.peek() == Some(&'*') {
                            chars.next();
                        }
                        break;
                    }
                    bold.push(n);
                }
                result.push_str(&bold.bold().to_string());
            }
            '*' if chars.peek().is_some_and(|n| !n.is_whitespace()) => {
                let italic: String = chars.by_ref().take_while(|&n| n != '*').collect();
                result.push_str(&italic.italic().to_string());
            }
            _ => result.push(c),
        }
    }

    result
}

/// Print a debug block to stderr
pub fn print_debug_section(title: &str, body: &str, footer: Option<String>) {
    eprintln!("{}", format!("=== DEBUG: {title} ===").yellow().bold());
    if body.trim().is_empty() {
        eprintln!("{}", "| <empty>".dimmed());
    } else {
        for line in body.lines() {
            eprintln!("{}", format!("| {line}").bright_white());
        }
    }
    if let Some(footer) = footer {
        eprintln!("{}", footer.dimmed());
    }
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain<T>(f: impl FnOnce() -> T) -> T {
        colored::control::set_override(false);
        f()
    }

    #[test]
    fn test_format_error_with_tip() {
        let text = plain(|| format_error("log file not found: x.txt", Some("Check the path")));
        assert_eq!(text, "Error: log file not found: x.txt\nTip: Check the path");
    }

    #[test]
    fn test_format_error_without_tip() {
        let text = plain(|| format_error("boom", None));
        assert_eq!(text, "Error: boom");
    }

    #[test]
    fn test_analysis_file_contents() {
        let contents = analysis_file_contents(&["Root cause: db".to_string(), "Fix: restart".to_string()]);
        assert!(contents.starts_with(ANALYSIS_BANNER));
        assert!(contents.ends_with("Root cause: db\nFix: restart\n"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_inline_markdown_plain() {
        let text = plain(|| render_inline_markdown("use `cargo build` to **compile** *now*"));
        assert_eq!(text, "use cargo build to compile now");
    }

    #[test]
    fn test_inline_markdown_bullet_kept() {
        let text = plain(|| render_inline_markdown("* restart the database"));
        assert_eq!(text, "* restart the database");
    }

    #[test]
    fn test_inline_markdown_heading() {
        let text = plain(|| render_inline_markdown("## Root Cause"));
        assert_eq!(text, "Root Cause");
    }
}
