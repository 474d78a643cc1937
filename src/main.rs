use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use logsift::config::print_default_config;
use logsift::format::{format_level_report, to_json, to_llm_text, write_file};
use logsift::logs::{latest_log_file, prompt_for_override};
use logsift::output::{
    analysis_file_contents, format_error, print_analysis, print_debug_section, print_summary,
    print_written, ANALYSIS_FILE_NAME, REPORT_FILE_NAME,
};
use logsift::providers::{build_prompt, DEFAULT_LOG_FIXTURE};
use logsift::{
    read_log_lines, render_outputs, select_responder, summarize_levels, write_outputs, AnalysisError,
    Cli, Config, LogAnalyzer, OutputFormat,
};

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "logsift", &mut io::stdout());
}

fn init_tracing(cli: &Cli) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// File, env and flag settings merged, flags winning
fn load_config(cli: &Cli) -> Config {
    let mut config = Config::load_from_path(cli.config.clone().or_else(Config::config_path));
    config.apply_env_overrides();

    if let Some(window) = cli.window {
        config.analysis.context_window = window;
    }
    if let Some(dir) = &cli.logs_dir {
        config.paths.logs_dir = dir.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.paths.output_dir = dir.clone();
    }
    if let Some(file) = &cli.file {
        config.paths.log_file = Some(file.clone());
    }
    if cli.no_llm {
        config.llm.enabled = false;
    }
    config
}

fn tip_for(err: &AnalysisError) -> Option<&'static str> {
    match err {
        AnalysisError::FileNotFound(_) => {
            Some("Check the path, or use --logs-dir to pick the newest .txt log in a directory")
        }
        AnalysisError::UnsupportedFormat(_) => Some("Valid formats: json, csv, llm_text"),
        AnalysisError::Processing(_) => None,
    }
}

fn report(err: &AnalysisError) {
    println!("{}", format_error(&err.to_string(), tip_for(err)));
}

/// Pick the log file: an explicit path wins, otherwise the newest log in
/// the logs directory, confirmed through `input` when `interactive`.
fn resolve_log_file<R: BufRead, W: Write>(
    config: &Config,
    interactive: bool,
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<PathBuf>> {
    if let Some(path) = &config.paths.log_file {
        return Ok(Some(path.clone()));
    }

    let latest = latest_log_file(&config.paths.logs_dir);
    if !interactive {
        return Ok(latest);
    }
    prompt_for_override(latest.as_deref(), input, output)
}

fn choice_error_message(err: &io::Error) -> String {
    format_error(
        &format!("could not read log file choice: {err}"),
        Some("Pass the log file path as an argument, or use --yes"),
    )
}

fn resolve_formats(cli: &Cli, config: &Config) -> Result<Vec<OutputFormat>, AnalysisError> {
    if cli.format.is_empty() {
        return config.output_formats();
    }
    let mut formats = Vec::new();
    for format in &cli.format {
        if !formats.contains(format) {
            formats.push(*format);
        }
    }
    Ok(formats)
}

/// Send the report to the LLM and save whatever comes back.
async fn run_llm(
    cli: &Cli,
    config: &Config,
    llm_text: &str,
    log_path: &Path,
) -> Result<Option<PathBuf>, AnalysisError> {
    let responder = select_responder(&config.llm, DEFAULT_LOG_FIXTURE);
    let prompt = build_prompt(llm_text);
    info!(responder = responder.name(), kind = %responder.kind(), "requesting analysis");

    if cli.debug {
        print_debug_section("Prompt", &prompt, Some(format!("({} chars)", prompt.len())));
    }

    let lines = responder.respond(&prompt, Some(log_path)).await;

    if cli.debug {
        print_debug_section(
            "Raw Response",
            &lines.join("\n"),
            Some(format!("({} lines, {})", lines.len(), responder.kind())),
        );
    }

    if lines.is_empty() {
        info!("empty LLM response, not writing {ANALYSIS_FILE_NAME}");
        return Ok(None);
    }

    let path = config.output_dir().join(ANALYSIS_FILE_NAME);
    write_file(&path, &analysis_file_contents(&lines))?;

    if !cli.quiet && !cli.json {
        print_analysis(&lines);
    }
    Ok(Some(path))
}

async fn run(cli: &Cli, config: &Config) -> Result<()> {
    // Resolve formats before touching anything on disk
    let formats = match resolve_formats(cli, config) {
        Ok(formats) => formats,
        Err(err) => {
            report(&err);
            return Ok(());
        }
    };

    let interactive = !(cli.yes || cli.json) && io::stdin().is_terminal();
    let resolved = resolve_log_file(config, interactive, &mut io::stdin().lock(), &mut io::stdout());
    let chosen = match resolved {
        Ok(chosen) => chosen,
        Err(err) => {
            println!("{}", choice_error_message(&err));
            return Ok(());
        }
    };

    let Some(log_path) = chosen else {
        println!(
            "{}",
            format_error(
                &format!(
                    "No .txt log files found in {}",
                    config.paths.logs_dir.display()
                ),
                Some("Pass a log file path, or use --logs-dir DIR"),
            )
        );
        return Ok(());
    };

    let lines = match read_log_lines(&log_path) {
        Ok(lines) => lines,
        Err(err) => {
            report(&err);
            return Ok(());
        }
    };

    let analyzer = LogAnalyzer::new(config.analysis.context_window);
    let result = analyzer.analyze_lines(&lines, &log_path.display().to_string());
    let levels = summarize_levels(&lines);
    debug!(window = analyzer.window(), errors = result.total_errors_found(), "analysis complete");

    // Everything is rendered before the first file is created
    let output_dir = config.output_dir();
    let mut files = match render_outputs(&result, &formats, output_dir) {
        Ok(files) => files,
        Err(err) => {
            report(&err);
            return Ok(());
        }
    };
    if cli.report {
        files.push((output_dir.join(REPORT_FILE_NAME), format_level_report(&levels)));
    }

    let written = match write_outputs(&files) {
        Ok(written) => written,
        Err(err) => {
            report(&err);
            return Ok(());
        }
    };

    if cli.json {
        match to_json(&result) {
            Ok(json) => println!("{json}"),
            Err(err) => report(&err),
        }
    } else if cli.quiet {
        print_written(&written);
    } else {
        print_summary(&result, &levels, &written);
    }

    if config.llm.enabled {
        match run_llm(cli, config, &to_llm_text(&result), &log_path).await {
            Ok(Some(path)) if !cli.json => print_written(&[path]),
            Ok(_) => {}
            Err(err) => report(&err),
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(&cli);

    if let Some(shell) = cli.completions {
        print_completions(shell);
        return Ok(());
    }

    if cli.print_config {
        print_default_config();
        return Ok(());
    }

    let config = load_config(&cli);
    run(&cli, &config).await
}
