//! gpacalc - SGPA/CGPA calculator
//!
//! A CLI tool that computes semester and cumulative grade point
//! averages, converts the final CGPA to a percentage, and exports the
//! results as a table, Markdown, CSV or JSON.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Invalid input, configuration or I/O error

mod analysis;
mod book;
mod cli;
mod config;
mod input;
mod models;
mod report;
mod sample;

use anyhow::{Context, Result};
use book::SemesterBook;
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use input::{FieldParser, GradeScale, ParsePolicy};
use models::EntryMode;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so it can enable verbose output
    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("gpacalc v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(&args, &config) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Calculation failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .gpacalc.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the grade scale, output format, and more.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so that exports written to stdout stay clean.
fn init_logging(args: &Args, config: &Config) {
    let level = if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Collect semesters, compute results, and write the rendered output.
fn run(args: &Args, config: &Config) -> Result<()> {
    let parser = FieldParser::new(
        ParsePolicy::from_strict(config.input.strict),
        GradeScale::from(&config.grading),
    );

    let (book, source) = collect_semesters(args, &parser)?;
    info!("Computing results for {} semesters", book.len());

    let report = report::build_report(
        book.results(),
        &config.report.title,
        &source,
        config.report.include_summary,
    );
    let output = report::render(&report, config.general.format)?;

    match config.general.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write results to {}", path))?;
            info!("Results written to {}", path);
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Build the semester book from the example dataset, an input file and
/// inline entries, in that order. Returns the book and a description of
/// where the semesters came from.
fn collect_semesters(args: &Args, parser: &FieldParser) -> Result<(SemesterBook, String)> {
    let mut book = SemesterBook::new();
    let mut sources = Vec::new();

    if args.example {
        book.load_example();
        sources.push("example dataset".to_string());
    }

    if let Some(ref path) = args.input {
        let added = input::load_transcript(path, parser, &mut book)?;
        if added == 0 {
            warn!("{} contains no semesters", path.display());
        }
        sources.push(path.display().to_string());
    }

    for entry in &args.semesters {
        let entry = parser.quick_entry(entry)?;
        let id = book.add_semester(entry.name, EntryMode::Quick);
        book.set_quick_totals(id, entry.credits, entry.credit_points)?;
    }
    if !args.semesters.is_empty() {
        sources.push("command line".to_string());
    }

    Ok((book, sources.join(", ")))
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    Ok(Config::load_default()?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_collect_inline_semesters() {
        let mut args = make_args();
        args.semesters.push("Semester 2=23:200".to_string());

        let (book, source) = collect_semesters(&args, &FieldParser::default()).unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(source, "command line");
        assert_eq!(book.results()[1].cumulative_credits, 46.0);
    }

    #[test]
    fn test_collect_example_then_inline() {
        let mut args = make_args();
        args.example = true;
        args.semesters = vec!["Semester 5=0:0".to_string()];

        let (book, source) = collect_semesters(&args, &FieldParser::default()).unwrap();
        assert_eq!(book.len(), 5);
        assert_eq!(source, "example dataset, command line");

        let rows = book.results();
        assert_eq!(rows[4].sgpa, 0.0);
        assert_eq!(rows[4].cgpa, rows[3].cgpa);
    }

    #[test]
    fn test_collect_rejects_bad_entry() {
        let mut args = make_args();
        args.semesters = vec!["no figures".to_string()];
        assert!(collect_semesters(&args, &FieldParser::default()).is_err());
    }

    #[test]
    fn test_run_writes_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = dir.path().join("transcript.json");
        std::fs::write(
            &transcript,
            r#"{"semester": [{"name": "Semester 1", "subject": [{"credits": 4, "grade": 10}, {"credits": 3, "grade": "A+"}]}]}"#,
        )
        .unwrap();
        let output = dir.path().join("results.csv");

        let mut args = make_args();
        args.semesters.clear();
        args.input = Some(transcript);
        args.output = Some(output.clone());
        args.format = Some(cli::OutputFormat::Csv);

        let mut config = Config::default();
        config.merge_with_args(&args);
        run(&args, &config).unwrap();

        let csv = std::fs::read_to_string(&output).unwrap();
        assert!(csv.contains("Semester 1,7,67,9.57,7,67,9.57,82.83"));
    }
}
