//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// gpacalc - SGPA/CGPA calculator
///
/// Computes semester and cumulative grade point averages from quick
/// totals or per-subject grades, converts the final CGPA to a
/// percentage, and exports the results as a table, Markdown, CSV or JSON.
///
/// Examples:
///   gpacalc --example
///   gpacalc --input transcript.toml --format csv --output grades.csv
///   gpacalc --semester "Sem 1=23:170" --semester "Sem 2=23:200"
///   gpacalc --input transcript.json --strict --format json
///   gpacalc --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Transcript file to load (TOML or JSON)
    ///
    /// Files ending in .toml are read as TOML, anything else as JSON.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Quick-mode semester given inline, appended after the input file
    ///
    /// Format: NAME=CREDITS:POINTS, e.g. "Semester 5=22:192".
    /// May be repeated.
    #[arg(short, long = "semester", value_name = "ENTRY")]
    pub semesters: Vec<String>,

    /// Use the built-in example dataset
    #[arg(long, conflicts_with = "input")]
    pub example: bool,

    /// Output format (table, markdown, csv, json)
    ///
    /// Overrides the config file setting. Can also be set via GPACALC_FORMAT.
    #[arg(short, long, value_name = "FORMAT", env = "GPACALC_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Output file path; prints to stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .gpacalc.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Reject non-numeric values instead of treating them as 0
    #[arg(long)]
    pub strict: bool,

    /// Leave the overall summary out of the output
    #[arg(long)]
    pub no_summary: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .gpacalc.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the results.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned plain-text table (default)
    #[default]
    Table,
    /// Markdown report
    Markdown,
    /// Comma-separated values
    Csv,
    /// Pretty-printed JSON
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.input.is_none() && self.semesters.is_empty() && !self.example {
            return Err(
                "No semesters given: use --input, --semester or --example".to_string(),
            );
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate input file if provided
        if let Some(ref input) = self.input {
            if !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
