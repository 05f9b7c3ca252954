//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.gpacalc.toml` files.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".gpacalc.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input parsing settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Grade scale settings.
    #[serde(default)]
    pub grading: GradingConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Default output file path; stdout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Input parsing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// Reject non-numeric text instead of treating it as 0.
    #[serde(default)]
    pub strict: bool,
}

/// Grade scale used to substitute letter grades with grade points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Highest grade point a subject can earn.
    #[serde(default = "default_max_grade_point")]
    pub max_grade_point: f64,

    /// Letter grade to grade point table.
    #[serde(default = "default_letter_grades")]
    pub letter_grades: BTreeMap<String, f64>,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            max_grade_point: default_max_grade_point(),
            letter_grades: default_letter_grades(),
        }
    }
}

fn default_max_grade_point() -> f64 {
    10.0
}

fn default_letter_grades() -> BTreeMap<String, f64> {
    [
        ("O", 10.0),
        ("A+", 9.0),
        ("A", 8.0),
        ("B+", 7.0),
        ("B", 6.0),
        ("C", 5.0),
        ("P", 4.0),
        ("F", 0.0),
        ("AB", 0.0),
    ]
    .into_iter()
    .map(|(letter, points)| (letter.to_string(), points))
    .collect()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report title used by the Markdown and JSON outputs.
    #[serde(default = "default_title")]
    pub title: String,

    /// Append the overall summary after the semester rows.
    #[serde(default = "default_true")]
    pub include_summary: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            include_summary: true,
        }
    }
}

fn default_title() -> String {
    "GPA Report".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }

        // Flags always override
        if args.strict {
            self.input.strict = true;
        }
        if args.verbose {
            self.general.verbose = true;
        }
        if args.no_summary {
            self.report.include_summary = false;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.format, OutputFormat::Table);
        assert!(!config.input.strict);
        assert_eq!(config.grading.max_grade_point, 10.0);
        assert_eq!(config.grading.letter_grades.get("A+"), Some(&9.0));
        assert!(config.report.include_summary);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
format = "csv"
output = "grades.csv"

[input]
strict = true

[grading]
max_grade_point = 4.0

[grading.letter_grades]
A = 4.0
B = 3.0

[report]
title = "Transcript"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.format, OutputFormat::Csv);
        assert_eq!(config.general.output.as_deref(), Some("grades.csv"));
        assert!(config.input.strict);
        assert_eq!(config.grading.max_grade_point, 4.0);
        assert_eq!(config.grading.letter_grades.len(), 2);
        assert_eq!(config.report.title, "Transcript");
        assert!(config.report.include_summary);
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        config.general.format = OutputFormat::Csv;

        let mut args = make_args();
        config.merge_with_args(&args);
        assert_eq!(config.general.format, OutputFormat::Csv);
        assert!(!config.input.strict);

        args.format = Some(OutputFormat::Json);
        args.strict = true;
        args.no_summary = true;
        config.merge_with_args(&args);
        assert_eq!(config.general.format, OutputFormat::Json);
        assert!(config.input.strict);
        assert!(!config.report.include_summary);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[grading]"));
        assert!(toml_str.contains("[report]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.grading.letter_grades, default_letter_grades());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[input]\nstrict = true\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(config.input.strict);
        assert!(Config::load(&dir.path().join("missing.toml")).is_err());
    }
}
