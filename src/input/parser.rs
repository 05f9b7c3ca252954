//! Parsing and validation of raw field values.
//!
//! Everything entered by the user passes through here before it reaches
//! the aggregator, which only ever sees finite, non-negative numbers.

use crate::config::GradingConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

/// A field value as it appears in a transcript file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

/// Validation failure for a single field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field}: '{value}' is not a number")]
    NotANumber { field: String, value: String },

    #[error("{field}: value must be a finite number")]
    NotFinite { field: String },

    #[error("{field}: negative values are not allowed (got {value})")]
    Negative { field: String, value: f64 },

    #[error("{field}: grade point {value} is above the maximum of {max}")]
    GradeOutOfRange { field: String, value: f64, max: f64 },

    #[error("invalid semester entry '{0}': expected NAME=CREDITS:POINTS")]
    MalformedEntry(String),
}

/// How non-numeric text is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Non-numeric text counts as 0.
    #[default]
    Lenient,
    /// Non-numeric text is an error.
    Strict,
}

impl ParsePolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            ParsePolicy::Strict
        } else {
            ParsePolicy::Lenient
        }
    }
}

/// Letter grade substitution table.
#[derive(Debug, Clone)]
pub struct GradeScale {
    /// Highest grade point accepted.
    pub max_grade_point: f64,
    letters: HashMap<String, f64>,
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::from(&GradingConfig::default())
    }
}

impl From<&GradingConfig> for GradeScale {
    fn from(config: &GradingConfig) -> Self {
        Self {
            max_grade_point: config.max_grade_point,
            letters: config
                .letter_grades
                .iter()
                .map(|(letter, points)| (letter.trim().to_uppercase(), *points))
                .collect(),
        }
    }
}

impl GradeScale {
    /// Look up a letter grade, ignoring case and surrounding whitespace.
    pub fn lookup(&self, letter: &str) -> Option<f64> {
        self.letters.get(&letter.trim().to_uppercase()).copied()
    }
}

/// A quick-mode semester given as a single string.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickEntry {
    pub name: String,
    pub credits: f64,
    pub credit_points: f64,
}

/// Field parser carrying the active policy and grade scale.
#[derive(Debug, Clone, Default)]
pub struct FieldParser {
    policy: ParsePolicy,
    scale: GradeScale,
}

impl FieldParser {
    pub fn new(policy: ParsePolicy, scale: GradeScale) -> Self {
        Self { policy, scale }
    }

    /// Parse a credit or credit-point field.
    ///
    /// Absent and blank values are 0.
    pub fn number(&self, field: &str, raw: Option<&RawValue>) -> Result<f64, InputError> {
        let value = match raw {
            None => 0.0,
            Some(RawValue::Number(n)) => *n,
            Some(RawValue::Text(text)) => self.parse_text(field, text, None)?,
        };
        check_range(field, value)
    }

    /// Parse a grade-point field, which may also be a letter grade.
    pub fn grade_point(&self, field: &str, raw: Option<&RawValue>) -> Result<f64, InputError> {
        let value = match raw {
            None => 0.0,
            Some(RawValue::Number(n)) => *n,
            Some(RawValue::Text(text)) => self.parse_text(field, text, Some(&self.scale))?,
        };
        let value = check_range(field, value)?;

        if value > self.scale.max_grade_point {
            return Err(InputError::GradeOutOfRange {
                field: field.to_string(),
                value,
                max: self.scale.max_grade_point,
            });
        }
        Ok(value)
    }

    /// Parse a `NAME=CREDITS:POINTS` entry.
    pub fn quick_entry(&self, entry: &str) -> Result<QuickEntry, InputError> {
        let malformed = || InputError::MalformedEntry(entry.to_string());

        let (name, figures) = entry.rsplit_once('=').ok_or_else(malformed)?;
        let (credits, points) = figures.split_once(':').ok_or_else(malformed)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(malformed());
        }

        let field = |suffix: &str| format!("{}.{}", name, suffix);
        Ok(QuickEntry {
            name: name.to_string(),
            credits: self.number(&field("credits"), Some(&RawValue::Text(credits.to_string())))?,
            credit_points: self.number(
                &field("credit_points"),
                Some(&RawValue::Text(points.to_string())),
            )?,
        })
    }

    fn parse_text(
        &self,
        field: &str,
        text: &str,
        scale: Option<&GradeScale>,
    ) -> Result<f64, InputError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(0.0);
        }
        if let Ok(n) = trimmed.parse::<f64>() {
            return Ok(n);
        }
        if let Some(points) = scale.and_then(|s| s.lookup(trimmed)) {
            return Ok(points);
        }

        match self.policy {
            ParsePolicy::Lenient => {
                warn!("{}: '{}' is not a number, using 0", field, trimmed);
                Ok(0.0)
            }
            ParsePolicy::Strict => Err(InputError::NotANumber {
                field: field.to_string(),
                value: trimmed.to_string(),
            }),
        }
    }
}

fn check_range(field: &str, value: f64) -> Result<f64, InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite {
            field: field.to_string(),
        });
    }
    if value < 0.0 {
        return Err(InputError::Negative {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}
