//! Data models for the GPA calculator.
//!
//! This module contains the core data structures used throughout
//! the application for representing semesters, subjects, and the
//! derived result rows.

use crate::analysis::round2;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Opaque identifier of a semester within a [`crate::book::SemesterBook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SemesterId(pub u32);

impl fmt::Display for SemesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How the figures of a semester are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryMode {
    /// Pre-aggregated totals, no subject breakdown
    #[default]
    Quick,
    /// Individual subjects, aggregated by the calculator
    Detailed,
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryMode::Quick => write!(f, "quick"),
            EntryMode::Detailed => write!(f, "detailed"),
        }
    }
}

/// A single subject of a detailed-mode semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Subject name.
    pub name: String,
    /// Credit weight.
    pub credits: f64,
    /// Grade point earned, conventionally 0-10.
    pub grade_point: f64,
}

impl Subject {
    #[allow(dead_code)] // Convenience constructor
    pub fn new(name: impl Into<String>, credits: f64, grade_point: f64) -> Self {
        Self {
            name: name.into(),
            credits,
            grade_point,
        }
    }

    /// Credit weight multiplied by the grade point.
    pub fn credit_points(&self) -> f64 {
        self.credits * self.grade_point
    }
}

/// Directly-entered semester totals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QuickTotals {
    pub credits: f64,
    pub credit_points: f64,
}

/// One semester of input.
///
/// Both the quick totals and the subject list are kept regardless of the
/// active mode; only the data of `mode` takes part in aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semester {
    /// Identifier allocated by the owning book.
    pub id: SemesterId,
    /// Display name.
    pub name: String,
    /// Active input mode.
    pub mode: EntryMode,
    /// Totals used in quick mode.
    pub quick: QuickTotals,
    /// Subjects used in detailed mode.
    pub subjects: Vec<Subject>,
}

impl Semester {
    /// Creates a quick-mode semester from entered totals.
    pub fn quick(id: SemesterId, name: impl Into<String>, credits: f64, credit_points: f64) -> Self {
        Self {
            id,
            name: name.into(),
            mode: EntryMode::Quick,
            quick: QuickTotals {
                credits,
                credit_points,
            },
            subjects: Vec::new(),
        }
    }

    /// Creates a detailed-mode semester from a subject list.
    #[allow(dead_code)] // Books build detailed semesters subject by subject
    pub fn detailed(id: SemesterId, name: impl Into<String>, subjects: Vec<Subject>) -> Self {
        Self {
            id,
            name: name.into(),
            mode: EntryMode::Detailed,
            quick: QuickTotals::default(),
            subjects,
        }
    }
}

fn serialize_rounded<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round2(*value))
}

/// Derived figures for one semester, in list order.
///
/// Fields hold full precision; serialization and [`ResultRow::display`]
/// round to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    /// Semester display name.
    pub semester: String,
    #[serde(serialize_with = "serialize_rounded")]
    pub credits: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub credit_points: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub sgpa: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub cumulative_credits: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub cumulative_credit_points: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub cgpa: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub percentage: f64,
}

impl ResultRow {
    /// Returns the row as display strings, in export column order.
    pub fn display(&self) -> [String; 8] {
        [
            self.semester.clone(),
            format_number(self.credits),
            format_number(self.credit_points),
            format!("{:.2}", round2(self.sgpa)),
            format_number(self.cumulative_credits),
            format_number(self.cumulative_credit_points),
            format!("{:.2}", round2(self.cgpa)),
            format!("{:.2}", round2(self.percentage)),
        ]
    }
}

/// Column headers of the tabular export.
pub const RESULT_COLUMNS: [&str; 8] = [
    "Semester",
    "Credits",
    "Credit Points",
    "SGPA",
    "Cumulative Credits",
    "Cumulative Credit Points",
    "CGPA",
    "Percentage",
];

/// Formats a credit figure without trailing zeros ("23", "4.5").
pub fn format_number(value: f64) -> String {
    format!("{}", round2(value))
}

/// SGPA of a named semester.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterScore {
    pub semester: String,
    #[serde(serialize_with = "serialize_rounded")]
    pub sgpa: f64,
}

/// Overall figures after the last semester.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CgpaSummary {
    /// Number of semesters considered.
    pub semesters: usize,
    #[serde(serialize_with = "serialize_rounded")]
    pub total_credits: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub total_credit_points: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub cgpa: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub percentage: f64,
    /// Highest SGPA among semesters with credits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best: Option<SemesterScore>,
    /// Lowest SGPA among semesters with credits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worst: Option<SemesterScore>,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Date and time of generation.
    pub generated_at: DateTime<Utc>,
    /// Where the semesters came from (file path, "example", "command line").
    pub source: String,
    /// Version of the tool that produced the report.
    pub tool_version: String,
}

/// The complete result report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub title: String,
    pub metadata: ReportMetadata,
    pub rows: Vec<ResultRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<CgpaSummary>,
}
