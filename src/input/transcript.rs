//! Transcript file loading.
//!
//! A transcript lists semesters either as quick totals or as subjects:
//!
//! ```toml
//! [[semester]]
//! name = "Semester 1"
//! credits = 23
//! credit_points = 170
//!
//! [[semester]]
//! name = "Semester 2"
//! mode = "detailed"
//!
//! [[semester.subject]]
//! name = "Mathematics"
//! credits = 4
//! grade = "A+"
//! ```
//!
//! The same shape is accepted as JSON.

use super::parser::{FieldParser, InputError, RawValue};
use crate::book::SemesterBook;
use crate::models::{EntryMode, Subject};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// On-disk format of a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    Toml,
    Json,
}

impl TranscriptFormat {
    /// `.toml` files are TOML, everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => TranscriptFormat::Toml,
            _ => TranscriptFormat::Json,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptFile {
    #[serde(default, alias = "semesters")]
    semester: Vec<RawSemester>,
}

#[derive(Debug, Deserialize)]
struct RawSemester {
    name: Option<String>,
    mode: Option<EntryMode>,
    credits: Option<RawValue>,
    credit_points: Option<RawValue>,
    #[serde(default, alias = "subjects")]
    subject: Vec<RawSubject>,
}

#[derive(Debug, Deserialize)]
struct RawSubject {
    name: Option<String>,
    credits: Option<RawValue>,
    #[serde(alias = "grade_point")]
    grade: Option<RawValue>,
}

/// A semester whose fields have all been validated.
#[derive(Debug, Clone, PartialEq)]
pub struct SemesterDraft {
    pub name: String,
    pub mode: EntryMode,
    pub credits: f64,
    pub credit_points: f64,
    pub subjects: Vec<Subject>,
}

/// Parse and validate transcript content.
///
/// `offset` is the number of semesters already present, used for
/// default names.
pub fn parse_transcript(
    content: &str,
    format: TranscriptFormat,
    parser: &FieldParser,
    offset: usize,
) -> Result<Vec<SemesterDraft>> {
    let file: TranscriptFile = match format {
        TranscriptFormat::Toml => toml::from_str(content).context("Invalid TOML transcript")?,
        TranscriptFormat::Json => {
            serde_json::from_str(content).context("Invalid JSON transcript")?
        }
    };

    let drafts = file
        .semester
        .into_iter()
        .enumerate()
        .map(|(i, raw)| validate_semester(raw, i + 1, offset + i + 1, parser))
        .collect::<Result<Vec<_>, InputError>>()?;

    Ok(drafts)
}

fn validate_semester(
    raw: RawSemester,
    position: usize,
    number: usize,
    parser: &FieldParser,
) -> Result<SemesterDraft, InputError> {
    let field = format!("semester[{}]", position);
    let mode = raw.mode.unwrap_or(if raw.subject.is_empty() {
        EntryMode::Quick
    } else {
        EntryMode::Detailed
    });

    let subjects = raw
        .subject
        .into_iter()
        .enumerate()
        .map(|(j, subject)| {
            let field = format!("{}.subject[{}]", field, j + 1);
            Ok::<_, InputError>(Subject {
                name: subject
                    .name
                    .unwrap_or_else(|| format!("Subject {}", j + 1)),
                credits: parser.number(&format!("{}.credits", field), subject.credits.as_ref())?,
                grade_point: parser
                    .grade_point(&format!("{}.grade", field), subject.grade.as_ref())?,
            })
        })
        .collect::<Result<Vec<_>, InputError>>()?;

    Ok(SemesterDraft {
        name: raw
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("Semester {}", number)),
        mode,
        credits: parser.number(&format!("{}.credits", field), raw.credits.as_ref())?,
        credit_points: parser
            .number(&format!("{}.credit_points", field), raw.credit_points.as_ref())?,
        subjects,
    })
}

/// Append validated drafts to a book, in order.
pub fn push_drafts(book: &mut SemesterBook, drafts: Vec<SemesterDraft>) -> Result<()> {
    for draft in drafts {
        let id = book.add_semester(draft.name, draft.mode);
        book.set_quick_totals(id, draft.credits, draft.credit_points)?;
        for subject in draft.subjects {
            book.add_subject(id, subject)?;
        }
    }
    Ok(())
}

/// Load a transcript file into a book. Returns the number of semesters added.
///
/// Nothing is added if any field fails validation.
pub fn load_transcript(path: &Path, parser: &FieldParser, book: &mut SemesterBook) -> Result<usize> {
    info!("Loading transcript from: {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript: {}", path.display()))?;

    let format = TranscriptFormat::from_path(path);
    debug!("Transcript format: {:?}", format);

    let drafts = parse_transcript(&content, format, parser, book.len())
        .with_context(|| format!("Failed to load transcript: {}", path.display()))?;
    let count = drafts.len();

    push_drafts(book, drafts)?;
    Ok(count)
}
