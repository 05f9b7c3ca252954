//! Semester aggregation and statistics.
//!
//! This module folds an ordered list of semesters into per-semester and
//! running cumulative figures, and computes summary statistics over the
//! resulting rows.

use crate::models::{CgpaSummary, EntryMode, ResultRow, Semester, SemesterScore};
use tracing::trace;

/// CGPA from which the upper percentage conversion applies.
const PERCENTAGE_THRESHOLD: f64 = 7.0;

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Credit-weighted average, zero when there are no credits.
pub fn grade_average(credit_points: f64, credits: f64) -> f64 {
    if credits > 0.0 {
        credit_points / credits
    } else {
        0.0
    }
}

/// Convert a CGPA to a percentage score.
///
/// A CGPA of exactly 7 falls in the upper branch.
pub fn percentage_from_cgpa(cgpa: f64) -> f64 {
    if cgpa >= PERCENTAGE_THRESHOLD {
        7.4 * cgpa + 12.0
    } else {
        7.1 * cgpa + 12.0
    }
}

/// Credits and credit-points of a semester under its active mode.
pub fn semester_totals(semester: &Semester) -> (f64, f64) {
    match semester.mode {
        EntryMode::Quick => (semester.quick.credits, semester.quick.credit_points),
        EntryMode::Detailed => semester
            .subjects
            .iter()
            .fold((0.0, 0.0), |(credits, points), subject| {
                (credits + subject.credits, points + subject.credit_points())
            }),
    }
}

/// Fold semesters, in order, into one result row each.
pub fn aggregate(semesters: &[Semester]) -> Vec<ResultRow> {
    let mut cumulative_credits = 0.0;
    let mut cumulative_points = 0.0;

    semesters
        .iter()
        .map(|semester| {
            let (credits, credit_points) = semester_totals(semester);
            // Points without credits cannot have been earned.
            let credit_points = if credits == 0.0 { 0.0 } else { credit_points };

            cumulative_credits += credits;
            cumulative_points += credit_points;

            let cgpa = grade_average(cumulative_points, cumulative_credits);
            let row = ResultRow {
                semester: semester.name.clone(),
                credits,
                credit_points,
                sgpa: grade_average(credit_points, credits),
                cumulative_credits,
                cumulative_credit_points: cumulative_points,
                cgpa,
                percentage: percentage_from_cgpa(cgpa),
            };

            trace!(
                "{} ({}): sgpa={:.4} cgpa={:.4}",
                semester.name,
                semester.mode,
                row.sgpa,
                row.cgpa
            );
            row
        })
        .collect()
}

/// Summarize the final standing. Returns `None` for an empty list.
pub fn summarize(rows: &[ResultRow]) -> Option<CgpaSummary> {
    let last = rows.last()?;

    let scored: Vec<&ResultRow> = rows.iter().filter(|r| r.credits > 0.0).collect();
    let best = scored
        .iter()
        .copied()
        .max_by(|a, b| a.sgpa.total_cmp(&b.sgpa))
        .map(score_of);
    let worst = scored
        .iter()
        .copied()
        .min_by(|a, b| a.sgpa.total_cmp(&b.sgpa))
        .map(score_of);

    Some(CgpaSummary {
        semesters: rows.len(),
        total_credits: last.cumulative_credits,
        total_credit_points: last.cumulative_credit_points,
        cgpa: last.cgpa,
        percentage: last.percentage,
        best,
        worst,
    })
}

fn score_of(row: &ResultRow) -> SemesterScore {
    SemesterScore {
        semester: row.semester.clone(),
        sgpa: row.sgpa,
    }
}

/// SGPA change of each semester relative to the previous semester that
/// carried credits. Zero-credit semesters and the first scored semester
/// report 0.
pub fn sgpa_trend(rows: &[ResultRow]) -> Vec<f64> {
    let mut previous: Option<f64> = None;

    rows.iter()
        .map(|row| {
            if row.credits <= 0.0 {
                return 0.0;
            }
            let delta = previous.map_or(0.0, |p| row.sgpa - p);
            previous = Some(row.sgpa);
            delta
        })
        .collect()
}
