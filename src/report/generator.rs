//! Result report generation.
//!
//! This module renders result rows as a plain-text table, a Markdown
//! report, CSV, or JSON.

use crate::analysis::{round2, sgpa_trend, summarize};
use crate::cli::OutputFormat;
use crate::models::{
    format_number, CgpaSummary, Report, ReportMetadata, ResultRow, RESULT_COLUMNS,
};
use anyhow::{bail, Result};
use chrono::Utc;

/// Assemble a report from computed rows.
pub fn build_report(
    rows: Vec<ResultRow>,
    title: &str,
    source: &str,
    include_summary: bool,
) -> Report {
    let summary = if include_summary {
        summarize(&rows)
    } else {
        None
    };

    Report {
        title: title.to_string(),
        metadata: ReportMetadata {
            generated_at: Utc::now(),
            source: source.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        rows,
        summary,
    }
}

/// Render a report in the requested format.
///
/// Refuses to render a report without semesters.
pub fn render(report: &Report, format: OutputFormat) -> Result<String> {
    if report.rows.is_empty() {
        bail!("Nothing to export: add at least one semester first");
    }

    Ok(match format {
        OutputFormat::Table => generate_table(report),
        OutputFormat::Markdown => generate_markdown_report(report),
        OutputFormat::Csv => generate_csv(&report.rows),
        OutputFormat::Json => generate_json_report(report)?,
    })
}

/// Generate an aligned plain-text table.
pub fn generate_table(report: &Report) -> String {
    let cells: Vec<[String; 8]> = report.rows.iter().map(ResultRow::display).collect();

    let mut widths = RESULT_COLUMNS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    output.push_str(&format_table_line(&RESULT_COLUMNS.map(String::from), &widths));

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    output.push_str(&rule.join("  "));
    output.push('\n');

    for row in &cells {
        output.push_str(&format_table_line(row, &widths));
    }

    if let Some(ref summary) = report.summary {
        output.push('\n');
        output.push_str(&generate_summary_text(summary));
        output.push('\n');
    }

    output
}

/// First column left-aligned, figures right-aligned.
fn format_table_line(cells: &[String; 8], widths: &[usize; 8]) -> String {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            if i == 0 {
                format!("{:<width$}", cell, width = *width)
            } else {
                format!("{:>width$}", cell, width = *width)
            }
        })
        .collect();

    format!("{}\n", line.join("  ").trim_end())
}

/// Generate a text summary of the final standing.
pub fn generate_summary_text(summary: &CgpaSummary) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Semesters: {}", summary.semesters));
    lines.push(format!(
        "Total Credits: {} | Total Credit Points: {}",
        format_number(summary.total_credits),
        format_number(summary.total_credit_points)
    ));
    lines.push(format!(
        "CGPA: {:.2} | Percentage: {:.2}%",
        round2(summary.cgpa),
        round2(summary.percentage)
    ));

    if let Some(ref best) = summary.best {
        lines.push(format!("Best Semester: {} ({:.2})", best.semester, round2(best.sgpa)));
    }
    if let Some(ref worst) = summary.worst {
        lines.push(format!(
            "Lowest Semester: {} ({:.2})",
            worst.semester,
            round2(worst.sgpa)
        ));
    }

    lines.join("\n")
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", report.title));
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_results_section(&report.rows));

    if let Some(ref summary) = report.summary {
        output.push_str(&generate_summary_section(summary));
    }

    output.push_str("---\n\n");
    output.push_str("*Report generated by gpacalc*\n");

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Version:** {}\n", metadata.tool_version));
    section.push('\n');

    section
}

/// Generate the per-semester results table.
fn generate_results_section(rows: &[ResultRow]) -> String {
    let mut section = String::new();

    section.push_str("## Results\n\n");
    section.push_str(&format!("| {} | SGPA Change |\n", RESULT_COLUMNS.join(" | ")));
    section.push_str("|:---|");
    section.push_str(&"---:|".repeat(RESULT_COLUMNS.len()));
    section.push('\n');

    for (row, delta) in rows.iter().zip(sgpa_trend(rows)) {
        let cells = row.display().map(|c| c.replace('|', "\\|"));
        section.push_str(&format!("| {} | {} |\n", cells.join(" | "), format_delta(delta)));
    }
    section.push('\n');

    section
}

fn format_delta(delta: f64) -> String {
    let delta = round2(delta);
    if delta > 0.0 {
        format!("▲ {:.2}", delta)
    } else if delta < 0.0 {
        format!("▼ {:.2}", delta.abs())
    } else {
        "-".to_string()
    }
}

/// Generate the summary section.
fn generate_summary_section(summary: &CgpaSummary) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Semesters | Credits | Credit Points | **CGPA** | **Percentage** |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | **{:.2}** | **{:.2}%** |\n\n",
        summary.semesters,
        format_number(summary.total_credits),
        format_number(summary.total_credit_points),
        round2(summary.cgpa),
        round2(summary.percentage)
    ));

    if let (Some(best), Some(worst)) = (&summary.best, &summary.worst) {
        section.push_str(&format!(
            "- **Best semester:** {} ({:.2})\n",
            best.semester,
            round2(best.sgpa)
        ));
        section.push_str(&format!(
            "- **Lowest semester:** {} ({:.2})\n\n",
            worst.semester,
            round2(worst.sgpa)
        ));
    }

    section
}

/// Generate CSV with a header row, quoting fields where needed.
pub fn generate_csv(rows: &[ResultRow]) -> String {
    let mut output = String::new();

    output.push_str(&csv_line(RESULT_COLUMNS.iter().copied()));
    for row in rows {
        let cells = row.display();
        output.push_str(&csv_line(cells.iter().map(String::as_str)));
    }

    output
}

fn csv_line<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    let fields: Vec<String> = fields.map(csv_field).collect();
    format!("{}\r\n", fields.join(","))
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate;
    use crate::models::{Semester, SemesterId};

    fn create_test_report(include_summary: bool) -> Report {
        let semesters = vec![
            Semester::quick(SemesterId(0), "Semester 1", 23.0, 170.0),
            Semester::quick(SemesterId(1), "Semester 2", 23.0, 200.0),
            Semester::quick(SemesterId(2), "Semester 3", 22.0, 208.0),
            Semester::quick(SemesterId(3), "Semester 4", 22.0, 192.0),
        ];
        build_report(aggregate(&semesters), "GPA Report", "example", include_summary)
    }

    #[test]
    fn test_render_refuses_empty_report() {
        let report = build_report(Vec::new(), "GPA Report", "none", true);
        assert!(report.summary.is_none());

        for format in [
            OutputFormat::Table,
            OutputFormat::Markdown,
            OutputFormat::Csv,
            OutputFormat::Json,
        ] {
            assert!(render(&report, format).is_err());
        }
    }

    #[test]
    fn test_generate_csv() {
        let report = create_test_report(true);
        let csv = generate_csv(&report.rows);
        let lines: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(
            lines[0],
            "Semester,Credits,Credit Points,SGPA,Cumulative Credits,Cumulative Credit Points,CGPA,Percentage"
        );
        assert_eq!(lines[1], "Semester 1,23,170,7.39,23,170,7.39,66.70");
        assert_eq!(lines[4], "Semester 4,22,192,8.73,90,770,8.56,75.31");
        assert_eq!(lines[5], "");
    }

    #[test]
    fn test_csv_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("Fall, 2023"), "\"Fall, 2023\"");
        assert_eq!(csv_field("The \"hard\" one"), "\"The \"\"hard\"\" one\"");
    }

    #[test]
    fn test_generate_table() {
        let report = create_test_report(true);
        let table = render(&report, OutputFormat::Table).unwrap();
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[0].starts_with("Semester"));
        assert!(lines[0].ends_with("Percentage"));
        assert!(lines[1].starts_with("----------"));
        assert!(lines[2].starts_with("Semester 1"));
        assert!(lines[2].ends_with("66.70"));
        assert!(table.contains("CGPA: 8.56 | Percentage: 75.31%"));
        assert!(table.contains("Best Semester: Semester 3 (9.45)"));
    }

    #[test]
    fn test_table_without_summary() {
        let report = create_test_report(false);
        let table = generate_table(&report);
        assert!(!table.contains("CGPA:"));
        assert_eq!(table.lines().count(), 6);
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report(true);
        let markdown = generate_markdown_report(&report);

        assert!(markdown.starts_with("# GPA Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("- **Source:** example"));
        assert!(markdown.contains("## Results"));
        assert!(markdown.contains("| Semester 2 | 23 | 200 | 8.70 | 46 | 370 | 8.04 |"));
        assert!(markdown.contains("▲ 1.30"));
        assert!(markdown.contains("▼ 0.73"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("**8.56**"));
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(0.0), "-");
        assert_eq!(format_delta(0.001), "-");
        assert_eq!(format_delta(1.304), "▲ 1.30");
        assert_eq!(format_delta(-0.5), "▼ 0.50");
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report(true);
        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "GPA Report");
        assert_eq!(value["metadata"]["source"], "example");
        assert_eq!(value["rows"].as_array().map(Vec::len), Some(4));
        assert_eq!(value["rows"][0]["sgpa"], 7.39);
        assert_eq!(value["summary"]["cgpa"], 8.56);
        assert_eq!(value["summary"]["percentage"], 75.31);
    }

    #[test]
    fn test_json_omits_disabled_summary() {
        let report = create_test_report(false);
        let json = generate_json_report(&report).unwrap();
        assert!(!json.contains("\"summary\""));
    }
}
