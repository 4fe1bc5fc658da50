//! Output formatting for analysis results.
//!
//! Supports three output formats:
//! - JSON: the machine-readable report shape
//! - Pretty: colored terminal output for human readability
//! - Text: uncolored plain output for CI logs

use colored::*;
use serde::Serialize;
use std::fmt::Write as _;

use crate::error::{EngineError, ErrorPayload, ScanError};
use crate::rules::{Category, Severity};
use crate::score::AnalysisReport;

const BAR_WIDTH: u32 = 20;

/// Result of analyzing one file during a scan.
#[derive(Debug, Clone)]
pub struct ScanEntry {
    pub path: String,
    pub result: Result<AnalysisReport, ScanError>,
}

/// Totals over a scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScanSummary {
    pub files: usize,
    pub analyzed: usize,
    pub errors: usize,
    pub average_score: f64,
    pub lowest_score: Option<u32>,
}

impl ScanSummary {
    pub fn from_entries(entries: &[ScanEntry]) -> Self {
        let scores: Vec<u32> = entries
            .iter()
            .filter_map(|e| e.result.as_ref().ok().map(|r| r.overall_score))
            .collect();
        let average_score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().map(|s| *s as f64).sum::<f64>() / scores.len() as f64
        };
        Self {
            files: entries.len(),
            analyzed: scores.len(),
            errors: entries.len() - scores.len(),
            average_score,
            lowest_score: scores.iter().copied().min(),
        }
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// One scan entry as JSON: `{path, report}` or `{path, error, message}`.
#[derive(Serialize)]
struct JsonScanEntry<'a> {
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a AnalysisReport>,
    #[serde(flatten)]
    error: Option<ErrorPayload>,
}

/// Serialize a report as pretty-printed JSON.
pub fn to_json(report: &AnalysisReport) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Serialize an engine error as `{"error": CODE, "message": ...}`.
pub fn error_to_json(err: &EngineError) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&err.payload())?)
}

/// Serialize scan entries as a JSON array, in the given order.
pub fn scan_to_json(entries: &[ScanEntry]) -> anyhow::Result<String> {
    let json: Vec<JsonScanEntry<'_>> = entries
        .iter()
        .map(|entry| match &entry.result {
            Ok(report) => JsonScanEntry {
                path: &entry.path,
                report: Some(report),
                error: None,
            },
            Err(err) => JsonScanEntry {
                path: &entry.path,
                report: None,
                error: Some(err.payload()),
            },
        })
        .collect();
    Ok(serde_json::to_string_pretty(&json)?)
}

pub fn write_json(report: &AnalysisReport) -> anyhow::Result<()> {
    println!("{}", to_json(report)?);
    Ok(())
}

pub fn write_scan_json(entries: &[ScanEntry]) -> anyhow::Result<()> {
    println!("{}", scan_to_json(entries)?);
    Ok(())
}

// =============================================================================
// Text Format
// =============================================================================

/// Render a report as uncolored text.
pub fn render_text(path: &str, report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {}/100 (grade {})",
        path,
        report.overall_score,
        report.grade()
    );
    for category in Category::ALL {
        let _ = writeln!(
            out,
            "  {:<16} {:>2}/{}",
            category.label(),
            report.score_for(category),
            category.max_points()
        );
    }
    for recommendation in &report.recommendations {
        let _ = writeln!(out, "  - {}", recommendation);
    }
    out
}

/// Render a scan as uncolored text, ending with the summary line.
pub fn render_scan_text(entries: &[ScanEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        match &entry.result {
            Ok(report) => out.push_str(&render_text(&entry.path, report)),
            Err(err) => {
                let _ = writeln!(out, "{}: error {}: {}", entry.path, err.code(), err);
            }
        }
    }
    let summary = ScanSummary::from_entries(entries);
    let _ = writeln!(
        out,
        "Scanned {} files: {} analyzed, {} errors, average score {:.1}",
        summary.files, summary.analyzed, summary.errors, summary.average_score
    );
    out
}

pub fn write_text(path: &str, report: &AnalysisReport) {
    print!("{}", render_text(path, report));
}

pub fn write_scan_text(entries: &[ScanEntry]) {
    print!("{}", render_scan_text(entries));
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write a report with colors.
pub fn write_pretty(path: &str, report: &AnalysisReport, min_score: Option<u32>) {
    write_header();

    print!("  {}", "File: ".dimmed());
    println!("{}", path);
    println!();

    write_result_summary(report.overall_score, report.grade(), min_score);
    println!();

    write_categories(report);
}

/// Write every scan entry followed by a summary.
pub fn write_scan_pretty(root: &str, entries: &[ScanEntry], min_score: Option<u32>) {
    write_header();

    print!("  {}", "Scanning: ".dimmed());
    println!("{}", root);
    println!();

    for entry in entries {
        match &entry.result {
            Ok(report) => {
                print!("  {}  ", entry.path.blue());
                write_colored_score(report.overall_score);
                print!("/100  Grade: ");
                write_colored_grade(report.grade());
                if let Some(min) = min_score {
                    if report.overall_score < min {
                        print!("  {}", "below minimum".red());
                    }
                }
                println!();
                for category in Category::ALL {
                    for finding in report.findings_for(category) {
                        write_severity_tag(finding.severity);
                        println!("{}", finding.render());
                    }
                }
            }
            Err(err) => {
                print!("  {}  ", entry.path.blue());
                println!("{} {}", err.code().red(), err);
            }
        }
        println!();
    }

    let summary = ScanSummary::from_entries(entries);
    println!(
        "  {} {} files, {} analyzed, {} errors",
        "Summary:".bold(),
        summary.files,
        summary.analyzed,
        summary.errors
    );
    print!("  Average score: ");
    println!("{:.1}", summary.average_score);
    if let Some(lowest) = summary.lowest_score {
        print!("  Lowest score: ");
        write_colored_score(lowest);
        println!();
    }
    println!();
}

fn write_header() {
    println!();
    print!("  ");
    print!("{}", "codegrade".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();
}

fn write_result_summary(score: u32, grade: &str, min_score: Option<u32>) {
    if let Some(min) = min_score {
        if score >= min {
            print!("  {}", "✓ PASS".green());
        } else {
            print!("  {}", "✗ FAIL".red());
        }
    }

    print!("  Score: ");
    write_colored_score(score);
    print!("/100  Grade: ");
    write_colored_grade(grade);

    if let Some(min) = min_score {
        print!("  {}", format!("(minimum {})", min).dimmed());
    }
    println!();
}

fn write_categories(report: &AnalysisReport) {
    println!("  {}", "Categories:".bold());
    println!();

    for category in Category::ALL {
        let score = report.score_for(category);
        let max = category.max_points();
        print!("    {:<16} ", category.label());
        write_bar(score, max);
        println!(" {:>2}/{}", score, max);

        for finding in report.findings_for(category) {
            write_severity_tag(finding.severity);
            println!("{}", finding.render());
        }
    }
    println!();
}

fn write_bar(score: u32, max: u32) {
    let filled = if max == 0 { 0 } else { score * BAR_WIDTH / max };
    let bar = "█".repeat(filled as usize);
    let rest = "░".repeat((BAR_WIDTH - filled) as usize);
    let ratio = if max == 0 { 0 } else { score * 100 / max };
    match ratio {
        r if r >= 80 => print!("{}", bar.green()),
        r if r >= 50 => print!("{}", bar.yellow()),
        _ => print!("{}", bar.red()),
    }
    print!("{}", rest.dimmed());
}

fn write_colored_score(s: u32) {
    match s {
        s if s >= 90 => print!("{}", s.to_string().green().bold()),
        s if s >= 80 => print!("{}", s.to_string().green()),
        s if s >= 70 => print!("{}", s.to_string().yellow()),
        s if s >= 60 => print!("{}", s.to_string().yellow().bold()),
        _ => print!("{}", s.to_string().red()),
    }
}

fn write_colored_grade(grade: &str) {
    match grade {
        "A" => print!("{}", grade.green().bold()),
        "B" => print!("{}", grade.green()),
        "C" => print!("{}", grade.yellow()),
        "D" => print!("{}", grade.yellow().bold()),
        _ => print!("{}", grade.red()),
    }
}

fn write_severity_tag(severity: Severity) {
    match severity {
        Severity::Warn => print!("      {} ", "WARN".yellow()),
        Severity::Info => print!("      {} ", "INFO".blue()),
    }
}
