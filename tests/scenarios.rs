//! End-to-end scoring of representative files.

use std::path::PathBuf;

use codegrade::{run, AnalysisReport, Category};

fn fixture(name: &str) -> AnalysisReport {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name);
    let bytes = std::fs::read(&path).expect("fixture should exist");
    run(name, &bytes).expect("fixture should analyze")
}

/// Ten one-letter names, no docstrings and one 200-line function.
fn sloppy_python() -> String {
    let mut text = String::from("def process(a, b):\n");
    for name in ["c", "d", "e", "f", "g", "h", "m", "n", "p", "q"] {
        text.push_str(&format!("    {} = a + b\n", name));
    }
    for n in 0..190 {
        text.push_str(&format!("    step_{} = a * {}\n", n, n + 10));
    }
    text.push_str("    return q\n");
    text
}

#[test]
fn test_sloppy_python_scores_low() {
    let report = run("sloppy.py", sloppy_python().as_bytes()).unwrap();

    assert_eq!(report.score_for(Category::Modularity), 0);
    assert_eq!(report.score_for(Category::Comments), 0);
    assert!(report.score_for(Category::Naming) <= 4);
    assert!(report.overall_score < 50, "score was {}", report.overall_score);
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.contains("Function 'process'") && r.contains("Consider breaking it down")));
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.contains("Module has no docstring")));
}

#[test]
fn test_clean_javascript_scores_high() {
    let report = fixture("clean.js");
    assert!(report.overall_score >= 90, "score was {}", report.overall_score);
    assert_eq!(report.score_for(Category::Naming), 10);
    assert_eq!(report.score_for(Category::BestPractices), 20);
}

#[test]
fn test_clean_python_scores_high() {
    let report = fixture("clean.py");
    assert!(report.overall_score >= 90, "score was {}", report.overall_score);
    assert_eq!(report.score_for(Category::Comments), 20);
}

#[test]
fn test_plain_text_is_unsupported() {
    let err = run("notes.txt", b"remember the milk\n").unwrap_err();
    assert_eq!(err.code(), "UNSUPPORTED_FILE_TYPE");
}

#[test]
fn test_mixed_indentation_reported_once() {
    let report = fixture("mixed_indent.py");
    let mixed: Vec<&String> = report
        .recommendations
        .iter()
        .filter(|r| r.contains("Mixed indentation"))
        .collect();
    assert_eq!(mixed.len(), 1);
    assert!(mixed[0].starts_with("Line 10:"));
    assert!(report.score_for(Category::Formatting) < Category::Formatting.max_points());
}

#[test]
fn test_legacy_javascript_practices() {
    let report = fixture("legacy.js");
    // var 3, loose equality 3, console 2, innerHTML 3, eval 5
    assert_eq!(report.score_for(Category::BestPractices), 4);
    assert_eq!(report.findings_for(Category::BestPractices).len(), 5);
}
