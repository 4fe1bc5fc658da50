//! Codegrade - rubric-based code quality scoring.
//!
//! Codegrade scores a single Python or JavaScript/JSX source file from 0 to
//! 100 across six categories and explains every deduction:
//!
//! | Category       | Max |
//! |----------------|-----|
//! | Naming         | 10  |
//! | Modularity     | 20  |
//! | Comments       | 20  |
//! | Formatting     | 15  |
//! | Reusability    | 15  |
//! | Best practices | 20  |
//!
//! ```
//! let report = codegrade::run("greet.py", b"def greet(name):\n    return name\n").unwrap();
//! assert_eq!(report.overall_score, report.breakdown.values().sum::<u32>());
//! ```
//!
//! # Architecture
//!
//! The engine works on lines, not syntax trees:
//!
//! - `source`: logical lines with comments and strings stripped, indentation
//! - `analysis`: per-language analyzers extracting identifiers and functions
//! - `rules`: one scorer per rubric category
//! - `score`: aggregation into an [`AnalysisReport`]
//! - `dispatch`: language resolution and decoding, the [`run`] entry point
//! - `config`: YAML-loadable rubric weights and thresholds
//! - `report`: output formatting (JSON, pretty, text)

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod language;
pub mod report;
pub mod rules;
pub mod score;
pub mod source;

pub use analysis::{register_analyzers, FileFacts, LanguageAnalyzer};
pub use config::RubricConfig;
pub use dispatch::{run, Engine, SourceUnit};
pub use error::{EngineError, ErrorPayload, ScanError};
pub use language::Language;
pub use rules::{Category, CategoryResult, Finding, RuleError, Severity};
pub use score::AnalysisReport;

/// Initialize all subsystems.
///
/// Optional; analyzers are also registered on first use.
pub fn init() {
    register_analyzers();
}
