//! Language-specific analyzer implementations.

mod javascript;
mod python;

pub use javascript::JavaScriptAnalyzer;
pub use python::PythonAnalyzer;

use super::LanguageAnalyzer;
use crate::language::Language;
use once_cell::sync::OnceCell;

/// Static storage for Python analyzer.
static PYTHON_ANALYZER: OnceCell<PythonAnalyzer> = OnceCell::new();

/// Static storage for JavaScript analyzer.
static JAVASCRIPT_ANALYZER: OnceCell<JavaScriptAnalyzer> = OnceCell::new();

/// Register all available language analyzers.
///
/// Idempotent; [`get_analyzer`] registers lazily as well.
pub fn register_analyzers() {
    PYTHON_ANALYZER.get_or_init(PythonAnalyzer::new);
    JAVASCRIPT_ANALYZER.get_or_init(JavaScriptAnalyzer::new);
}

/// Get the analyzer for a language.
pub fn get_analyzer(language: Language) -> &'static dyn LanguageAnalyzer {
    match language {
        Language::Python => PYTHON_ANALYZER.get_or_init(PythonAnalyzer::new),
        Language::JavaScript => JAVASCRIPT_ANALYZER.get_or_init(JavaScriptAnalyzer::new),
    }
}

/// Get the analyzer for a file extension (without dot, case-insensitive).
pub fn get_analyzer_for_extension(ext: &str) -> Option<&'static dyn LanguageAnalyzer> {
    Language::from_extension(ext).map(get_analyzer)
}
