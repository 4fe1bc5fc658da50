//! Core traits for language analysis.

use regex::Regex;

use super::{FileFacts, Identifier};
use crate::config::{LanguageRules, Tier};
use crate::language::Language;
use crate::rules::{self, RuleContext, RuleOutcome};
use crate::source::SourceFile;

/// A language-specific construct the best-practices rules penalize.
pub struct AntiPattern {
    /// Short identifier (e.g. "bare-except").
    pub name: &'static str,
    /// Recommendation shown to the user.
    pub message: &'static str,
    pub tier: Tier,
    /// Matched against comment-free, string-blanked code.
    pub regex: Regex,
}

/// The language's formatting convention check.
pub struct StyleCheck {
    pub message: &'static str,
    pub regex: Regex,
}

/// Language-specific analyzer trait.
///
/// Each language implements fact extraction and the hooks the category rule
/// sets need. Implementations hold no mutable state and are shared across
/// threads through static storage.
pub trait LanguageAnalyzer: Send + Sync {
    /// Returns the language this analyzer handles.
    fn language(&self) -> Language;

    /// Returns file extensions this analyzer handles (without dot).
    fn extensions(&self) -> &'static [&'static str] {
        self.language().extensions()
    }

    /// Extract identifiers, function shapes and public symbols.
    fn extract_facts(&self, source: SourceFile) -> FileFacts;

    /// Returns the expected convention (e.g. "snake_case") when the
    /// identifier violates it, `None` when it conforms or is not checked.
    fn naming_convention(&self, identifier: &Identifier) -> Option<&'static str>;

    /// Built-in anti-patterns for this language.
    fn anti_patterns(&self) -> &'static [AntiPattern];

    fn style_check(&self) -> &'static StyleCheck;

    /// Whether a code line defines a named constant.
    fn is_constant_definition(&self, code: &str) -> bool;

    /// Whether a code line imports a module.
    fn is_import_line(&self, code: &str) -> bool;

    /// What documentation is called in this language ("docstring").
    fn doc_comment_name(&self) -> &'static str;

    /// Check if this analyzer handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext.trim_start_matches('.')))
    }

    /// Score `text` against every category.
    ///
    /// Returns exactly one outcome per category, in category order.
    fn analyze(&self, text: &str, config: &LanguageRules) -> Vec<RuleOutcome> {
        let source = SourceFile::parse(text, self.language());
        tracing::debug!(
            language = %self.language(),
            lines = source.lines().len(),
            code = source.code_line_count(),
            comments = source.comment_line_count(),
            "parsed source"
        );

        let facts = self.extract_facts(source);
        tracing::debug!(
            identifiers = facts.identifiers.len(),
            functions = facts.functions.len(),
            public_symbols = facts.public_symbols.len(),
            "extracted facts"
        );

        rules::evaluate_all(&RuleContext::new(&facts, self, config))
    }
}
