//! Category rule sets.
//!
//! Each rule set scores one rubric category. A category starts at its
//! maximum and loses points for every problem found, flooring at zero.
//! Language differences come in through the analyzer hooks and the
//! per-language [`LanguageRules`].

mod comments;
mod formatting;
mod modularity;
mod naming;
mod practices;
mod reusability;
mod types;

pub use types::{
    Category, CategoryResult, Finding, RuleError, RuleOutcome, ScoreCard, Severity,
};

use crate::analysis::{FileFacts, LanguageAnalyzer};
use crate::config::LanguageRules;

/// Everything a rule set needs to score one file.
pub struct RuleContext<'a, A: LanguageAnalyzer + ?Sized> {
    pub facts: &'a FileFacts,
    pub analyzer: &'a A,
    pub rules: &'a LanguageRules,
}

impl<'a, A: LanguageAnalyzer + ?Sized> RuleContext<'a, A> {
    pub fn new(facts: &'a FileFacts, analyzer: &'a A, rules: &'a LanguageRules) -> Self {
        Self {
            facts,
            analyzer,
            rules,
        }
    }
}

/// Evaluate every category, in category order.
pub fn evaluate_all<A: LanguageAnalyzer + ?Sized>(ctx: &RuleContext<'_, A>) -> Vec<RuleOutcome> {
    vec![
        Ok(naming::evaluate(ctx)),
        Ok(modularity::evaluate(ctx)),
        Ok(comments::evaluate(ctx)),
        Ok(formatting::evaluate(ctx)),
        Ok(reusability::evaluate(ctx)),
        practices::evaluate(ctx),
    ]
}

/// Finding for categories that cannot be assessed without code.
pub(crate) fn nothing_to_assess(category: Category) -> CategoryResult {
    CategoryResult::zero(
        category,
        Finding::info(format!(
            "No code to assess for {}",
            category.label().to_lowercase()
        )),
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::analysis::get_analyzer;
    use crate::language::Language;
    use crate::source::SourceFile;

    /// Extract facts for `text` with the registered analyzer.
    pub fn facts(language: Language, text: &str) -> FileFacts {
        get_analyzer(language).extract_facts(SourceFile::parse(text, language))
    }

    /// Run `f` against a context built with default rules.
    pub fn with_context<T>(
        language: Language,
        text: &str,
        f: impl FnOnce(&RuleContext<'_, dyn LanguageAnalyzer>) -> T,
    ) -> T {
        let rules = LanguageRules::default();
        with_rules(language, text, &rules, f)
    }

    pub fn with_rules<T>(
        language: Language,
        text: &str,
        rules: &LanguageRules,
        f: impl FnOnce(&RuleContext<'_, dyn LanguageAnalyzer>) -> T,
    ) -> T {
        let facts = facts(language, text);
        let ctx = RuleContext::new(&facts, get_analyzer(language), rules);
        f(&ctx)
    }
}
