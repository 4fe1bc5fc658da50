//! Naming: identifier length, case convention and generic names.

use super::{Category, CategoryResult, Finding, RuleContext, ScoreCard};
use crate::analysis::{IdentifierKind, LanguageAnalyzer};

pub(crate) fn evaluate<A: LanguageAnalyzer + ?Sized>(ctx: &RuleContext<'_, A>) -> CategoryResult {
    let rules = &ctx.rules.naming;
    let mut card = ScoreCard::new(Category::Naming);

    for identifier in &ctx.facts.identifiers {
        if identifier.kind == IdentifierKind::Import {
            continue;
        }
        let name = identifier.name.as_str();
        if rules.allowed_short.iter().any(|allowed| allowed == name) {
            continue;
        }

        let label = identifier.kind.label();
        let core = name.trim_matches(|c| c == '_' || c == '$');
        // Placeholders such as `__` or `$` name nothing.
        if core.is_empty() {
            continue;
        }

        if core.chars().count() < rules.min_length {
            card.deduct(
                rules.short_penalty,
                Finding::warn(format!(
                    "{} '{}' is too short; use a descriptive name of at least {} characters",
                    label, name, rules.min_length
                ))
                .at(identifier.line),
            );
        } else if let Some(convention) = ctx.analyzer.naming_convention(identifier) {
            card.deduct(
                rules.convention_penalty,
                Finding::warn(format!("{} '{}' should use {}", label, name, convention))
                    .at(identifier.line),
            );
        } else if identifier.kind != IdentifierKind::LoopVariable
            && rules
                .generic_names
                .iter()
                .any(|generic| generic.eq_ignore_ascii_case(core))
        {
            card.deduct(
                rules.generic_penalty,
                Finding::warn(format!(
                    "{} '{}' is too generic; name it after what it holds",
                    label, name
                ))
                .at(identifier.line),
            );
        }
    }

    card.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::rules::test_support::with_context;

    fn naming(language: Language, text: &str) -> CategoryResult {
        with_context(language, text, |ctx| evaluate(ctx))
    }

    #[test]
    fn test_clean_names_score_full() {
        let result = naming(
            Language::Python,
            "MAX_RETRIES = 3\n\nclass Fetcher:\n    pass\n\ndef fetch_page(url):\n    for i in range(MAX_RETRIES):\n        response = url\n    return response\n",
        );
        assert_eq!(result.score, 10);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn test_short_names() {
        let result = naming(Language::Python, "a = 1\nbb = 2\n_ = 3\ni = 0\n");
        assert_eq!(result.score, 6);
        assert_eq!(result.findings.len(), 2);
        assert_eq!(result.findings[0].line, Some(1));
        assert!(result.findings[0].message.contains("'a' is too short"));
    }

    #[test]
    fn test_placeholder_names_are_ignored() {
        let result = naming(Language::Python, "__ = compute()\nfor _, ___ in pairs:\n    pass\n");
        assert_eq!(result.score, 10);
        assert!(result.findings.is_empty());

        let result = naming(Language::JavaScript, "const $ = 1;\nlet __ = 2;\nconst $$ = 3;\n");
        assert_eq!(result.score, 10);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn test_convention_violation() {
        let result = naming(Language::JavaScript, "const user_name = 'x';\nclass cart {}\n");
        assert_eq!(result.score, 6);
        assert!(result.findings[0].message.contains("should use camelCase"));
        assert!(result.findings[1].message.contains("should use PascalCase"));
    }

    #[test]
    fn test_generic_names_outside_loops() {
        let result = naming(
            Language::Python,
            "data = load()\nfor temp in data:\n    pass\n",
        );
        assert_eq!(result.score, 9);
        assert_eq!(result.findings.len(), 1);
        assert!(result.findings[0].message.contains("too generic"));
    }

    #[test]
    fn test_one_finding_per_identifier() {
        // Short, wrong case and generic at once: only the first problem counts.
        let result = naming(Language::JavaScript, "let X = 1;\n");
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.score, 8);
    }

    #[test]
    fn test_floor_at_zero() {
        let text: String = ('a'..='l').map(|c| format!("{} = 1\n", c)).collect();
        let result = naming(Language::Python, &text);
        assert_eq!(result.score, 0);
        // i, j and k are allowed
        assert_eq!(result.findings.len(), 9);
    }
}
