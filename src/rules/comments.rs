//! Comments: comment density and documentation of public symbols.

use super::{nothing_to_assess, Category, CategoryResult, Finding, RuleContext, ScoreCard};
use crate::analysis::{LanguageAnalyzer, SymbolKind};

pub(crate) fn evaluate<A: LanguageAnalyzer + ?Sized>(ctx: &RuleContext<'_, A>) -> CategoryResult {
    let source = &ctx.facts.source;
    if !source.has_code() {
        return nothing_to_assess(Category::Comments);
    }

    let rules = &ctx.rules.comments;
    let mut card = ScoreCard::new(Category::Comments);

    let code = source.code_line_count();
    let comments = source.comment_line_count();
    let ratio = comments as f64 / code as f64;
    if ratio < rules.min_ratio {
        let shortfall = (rules.min_ratio - ratio) / rules.min_ratio;
        let penalty = (rules.ratio_penalty as f64 * shortfall).round() as u32;
        card.deduct(
            penalty,
            Finding::warn(format!(
                "Comment density is {:.0}% ({} comment lines for {} code lines); aim for at least {:.0}%",
                ratio * 100.0,
                comments,
                code,
                rules.min_ratio * 100.0
            )),
        );
    }

    let doc = ctx.analyzer.doc_comment_name();
    for symbol in ctx.facts.undocumented_symbols() {
        let message = match symbol.kind {
            SymbolKind::Module => format!("Module has no {}", doc),
            SymbolKind::Function => format!("Public function '{}' has no {}", symbol.name, doc),
            SymbolKind::Class => format!("Public class '{}' has no {}", symbol.name, doc),
        };
        card.deduct(rules.undocumented_penalty, Finding::warn(message).at(symbol.line));
    }

    card.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::rules::test_support::with_context;

    fn comments(language: Language, text: &str) -> CategoryResult {
        with_context(language, text, |ctx| evaluate(ctx))
    }

    #[test]
    fn test_documented_file_scores_full() {
        let result = comments(
            Language::Python,
            "\"\"\"Greeting helpers.\"\"\"\n\n\ndef greet(name):\n    \"\"\"Return a greeting.\"\"\"\n    return name\n",
        );
        assert_eq!(result.score, 20);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn test_no_comments_full_ratio_penalty() {
        let result = comments(Language::JavaScript, "let total = 0;\ntotal += 1;\n");
        // no comments at all; no public symbols
        assert_eq!(result.score, 5);
        assert_eq!(result.findings.len(), 1);
        assert!(result.findings[0].message.starts_with("Comment density is 0%"));
    }

    #[test]
    fn test_partial_ratio_penalty_rounds() {
        // 1 comment for 20 code lines: 5%, half the target -> 7.5 rounds to 8
        let mut text = String::from("// counters\n");
        for n in 0..20 {
            text.push_str(&format!("total += {};\n", n));
        }
        let result = comments(Language::JavaScript, &text);
        assert_eq!(result.score, 12);
    }

    #[test]
    fn test_undocumented_symbols() {
        let result = comments(
            Language::Python,
            "# helpers\n# more\ndef first():\n    return 1\n\nclass Second:\n    pass\n",
        );
        assert_eq!(result.score, 8);
        let messages: Vec<&str> = result.findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Module has no docstring",
                "Public function 'first' has no docstring",
                "Public class 'Second' has no docstring",
            ]
        );
        assert_eq!(result.findings[1].line, Some(3));
    }

    #[test]
    fn test_jsdoc_wording() {
        let result = comments(Language::JavaScript, "// entry\nfunction run() {}\n");
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].render(), "Line 2: Public function 'run' has no JSDoc comment");
    }

    #[test]
    fn test_comment_only_file_scores_zero() {
        let result = comments(Language::Python, "# nothing here\n");
        assert_eq!(result.score, 0);
    }
}
