//! Modularity: function length, nesting depth, parameter count and
//! cyclomatic complexity.

use super::{nothing_to_assess, Category, CategoryResult, Finding, RuleContext, ScoreCard};
use crate::analysis::LanguageAnalyzer;

pub(crate) fn evaluate<A: LanguageAnalyzer + ?Sized>(ctx: &RuleContext<'_, A>) -> CategoryResult {
    if !ctx.facts.source.has_code() {
        return nothing_to_assess(Category::Modularity);
    }

    let rules = &ctx.rules.modularity;
    let mut card = ScoreCard::new(Category::Modularity);

    for function in &ctx.facts.functions {
        let mut penalty = 0u32;
        let mut problems = Vec::new();

        if function.body_lines > rules.max_function_lines {
            let over = function.body_lines - rules.max_function_lines;
            let extra = to_u32(over / rules.lines_per_extra_point.max(1));
            penalty = penalty
                .saturating_add(rules.length_penalty)
                .saturating_add(extra);
            problems.push(format!(
                "is {} lines long (limit {})",
                function.body_lines, rules.max_function_lines
            ));
        }

        if function.max_nesting > rules.max_nesting {
            let over = to_u32(function.max_nesting - rules.max_nesting);
            penalty = penalty.saturating_add(rules.nesting_penalty.saturating_mul(over));
            problems.push(format!(
                "nests {} levels deep (limit {})",
                function.max_nesting, rules.max_nesting
            ));
        }

        let params = function.parameters.len();
        if params > rules.max_parameters {
            let over = to_u32(params - rules.max_parameters);
            penalty = penalty.saturating_add(rules.parameter_penalty.saturating_mul(over));
            problems.push(format!(
                "takes {} parameters (limit {})",
                params, rules.max_parameters
            ));
        }

        if function.complexity > rules.max_complexity {
            penalty = penalty.saturating_add(rules.complexity_penalty);
            problems.push(format!(
                "has cyclomatic complexity {} (limit {})",
                function.complexity, rules.max_complexity
            ));
        }

        if !problems.is_empty() {
            card.deduct(
                penalty,
                Finding::warn(format!(
                    "Function '{}' {}. Consider breaking it down into smaller functions.",
                    function.name,
                    problems.join(", ")
                ))
                .at(function.line),
            );
        }
    }

    card.finish()
}

fn to_u32(over: usize) -> u32 {
    u32::try_from(over).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LanguageRules;
    use crate::language::Language;
    use crate::rules::test_support::{with_context, with_rules};
    use crate::rules::Severity;

    fn modularity(language: Language, text: &str) -> CategoryResult {
        with_context(language, text, |ctx| evaluate(ctx))
    }

    fn long_function(body_lines: usize) -> String {
        let mut text = String::from("def long_task(items):\n");
        for n in 0..body_lines {
            text.push_str(&format!("    step_{} = items + {}\n", n, n));
        }
        text
    }

    #[test]
    fn test_small_functions_score_full() {
        let result = modularity(
            Language::Python,
            "def add(left, right):\n    return left + right\n",
        );
        assert_eq!(result.score, 20);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn test_long_function_penalty() {
        let result = modularity(Language::Python, &long_function(65));
        // 4 base + 2 for 25 lines over the limit
        assert_eq!(result.score, 14);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].line, Some(1));
        assert!(result.findings[0]
            .message
            .starts_with("Function 'long_task' is 65 lines long (limit 40)"));
        assert!(result.findings[0]
            .message
            .ends_with("Consider breaking it down into smaller functions."));
    }

    #[test]
    fn test_nesting_and_parameters_combine() {
        let text = "function route(a1, a2, a3, a4, a5, a6, a7) {\n  if (a1) {\n    if (a2) {\n      if (a3) {\n        if (a4) {\n          return a5;\n        }\n      }\n    }\n  }\n}\n";
        let result = modularity(Language::JavaScript, text);
        // nesting 5 (3) + two extra parameters (4)
        assert_eq!(result.score, 13);
        assert_eq!(result.findings.len(), 1);
        let message = &result.findings[0].message;
        assert!(message.contains("nests 5 levels deep"));
        assert!(message.contains("takes 7 parameters"));
    }

    #[test]
    fn test_complexity_over_limit() {
        let text = "def classify(order):\n    if order.rush and order.paid:\n        return 1\n    elif order.rush or order.vip:\n        return 2\n    for item in order.items:\n        while item.pending:\n            item.step()\n    try:\n        order.ship()\n    except ValueError:\n        return 3\n    labels = [tag for tag in order.tags if tag]\n    return labels if order.ok else None\n";
        let result = modularity(Language::Python, text);
        // if, and, elif, or, for, while, except, for, if, if
        assert_eq!(result.score, 15);
        assert_eq!(result.findings.len(), 1);
        assert!(result.findings[0]
            .message
            .contains("has cyclomatic complexity 11 (limit 10)"));
    }

    #[test]
    fn test_javascript_complexity_over_limit() {
        let text = "function route(input) {\n  if (input.a && input.b) {\n    return 1;\n  } else if (input.c || input.d) {\n    return 2;\n  }\n  for (const key of input.keys) {\n    while (key.next) {\n      key.step();\n    }\n  }\n  switch (input.kind) {\n    case 1:\n      return input.x ? 3 : 4;\n    case 2:\n      return input?.y ?? 5;\n  }\n  return 0;\n}\n";
        let result = modularity(Language::JavaScript, text);
        assert_eq!(result.score, 15);
        assert!(result.findings[0]
            .message
            .contains("has cyclomatic complexity 11 (limit 10)"));
    }

    #[test]
    fn test_huge_penalties_saturate() {
        let mut rules = LanguageRules::default();
        rules.modularity.nesting_penalty = u32::MAX;
        rules.modularity.parameter_penalty = u32::MAX;
        rules.modularity.length_penalty = u32::MAX;
        let text = "def walk(a1, a2, a3, a4, a5, a6, a7):\n    for node in a1:\n        if node:\n            while node:\n                if a2:\n                    if a3:\n                        if a4:\n                            node = None\n";
        let result = with_rules(Language::Python, text, &rules, |ctx| evaluate(ctx));
        assert_eq!(result.score, 0);
        assert_eq!(result.findings.len(), 1);
    }

    #[test]
    fn test_deeper_nesting_never_scores_higher() {
        let mut previous = Category::Modularity.max_points();
        for depth in 1..=9 {
            let mut text = String::from("def walk(tree):\n");
            for level in 1..depth {
                text.push_str(&"    ".repeat(level));
                text.push_str("if tree:\n");
            }
            text.push_str(&"    ".repeat(depth));
            text.push_str("return tree\n");
            let score = modularity(Language::Python, &text).score;
            assert!(score <= previous, "depth {} scored {} after {}", depth, score, previous);
            previous = score;
        }
        assert!(previous < Category::Modularity.max_points());
    }

    #[test]
    fn test_no_code_scores_zero() {
        let result = modularity(Language::Python, "# just a comment\n");
        assert_eq!(result.score, 0);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].severity, Severity::Info);
    }

    #[test]
    fn test_configured_limit() {
        let mut rules = LanguageRules::default();
        rules.modularity.max_function_lines = 100;
        let result = with_rules(Language::Python, &long_function(65), &rules, |ctx| evaluate(ctx));
        assert_eq!(result.score, 20);
    }
}
