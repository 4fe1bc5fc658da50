//! Best practices: language anti-patterns plus configured extra patterns.

use regex::{Regex, RegexBuilder};

use super::{Category, Finding, RuleContext, RuleError, RuleOutcome, ScoreCard};
use crate::analysis::LanguageAnalyzer;
use crate::source::Line;

/// Compiled size limit for user-supplied patterns.
const EXTRA_PATTERN_SIZE_LIMIT: usize = 1 << 20;

pub(crate) fn evaluate<A: LanguageAnalyzer + ?Sized>(ctx: &RuleContext<'_, A>) -> RuleOutcome {
    let rules = &ctx.rules.best_practices;
    let extras = compile_extra_patterns(ctx)?;
    let lines = ctx.facts.source.lines();
    let mut card = ScoreCard::new(Category::BestPractices);

    for pattern in ctx.analyzer.anti_patterns() {
        check(&mut card, lines, &pattern.regex, pattern.message, rules.penalty(pattern.tier));
    }
    for (regex, extra) in extras.iter().zip(&rules.extra_patterns) {
        check(&mut card, lines, regex, &extra.message, rules.penalty(extra.tier));
    }

    Ok(card.finish())
}

fn compile_extra_patterns<A: LanguageAnalyzer + ?Sized>(
    ctx: &RuleContext<'_, A>,
) -> Result<Vec<Regex>, RuleError> {
    ctx.rules
        .best_practices
        .extra_patterns
        .iter()
        .map(|extra| {
            RegexBuilder::new(&extra.pattern)
                .size_limit(EXTRA_PATTERN_SIZE_LIMIT)
                .build()
                .map_err(|e| RuleError::InvalidPattern {
                    category: Category::BestPractices,
                    pattern: extra.pattern.clone(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// Deduct `penalty` per match and record one finding listing the lines.
fn check(card: &mut ScoreCard, lines: &[Line], regex: &Regex, message: &str, penalty: u32) {
    let mut hits: Vec<usize> = Vec::new();
    let mut instances = 0u32;

    for line in lines.iter().filter(|l| l.is_code()) {
        let count = regex.find_iter(&line.code).count() as u32;
        if count > 0 {
            instances += count;
            hits.push(line.number);
        }
    }

    let Some(&first) = hits.first() else {
        return;
    };
    let message = if hits.len() == 1 {
        message.to_string()
    } else {
        let listed: Vec<String> = hits.iter().map(|n| n.to_string()).collect();
        format!("{} (lines {})", message, listed.join(", "))
    };
    card.deduct(penalty.saturating_mul(instances), Finding::warn(message).at(first));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExtraPattern, LanguageRules, Tier};
    use crate::language::Language;
    use crate::rules::test_support::{with_context, with_rules};
    use crate::rules::CategoryResult;

    fn practices(language: Language, text: &str) -> CategoryResult {
        with_context(language, text, |ctx| evaluate(ctx)).unwrap()
    }

    #[test]
    fn test_clean_python() {
        let result = practices(
            Language::Python,
            "import logging\n\nlog = logging.getLogger(__name__)\n\ndef run(value=None):\n    if value is None:\n        log.info(\"print(x) == None\")\n",
        );
        assert_eq!(result.score, 20);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn test_python_anti_patterns() {
        let text = "from os import *\n\ndef load(items=[]):\n    global cache\n    try:\n        return eval(items)\n    except:\n        print(items)\n";
        let result = practices(Language::Python, text);
        // bare except 3, mutable default 3, global 3, wildcard 3, eval 5, print 2
        assert_eq!(result.score, 1);
        assert_eq!(result.findings.len(), 6);
    }

    #[test]
    fn test_comparison_in_one_line_body_is_not_a_default() {
        let result = practices(
            Language::Python,
            "def is_empty(items): return items == []\n\ndef reset(key=None): cache = {}\n",
        );
        assert_eq!(result.score, 20);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn test_javascript_anti_patterns() {
        let text = "var count = 0;\nif (count == 1) {\n  console.log(count);\n}\nif (count === 2) {\n  debugger;\n}\nel.innerHTML = html;\nwindow.state = {};\n";
        let result = practices(Language::JavaScript, text);
        // var 3, loose 3, console 2, debugger 2, innerHTML 3, window 3
        assert_eq!(result.score, 4);
        let rendered: Vec<String> = result.findings.iter().map(|f| f.render()).collect();
        assert!(rendered.iter().any(|r| r.starts_with("Line 2: Loose equality")));
        assert!(rendered.iter().any(|r| r.starts_with("Line 8: Direct DOM") && r.ends_with("(lines 8, 9)")));
    }

    #[test]
    fn test_instances_accumulate_and_floor() {
        let text: String = (0..6).map(|n| format!("eval(step{})\n", n)).collect();
        let result = practices(Language::Python, &text);
        assert_eq!(result.score, 0);
        assert_eq!(result.findings.len(), 1);
        assert!(result.findings[0].message.ends_with("(lines 1, 2, 3, 4, 5, 6)"));
    }

    #[test]
    fn test_patterns_ignore_strings_and_comments() {
        let result = practices(
            Language::JavaScript,
            "// console.log(debug)\nconst msg = 'var x == 1';\n",
        );
        assert_eq!(result.score, 20);
    }

    #[test]
    fn test_extra_pattern() {
        let mut rules = LanguageRules::default();
        rules.best_practices.extra_patterns.push(ExtraPattern {
            pattern: r"\balert\s*\(".to_string(),
            message: "Avoid alert()".to_string(),
            tier: Tier::Severe,
        });
        let result = with_rules(Language::JavaScript, "alert(message);\n", &rules, |ctx| evaluate(ctx))
            .unwrap();
        assert_eq!(result.score, 15);
        assert_eq!(result.findings[0].message, "Avoid alert()");
    }

    #[test]
    fn test_invalid_extra_pattern_is_rule_error() {
        let mut rules = LanguageRules::default();
        rules.best_practices.extra_patterns.push(ExtraPattern {
            pattern: "(unclosed".to_string(),
            message: "broken".to_string(),
            tier: Tier::Minor,
        });
        let err = with_rules(Language::Python, "value = 1\n", &rules, |ctx| evaluate(ctx))
            .unwrap_err();
        assert_eq!(err.code(), "INTERNAL_RULE_ERROR");
        assert_eq!(err.category(), Category::BestPractices);
    }
}
