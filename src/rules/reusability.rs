//! Reusability: duplicated blocks, repeated literals and code that is not
//! split into functions.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use super::{nothing_to_assess, Category, CategoryResult, Finding, RuleContext, ScoreCard};
use crate::analysis::LanguageAnalyzer;
use crate::config::ReusabilityRules;
use crate::source::Line;

/// Words that carry no logic on their own.
const TRIVIAL_WORDS: &[&str] = &[
    "else", "elif", "try", "finally", "pass", "break", "continue", "return", "except",
    "default", "do", "end", "true", "false", "null", "none", "undefined", "this", "self",
];

lazy_static! {
    static ref NUMBER_RE: Regex = Regex::new(r"(?:^|[^\w.$])(-?\d+(?:\.\d+)?)\b").unwrap();
    static ref WORD_RE: Regex = Regex::new(r"[A-Za-z_$][\w$]*").unwrap();
}

pub(crate) fn evaluate<A: LanguageAnalyzer + ?Sized>(ctx: &RuleContext<'_, A>) -> CategoryResult {
    let source = &ctx.facts.source;
    if !source.has_code() {
        return nothing_to_assess(Category::Reusability);
    }

    let rules = &ctx.rules.reusability;
    let mut card = ScoreCard::new(Category::Reusability);
    let code_lines: Vec<&Line> = source.code_lines().collect();

    for (line, length) in duplicate_runs(&code_lines, rules.duplicate_window.max(1)) {
        card.deduct(
            rules.duplicate_penalty,
            Finding::warn(format!(
                "Duplicated block of {} lines; extract it into a shared function",
                length
            ))
            .at(line),
        );
    }

    let literals = repeated_literals(&code_lines, rules, |code| {
        ctx.analyzer.is_constant_definition(code) || ctx.analyzer.is_import_line(code)
    });
    for literal in literals {
        card.deduct(
            rules.literal_penalty,
            Finding::warn(format!(
                "Literal {} appears {} times; extract it into a named constant",
                literal.text, literal.count
            ))
            .at(literal.first_line),
        );
    }

    let function_count = ctx.facts.functions.len();
    if code_lines.len() >= rules.monolith_min_lines && function_count < rules.monolith_min_functions
    {
        card.deduct(
            rules.monolith_penalty,
            Finding::warn(format!(
                "File has {} code lines but only {} {}; split the logic into reusable functions",
                code_lines.len(),
                function_count,
                if function_count == 1 { "function" } else { "functions" }
            )),
        );
    }

    card.finish()
}

fn normalize(code: &str) -> String {
    code.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lines too small or too generic to count towards duplication.
fn is_trivial(normalized: &str) -> bool {
    if normalized.chars().filter(|c| c.is_alphanumeric()).count() <= 4 {
        return true;
    }
    let mut words = WORD_RE.find_iter(normalized).peekable();
    words.peek().is_some()
        && words.all(|w| TRIVIAL_WORDS.contains(&w.as_str().to_ascii_lowercase().as_str()))
        && !normalized.chars().any(|c| c.is_ascii_digit())
}

/// Start line and length of every repeated run of `window` or more lines.
///
/// A run counts once, extended as far as it keeps matching an earlier,
/// non-overlapping occurrence.
fn duplicate_runs(code_lines: &[&Line], window: usize) -> Vec<(usize, usize)> {
    let seq: Vec<(String, usize)> = code_lines
        .iter()
        .map(|l| (normalize(&l.code), l.number))
        .filter(|(text, _)| !is_trivial(text))
        .collect();

    let mut seen: HashMap<Vec<&str>, usize> = HashMap::new();
    let mut runs = Vec::new();
    let mut i = 0;

    while i + window <= seq.len() {
        let key: Vec<&str> = seq[i..i + window].iter().map(|(t, _)| t.as_str()).collect();
        match seen.get(&key) {
            Some(&j) if j + window <= i => {
                let mut length = window;
                while i + length < seq.len() && j + length < i && seq[j + length].0 == seq[i + length].0 {
                    length += 1;
                }
                runs.push((seq[i].1, length));
                i += length;
            }
            Some(_) => i += 1,
            None => {
                seen.insert(key, i);
                i += 1;
            }
        }
    }

    runs
}

struct RepeatedLiteral {
    text: String,
    count: usize,
    first_line: usize,
}

/// Literals repeated at least the configured number of times, in order of
/// first appearance.
fn repeated_literals(
    code_lines: &[&Line],
    rules: &ReusabilityRules,
    skip_line: impl Fn(&str) -> bool,
) -> Vec<RepeatedLiteral> {
    let mut order: Vec<RepeatedLiteral> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let mut record = |text: String, line: usize| match index.get(&text) {
        Some(&at) => order[at].count += 1,
        None => {
            index.insert(text.clone(), order.len());
            order.push(RepeatedLiteral {
                text,
                count: 1,
                first_line: line,
            });
        }
    };

    for line in code_lines {
        if skip_line(&line.code) {
            continue;
        }
        for caps in NUMBER_RE.captures_iter(&line.code) {
            let number = &caps[1];
            if !rules.allowed_numbers.iter().any(|n| n == number) {
                record(number.to_string(), line.number);
            }
        }
        for string in &line.strings {
            if string.chars().count() >= rules.min_string_length {
                record(format!("\"{}\"", string), line.number);
            }
        }
    }

    order
        .into_iter()
        .filter(|l| l.count >= rules.literal_repeat_threshold)
        .collect()
}
