//! Formatting: indentation, line length, trailing whitespace and the
//! language's spacing convention.
//!
//! Each violation type costs a flat penalty once, however often it occurs.

use super::{Category, CategoryResult, Finding, RuleContext, ScoreCard};
use crate::analysis::LanguageAnalyzer;
use crate::source::{dominant_step, IndentKind, Line, LineKind};

pub(crate) fn evaluate<A: LanguageAnalyzer + ?Sized>(ctx: &RuleContext<'_, A>) -> CategoryResult {
    let source = &ctx.facts.source;
    if source.is_blank() {
        return CategoryResult::full(Category::Formatting);
    }

    let rules = &ctx.rules.formatting;
    let lines = source.lines();
    let mut card = ScoreCard::new(Category::Formatting);

    if let Some(line) = first_mixed_indent(lines) {
        card.deduct(
            rules.mixed_indent_penalty,
            Finding::warn("Mixed indentation: tabs and spaces are both used").at(line),
        );
    }

    let samples = source.indent_samples();
    if let Some(unit) = dominant_step(&samples) {
        let offending = samples
            .iter()
            .find(|s| s.width % unit != 0 || (s.step > 0 && s.step % unit != 0));
        if let Some(sample) = offending {
            card.deduct(
                rules.inconsistent_indent_penalty,
                Finding::warn(format!(
                    "Inconsistent indentation: expected multiples of {} spaces, found {}",
                    unit, sample.width
                ))
                .at(sample.line),
            );
        }
    }

    let long: Vec<&Line> = lines
        .iter()
        .filter(|l| l.raw.chars().count() > rules.max_line_length)
        .collect();
    if let Some(first) = long.first() {
        card.deduct(
            rules.long_line_penalty,
            Finding::warn(format!(
                "{} {} longer than {} characters",
                long.len(),
                plural(long.len(), "line is", "lines are"),
                rules.max_line_length
            ))
            .at(first.number),
        );
    }

    let trailing: Vec<&Line> = lines
        .iter()
        .filter(|l| l.raw.ends_with(|c: char| c == ' ' || c == '\t'))
        .collect();
    if let Some(first) = trailing.first() {
        card.deduct(
            rules.trailing_whitespace_penalty,
            Finding::warn(format!(
                "Trailing whitespace on {} {}",
                trailing.len(),
                plural(trailing.len(), "line", "lines")
            ))
            .at(first.number),
        );
    }

    let style = ctx.analyzer.style_check();
    let styled: Vec<&Line> = lines
        .iter()
        .filter(|l| l.kind == LineKind::Code && style.regex.is_match(&l.code))
        .collect();
    if let Some(first) = styled.first() {
        let message = if styled.len() > 1 {
            format!("{} ({} lines)", style.message, styled.len())
        } else {
            style.message.to_string()
        };
        card.deduct(rules.style_penalty, Finding::warn(message).at(first.number));
    }

    card.finish()
}

/// First line whose indentation mixes tabs and spaces, either within the
/// line or against the style established by earlier lines.
fn first_mixed_indent(lines: &[Line]) -> Option<usize> {
    let mut established: Option<IndentKind> = None;

    for line in lines {
        if line.kind == LineKind::Blank || line.continuation {
            continue;
        }
        match line.indent.kind {
            IndentKind::Mixed => return Some(line.number),
            IndentKind::Tabs | IndentKind::Spaces => match established {
                Some(kind) if kind != line.indent.kind => return Some(line.number),
                Some(_) => {}
                None => established = Some(line.indent.kind),
            },
            IndentKind::None => {}
        }
    }
    None
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}
