//! Logical lines of a source file.

use std::collections::HashMap;

use super::indent::{indentation_of, IndentKind, Indentation};
use super::scanner::Scanner;
use crate::language::Language;

/// Classification of a logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Code,
    Comment,
    /// Python docstrings and JSDoc blocks.
    DocComment,
    Blank,
}

impl LineKind {
    pub fn is_comment(&self) -> bool {
        matches!(self, LineKind::Comment | LineKind::DocComment)
    }
}

/// One logical line with its stripped code view.
#[derive(Debug, Clone)]
pub struct Line {
    /// 1-based line number.
    pub number: usize,
    /// Original text without the line terminator.
    pub raw: String,
    pub kind: LineKind,
    /// Text with comments removed and string contents blanked.
    pub code: String,
    /// Contents of quoted string literals on this line.
    pub strings: Vec<String>,
    pub indent: Indentation,
    /// The line continues a statement from an earlier line (open bracket,
    /// backslash continuation, or multi-line literal).
    pub continuation: bool,
}

impl Line {
    pub fn is_code(&self) -> bool {
        self.kind == LineKind::Code
    }

    /// A code line that starts a new statement.
    pub fn is_statement_start(&self) -> bool {
        self.is_code() && !self.continuation && !self.code.trim().is_empty()
    }
}

/// An indentation sample used to judge indent width consistency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentSample {
    pub line: usize,
    pub width: usize,
    /// Increase over the previous sampled line, 0 when not an increase.
    pub step: usize,
}

/// A source file split into classified logical lines.
#[derive(Debug, Clone)]
pub struct SourceFile {
    language: Language,
    lines: Vec<Line>,
}

impl SourceFile {
    /// Split and classify `text`. Never fails; unconventional input simply
    /// produces unconventional lines.
    pub fn parse(text: &str, language: Language) -> Self {
        let mut scanner = Scanner::new(language);
        let mut lines = Vec::new();
        let mut depth = 0usize;
        let mut backslash = false;

        for (idx, raw) in text.lines().enumerate() {
            let scanned = scanner.scan_line(raw);
            let continuation = depth > 0 || backslash || scanned.in_literal;

            depth = bracket_depth_after(depth, &scanned.code, language);
            backslash = language == Language::Python
                && scanned.kind == LineKind::Code
                && scanned.code.trim_end().ends_with('\\');

            lines.push(Line {
                number: idx + 1,
                raw: raw.to_string(),
                kind: scanned.kind,
                code: scanned.code,
                strings: scanned.strings,
                indent: indentation_of(raw),
                continuation,
            });
        }

        Self { language, lines }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Get a line by its 1-based number.
    pub fn line(&self, number: usize) -> Option<&Line> {
        number.checked_sub(1).and_then(|idx| self.lines.get(idx))
    }

    pub fn code_lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter().filter(|l| l.is_code())
    }

    pub fn code_line_count(&self) -> usize {
        self.code_lines().count()
    }

    pub fn comment_line_count(&self) -> usize {
        self.lines.iter().filter(|l| l.kind.is_comment()).count()
    }

    pub fn blank_line_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.kind == LineKind::Blank)
            .count()
    }

    pub fn has_code(&self) -> bool {
        self.lines.iter().any(|l| l.is_code())
    }

    /// True when the file holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.kind == LineKind::Blank)
    }

    /// Space-indented statement lines with the indentation step they take.
    pub fn indent_samples(&self) -> Vec<IndentSample> {
        let mut samples = Vec::new();
        let mut previous: Option<usize> = None;

        for line in self.lines.iter().filter(|l| l.is_statement_start()) {
            if !matches!(line.indent.kind, IndentKind::None | IndentKind::Spaces) {
                continue;
            }
            let width = line.indent.spaces;
            let step = match previous {
                Some(prev) if width > prev => width - prev,
                _ => 0,
            };
            samples.push(IndentSample {
                line: line.number,
                width,
                step,
            });
            previous = Some(width);
        }

        samples
    }

    /// The file's dominant indentation step, falling back to the language
    /// default when the file never indents with spaces.
    pub fn indent_unit(&self) -> usize {
        dominant_step(&self.indent_samples()).unwrap_or_else(|| self.language.default_indent_width())
    }
}

/// Most frequent positive indentation step; ties go to the smaller step.
pub(crate) fn dominant_step(samples: &[IndentSample]) -> Option<usize> {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for sample in samples.iter().filter(|s| s.step > 0) {
        *counts.entry(sample.step).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(step, _)| step)
}

fn bracket_depth_after(depth: usize, code: &str, language: Language) -> usize {
    let (open, close): (&str, &str) = match language {
        Language::Python => ("([{", ")]}"),
        // Braces delimit blocks in JavaScript, so they never continue a statement.
        Language::JavaScript => ("([", ")]"),
    };

    code.chars().fold(depth, |d, c| {
        if open.contains(c) {
            d + 1
        } else if close.contains(c) {
            d.saturating_sub(1)
        } else {
            d
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_counts() {
        let text = "# header\n\nimport os\n\ndef main():\n    \"\"\"Entry.\"\"\"\n    return os.getcwd()\n";
        let source = SourceFile::parse(text, Language::Python);
        assert_eq!(source.lines().len(), 7);
        assert_eq!(source.code_line_count(), 3);
        assert_eq!(source.comment_line_count(), 2);
        assert_eq!(source.blank_line_count(), 2);
        assert_eq!(
            source.code_line_count() + source.comment_line_count() + source.blank_line_count(),
            source.lines().len()
        );
    }

    #[test]
    fn test_line_numbers_are_one_based() {
        let source = SourceFile::parse("a = 1\nb = 2\n", Language::Python);
        assert_eq!(source.line(1).map(|l| l.raw.as_str()), Some("a = 1"));
        assert_eq!(source.line(2).map(|l| l.number), Some(2));
        assert!(source.line(0).is_none());
        assert!(source.line(3).is_none());
    }

    #[test]
    fn test_python_continuation_lines() {
        let text = "total = compute(\n    first,\n    second,\n)\nvalue = 1 + \\\n    2\nnext_value = 3\n";
        let source = SourceFile::parse(text, Language::Python);
        let flags: Vec<bool> = source.lines().iter().map(|l| l.continuation).collect();
        assert_eq!(flags, vec![false, true, true, true, false, true, false]);
    }

    #[test]
    fn test_javascript_braces_do_not_continue() {
        let text = "function run() {\n  const items = [\n    1,\n  ];\n  return items;\n}\n";
        let source = SourceFile::parse(text, Language::JavaScript);
        let flags: Vec<bool> = source.lines().iter().map(|l| l.continuation).collect();
        assert_eq!(flags, vec![false, false, true, true, false, false]);
    }

    #[test]
    fn test_blank_file() {
        let source = SourceFile::parse("   \n\t\n\n", Language::JavaScript);
        assert!(source.is_blank());
        assert!(!source.has_code());
        assert_eq!(source.indent_unit(), 2);
    }

    #[test]
    fn test_indent_unit() {
        let text = "def run():\n  if True:\n    return 1\n  return 2\n";
        let source = SourceFile::parse(text, Language::Python);
        assert_eq!(source.indent_unit(), 2);
    }
}
