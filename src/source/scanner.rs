//! Per-line comment and string-literal stripping.
//!
//! The scanner walks a file line by line, carrying multi-line state
//! (triple-quoted strings, block comments, template literals) between lines.
//! For every line it reports the code that remains once comments are removed
//! and string contents are blanked, so that pattern rules never fire on text
//! inside a literal or a comment.

use super::LineKind;
use crate::language::Language;

/// Result of scanning one line.
pub(crate) struct ScannedLine {
    pub kind: LineKind,
    pub code: String,
    pub strings: Vec<String>,
    /// The line began inside a literal or comment opened on an earlier line.
    pub in_literal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    TripleQuote { quote: char, doc: bool },
    BlockComment { doc: bool },
    Template,
}

/// Accumulates the pieces of a line while it is being scanned.
struct LineBuilder {
    code: String,
    strings: Vec<String>,
    comment: bool,
    doc: bool,
    in_literal: bool,
    in_code_literal: bool,
}

impl LineBuilder {
    fn new(state: State) -> Self {
        Self {
            code: String::new(),
            strings: Vec::new(),
            comment: false,
            doc: false,
            in_literal: state != State::Normal,
            in_code_literal: matches!(
                state,
                State::Template | State::TripleQuote { doc: false, .. }
            ),
        }
    }

    fn push_literal(&mut self, quote: char, content: String) {
        self.strings.push(content);
        self.code.push(quote);
        self.code.push(quote);
    }

    fn finish(self, raw: &str) -> ScannedLine {
        let residue = self.code.trim();
        let comment_only = residue.is_empty() || (residue == "{}" && self.comment);

        let kind = if !comment_only {
            LineKind::Code
        } else if self.doc {
            LineKind::DocComment
        } else if self.comment {
            LineKind::Comment
        } else if self.in_code_literal || !raw.trim().is_empty() {
            LineKind::Code
        } else {
            LineKind::Blank
        };

        ScannedLine {
            kind,
            code: self.code,
            strings: self.strings,
            in_literal: self.in_literal,
        }
    }
}

/// Stateful line scanner for one file.
pub(crate) struct Scanner {
    language: Language,
    state: State,
}

impl Scanner {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            state: State::Normal,
        }
    }

    pub fn scan_line(&mut self, raw: &str) -> ScannedLine {
        match self.language {
            Language::Python => self.scan_python(raw),
            Language::JavaScript => self.scan_javascript(raw),
        }
    }

    fn scan_python(&mut self, raw: &str) -> ScannedLine {
        let chars: Vec<char> = raw.chars().collect();
        let mut line = LineBuilder::new(self.state);
        let mut i = 0;

        if let State::TripleQuote { quote, doc } = self.state {
            if doc {
                line.doc = true;
            }
            match find_triple(&chars, 0, quote) {
                Some(end) => {
                    i = end + 3;
                    self.state = State::Normal;
                }
                None => return line.finish(raw),
            }
        }

        while i < chars.len() {
            let c = chars[i];
            match c {
                '#' => {
                    line.comment = true;
                    break;
                }
                '\'' | '"' if is_triple(&chars, i, c) => {
                    // A triple-quoted string that opens a statement is a docstring.
                    let prefix_len = line.code.trim_start().len();
                    let doc = prefix_len <= 2
                        && line
                            .code
                            .trim_start()
                            .chars()
                            .all(|p| matches!(p, 'r' | 'R' | 'u' | 'U' | 'b' | 'B' | 'f' | 'F'));
                    if doc {
                        let keep = line.code.len() - prefix_len;
                        line.code.truncate(keep);
                        line.doc = true;
                    } else {
                        line.code.push(c);
                        line.code.push(c);
                    }

                    match find_triple(&chars, i + 3, c) {
                        Some(end) => i = end + 3,
                        None => {
                            self.state = State::TripleQuote { quote: c, doc };
                            break;
                        }
                    }
                }
                '\'' | '"' => {
                    let close = find_closing_quote(&chars, i + 1, c).unwrap_or(chars.len());
                    line.push_literal(c, chars[i + 1..close].iter().collect());
                    i = close + 1;
                }
                _ => {
                    line.code.push(c);
                    i += 1;
                }
            }
        }

        line.finish(raw)
    }

    fn scan_javascript(&mut self, raw: &str) -> ScannedLine {
        let chars: Vec<char> = raw.chars().collect();
        let mut line = LineBuilder::new(self.state);
        let mut i = 0;

        match self.state {
            State::BlockComment { doc } => {
                line.comment = true;
                line.doc = doc;
                match find_comment_end(&chars, 0) {
                    Some(end) => {
                        i = end + 2;
                        self.state = State::Normal;
                    }
                    None => return line.finish(raw),
                }
            }
            State::Template => match find_closing_quote(&chars, 0, '`') {
                Some(end) => {
                    line.code.push('`');
                    i = end + 1;
                    self.state = State::Normal;
                }
                None => return line.finish(raw),
            },
            _ => {}
        }

        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();
            match c {
                '/' if next == Some('/') => {
                    line.comment = true;
                    break;
                }
                '/' if next == Some('*') => {
                    let doc = chars.get(i + 2) == Some(&'*') && chars.get(i + 3) != Some(&'/');
                    line.comment = true;
                    line.doc |= doc;
                    match find_comment_end(&chars, i + 2) {
                        Some(end) => i = end + 2,
                        None => {
                            self.state = State::BlockComment { doc };
                            break;
                        }
                    }
                }
                '/' if regex_allowed(&line.code) => match find_regex_end(&chars, i + 1) {
                    Some(end) => {
                        line.code.push_str("/ /");
                        i = end + 1;
                    }
                    None => {
                        line.code.push(c);
                        i += 1;
                    }
                },
                '\'' | '"' => {
                    // Quoted strings never continue past the end of the line,
                    // which keeps apostrophes in JSX text from leaking.
                    let close = find_closing_quote(&chars, i + 1, c).unwrap_or(chars.len());
                    line.push_literal(c, chars[i + 1..close].iter().collect());
                    i = close + 1;
                }
                '`' => match find_closing_quote(&chars, i + 1, '`') {
                    Some(end) => {
                        line.code.push_str("``");
                        i = end + 1;
                    }
                    None => {
                        line.code.push('`');
                        self.state = State::Template;
                        break;
                    }
                },
                _ => {
                    line.code.push(c);
                    i += 1;
                }
            }
        }

        line.finish(raw)
    }
}

fn is_triple(chars: &[char], at: usize, quote: char) -> bool {
    chars.len() >= at + 3 && chars[at..at + 3].iter().all(|&c| c == quote)
}

fn find_triple(chars: &[char], from: usize, quote: char) -> Option<usize> {
    let mut i = from;
    while i < chars.len() {
        if chars[i] == '\\' {
            i += 2;
            continue;
        }
        if is_triple(chars, i, quote) {
            return Some(i);
        }
        i += 1;
    }
    None
}

fn find_closing_quote(chars: &[char], from: usize, quote: char) -> Option<usize> {
    let mut i = from;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return Some(i),
            _ => i += 1,
        }
    }
    None
}

fn find_comment_end(chars: &[char], from: usize) -> Option<usize> {
    (from..chars.len().saturating_sub(1)).find(|&i| chars[i] == '*' && chars[i + 1] == '/')
}

fn find_regex_end(chars: &[char], from: usize) -> Option<usize> {
    let mut in_class = false;
    let mut i = from;
    while i < chars.len() {
        match chars[i] {
            '\\' => {
                i += 2;
                continue;
            }
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// A `/` starts a regex literal when it cannot be a division operator.
fn regex_allowed(code: &str) -> bool {
    let trimmed = code.trim_end();
    match trimmed.chars().last() {
        None => true,
        Some(c) if "(,=:[!&|?{};+-*%~^".contains(c) => true,
        Some(_) => ["return", "typeof", "case"]
            .iter()
            .any(|kw| trimmed.ends_with(kw)),
    }
}
