//! Python language analyzer.
//!
//! Facts are read from statement-start lines: `def`, `class`, assignments,
//! `for` targets and imports. Scopes follow indentation.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::signature::{parenthesized, split_parameters};
use crate::analysis::{
    AntiPattern, FileFacts, FunctionFacts, Identifier, IdentifierKind, LanguageAnalyzer,
    PublicSymbol, StyleCheck, SymbolKind,
};
use crate::config::Tier;
use crate::language::Language;
use crate::source::{Line, LineKind, SourceFile};

/// Columns a tab advances when comparing indentation.
const TAB_WIDTH: usize = 4;

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

lazy_static! {
    static ref DEF_RE: Regex = Regex::new(r"^\s*(?:async\s+)?def\s+([A-Za-z_]\w*)\s*\(").unwrap();
    static ref CLASS_RE: Regex = Regex::new(r"^\s*class\s+([A-Za-z_]\w*)").unwrap();
    // name = ..., a, b = ..., name: Type = ...
    static ref ASSIGN_RE: Regex = Regex::new(
        r"^\s*([A-Za-z_]\w*(?:\s*,\s*[A-Za-z_]\w*)*)\s*(?::[^=]*)?=(?:[^=]|$)"
    ).unwrap();
    static ref FOR_RE: Regex = Regex::new(r"^\s*(?:async\s+)?for\s+(.+?)\s+in\b").unwrap();
    static ref IMPORT_RE: Regex = Regex::new(r"^\s*(?:import\s|from\s+\S+\s+import\b)").unwrap();
    static ref CONSTANT_RE: Regex = Regex::new(
        r"^\s*_?[A-Z][A-Z0-9_]*\s*(?::[^=]*)?=(?:[^=]|$)"
    ).unwrap();
    static ref WORD_RE: Regex = Regex::new(r"[A-Za-z_]\w*").unwrap();
    // Branches, loops, handlers, boolean operators and match arms.
    static ref DECISION_RE: Regex = Regex::new(
        r"\b(?:if|elif|for|while|except|and|or)\b|^\s*case\s"
    ).unwrap();

    static ref SNAKE_CASE: Regex = Regex::new(r"^_{0,2}[a-z][a-z0-9_]*$").unwrap();
    static ref DUNDER: Regex = Regex::new(r"^__[a-z][a-z0-9_]*__$").unwrap();
    static ref PASCAL_CASE: Regex = Regex::new(r"^_?[A-Z][a-zA-Z0-9]*$").unwrap();
    static ref UPPER_SNAKE: Regex = Regex::new(r"^_?[A-Z][A-Z0-9_]*$").unwrap();

    static ref ANTI_PATTERNS: Vec<AntiPattern> = vec![
        AntiPattern {
            name: "bare-except",
            message: "Bare 'except:' catches everything, including KeyboardInterrupt; catch specific exceptions",
            tier: Tier::Moderate,
            regex: Regex::new(r"^\s*except\s*:").unwrap(),
        },
        AntiPattern {
            name: "mutable-default",
            message: "Mutable default argument is shared between calls; default to None instead",
            tier: Tier::Moderate,
            regex: Regex::new(
                r"^\s*(?:async\s+)?def\s+\w+\s*\((?:[^()]|\([^()]*\))*?=\s*(?:\[|\{|list\(\)|dict\(\)|set\(\))"
            ).unwrap(),
        },
        AntiPattern {
            name: "global",
            message: "Avoid 'global' statements; pass values explicitly",
            tier: Tier::Moderate,
            regex: Regex::new(r"^\s*global\s+\w").unwrap(),
        },
        AntiPattern {
            name: "wildcard-import",
            message: "Wildcard import pollutes the namespace; import names explicitly",
            tier: Tier::Moderate,
            regex: Regex::new(r"^\s*from\s+\S+\s+import\s+\*").unwrap(),
        },
        AntiPattern {
            name: "eval",
            message: "eval()/exec() executes arbitrary code; avoid it",
            tier: Tier::Severe,
            regex: Regex::new(r"(?:^|[^\w.])(?:eval|exec)\s*\(").unwrap(),
        },
        AntiPattern {
            name: "print",
            message: "print() left in code; use the logging module",
            tier: Tier::Minor,
            regex: Regex::new(r"(?:^|[^\w.])print\s*\(").unwrap(),
        },
        AntiPattern {
            name: "none-comparison",
            message: "Compare with None using 'is' / 'is not'",
            tier: Tier::Minor,
            regex: Regex::new(r"(?:==|!=)\s*None\b").unwrap(),
        },
    ];

    static ref STYLE_CHECK: StyleCheck = StyleCheck {
        message: "Statements separated by ';'; put one statement per line",
        regex: Regex::new(r";").unwrap(),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Class,
    Function,
}

pub struct PythonAnalyzer;

impl PythonAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for PythonAnalyzer {
    fn language(&self) -> Language {
        Language::Python
    }

    fn extract_facts(&self, source: SourceFile) -> FileFacts {
        let unit = source.indent_unit();
        let mut identifiers = Vec::new();
        let mut functions = Vec::new();
        let mut public_symbols = Vec::new();

        if source.has_code() {
            public_symbols.push(PublicSymbol {
                name: "module".to_string(),
                kind: SymbolKind::Module,
                line: 1,
                documented: module_documented(source.lines()),
            });
        }

        let lines = source.lines();
        let mut scopes: Vec<(usize, Scope)> = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if !line.is_statement_start() {
                continue;
            }
            let col = line.indent.columns(TAB_WIDTH);
            while scopes.last().map_or(false, |(c, _)| *c >= col) {
                scopes.pop();
            }
            let in_function = scopes.iter().any(|(_, s)| *s == Scope::Function);
            let code = line.code.as_str();

            if let Some(caps) = DEF_RE.captures(code) {
                let name = caps[1].to_string();
                let open = caps.get(0).map(|m| m.end() - 1).unwrap_or(0);
                let function = function_facts(lines, idx, open, &name, unit);
                let documented = starts_with_docstring(lines, function_body_start(lines, idx, open));

                identifiers.push(Identifier::new(&name, IdentifierKind::Function, line.number));
                if !in_function && !name.starts_with('_') {
                    public_symbols.push(PublicSymbol {
                        name: name.clone(),
                        kind: SymbolKind::Function,
                        line: line.number,
                        documented,
                    });
                }
                functions.push(function);
                scopes.push((col, Scope::Function));
            } else if let Some(caps) = CLASS_RE.captures(code) {
                let name = caps[1].to_string();
                identifiers.push(Identifier::new(&name, IdentifierKind::Class, line.number));
                if !in_function && !name.starts_with('_') {
                    public_symbols.push(PublicSymbol {
                        name,
                        kind: SymbolKind::Class,
                        line: line.number,
                        documented: starts_with_docstring(lines, idx + 1),
                    });
                }
                scopes.push((col, Scope::Class));
            } else if let Some(caps) = FOR_RE.captures(code) {
                for target in WORD_RE.find_iter(&caps[1]) {
                    if !KEYWORDS.contains(&target.as_str()) {
                        identifiers.push(Identifier::new(
                            target.as_str(),
                            IdentifierKind::LoopVariable,
                            line.number,
                        ));
                    }
                }
            } else if IMPORT_RE.is_match(code) {
                for name in imported_names(code) {
                    identifiers.push(Identifier::new(name, IdentifierKind::Import, line.number));
                }
            } else if let Some(caps) = ASSIGN_RE.captures(code) {
                for target in caps[1].split(',').map(str::trim) {
                    if target.is_empty() || KEYWORDS.contains(&target) {
                        continue;
                    }
                    let kind = if UPPER_SNAKE.is_match(target) {
                        IdentifierKind::Constant
                    } else {
                        IdentifierKind::Variable
                    };
                    identifiers.push(Identifier::new(target, kind, line.number));
                }
            }
        }

        let mut facts = FileFacts::new(source);
        for identifier in identifiers {
            facts.add_identifier(&identifier.name, identifier.kind, identifier.line);
        }
        facts.functions = functions;
        facts.public_symbols = public_symbols;
        facts
    }

    fn naming_convention(&self, identifier: &Identifier) -> Option<&'static str> {
        let name = identifier.name.as_str();
        match identifier.kind {
            IdentifierKind::Function => {
                (!SNAKE_CASE.is_match(name) && !DUNDER.is_match(name)).then_some("snake_case")
            }
            IdentifierKind::Variable | IdentifierKind::LoopVariable => {
                (!SNAKE_CASE.is_match(name)).then_some("snake_case")
            }
            IdentifierKind::Class => (!PASCAL_CASE.is_match(name)).then_some("PascalCase"),
            IdentifierKind::Constant => (!UPPER_SNAKE.is_match(name)).then_some("UPPER_SNAKE_CASE"),
            IdentifierKind::Import => None,
        }
    }

    fn anti_patterns(&self) -> &'static [AntiPattern] {
        &ANTI_PATTERNS
    }

    fn style_check(&self) -> &'static StyleCheck {
        &STYLE_CHECK
    }

    fn is_constant_definition(&self, code: &str) -> bool {
        CONSTANT_RE.is_match(code)
    }

    fn is_import_line(&self, code: &str) -> bool {
        IMPORT_RE.is_match(code)
    }

    fn doc_comment_name(&self) -> &'static str {
        "docstring"
    }
}

/// Index of the first line after a `def` signature.
fn function_body_start(lines: &[Line], idx: usize, open: usize) -> usize {
    parenthesized(lines, idx, open).close_line + 1
}

fn function_facts(lines: &[Line], idx: usize, open: usize, name: &str, unit: usize) -> FunctionFacts {
    let def_line = &lines[idx];
    let def_col = def_line.indent.columns(TAB_WIDTH);
    let signature = parenthesized(lines, idx, open);
    let body_start = signature.close_line + 1;

    let mut end = signature.close_line;
    let mut body_lines = 0;
    let mut base: Option<usize> = None;
    let mut max_nesting = 0;
    let mut complexity = 1;

    for (li, line) in lines.iter().enumerate().skip(body_start) {
        if line.is_statement_start() && line.indent.columns(TAB_WIDTH) <= def_col {
            break;
        }
        if line.kind == LineKind::Blank {
            continue;
        }
        end = li;
        if !line.is_code() {
            continue;
        }
        body_lines += 1;
        complexity += DECISION_RE.find_iter(&line.code).count();
        if line.is_statement_start() {
            let col = line.indent.columns(TAB_WIDTH);
            let base_col = *base.get_or_insert(col);
            let level = col.saturating_sub(base_col) / unit.max(1) + 1;
            max_nesting = max_nesting.max(level);
        }
    }

    FunctionFacts {
        name: name.to_string(),
        line: def_line.number,
        end_line: lines[end].number,
        body_lines,
        parameters: split_parameters(&signature.inner),
        max_nesting,
        complexity,
    }
}

/// Whether the first non-blank line at or after `idx` is a docstring.
fn starts_with_docstring(lines: &[Line], idx: usize) -> bool {
    lines
        .iter()
        .skip(idx)
        .find(|l| l.kind != LineKind::Blank)
        .map_or(false, |l| l.kind == LineKind::DocComment)
}

fn module_documented(lines: &[Line]) -> bool {
    lines
        .iter()
        .find(|l| !matches!(l.kind, LineKind::Blank | LineKind::Comment))
        .map_or(false, |l| l.kind == LineKind::DocComment)
}

/// Names bound by an import statement.
fn imported_names(code: &str) -> Vec<&str> {
    let Some(pos) = code.rfind("import") else {
        return Vec::new();
    };
    let is_from = code.trim_start().starts_with("from");

    code[pos + "import".len()..]
        .split(',')
        .filter_map(|part| {
            let part = part.trim().trim_matches(|c| c == '(' || c == ')').trim();
            if part.is_empty() || part == "*" {
                return None;
            }
            match part.split_once(" as ") {
                Some((_, alias)) => Some(alias.trim()),
                None if is_from => Some(part),
                None => part.split('.').next(),
            }
        })
        .collect()
}
