//! JavaScript and JSX language analyzer.
//!
//! Declarations are matched on stripped code lines; function bodies are
//! delimited by brace matching.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::signature::{
    block_extent, find_block_open, parenthesized, split_parameters,
};
use crate::analysis::{
    AntiPattern, FileFacts, FunctionFacts, Identifier, IdentifierKind, LanguageAnalyzer,
    PublicSymbol, StyleCheck, SymbolKind,
};
use crate::config::Tier;
use crate::language::Language;
use crate::source::{Line, LineKind, SourceFile};

/// Words that can precede `(...) {` without naming a method.
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "with", "function", "return", "typeof", "new",
    "await", "else", "do", "try", "yield",
];

lazy_static! {
    static ref FUNCTION_DECL_RE: Regex = Regex::new(
        r"(?:^|[^\w$.])function(?:\s*\*\s*|\s+)([A-Za-z_$][\w$]*)\s*\("
    ).unwrap();
    static ref CLASS_RE: Regex = Regex::new(r"(?:^|[^\w$.])class\s+([A-Za-z_$][\w$]*)").unwrap();
    static ref DECL_RE: Regex = Regex::new(
        r"(?:^|[^\w$.])(const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*(.*)$"
    ).unwrap();
    static ref DESTRUCTURE_RE: Regex = Regex::new(
        r"(?:^|[^\w$.])(?:const|let|var)\s+[\[{]([^\]}=]*)[\]}]\s*="
    ).unwrap();
    static ref LOOP_RE: Regex = Regex::new(
        r"\bfor\s*\(\s*(?:const|let|var)\s+([A-Za-z_$][\w$]*)"
    ).unwrap();
    static ref METHOD_RE: Regex = Regex::new(
        r"^\s*(?:static\s+)?(?:async\s+)?(?:get\s+|set\s+)?\*?([A-Za-z_$][\w$]*)\s*\([^)]*\)\s*\{"
    ).unwrap();
    static ref ARROW_RE: Regex = Regex::new(
        r"^(?:async\s+)?(?:\([^)]*\)|[A-Za-z_$][\w$]*)\s*=>"
    ).unwrap();
    static ref FUNCTION_EXPR_RE: Regex = Regex::new(r"^(?:async\s+)?function\b").unwrap();
    static ref REQUIRE_RE: Regex = Regex::new(r"^require\s*\(").unwrap();
    static ref EXPORT_RE: Regex = Regex::new(r"^\s*export\b").unwrap();
    static ref IMPORT_RE: Regex = Regex::new(
        r"^\s*(?:import\b|export\s+.*\bfrom\s)|(?:^|[^\w$.])require\s*\("
    ).unwrap();
    static ref IMPORT_BINDING_RE: Regex = Regex::new(r"^\s*import\s+([\w$]+)").unwrap();
    static ref CONSTANT_RE: Regex = Regex::new(
        r"^\s*(?:export\s+)?const\s+[A-Z][A-Z0-9_]*\s*="
    ).unwrap();
    static ref WORD_RE: Regex = Regex::new(r"[A-Za-z_$][\w$]*").unwrap();
    // Branches, loops, handlers, short-circuits and ternaries; `?.` is not a branch.
    static ref DECISION_RE: Regex = Regex::new(
        r"(?:^|[^\w$.])(?:if|for|while|case|catch)\b|&&|\|\||\?\?|\?(?:[^.?]|$)"
    ).unwrap();

    static ref CAMEL_CASE: Regex = Regex::new(r"^[_$]*[a-z][a-zA-Z0-9]*$").unwrap();
    static ref PASCAL_CASE: Regex = Regex::new(r"^[_$]*[A-Z][a-zA-Z0-9]*$").unwrap();
    static ref UPPER_SNAKE: Regex = Regex::new(r"^[_$]*[A-Z][A-Z0-9_]*$").unwrap();

    static ref ANTI_PATTERNS: Vec<AntiPattern> = vec![
        AntiPattern {
            name: "var",
            message: "'var' is function-scoped; use 'let' or 'const'",
            tier: Tier::Moderate,
            regex: Regex::new(r"(?:^|[^\w$.])var\s+[\w$\[{]").unwrap(),
        },
        AntiPattern {
            name: "loose-equality",
            message: "Loose equality coerces types; use '===' / '!=='",
            tier: Tier::Moderate,
            regex: Regex::new(r"(?:^|[^=!<>])(?:==|!=)(?:[^=]|$)").unwrap(),
        },
        AntiPattern {
            name: "debug-logging",
            message: "Debug logging left in code; remove console output",
            tier: Tier::Minor,
            regex: Regex::new(r"\bconsole\.(?:log|debug|trace|dir)\s*\(").unwrap(),
        },
        AntiPattern {
            name: "debugger",
            message: "'debugger' statement left in code",
            tier: Tier::Minor,
            regex: Regex::new(r"(?:^|[^\w$.])debugger\b").unwrap(),
        },
        AntiPattern {
            name: "dom-mutation",
            message: "Direct DOM or global mutation; prefer safe DOM APIs and module scope",
            tier: Tier::Moderate,
            regex: Regex::new(
                r"\.(?:innerHTML|outerHTML)\s*=[^=]|\bdocument\.write(?:ln)?\s*\(|\b(?:window|globalThis)\.[\w$]+\s*=[^=]"
            ).unwrap(),
        },
        AntiPattern {
            name: "eval",
            message: "eval() executes arbitrary code; avoid it",
            tier: Tier::Severe,
            regex: Regex::new(r"(?:^|[^\w$.])eval\s*\(").unwrap(),
        },
    ];

    static ref STYLE_CHECK: StyleCheck = StyleCheck {
        message: "Missing space between control keyword and '('",
        regex: Regex::new(r"\b(?:if|for|while|switch|catch)\(").unwrap(),
    };
}

pub struct JavaScriptAnalyzer;

impl JavaScriptAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JavaScriptAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// A function found on a line, before its body is measured.
struct FunctionHead {
    name: String,
    /// Byte offset of the parameter list's `(`, if any.
    params_open: Option<usize>,
    /// Bare single parameter of an arrow function (`x => ...`).
    bare_param: Option<String>,
    /// Byte offset from which to look for the body.
    search_from: usize,
    arrow: bool,
}

impl LanguageAnalyzer for JavaScriptAnalyzer {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn extract_facts(&self, source: SourceFile) -> FileFacts {
        let lines = source.lines();
        let uses_exports = lines.iter().any(|l| l.is_code() && EXPORT_RE.is_match(&l.code));
        let depths = depth_at_line_start(lines);

        let mut identifiers = Vec::new();
        let mut functions = Vec::new();
        let mut public_symbols = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if !line.is_code() {
                continue;
            }
            let code = line.code.as_str();
            let top_level = depths[idx] == 0;
            let exported = EXPORT_RE.is_match(code);
            let public = |name: &str| {
                top_level && !name.starts_with('_') && (!uses_exports || exported)
            };
            let documented = preceded_by_doc_comment(lines, idx);

            if let Some(caps) = LOOP_RE.captures(code) {
                identifiers.push(Identifier::new(&caps[1], IdentifierKind::LoopVariable, line.number));
                continue;
            }

            if let Some(caps) = FUNCTION_DECL_RE.captures(code) {
                let name = caps[1].to_string();
                let open = caps.get(0).map(|m| m.end() - 1).unwrap_or(0);
                identifiers.push(Identifier::new(&name, IdentifierKind::Function, line.number));
                if public(&name) {
                    public_symbols.push(symbol(&name, SymbolKind::Function, line, documented));
                }
                functions.push(measure_function(
                    lines,
                    idx,
                    FunctionHead {
                        name,
                        params_open: Some(open),
                        bare_param: None,
                        search_from: open,
                        arrow: false,
                    },
                ));
            } else if let Some(caps) = CLASS_RE.captures(code) {
                let name = caps[1].to_string();
                identifiers.push(Identifier::new(&name, IdentifierKind::Class, line.number));
                if public(&name) {
                    public_symbols.push(symbol(&name, SymbolKind::Class, line, documented));
                }
            } else if let Some(caps) = DECL_RE.captures(code) {
                let keyword = &caps[1];
                let name = caps[2].to_string();
                let rhs = caps.get(3).map_or("", |m| m.as_str());
                let rhs_start = caps.get(3).map_or(code.len(), |m| m.start());

                if let Some(head) = function_head(&name, rhs, rhs_start) {
                    identifiers.push(Identifier::new(&name, IdentifierKind::Function, line.number));
                    if public(&name) {
                        public_symbols.push(symbol(&name, SymbolKind::Function, line, documented));
                    }
                    functions.push(measure_function(lines, idx, head));
                } else {
                    let kind = if REQUIRE_RE.is_match(rhs) {
                        IdentifierKind::Import
                    } else if keyword == "const" && UPPER_SNAKE.is_match(&name) {
                        IdentifierKind::Constant
                    } else {
                        IdentifierKind::Variable
                    };
                    identifiers.push(Identifier::new(&name, kind, line.number));
                }
            } else if let Some(caps) = DESTRUCTURE_RE.captures(code) {
                let kind = if code.contains("require") {
                    IdentifierKind::Import
                } else {
                    IdentifierKind::Variable
                };
                for name in destructured_names(&caps[1]) {
                    identifiers.push(Identifier::new(name, kind, line.number));
                }
            } else if let Some(caps) = IMPORT_BINDING_RE.captures(code) {
                identifiers.push(Identifier::new(&caps[1], IdentifierKind::Import, line.number));
            } else if let Some(caps) = METHOD_RE.captures(code) {
                let name = caps[1].to_string();
                if CONTROL_KEYWORDS.contains(&name.as_str()) {
                    continue;
                }
                let open = caps
                    .get(1)
                    .and_then(|m| code[m.end()..].find('(').map(|p| m.end() + p))
                    .unwrap_or(0);
                identifiers.push(Identifier::new(&name, IdentifierKind::Function, line.number));
                functions.push(measure_function(
                    lines,
                    idx,
                    FunctionHead {
                        name,
                        params_open: Some(open),
                        bare_param: None,
                        search_from: open,
                        arrow: false,
                    },
                ));
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
            IdentifierKind::Function => (!CAMEL_CASE.is_match(name) && !PASCAL_CASE.is_match(name))
                .then_some("camelCase"),
            IdentifierKind::Variable | IdentifierKind::LoopVariable => {
                (!CAMEL_CASE.is_match(name)).then_some("camelCase")
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
        "JSDoc comment"
    }
}

fn symbol(name: &str, kind: SymbolKind, line: &Line, documented: bool) -> PublicSymbol {
    PublicSymbol {
        name: name.to_string(),
        kind,
        line: line.number,
        documented,
    }
}

/// Classify the right-hand side of a binding as a function, if it is one.
fn function_head(name: &str, rhs: &str, rhs_start: usize) -> Option<FunctionHead> {
    if FUNCTION_EXPR_RE.is_match(rhs) {
        let open = rhs.find('(').map(|p| rhs_start + p);
        return Some(FunctionHead {
            name: name.to_string(),
            params_open: open,
            bare_param: None,
            search_from: open.unwrap_or(rhs_start),
            arrow: false,
        });
    }

    if !ARROW_RE.is_match(rhs) {
        return None;
    }

    let params = rhs
        .strip_prefix("async")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map_or(rhs, str::trim_start);
    if params.starts_with('(') {
        let open = rhs_start + rhs.find('(').unwrap_or(0);
        Some(FunctionHead {
            name: name.to_string(),
            params_open: Some(open),
            bare_param: None,
            search_from: open,
            arrow: true,
        })
    } else {
        let param = WORD_RE.find(params).map(|m| m.as_str().to_string());
        Some(FunctionHead {
            name: name.to_string(),
            params_open: None,
            bare_param: param,
            search_from: rhs_start,
            arrow: true,
        })
    }
}

fn measure_function(lines: &[Line], idx: usize, head: FunctionHead) -> FunctionFacts {
    let (parameters, after_line, after_pos) = match head.params_open {
        Some(open) => {
            let group = parenthesized(lines, idx, open);
            (split_parameters(&group.inner), group.close_line, group.close_end)
        }
        None => (head.bare_param.into_iter().collect(), idx, head.search_from),
    };

    let block = if head.arrow {
        arrow_block(lines, after_line, after_pos)
    } else {
        find_block_open(lines, after_line, after_pos)
    };

    let (end_line, body_lines, max_nesting, decisions) = match block {
        Some((open_line, open_pos)) => {
            let extent = block_extent(lines, open_line, open_pos);
            (
                lines[extent.end_line].number,
                extent.body_lines,
                extent.max_nesting,
                count_decisions(lines, open_line, open_pos, extent.end_line),
            )
        }
        // Expression-bodied arrows have no block.
        None => (
            lines[after_line].number,
            0,
            0,
            count_decisions(lines, after_line, after_pos, after_line),
        ),
    };

    FunctionFacts {
        name: head.name,
        line: lines[idx].number,
        end_line,
        body_lines,
        parameters,
        max_nesting,
        complexity: 1 + decisions,
    }
}

/// Decision points from byte `from` of line `start` through line `end`.
fn count_decisions(lines: &[Line], start: usize, from: usize, end: usize) -> usize {
    lines
        .iter()
        .enumerate()
        .take(end + 1)
        .skip(start)
        .filter(|(_, line)| line.is_code())
        .map(|(li, line)| {
            let code = if li == start {
                line.code.get(from..).unwrap_or("")
            } else {
                line.code.as_str()
            };
            DECISION_RE.find_iter(code).count()
        })
        .sum()
}

/// Locate the `{` that opens an arrow function's block body.
fn arrow_block(lines: &[Line], idx: usize, from: usize) -> Option<(usize, usize)> {
    let code = lines[idx].code.as_str();
    let arrow = code.get(from..)?.find("=>")? + from + 2;
    let rest = &code[arrow..];
    let trimmed = rest.trim_start();

    if trimmed.starts_with('{') {
        return Some((idx, arrow + (rest.len() - trimmed.len())));
    }
    if trimmed.is_empty() {
        let next = lines.get(idx + 1)?;
        let pos = next.code.find(|c: char| !c.is_whitespace())?;
        if next.code[pos..].starts_with('{') {
            return Some((idx + 1, pos));
        }
    }
    None
}

/// Brace depth at the start of each line.
fn depth_at_line_start(lines: &[Line]) -> Vec<usize> {
    let mut depth = 0usize;
    lines
        .iter()
        .map(|line| {
            let at_start = depth;
            for c in line.code.chars() {
                match c {
                    '{' => depth += 1,
                    '}' => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
            at_start
        })
        .collect()
}

/// Whether the nearest non-blank line above `idx` ends a JSDoc block.
fn preceded_by_doc_comment(lines: &[Line], idx: usize) -> bool {
    lines[..idx]
        .iter()
        .rev()
        .find(|l| l.kind != LineKind::Blank)
        .map_or(false, |l| l.kind == LineKind::DocComment)
}

fn destructured_names(pattern: &str) -> Vec<&str> {
    pattern
        .split(',')
        .filter_map(|part| {
            let part = part.trim().trim_start_matches("...");
            let binding = match part.split_once(':') {
                Some((_, alias)) => alias,
                None => part,
            };
            WORD_RE.find(binding).map(|m| m.as_str())
        })
        .collect()
}
