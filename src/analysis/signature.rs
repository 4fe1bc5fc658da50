//! Helpers for reading parameter lists and brace-delimited blocks out of
//! stripped code lines.

use crate::source::Line;

/// Where a parenthesized group closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Group {
    /// Text between the outer parentheses, lines joined by spaces.
    pub inner: String,
    /// Index into the line slice of the line holding the closing parenthesis.
    pub close_line: usize,
    /// Byte offset just past the closing parenthesis on that line.
    pub close_end: usize,
}

/// Read the group opened by the `(` at byte `open` of `lines[idx].code`.
/// An unbalanced group runs to the end of the file.
pub(crate) fn parenthesized(lines: &[Line], idx: usize, open: usize) -> Group {
    let mut depth = 0usize;
    let mut inner = String::new();

    for (li, line) in lines.iter().enumerate().skip(idx) {
        let start = if li == idx { open } else { 0 };
        let code = line.code.get(start..).unwrap_or("");

        for (offset, c) in code.char_indices() {
            match c {
                '(' => {
                    depth += 1;
                    if depth == 1 {
                        continue;
                    }
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Group {
                            inner,
                            close_line: li,
                            close_end: start + offset + 1,
                        };
                    }
                }
                _ => {}
            }
            inner.push(c);
        }
        inner.push(' ');
    }

    let last = lines.len().saturating_sub(1);
    Group {
        inner,
        close_line: last,
        close_end: lines.get(last).map(|l| l.code.len()).unwrap_or(0),
    }
}

/// Split a parameter list on top-level commas and reduce each entry to its
/// name. Receivers (`self`, `cls`) and bare `*` / `/` markers are dropped.
pub(crate) fn split_parameters(list: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for c in list.chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                params.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    params.push(current);

    params
        .iter()
        .filter_map(|p| parameter_name(p))
        .filter(|name| !matches!(name.as_str(), "self" | "cls" | "/"))
        .collect()
}

fn parameter_name(entry: &str) -> Option<String> {
    let entry = entry.trim().trim_start_matches('*').trim_start_matches("...");
    if entry.starts_with('{') || entry.starts_with('[') {
        return Some(entry.to_string());
    }
    let name = entry
        .split(|c| c == ':' || c == '=')
        .next()
        .unwrap_or("")
        .trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Extent of a brace-delimited block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block {
    /// Index of the line holding the closing brace.
    pub end_line: usize,
    /// Code lines inside the block.
    pub body_lines: usize,
    /// Deepest brace level at which a body line starts; the block itself is 1.
    pub max_nesting: usize,
}

/// Match the `{` at byte `open` of `lines[idx].code` to its closing brace.
pub(crate) fn block_extent(lines: &[Line], idx: usize, open: usize) -> Block {
    let mut depth = 0usize;
    let mut body_lines = 0;
    let mut max_nesting = 1;

    for (li, line) in lines.iter().enumerate().skip(idx) {
        let start = if li == idx { open } else { 0 };
        let code = line.code.get(start..).unwrap_or("");

        if li > idx && line.is_code() {
            max_nesting = max_nesting.max(depth);
            if !is_closing_only(code) {
                body_lines += 1;
            }
        }

        for c in code.chars() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Block {
                            end_line: li,
                            body_lines,
                            max_nesting,
                        };
                    }
                }
                _ => {}
            }
        }
    }

    Block {
        end_line: lines.len().saturating_sub(1),
        body_lines,
        max_nesting,
    }
}

fn is_closing_only(code: &str) -> bool {
    code.chars()
        .all(|c| c.is_whitespace() || matches!(c, '}' | ')' | ']' | ';' | ','))
}

/// Find the first `{` at or after byte `from` on line `idx`, looking at most
/// one line further. A `;` before any brace ends the search.
pub(crate) fn find_block_open(lines: &[Line], idx: usize, from: usize) -> Option<(usize, usize)> {
    for (li, line) in lines.iter().enumerate().skip(idx).take(2) {
        let start = if li == idx { from } else { 0 };
        let code = line.code.get(start..).unwrap_or("");
        for (offset, c) in code.char_indices() {
            match c {
                '{' => return Some((li, start + offset)),
                ';' => return None,
                _ => {}
            }
        }
    }
    None
}
