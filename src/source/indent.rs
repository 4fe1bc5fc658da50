//! Leading-whitespace measurement.

/// Composition of a line's leading whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentKind {
    None,
    Spaces,
    Tabs,
    Mixed,
}

/// Leading whitespace of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indentation {
    pub spaces: usize,
    pub tabs: usize,
    pub kind: IndentKind,
}

impl Indentation {
    /// Number of leading whitespace characters.
    pub fn width(&self) -> usize {
        self.spaces + self.tabs
    }

    /// Visual column of the first non-whitespace character, expanding tabs.
    pub fn columns(&self, tab_width: usize) -> usize {
        self.spaces + self.tabs * tab_width
    }
}

/// Measure the leading spaces and tabs of `line`.
pub fn indentation_of(line: &str) -> Indentation {
    let mut spaces = 0;
    let mut tabs = 0;

    for ch in line.chars() {
        match ch {
            ' ' => spaces += 1,
            '\t' => tabs += 1,
            _ => break,
        }
    }

    let kind = match (spaces, tabs) {
        (0, 0) => IndentKind::None,
        (_, 0) => IndentKind::Spaces,
        (0, _) => IndentKind::Tabs,
        _ => IndentKind::Mixed,
    };

    Indentation { spaces, tabs, kind }
}
