//! Fact structures extracted by line-pattern analysis.

use std::collections::HashSet;
use std::fmt;

use crate::source::SourceFile;

/// Kind of named entity an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    Function,
    Class,
    Variable,
    Constant,
    LoopVariable,
    Import,
}

impl IdentifierKind {
    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Function => "function",
            IdentifierKind::Class => "class",
            IdentifierKind::Variable => "variable",
            IdentifierKind::Constant => "constant",
            IdentifierKind::LoopVariable => "loop variable",
            IdentifierKind::Import => "import",
        }
    }

    /// Capitalized form used at the start of a finding message.
    pub fn label(&self) -> &'static str {
        match self {
            IdentifierKind::Function => "Function",
            IdentifierKind::Class => "Class",
            IdentifierKind::Variable => "Variable",
            IdentifierKind::Constant => "Constant",
            IdentifierKind::LoopVariable => "Loop variable",
            IdentifierKind::Import => "Import",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A name introduced by the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub kind: IdentifierKind,
    /// Line of first introduction (1-indexed).
    pub line: usize,
}

impl Identifier {
    pub fn new(name: impl Into<String>, kind: IdentifierKind, line: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            line,
        }
    }
}

/// Size and shape of one function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionFacts {
    pub name: String,
    /// Line of the definition (1-indexed).
    pub line: usize,
    /// Last line of the body (1-indexed, inclusive).
    pub end_line: usize,
    /// Code lines in the body, excluding comments and blanks.
    pub body_lines: usize,
    pub parameters: Vec<String>,
    /// Deepest block level inside the body; the body itself is level 1.
    pub max_nesting: usize,
    /// Cyclomatic complexity: 1 plus one per decision point in the body.
    pub complexity: usize,
}

/// Kind of public symbol that should carry documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Module,
    Function,
    Class,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Module => "module",
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A publicly visible symbol and whether it is documented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub line: usize,
    pub documented: bool,
}

/// All facts extracted from a single file.
#[derive(Debug, Clone)]
pub struct FileFacts {
    pub source: SourceFile,
    pub identifiers: Vec<Identifier>,
    pub functions: Vec<FunctionFacts>,
    pub public_symbols: Vec<PublicSymbol>,
    /// Names already in `identifiers`.
    seen: HashSet<String>,
}

impl FileFacts {
    /// Create empty facts for a parsed source.
    pub fn new(source: SourceFile) -> Self {
        Self {
            source,
            identifiers: Vec::new(),
            functions: Vec::new(),
            public_symbols: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Record an identifier unless the same name was already introduced.
    pub fn add_identifier(&mut self, name: &str, kind: IdentifierKind, line: usize) {
        if name.is_empty() || !self.seen.insert(name.to_string()) {
            return;
        }
        self.identifiers.push(Identifier::new(name, kind, line));
    }

    /// Look up a function by name.
    pub fn function(&self, name: &str) -> Option<&FunctionFacts> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Public symbols missing documentation.
    pub fn undocumented_symbols(&self) -> impl Iterator<Item = &PublicSymbol> {
        self.public_symbols.iter().filter(|s| !s.documented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    #[test]
    fn test_identifiers_are_deduplicated() {
        let mut facts = FileFacts::new(SourceFile::parse("", Language::Python));
        facts.add_identifier("total", IdentifierKind::Variable, 3);
        facts.add_identifier("total", IdentifierKind::Variable, 9);
        facts.add_identifier("", IdentifierKind::Variable, 10);
        assert_eq!(facts.identifiers.len(), 1);
        assert_eq!(facts.identifiers[0].line, 3);
    }

    #[test]
    fn test_many_identifiers_keep_first_occurrence() {
        let mut facts = FileFacts::new(SourceFile::parse("", Language::Python));
        for round in 0..3 {
            for n in 0..20_000 {
                facts.add_identifier(&format!("name_{}", n), IdentifierKind::Variable, round + 1);
            }
        }
        assert_eq!(facts.identifiers.len(), 20_000);
        assert!(facts.identifiers.iter().all(|i| i.line == 1));
        assert_eq!(facts.identifiers[19_999].name, "name_19999");
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(IdentifierKind::LoopVariable.label(), "Loop variable");
        assert_eq!(IdentifierKind::Class.to_string(), "class");
        assert_eq!(SymbolKind::Module.to_string(), "module");
    }
}
