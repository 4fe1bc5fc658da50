//! Line-pattern code analysis.
//!
//! This module turns a [`SourceFile`](crate::source::SourceFile) into
//! "facts" the category rule sets consume:
//! - Identifiers and the role each one plays (function, class, constant...)
//! - Function spans with parameter counts and nesting depth
//! - Public symbols and whether they are documented
//!
//! No syntax tree is built. Each language analyzer matches declarations
//! line by line over comment- and string-stripped code.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ SourceFile  │────▶│ Analyzers    │────▶│ FileFacts     │
//! └─────────────┘     │ (Python, JS) │     │ (Identifiers, │
//!                     └──────────────┘     │  Functions)   │
//!                                          └───────────────┘
//!                                                  │
//!                                                  ▼
//!                                          ┌───────────────┐
//!                                          │ Rule sets     │
//!                                          └───────────────┘
//! ```
//!
//! # Adding a New Language
//!
//! 1. Add a variant to [`Language`](crate::language::Language)
//! 2. Create a module in `src/analysis/languages/` implementing `LanguageAnalyzer`
//! 3. Register the analyzer in `languages/mod.rs`
//! 4. Add a `LanguageRules` entry to the rubric config

mod facts;
mod languages;
pub(crate) mod signature;
mod traits;

pub use facts::{
    FileFacts, FunctionFacts, Identifier, IdentifierKind, PublicSymbol, SymbolKind,
};
pub use languages::{
    get_analyzer, get_analyzer_for_extension, register_analyzers, JavaScriptAnalyzer,
    PythonAnalyzer,
};
pub use traits::{AntiPattern, LanguageAnalyzer, StyleCheck};
