//! Line and token utilities shared by every analyzer.
//!
//! Splits raw text into logical lines, classifies each as code, comment,
//! docstring or blank, strips comments and string contents for safe pattern
//! matching, and measures indentation.

mod indent;
mod lines;
mod scanner;

pub use indent::{indentation_of, IndentKind, Indentation};
pub use lines::{IndentSample, Line, LineKind, SourceFile};

pub(crate) use lines::dominant_step;
