//! Supported source languages.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Languages the engine knows how to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Language; 2] = [Language::Python, Language::JavaScript];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
        }
    }

    /// File extensions (without dot) handled by this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py"],
            Language::JavaScript => &["js", "jsx"],
        }
    }

    /// Determine the language from a file extension. Matching is case-insensitive
    /// and tolerates a leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext.as_str()))
    }

    /// Determine the language from a file name or path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Language::from_extension)
    }

    /// Fallback indentation width when a file does not reveal its own.
    pub fn default_indent_width(&self) -> usize {
        match self {
            Language::Python => 4,
            Language::JavaScript => 2,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension(".JS"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("Jsx"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("ts"), None);
        assert_eq!(Language::from_extension(""), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("src/app.PY"), Some(Language::Python));
        assert_eq!(Language::from_path("components/Button.jsx"), Some(Language::JavaScript));
        assert_eq!(Language::from_path("notes.txt"), None);
        assert_eq!(Language::from_path("Makefile"), None);
    }
}
