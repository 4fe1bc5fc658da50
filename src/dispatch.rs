//! Entry point of the engine: language resolution, decoding, analysis and
//! aggregation for one file.

use once_cell::sync::Lazy;
use std::path::Path;

use crate::analysis::get_analyzer;
use crate::config::RubricConfig;
use crate::error::EngineError;
use crate::language::Language;
use crate::score::{self, AnalysisReport};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Engine using the default rubric.
static DEFAULT_ENGINE: Lazy<Engine> = Lazy::new(Engine::default);

/// Decoded file content tagged with its language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub language: Language,
    pub text: String,
}

impl SourceUnit {
    /// Resolve the language of `filename` and decode `content`.
    pub fn decode(filename: &str, content: &[u8]) -> Result<Self, EngineError> {
        let language = Language::from_path(filename).ok_or_else(|| {
            EngineError::UnsupportedFileType {
                filename: filename.to_string(),
                extension: Path::new(filename)
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            }
        })?;

        let bytes = content.strip_prefix(UTF8_BOM).unwrap_or(content);
        if bytes.contains(&0) {
            return Err(EngineError::ContentError {
                filename: filename.to_string(),
                reason: "content contains NUL bytes; binary files cannot be analyzed".to_string(),
            });
        }
        let text = std::str::from_utf8(bytes).map_err(|e| EngineError::ContentError {
            filename: filename.to_string(),
            reason: format!("content is not valid UTF-8 ({})", e),
        })?;

        Ok(Self {
            language,
            text: text.to_string(),
        })
    }
}

/// Scores files against a rubric. Stateless between calls and safe to share
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: RubricConfig,
}

impl Engine {
    pub fn new(config: RubricConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RubricConfig {
        &self.config
    }

    /// Analyze one file. Either a complete report or an error, never both.
    pub fn run(&self, filename: &str, content: &[u8]) -> Result<AnalysisReport, EngineError> {
        let unit = SourceUnit::decode(filename, content)?;
        tracing::debug!(
            file = filename,
            language = %unit.language,
            bytes = content.len(),
            "analyzing file"
        );
        Ok(self.analyze_unit(&unit))
    }

    /// Analyze already-decoded text.
    pub fn analyze_unit(&self, unit: &SourceUnit) -> AnalysisReport {
        let analyzer = get_analyzer(unit.language);
        let outcomes = analyzer.analyze(&unit.text, self.config.rules_for(unit.language));
        score::aggregate(outcomes)
    }
}

/// Analyze one file with the default rubric.
pub fn run(filename: &str, content: &[u8]) -> Result<AnalysisReport, EngineError> {
    DEFAULT_ENGINE.run(filename, content)
}
