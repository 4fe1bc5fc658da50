//! Rubric configuration.
//!
//! Every weight and threshold the rule sets use lives here, per language.
//! A rubric can be loaded from YAML; any omitted field keeps its default.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::language::Language;

/// Largest accepted single deduction; no category is worth more than 100.
pub const MAX_PENALTY: u32 = 100;

/// File names searched for by [`RubricConfig::discover`].
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["codegrade.yaml", ".codegrade.yaml"];

/// Top-level rubric definition.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RubricConfig {
    /// Glob patterns for paths `scan` skips (e.g. "**/migrations/**").
    pub excluded_paths: Vec<String>,
    pub python: LanguageRules,
    pub javascript: LanguageRules,
}

impl RubricConfig {
    /// Parse a rubric from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse a rubric from YAML text. An empty document yields the defaults.
    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: RubricConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Look for a config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Rules for one language.
    pub fn rules_for(&self, language: Language) -> &LanguageRules {
        match language {
            Language::Python => &self.python,
            Language::JavaScript => &self.javascript,
        }
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();

        for pattern in &self.excluded_paths {
            if let Ok(glob) = globset::Glob::new(pattern) {
                if glob.compile_matcher().is_match(&*path_str) {
                    return true;
                }
            }
        }
        false
    }
}

/// Weights and thresholds for one language.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LanguageRules {
    pub naming: NamingRules,
    pub modularity: ModularityRules,
    pub comments: CommentRules,
    pub formatting: FormattingRules,
    pub reusability: ReusabilityRules,
    pub best_practices: PracticeRules,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NamingRules {
    /// Identifiers shorter than this are flagged (default: 3)
    pub min_length: usize,
    /// Short names that are always acceptable.
    pub allowed_short: Vec<String>,
    /// Names that say nothing about their purpose.
    pub generic_names: Vec<String>,
    pub short_penalty: u32,
    pub convention_penalty: u32,
    pub generic_penalty: u32,
}

impl Default for NamingRules {
    fn default() -> Self {
        Self {
            min_length: 3,
            allowed_short: ["i", "j", "k", "_"].iter().map(|s| s.to_string()).collect(),
            generic_names: [
                "data", "temp", "tmp", "foo", "bar", "baz", "x", "val", "obj", "stuff", "thing",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            short_penalty: 2,
            convention_penalty: 2,
            generic_penalty: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModularityRules {
    /// Maximum code lines in a function body (default: 40)
    pub max_function_lines: usize,
    pub length_penalty: u32,
    /// One extra point is deducted per this many lines over the limit.
    pub lines_per_extra_point: usize,
    /// Maximum block nesting depth (default: 4)
    pub max_nesting: usize,
    /// Deducted per nesting level over the limit.
    pub nesting_penalty: u32,
    /// Maximum parameters per function (default: 5)
    pub max_parameters: usize,
    /// Deducted per parameter over the limit.
    pub parameter_penalty: u32,
    /// Maximum cyclomatic complexity per function (default: 10)
    pub max_complexity: usize,
    pub complexity_penalty: u32,
}

impl Default for ModularityRules {
    fn default() -> Self {
        Self {
            max_function_lines: 40,
            length_penalty: 4,
            lines_per_extra_point: 10,
            max_nesting: 4,
            nesting_penalty: 3,
            max_parameters: 5,
            parameter_penalty: 2,
            max_complexity: 10,
            complexity_penalty: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CommentRules {
    /// Minimum comment-to-code line ratio (default: 0.10)
    pub min_ratio: f64,
    /// Deduction when the file has no comments at all; scaled by the shortfall.
    pub ratio_penalty: u32,
    /// Deducted per undocumented public function, class or module.
    pub undocumented_penalty: u32,
}

impl Default for CommentRules {
    fn default() -> Self {
        Self {
            min_ratio: 0.10,
            ratio_penalty: 15,
            undocumented_penalty: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FormattingRules {
    /// Maximum characters per line (default: 100)
    pub max_line_length: usize,
    pub mixed_indent_penalty: u32,
    pub inconsistent_indent_penalty: u32,
    pub long_line_penalty: u32,
    pub trailing_whitespace_penalty: u32,
    pub style_penalty: u32,
}

impl Default for FormattingRules {
    fn default() -> Self {
        Self {
            max_line_length: 100,
            mixed_indent_penalty: 4,
            inconsistent_indent_penalty: 3,
            long_line_penalty: 3,
            trailing_whitespace_penalty: 2,
            style_penalty: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReusabilityRules {
    /// Consecutive normalized lines that make a duplicate block (default: 4)
    pub duplicate_window: usize,
    pub duplicate_penalty: u32,
    /// Occurrences at which a literal counts as magic (default: 3)
    pub literal_repeat_threshold: usize,
    pub literal_penalty: u32,
    /// Numeric literals that never count as magic.
    pub allowed_numbers: Vec<String>,
    /// Shortest string literal considered (default: 2)
    pub min_string_length: usize,
    /// Code lines at which a file is expected to be split into functions.
    pub monolith_min_lines: usize,
    pub monolith_min_functions: usize,
    pub monolith_penalty: u32,
}

impl Default for ReusabilityRules {
    fn default() -> Self {
        Self {
            duplicate_window: 4,
            duplicate_penalty: 3,
            literal_repeat_threshold: 3,
            literal_penalty: 2,
            allowed_numbers: ["0", "1", "2", "-1"].iter().map(|s| s.to_string()).collect(),
            min_string_length: 2,
            monolith_min_lines: 30,
            monolith_min_functions: 2,
            monolith_penalty: 5,
        }
    }
}

/// Penalty tier for an anti-pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Minor,
    #[default]
    Moderate,
    Severe,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Minor => write!(f, "minor"),
            Tier::Moderate => write!(f, "moderate"),
            Tier::Severe => write!(f, "severe"),
        }
    }
}

/// A user-supplied anti-pattern.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtraPattern {
    /// Regex matched against comment-free, string-blanked code.
    pub pattern: String,
    pub message: String,
    #[serde(default)]
    pub tier: Tier,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PracticeRules {
    pub minor_penalty: u32,
    pub moderate_penalty: u32,
    pub severe_penalty: u32,
    pub extra_patterns: Vec<ExtraPattern>,
}

impl PracticeRules {
    pub fn penalty(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Minor => self.minor_penalty,
            Tier::Moderate => self.moderate_penalty,
            Tier::Severe => self.severe_penalty,
        }
    }
}

impl Default for PracticeRules {
    fn default() -> Self {
        Self {
            minor_penalty: 2,
            moderate_penalty: 3,
            severe_penalty: 5,
            extra_patterns: Vec::new(),
        }
    }
}

/// Validate a rubric for correctness.
pub fn validate(config: &RubricConfig) -> anyhow::Result<()> {
    for pattern in &config.excluded_paths {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
    }

    for language in Language::ALL {
        validate_rules(language, config.rules_for(language))?;
    }

    Ok(())
}

fn validate_rules(language: Language, rules: &LanguageRules) -> anyhow::Result<()> {
    let positive = [
        ("naming.min_length", rules.naming.min_length),
        ("modularity.max_function_lines", rules.modularity.max_function_lines),
        ("modularity.lines_per_extra_point", rules.modularity.lines_per_extra_point),
        ("modularity.max_nesting", rules.modularity.max_nesting),
        ("modularity.max_parameters", rules.modularity.max_parameters),
        ("modularity.max_complexity", rules.modularity.max_complexity),
        ("formatting.max_line_length", rules.formatting.max_line_length),
        ("reusability.duplicate_window", rules.reusability.duplicate_window),
        ("reusability.literal_repeat_threshold", rules.reusability.literal_repeat_threshold),
    ];
    for (name, value) in positive {
        if value == 0 {
            anyhow::bail!("{}.{} must be greater than zero", language, name);
        }
    }

    let penalties = [
        ("naming.short_penalty", rules.naming.short_penalty),
        ("naming.convention_penalty", rules.naming.convention_penalty),
        ("naming.generic_penalty", rules.naming.generic_penalty),
        ("modularity.length_penalty", rules.modularity.length_penalty),
        ("modularity.nesting_penalty", rules.modularity.nesting_penalty),
        ("modularity.parameter_penalty", rules.modularity.parameter_penalty),
        ("modularity.complexity_penalty", rules.modularity.complexity_penalty),
        ("comments.ratio_penalty", rules.comments.ratio_penalty),
        ("comments.undocumented_penalty", rules.comments.undocumented_penalty),
        ("formatting.mixed_indent_penalty", rules.formatting.mixed_indent_penalty),
        ("formatting.inconsistent_indent_penalty", rules.formatting.inconsistent_indent_penalty),
        ("formatting.long_line_penalty", rules.formatting.long_line_penalty),
        ("formatting.trailing_whitespace_penalty", rules.formatting.trailing_whitespace_penalty),
        ("formatting.style_penalty", rules.formatting.style_penalty),
        ("reusability.duplicate_penalty", rules.reusability.duplicate_penalty),
        ("reusability.literal_penalty", rules.reusability.literal_penalty),
        ("reusability.monolith_penalty", rules.reusability.monolith_penalty),
        ("best_practices.minor_penalty", rules.best_practices.minor_penalty),
        ("best_practices.moderate_penalty", rules.best_practices.moderate_penalty),
        ("best_practices.severe_penalty", rules.best_practices.severe_penalty),
    ];
    for (name, value) in penalties {
        if value > MAX_PENALTY {
            anyhow::bail!(
                "{}.{} must be at most {}, got {}",
                language,
                name,
                MAX_PENALTY,
                value
            );
        }
    }

    let ratio = rules.comments.min_ratio;
    if !(ratio > 0.0 && ratio <= 1.0) {
        anyhow::bail!(
            "{}.comments.min_ratio must be in (0, 1], got {}",
            language,
            ratio
        );
    }

    for p in &rules.best_practices.extra_patterns {
        regex::Regex::new(&p.pattern).map_err(|e| {
            anyhow::anyhow!("invalid {} extra pattern {:?}: {}", language, p.pattern, e)
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = RubricConfig::default();
        let rules = config.rules_for(Language::Python);
        assert_eq!(rules.naming.min_length, 3);
        assert_eq!(rules.modularity.max_function_lines, 40);
        assert_eq!(rules.formatting.max_line_length, 100);
        assert_eq!(rules.best_practices.penalty(Tier::Severe), 5);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let yaml = r#"
excluded_paths:
  - "**/generated/**"
javascript:
  formatting:
    max_line_length: 120
  best_practices:
    extra_patterns:
      - pattern: "\\balert\\s*\\("
        message: "Avoid alert()"
        tier: minor
"#;
        let config = RubricConfig::parse_str(yaml).unwrap();
        assert_eq!(config.javascript.formatting.max_line_length, 120);
        assert_eq!(config.javascript.formatting.long_line_penalty, 3);
        assert_eq!(config.python.formatting.max_line_length, 100);
        assert_eq!(config.javascript.best_practices.extra_patterns.len(), 1);
        assert_eq!(
            config.javascript.best_practices.extra_patterns[0].tier,
            Tier::Minor
        );
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = RubricConfig::parse_str("").unwrap();
        assert!(config.excluded_paths.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = RubricConfig::default();
        config.python.comments.min_ratio = 0.0;
        assert!(validate(&config).is_err());

        let mut config = RubricConfig::default();
        config.javascript.best_practices.extra_patterns.push(ExtraPattern {
            pattern: "(".to_string(),
            message: "broken".to_string(),
            tier: Tier::Minor,
        });
        assert!(validate(&config).is_err());

        let config = RubricConfig {
            excluded_paths: vec!["[".to_string()],
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_bounds_penalties() {
        let mut config = RubricConfig::default();
        config.javascript.modularity.nesting_penalty = MAX_PENALTY;
        assert!(validate(&config).is_ok());

        config.javascript.modularity.nesting_penalty = u32::MAX;
        let err = validate(&config).unwrap_err();
        assert!(err
            .to_string()
            .contains("javascript.modularity.nesting_penalty must be at most 100"));

        let mut config = RubricConfig::default();
        config.python.modularity.max_complexity = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_path_exclusion() {
        let config = RubricConfig {
            excluded_paths: vec!["**/migrations/**".to_string()],
            ..Default::default()
        };
        assert!(config.is_path_excluded(Path::new("app/migrations/0001_initial.py")));
        assert!(!config.is_path_excluded(Path::new("app/models.py")));
    }

    #[test]
    fn test_discover_and_parse_file() {
        let dir = TempDir::new().unwrap();
        assert!(RubricConfig::discover(dir.path()).is_none());

        let path = dir.path().join(".codegrade.yaml");
        fs::write(&path, "python:\n  naming:\n    min_length: 2\n").unwrap();
        let found = RubricConfig::discover(dir.path()).unwrap();
        assert_eq!(found, path);

        let config = RubricConfig::parse_file(&found).unwrap();
        assert_eq!(config.python.naming.min_length, 2);
    }

    #[test]
    fn test_parse_file_missing() {
        let dir = TempDir::new().unwrap();
        let err = RubricConfig::parse_file(dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
