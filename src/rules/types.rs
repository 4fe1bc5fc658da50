//! Core types shared by the category rule sets.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rubric categories in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Naming,
    Modularity,
    Comments,
    Formatting,
    Reusability,
    BestPractices,
}

impl Category {
    /// All categories in report order.
    pub const ALL: [Category; 6] = [
        Category::Naming,
        Category::Modularity,
        Category::Comments,
        Category::Formatting,
        Category::Reusability,
        Category::BestPractices,
    ];

    /// Maximum points the category contributes to the overall score.
    pub fn max_points(&self) -> u32 {
        match self {
            Category::Naming => 10,
            Category::Modularity => 20,
            Category::Comments => 20,
            Category::Formatting => 15,
            Category::Reusability => 15,
            Category::BestPractices => 20,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Naming => "naming",
            Category::Modularity => "modularity",
            Category::Comments => "comments",
            Category::Formatting => "formatting",
            Category::Reusability => "reusability",
            Category::BestPractices => "best_practices",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Naming => "Naming",
            Category::Modularity => "Modularity",
            Category::Comments => "Comments",
            Category::Formatting => "Formatting",
            Category::Reusability => "Reusability",
            Category::BestPractices => "Best Practices",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warn => write!(f, "WARN"),
        }
    }
}

/// A human-readable observation attached to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub message: String,
    pub line: Option<usize>,
    pub severity: Severity,
}

impl Finding {
    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            severity: Severity::Warn,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            severity: Severity::Info,
        }
    }

    /// Attach a 1-based line number.
    pub fn at(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Render as a recommendation string.
    pub fn render(&self) -> String {
        match self.line {
            Some(line) => format!("Line {}: {}", line, self.message),
            None => self.message.clone(),
        }
    }
}

/// Score and findings for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryResult {
    pub category: Category,
    pub score: u32,
    pub findings: Vec<Finding>,
}

impl CategoryResult {
    /// A zero score explained by a single finding.
    pub fn zero(category: Category, finding: Finding) -> Self {
        Self {
            category,
            score: 0,
            findings: vec![finding],
        }
    }

    /// Full marks with no findings.
    pub fn full(category: Category) -> Self {
        Self {
            category,
            score: category.max_points(),
            findings: Vec::new(),
        }
    }
}

/// Accumulates deductions for a category, starting from its maximum.
#[derive(Debug)]
pub struct ScoreCard {
    category: Category,
    deducted: u32,
    findings: Vec<Finding>,
}

impl ScoreCard {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            deducted: 0,
            findings: Vec::new(),
        }
    }

    /// Deduct points and record the finding that explains them.
    pub fn deduct(&mut self, points: u32, finding: Finding) {
        self.deducted = self.deducted.saturating_add(points);
        self.findings.push(finding);
    }

    /// Record a finding without deducting.
    pub fn note(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn deducted(&self) -> u32 {
        self.deducted
    }

    /// Final result, floored at zero.
    pub fn finish(self) -> CategoryResult {
        CategoryResult {
            category: self.category,
            score: self.category.max_points().saturating_sub(self.deducted),
            findings: self.findings,
        }
    }
}

/// Errors a rule set can raise while evaluating a file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("invalid pattern {pattern:?} in {category} rules: {reason}")]
    InvalidPattern {
        category: Category,
        pattern: String,
        reason: String,
    },
}

impl RuleError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        "INTERNAL_RULE_ERROR"
    }

    /// Category whose evaluation failed.
    pub fn category(&self) -> Category {
        match self {
            RuleError::InvalidPattern { category, .. } => *category,
        }
    }
}

/// Outcome of evaluating one category.
pub type RuleOutcome = Result<CategoryResult, RuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_maxima_sum_to_100() {
        let total: u32 = Category::ALL.iter().map(|c| c.max_points()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_category_order() {
        let mut sorted = Category::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, Category::ALL.to_vec());
    }

    #[test]
    fn test_finding_render() {
        assert_eq!(
            Finding::warn("Use of eval").at(12).render(),
            "Line 12: Use of eval"
        );
        assert_eq!(Finding::info("Nothing to assess").render(), "Nothing to assess");
    }

    #[test]
    fn test_score_card_floors_at_zero() {
        let mut card = ScoreCard::new(Category::Naming);
        card.deduct(7, Finding::warn("a"));
        card.deduct(7, Finding::warn("b"));
        let result = card.finish();
        assert_eq!(result.score, 0);
        assert_eq!(result.findings.len(), 2);
    }

    #[test]
    fn test_rule_error_code() {
        let err = RuleError::InvalidPattern {
            category: Category::BestPractices,
            pattern: "(".to_string(),
            reason: "unclosed group".to_string(),
        };
        assert_eq!(err.code(), "INTERNAL_RULE_ERROR");
        assert_eq!(err.category(), Category::BestPractices);
        assert!(err.to_string().contains("best_practices"));
    }
}
