//! Aggregation of category outcomes into the final report.
//!
//! The overall score is the sum of the six category scores, each bounded by
//! its category maximum. A failed category scores zero and says why; it
//! never fails the whole analysis.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::rules::{Category, CategoryResult, Finding, RuleOutcome};

/// Grade thresholds (minimum overall score).
pub mod grades {
    pub const A_MIN: u32 = 90;
    pub const B_MIN: u32 = 80;
    pub const C_MIN: u32 = 70;
    pub const D_MIN: u32 = 60;
}

/// The scored result for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Sum of the category scores, 0-100.
    pub overall_score: u32,
    /// Score per category, always holding all six categories.
    pub breakdown: BTreeMap<Category, u32>,
    /// Rendered findings in category order.
    pub recommendations: Vec<String>,
    /// Per-category findings with severity, for terminal rendering.
    #[serde(skip)]
    pub details: Vec<CategoryResult>,
}

impl AnalysisReport {
    /// Letter grade for presentation.
    pub fn grade(&self) -> &'static str {
        match self.overall_score {
            s if s >= grades::A_MIN => "A",
            s if s >= grades::B_MIN => "B",
            s if s >= grades::C_MIN => "C",
            s if s >= grades::D_MIN => "D",
            _ => "F",
        }
    }

    /// Score for one category.
    pub fn score_for(&self, category: Category) -> u32 {
        self.breakdown.get(&category).copied().unwrap_or(0)
    }

    /// Findings for one category.
    pub fn findings_for(&self, category: Category) -> &[Finding] {
        self.details
            .iter()
            .find(|d| d.category == category)
            .map(|d| d.findings.as_slice())
            .unwrap_or(&[])
    }
}

/// Combine per-category outcomes into a report.
///
/// Rule errors become a zero score with a warning; scores above a
/// category's maximum are clamped; missing categories score zero.
pub fn aggregate(outcomes: Vec<RuleOutcome>) -> AnalysisReport {
    let mut results: BTreeMap<Category, CategoryResult> = BTreeMap::new();

    for outcome in outcomes {
        let result = match outcome {
            Ok(mut result) => {
                result.score = result.score.min(result.category.max_points());
                result
            }
            Err(err) => {
                tracing::warn!(
                    category = %err.category(),
                    code = err.code(),
                    error = %err,
                    "category evaluation failed; scoring it as zero"
                );
                CategoryResult::zero(
                    err.category(),
                    Finding::warn(format!(
                        "{} could not be evaluated ({}): {}",
                        err.category().label(),
                        err.code(),
                        err
                    )),
                )
            }
        };
        results.entry(result.category).or_insert(result);
    }

    let details: Vec<CategoryResult> = Category::ALL
        .iter()
        .map(|category| {
            results.remove(category).unwrap_or_else(|| CategoryResult {
                category: *category,
                score: 0,
                findings: Vec::new(),
            })
        })
        .collect();

    for detail in &details {
        tracing::debug!(category = %detail.category, score = detail.score, "category scored");
    }

    let breakdown: BTreeMap<Category, u32> =
        details.iter().map(|d| (d.category, d.score)).collect();
    let overall_score = breakdown.values().sum();
    let recommendations = details
        .iter()
        .flat_map(|d| d.findings.iter().map(Finding::render))
        .collect();

    AnalysisReport {
        overall_score,
        breakdown,
        recommendations,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleError;

    fn result(category: Category, score: u32, findings: &[&str]) -> RuleOutcome {
        Ok(CategoryResult {
            category,
            score,
            findings: findings.iter().map(|m| Finding::warn(*m)).collect(),
        })
    }

    fn full_outcomes() -> Vec<RuleOutcome> {
        Category::ALL
            .iter()
            .map(|c| result(*c, c.max_points(), &[]))
            .collect()
    }

    #[test]
    fn test_sum_of_categories() {
        let report = aggregate(full_outcomes());
        assert_eq!(report.overall_score, 100);
        assert_eq!(report.grade(), "A");
        assert!(report.recommendations.is_empty());
        assert_eq!(report.breakdown.len(), 6);
    }

    #[test]
    fn test_clamps_to_category_max() {
        let mut outcomes = full_outcomes();
        outcomes[0] = result(Category::Naming, 50, &[]);
        let report = aggregate(outcomes);
        assert_eq!(report.score_for(Category::Naming), 10);
        assert_eq!(report.overall_score, 100);
    }

    #[test]
    fn test_rule_error_recovered_as_zero() {
        let mut outcomes = full_outcomes();
        outcomes[5] = Err(RuleError::InvalidPattern {
            category: Category::BestPractices,
            pattern: "(".to_string(),
            reason: "unclosed group".to_string(),
        });
        let report = aggregate(outcomes);
        assert_eq!(report.score_for(Category::BestPractices), 0);
        assert_eq!(report.overall_score, 80);
        assert_eq!(report.recommendations.len(), 1);
        assert!(report.recommendations[0].contains("INTERNAL_RULE_ERROR"));
    }

    #[test]
    fn test_missing_categories_filled() {
        let report = aggregate(vec![result(Category::Comments, 12, &["Module has no docstring"])]);
        assert_eq!(report.breakdown.len(), 6);
        assert_eq!(report.overall_score, 12);
        assert_eq!(report.score_for(Category::Naming), 0);
    }

    #[test]
    fn test_recommendations_follow_category_order() {
        let outcomes = vec![
            result(Category::BestPractices, 18, &["practice"]),
            result(Category::Naming, 8, &["naming"]),
            result(Category::Formatting, 13, &["formatting"]),
        ];
        let report = aggregate(outcomes);
        assert_eq!(report.recommendations, vec!["naming", "formatting", "practice"]);
    }

    #[test]
    fn test_no_praise_for_high_scores() {
        let mut outcomes = full_outcomes();
        outcomes[3] = result(Category::Formatting, 13, &["Trailing whitespace on 1 line"]);
        let report = aggregate(outcomes);
        assert_eq!(report.overall_score, 98);
        assert_eq!(report.recommendations, vec!["Trailing whitespace on 1 line"]);
    }

    #[test]
    fn test_grades() {
        let mut report = aggregate(full_outcomes());
        for (score, grade) in [(90, "A"), (89, "B"), (80, "B"), (70, "C"), (60, "D"), (59, "F"), (0, "F")] {
            report.overall_score = score;
            assert_eq!(report.grade(), grade);
        }
    }

    #[test]
    fn test_json_shape() {
        let report = aggregate(full_outcomes());
        let value = serde_json::to_value(&report).unwrap();
        let keys: Vec<&String> = value["breakdown"].as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            vec!["best_practices", "comments", "formatting", "modularity", "naming", "reusability"]
        );
        assert!(value.get("details").is_none());
        assert_eq!(value["overall_score"], 100);
    }
}
