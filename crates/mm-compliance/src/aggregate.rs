//! Weighted aggregation of category scores into the overall verdict

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mm_types::{AppError, AppResult};

use crate::scoring::ScoreBreakdown;
use crate::types::{ComplianceCategory, Severity, ValidationResult};

const WEIGHT_EPSILON: f64 = 1e-6;

/// Fixed per-engine category weights; must sum to 1.0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWeights(BTreeMap<ComplianceCategory, f64>);

impl Default for CategoryWeights {
    fn default() -> Self {
        Self(BTreeMap::from([
            (ComplianceCategory::TherapeuticClaims, 0.30),
            (ComplianceCategory::MedicinesMention, 0.15),
            (ComplianceCategory::ProfessionalBoundaries, 0.20),
            (ComplianceCategory::PatientSafety, 0.20),
            (ComplianceCategory::AudienceAppropriateness, 0.15),
        ]))
    }
}

impl CategoryWeights {
    /// Build from an explicit map; categories left out weigh 0.0
    pub fn new(weights: BTreeMap<ComplianceCategory, f64>) -> Self {
        Self(weights)
    }

    pub fn get(&self, category: ComplianceCategory) -> f64 {
        self.0.get(&category).copied().unwrap_or(0.0)
    }

    /// Validate the weight configuration; called at engine construction
    pub fn validate(&self) -> AppResult<()> {
        if let Some((category, w)) = self.0.iter().find(|(_, w)| **w < 0.0) {
            return Err(AppError::Config(format!(
                "negative weight {w} for category {category}"
            )));
        }
        let sum: f64 = self.0.values().sum();
        if (sum - 1.0).abs() > WEIGHT_EPSILON {
            return Err(AppError::Config(format!(
                "category weights sum to {sum}, expected 1.0"
            )));
        }
        Ok(())
    }
}

/// Overall verdict thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictThresholds {
    /// Minimum overall score for compliance (critical violations veto it)
    pub compliant_min: u8,
    /// Scores below this require human review even when compliant
    pub review_below: u8,
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            compliant_min: 70,
            review_below: 85,
        }
    }
}

/// Combine category results into a single `ValidationResult`
///
/// The overall score is the weighted sum of category scores, rounded to the
/// nearest integer and clamped to 0..=100. A single critical violation
/// vetoes compliance regardless of the numeric score; any high-or-worse
/// violation requires review, as does an overall score below the review
/// threshold. Recommendations and telemetry are filled in by the engine.
pub fn aggregate(
    breakdown: ScoreBreakdown,
    weights: &CategoryWeights,
    thresholds: &VerdictThresholds,
) -> ValidationResult {
    let weighted: f64 = breakdown
        .categories
        .iter()
        .map(|(category, result)| f64::from(result.score) * weights.get(*category))
        .sum();
    let overall_score = weighted.round().clamp(0.0, 100.0) as u8;

    let has_critical = breakdown
        .violations
        .iter()
        .any(|v| v.severity == Severity::Critical);
    let has_high_or_worse = breakdown
        .violations
        .iter()
        .any(|v| v.severity >= Severity::High);

    let is_compliant = overall_score >= thresholds.compliant_min && !has_critical;
    let requires_review = overall_score < thresholds.review_below || has_high_or_worse;

    ValidationResult {
        is_compliant,
        overall_score,
        requires_review,
        violations: breakdown.violations,
        warnings: breakdown.warnings,
        recommendations: Vec::new(),
        categories: breakdown.categories,
        rules_checked: 0,
        scan_duration_ms: 0,
    }
}
