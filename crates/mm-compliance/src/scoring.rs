//! Per-category scoring: converts trigger matches into violations, soft
//! warnings, and 0-100 category scores

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::compiled_rules::CompiledRuleSet;
use crate::types::{
    CategoryResult, ComplianceCategory, TriggerMatch, ValidationRequest, Violation, Warning,
    Severity,
};

/// Severity-indexed penalties and the per-category compliance threshold
///
/// The defaults (30/20/10/5, threshold 70) are the documented heuristics from
/// the rule tables; hosts may override them through configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub critical_penalty: u32,
    pub high_penalty: u32,
    pub medium_penalty: u32,
    pub low_penalty: u32,
    /// A category is compliant when its score is at or above this
    pub category_compliance_threshold: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            critical_penalty: 30,
            high_penalty: 20,
            medium_penalty: 10,
            low_penalty: 5,
            category_compliance_threshold: 70,
        }
    }
}

impl ScoringConfig {
    /// Penalty applied per match of the given severity
    pub fn penalty(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical_penalty,
            Severity::High => self.high_penalty,
            Severity::Medium => self.medium_penalty,
            Severity::Low => self.low_penalty,
        }
    }
}

/// A soft-warning rule: a claim term that requires a companion evidence term
/// somewhere in the same content
///
/// Warnings never reduce a category score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningRule {
    pub category: ComplianceCategory,
    pub claim_terms: Vec<String>,
    pub evidence_terms: Vec<String>,
    /// Only applied when the target audience is lay readers
    #[serde(default)]
    pub patient_facing_only: bool,
    pub description: String,
    pub recommendation: String,
}

impl WarningRule {
    fn first_claim_hit<'a>(&'a self, content_lower: &str) -> Option<&'a str> {
        self.claim_terms
            .iter()
            .find(|t| content_lower.contains(t.to_lowercase().as_str()))
            .map(|t| t.as_str())
    }

    fn has_evidence(&self, content_lower: &str) -> bool {
        self.evidence_terms
            .iter()
            .any(|t| content_lower.contains(t.to_lowercase().as_str()))
    }
}

/// Output of the scoring pass, consumed by the aggregator
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub categories: BTreeMap<ComplianceCategory, CategoryResult>,
    pub violations: Vec<Violation>,
    pub warnings: Vec<Warning>,
}

/// Score all categories for one request
///
/// Every category starts at 100 and loses a severity-indexed penalty per
/// match, floored at 0. Every category appears in the output map even with no
/// matches.
pub fn score(
    matches: &[TriggerMatch],
    set: &CompiledRuleSet,
    request: &ValidationRequest,
    warning_rules: &[WarningRule],
    config: &ScoringConfig,
) -> ScoreBreakdown {
    let mut scores: BTreeMap<ComplianceCategory, i64> =
        ComplianceCategory::ALL.iter().map(|c| (*c, 100)).collect();
    let mut violations = Vec::new();

    for m in matches {
        let Some(meta) = set.metadata.get(m.trigger_index) else {
            continue;
        };
        let penalty = config.penalty(m.severity);
        if let Some(score) = scores.get_mut(&m.category) {
            *score -= i64::from(penalty);
        }
        violations.push(Violation {
            severity: m.severity,
            category: m.category,
            description: meta.description.clone(),
            found_text: m.found_text.clone(),
            reference: meta.code.clone(),
            penalty,
            suggested_fix: suggested_fix(&meta.recommendation, &meta.alternatives),
        });
    }

    let warnings = soft_warnings(request, warning_rules);

    let mut categories = BTreeMap::new();
    for category in ComplianceCategory::ALL {
        let score = scores[&category].clamp(0, 100) as u8;

        let mut issues = Vec::new();
        let mut recommendations = Vec::new();
        for v in violations.iter().filter(|v| v.category == category) {
            issues.push(format!("{} (found \"{}\")", v.description, v.found_text));
            push_unique(&mut recommendations, &v.suggested_fix);
        }
        for w in warnings.iter().filter(|w| w.category == category) {
            push_unique(&mut recommendations, &w.recommendation);
        }

        categories.insert(
            category,
            CategoryResult {
                category,
                score,
                compliant: score >= config.category_compliance_threshold,
                issues,
                recommendations,
            },
        );
    }

    ScoreBreakdown {
        categories,
        violations,
        warnings,
    }
}

/// Evaluate warning rules and caller flags against the content
fn soft_warnings(request: &ValidationRequest, warning_rules: &[WarningRule]) -> Vec<Warning> {
    let content_lower = request.content.to_lowercase();
    let mut warnings = Vec::new();

    for rule in warning_rules {
        if rule.patient_facing_only && !request.target_audience.is_patient_facing() {
            continue;
        }
        if let Some(term) = rule.first_claim_hit(&content_lower) {
            if !rule.has_evidence(&content_lower) {
                warnings.push(Warning {
                    category: rule.category,
                    description: rule.description.clone(),
                    found_text: term.to_string(),
                    recommendation: rule.recommendation.clone(),
                });
            }
        }
    }

    if request.flags.includes_medical_claims {
        warnings.push(Warning {
            category: ComplianceCategory::TherapeuticClaims,
            description: "Author flagged that this content makes medical claims".into(),
            found_text: String::new(),
            recommendation: "Ensure every medical claim is supported by cited evidence.".into(),
        });
    }
    if request.flags.mentions_medications {
        warnings.push(Warning {
            category: ComplianceCategory::MedicinesMention,
            description: "Author flagged that this content mentions medications".into(),
            found_text: String::new(),
            recommendation:
                "Review medication references against the advertising permissions for scheduled substances."
                    .into(),
        });
    }
    if request.flags.includes_device_claims {
        warnings.push(Warning {
            category: ComplianceCategory::TherapeuticClaims,
            description: "Author flagged that this content makes medical device claims".into(),
            found_text: String::new(),
            recommendation: "Check device claims against the product's ARTG inclusion.".into(),
        });
    }

    warnings
}

fn suggested_fix(recommendation: &str, alternatives: &[String]) -> String {
    if alternatives.is_empty() {
        recommendation.to_string()
    } else {
        format!("{} Consider: {}.", recommendation, alternatives.join(", "))
    }
}

pub(crate) fn push_unique(list: &mut Vec<String>, candidate: &str) {
    if !list.iter().any(|s| s == candidate) {
        list.push(candidate.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner;
    use crate::types::{ContentFlags, Rule, TargetAudience, Trigger};
    use test_case::test_case;

    fn rule(id: &str, severity: Severity, trigger: &str) -> Rule {
        Rule {
            id: id.to_string(),
            category: ComplianceCategory::TherapeuticClaims,
            severity,
            triggers: vec![Trigger::Phrase(trigger.to_string())],
            code: "TGA Advertising Code".to_string(),
            description: format!("{trigger} rule"),
            recommendation: format!("remove {trigger}"),
            alternatives: vec![],
            active: true,
        }
    }

    fn score_content(rules: &[Rule], content: &str) -> ScoreBreakdown {
        let set = CompiledRuleSet::compile(1, rules);
        let request = ValidationRequest::new(content);
        let matches = scanner::scan(content, &set);
        score(&matches, &set, &request, &[], &ScoringConfig::default())
    }

    #[test_case(Severity::Critical, 70 ; "critical costs 30")]
    #[test_case(Severity::High, 80 ; "high costs 20")]
    #[test_case(Severity::Medium, 90 ; "medium costs 10")]
    #[test_case(Severity::Low, 95 ; "low costs 5")]
    fn test_single_match_penalty(severity: Severity, expected: u8) {
        let breakdown = score_content(&[rule("r1", severity, "banned")], "this is banned text");
        let result = &breakdown.categories[&ComplianceCategory::TherapeuticClaims];
        assert_eq!(result.score, expected);
        assert_eq!(breakdown.violations.len(), 1);
        assert_eq!(breakdown.violations[0].severity, severity);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let rules: Vec<Rule> = (0..4)
            .map(|i| rule(&format!("r{i}"), Severity::Critical, ["a1", "a2", "a3", "a4"][i]))
            .collect();
        let breakdown = score_content(&rules, "a1 a2 a3 a4");
        let result = &breakdown.categories[&ComplianceCategory::TherapeuticClaims];
        assert_eq!(result.score, 0);
        assert!(!result.compliant);
        assert_eq!(breakdown.violations.len(), 4);
    }

    #[test]
    fn test_untouched_categories_score_100() {
        let breakdown = score_content(&[rule("r1", Severity::High, "banned")], "clean copy");
        for category in ComplianceCategory::ALL {
            let result = &breakdown.categories[&category];
            assert_eq!(result.score, 100);
            assert!(result.compliant);
            assert!(result.issues.is_empty());
        }
    }

    #[test]
    fn test_category_compliance_threshold() {
        // Two high + one medium = 50 points off
        let rules = vec![
            rule("r1", Severity::High, "alpha"),
            rule("r2", Severity::High, "beta"),
            rule("r3", Severity::Medium, "gamma"),
        ];
        let breakdown = score_content(&rules, "alpha beta gamma");
        let result = &breakdown.categories[&ComplianceCategory::TherapeuticClaims];
        assert_eq!(result.score, 50);
        assert!(!result.compliant);
    }

    #[test]
    fn test_warning_without_evidence() {
        let request = ValidationRequest::new("Our program is highly effective.");
        let warnings = soft_warnings(&request, &crate::sources::builtin::warning_rules());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, ComplianceCategory::TherapeuticClaims);
        assert_eq!(warnings[0].found_text, "effective");
    }

    #[test]
    fn test_no_warning_with_evidence() {
        let request =
            ValidationRequest::new("Our program is effective, as shown in a 2023 clinical trial.");
        let warnings = soft_warnings(&request, &crate::sources::builtin::warning_rules());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_patient_facing_warning_skipped_for_practitioners() {
        let mut request = ValidationRequest::new("The procedure is contraindicated in pregnancy.");
        request.target_audience = TargetAudience::Practitioners;
        let warnings = soft_warnings(&request, &crate::sources::builtin::warning_rules());
        assert!(warnings.is_empty());

        request.target_audience = TargetAudience::Patients;
        let warnings = soft_warnings(&request, &crate::sources::builtin::warning_rules());
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].category,
            ComplianceCategory::AudienceAppropriateness
        );
    }

    #[test]
    fn test_flag_driven_warnings() {
        let mut request = ValidationRequest::new("General wellness update.");
        request.flags = ContentFlags {
            includes_medical_claims: false,
            mentions_medications: true,
            includes_device_claims: true,
        };
        let warnings = soft_warnings(&request, &[]);
        assert_eq!(warnings.len(), 2);
        assert!(warnings
            .iter()
            .any(|w| w.category == ComplianceCategory::MedicinesMention));
        assert!(warnings
            .iter()
            .any(|w| w.category == ComplianceCategory::TherapeuticClaims));
    }

    #[test]
    fn test_warnings_do_not_reduce_score() {
        let set = CompiledRuleSet::compile(1, &[]);
        let request = ValidationRequest::new("Our program is highly effective.");
        let breakdown = score(
            &[],
            &set,
            &request,
            &crate::sources::builtin::warning_rules(),
            &ScoringConfig::default(),
        );
        assert_eq!(breakdown.warnings.len(), 1);
        assert_eq!(
            breakdown.categories[&ComplianceCategory::TherapeuticClaims].score,
            100
        );
        // The warning's recommendation still lands on the category result
        assert_eq!(
            breakdown.categories[&ComplianceCategory::TherapeuticClaims]
                .recommendations
                .len(),
            1
        );
    }

    #[test]
    fn test_suggested_fix_includes_alternatives() {
        let mut r = rule("r1", Severity::Critical, "cure");
        r.alternatives = vec!["may assist with".into()];
        let breakdown = score_content(&[r], "we cure everything");
        assert_eq!(
            breakdown.violations[0].suggested_fix,
            "remove cure Consider: may assist with."
        );
    }
}
