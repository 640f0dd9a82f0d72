//! Remediation recommendations derived from a validation result

use crate::scoring::push_unique;
use crate::types::{ComplianceCategory, Severity, ValidationResult};

/// Generic disclaimer appended whenever patient safety fails with a
/// high-or-worse violation, independent of the rule-specific fixes
const SAFETY_DISCLAIMER: &str = "Add a clear disclaimer directing readers to call 000 in an \
     emergency and to seek personalised advice from a registered practitioner.";

/// Template recommendation for a non-compliant category
fn category_template(category: ComplianceCategory) -> &'static str {
    match category {
        ComplianceCategory::TherapeuticClaims => {
            "Review all therapeutic claims against the TGA Advertising Code before publishing."
        }
        ComplianceCategory::MedicinesMention => {
            "Remove or rework references to prescription medicines and scheduled substances."
        }
        ComplianceCategory::ProfessionalBoundaries => {
            "Bring practitioner and testimonial content in line with National Law s.133."
        }
        ComplianceCategory::PatientSafety => {
            "Rework any content that could delay or discourage appropriate medical care."
        }
        ComplianceCategory::AudienceAppropriateness => {
            "Adjust tone and language to suit a lay health audience."
        }
    }
}

/// Derive the deduplicated remediation list for a result
///
/// Order: each violation's suggested fix (scan order), then the template
/// recommendation for each non-compliant category, then the safety
/// disclaimer when warranted. Duplicates (exact string equality) keep their
/// first-seen position.
pub fn recommend(result: &ValidationResult) -> Vec<String> {
    let mut recommendations = Vec::new();

    for violation in &result.violations {
        push_unique(&mut recommendations, &violation.suggested_fix);
    }

    for (category, category_result) in &result.categories {
        if !category_result.compliant {
            push_unique(&mut recommendations, category_template(*category));
        }
    }

    let safety_non_compliant = result
        .categories
        .get(&ComplianceCategory::PatientSafety)
        .map(|c| !c.compliant)
        .unwrap_or(false);
    let safety_high_or_worse = result.violations.iter().any(|v| {
        v.category == ComplianceCategory::PatientSafety && v.severity >= Severity::High
    });
    if safety_non_compliant && safety_high_or_worse {
        push_unique(&mut recommendations, SAFETY_DISCLAIMER);
    }

    recommendations
}
