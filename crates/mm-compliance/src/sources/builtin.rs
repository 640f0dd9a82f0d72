//! Built-in default compliance rules
//!
//! Always available without a rule store. These are the conservative,
//! high-confidence rules the hosted rule table ships with; the catalog falls
//! back to them whenever the store is unreachable or returns malformed data.
//!
//! References: Therapeutic Goods (Therapeutic Goods Advertising Code)
//! Instrument 2021, Therapeutic Goods Act 1989, and the Health Practitioner
//! Regulation National Law s.133 advertising provisions.

use crate::scoring::WarningRule;
use crate::types::{ComplianceCategory, Rule, Severity, Trigger};

fn phrases(list: &[&str]) -> Vec<Trigger> {
    list.iter().map(|p| Trigger::Phrase((*p).to_string())).collect()
}

/// Get all built-in rules
pub fn default_rules() -> Vec<Rule> {
    let mut rules = Vec::new();

    rules.extend(therapeutic_claims_rules());
    rules.extend(medicines_mention_rules());
    rules.extend(professional_boundaries_rules());
    rules.extend(patient_safety_rules());
    rules.extend(audience_appropriateness_rules());

    rules
}

fn therapeutic_claims_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "builtin-tc-001".into(),
            category: ComplianceCategory::TherapeuticClaims,
            severity: Severity::Critical,
            triggers: phrases(&["cure", "cures", "curing", "cured"]),
            code: "TGA Advertising Code s.9(2)".into(),
            description: "Claims to cure a condition".into(),
            recommendation: "Remove cure claims and describe the treatment without guaranteeing an outcome.".into(),
            alternatives: vec![
                "may assist in the management of".into(),
                "is used to support".into(),
            ],
            active: true,
        },
        Rule {
            id: "builtin-tc-002".into(),
            category: ComplianceCategory::TherapeuticClaims,
            severity: Severity::Critical,
            triggers: phrases(&[
                "guaranteed results",
                "guaranteed outcome",
                "100% effective",
                "never fails",
                "always works",
            ]),
            code: "TGA Advertising Code s.9(2)(a)".into(),
            description: "Guarantees a therapeutic outcome".into(),
            recommendation: "Remove outcome guarantees; individual results vary and cannot be promised.".into(),
            alternatives: vec!["many patients report improvement with".into()],
            active: true,
        },
        Rule {
            id: "builtin-tc-003".into(),
            category: ComplianceCategory::TherapeuticClaims,
            severity: Severity::High,
            triggers: phrases(&["miracle", "miraculous", "magic treatment", "wonder treatment"]),
            code: "TGA Advertising Code s.9(2)(b)".into(),
            description: "Uses miracle or magical language for a therapeutic good or service".into(),
            recommendation: "Replace miracle language with a factual description of the treatment.".into(),
            alternatives: vec![],
            active: true,
        },
        Rule {
            id: "builtin-tc-004".into(),
            category: ComplianceCategory::TherapeuticClaims,
            severity: Severity::High,
            triggers: phrases(&[
                "completely safe",
                "no side effects",
                "risk-free",
                "zero risk",
                "no risks",
            ]),
            code: "TGA Advertising Code s.9(2)(c)".into(),
            description: "Represents the treatment as free of harm or risk".into(),
            recommendation: "Remove absolute safety claims; all treatments carry some risk and this must not be denied.".into(),
            alternatives: vec!["generally well tolerated".into()],
            active: true,
        },
        Rule {
            id: "builtin-tc-005".into(),
            category: ComplianceCategory::TherapeuticClaims,
            severity: Severity::Medium,
            triggers: phrases(&["clinically proven", "scientifically proven", "doctor recommended"]),
            code: "TGA Advertising Code s.10".into(),
            description: "Evidence claim without identified supporting evidence".into(),
            recommendation: "Only state that a result is proven if you cite the supporting study.".into(),
            alternatives: vec!["supported by published research (cite it)".into()],
            active: true,
        },
    ]
}

fn medicines_mention_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "builtin-mm-001".into(),
            category: ComplianceCategory::MedicinesMention,
            severity: Severity::Critical,
            triggers: phrases(&["botox", "ozempic", "dysport", "wegovy", "valium", "viagra"]),
            code: "Therapeutic Goods Act 1989 s.42DL".into(),
            description: "Advertises a prescription-only medicine by name".into(),
            recommendation: "Remove prescription medicine brand names; advertising prescription-only medicines to the public is prohibited.".into(),
            alternatives: vec![
                "anti-wrinkle injections (discussed at consultation)".into(),
                "prescription weight-management options".into(),
            ],
            active: true,
        },
        Rule {
            id: "builtin-mm-002".into(),
            category: ComplianceCategory::MedicinesMention,
            severity: Severity::High,
            triggers: phrases(&[
                "prescription strength",
                "schedule 4",
                "schedule 8",
                "s4 medication",
            ]),
            code: "Therapeutic Goods Act 1989 s.42DL".into(),
            description: "References scheduled substances in advertising".into(),
            recommendation: "Remove references to scheduled or prescription-strength substances from public content.".into(),
            alternatives: vec![],
            active: true,
        },
        Rule {
            id: "builtin-mm-003".into(),
            category: ComplianceCategory::MedicinesMention,
            severity: Severity::Medium,
            triggers: phrases(&["discount medication", "cheap medication", "free samples"]),
            code: "TGA Advertising Code s.16".into(),
            description: "Price-led promotion of medicines".into(),
            recommendation: "Avoid discount or free-sample offers for medicines.".into(),
            alternatives: vec![],
            active: true,
        },
    ]
}

fn professional_boundaries_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "builtin-pb-001".into(),
            category: ComplianceCategory::ProfessionalBoundaries,
            severity: Severity::High,
            triggers: phrases(&[
                "testimonial",
                "testimonials",
                "patients say",
                "our patients love",
                "success stories",
            ]),
            code: "National Law s.133(1)(c)".into(),
            description: "Uses patient testimonials in advertising a regulated health service".into(),
            recommendation: "Remove testimonials; advertising regulated health services with testimonials is prohibited.".into(),
            alternatives: vec!["describe the service and practitioner qualifications instead".into()],
            active: true,
        },
        Rule {
            id: "builtin-pb-002".into(),
            category: ComplianceCategory::ProfessionalBoundaries,
            severity: Severity::Medium,
            triggers: phrases(&[
                "best dentist",
                "best doctor",
                "best physio",
                "top specialist",
                "leading specialist",
                "#1",
            ]),
            code: "National Law s.133(1)(a)".into(),
            description: "Comparative or superiority claim about a practitioner".into(),
            recommendation: "Remove comparative claims; describe qualifications and services factually.".into(),
            alternatives: vec!["experienced".into(), "accredited".into()],
            active: true,
        },
        Rule {
            id: "builtin-pb-003".into(),
            category: ComplianceCategory::ProfessionalBoundaries,
            severity: Severity::Low,
            triggers: phrases(&["world-class", "renowned", "award-winning care"]),
            code: "AHPRA Advertising Guidelines".into(),
            description: "Promotional superlatives that may create unreasonable expectations".into(),
            recommendation: "Tone down superlatives that cannot be substantiated.".into(),
            alternatives: vec![],
            active: true,
        },
    ]
}

fn patient_safety_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "builtin-ps-001".into(),
            category: ComplianceCategory::PatientSafety,
            severity: Severity::Critical,
            triggers: phrases(&[
                "instead of calling 000",
                "avoid the emergency room",
                "no need to see a doctor",
                "skip the gp",
            ]),
            code: "AHPRA Advertising Guidelines s.6".into(),
            description: "Discourages appropriate emergency or medical care".into(),
            recommendation: "Never discourage readers from seeking emergency or medical care; direct them to it.".into(),
            alternatives: vec![],
            active: true,
        },
        Rule {
            id: "builtin-ps-002".into(),
            category: ComplianceCategory::PatientSafety,
            severity: Severity::Critical,
            triggers: phrases(&[
                "stop taking your medication",
                "discontinue your medication",
                "throw away your pills",
            ]),
            code: "AHPRA Advertising Guidelines s.6".into(),
            description: "Advises readers to stop prescribed treatment".into(),
            recommendation: "Remove advice to alter or stop prescribed treatment; that decision belongs with the prescriber.".into(),
            alternatives: vec!["discuss your medication with your prescribing doctor".into()],
            active: true,
        },
        Rule {
            id: "builtin-ps-003".into(),
            category: ComplianceCategory::PatientSafety,
            severity: Severity::High,
            triggers: phrases(&["self-diagnose", "diagnose yourself", "you don't need a diagnosis"]),
            code: "AHPRA Advertising Guidelines s.6".into(),
            description: "Encourages self-diagnosis".into(),
            recommendation: "Encourage readers to seek a professional assessment rather than self-diagnosing.".into(),
            alternatives: vec![],
            active: true,
        },
    ]
}

fn audience_appropriateness_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "builtin-aa-001".into(),
            category: ComplianceCategory::AudienceAppropriateness,
            severity: Severity::Medium,
            triggers: phrases(&[
                "before it's too late",
                "if you don't act now",
                "silent killer",
                "ticking time bomb",
            ]),
            code: "TGA Advertising Code s.9(2)(d)".into(),
            description: "Fear-based appeal likely to cause undue alarm".into(),
            recommendation: "Replace fear-based phrasing with calm, factual information.".into(),
            alternatives: vec![],
            active: true,
        },
        Rule {
            id: "builtin-aa-002".into(),
            category: ComplianceCategory::AudienceAppropriateness,
            severity: Severity::Medium,
            triggers: phrases(&["limited time offer", "act now", "today only", "book now before"]),
            code: "TGA Advertising Code s.9(2)(e)".into(),
            description: "Urgency pressure encouraging unnecessary or rushed treatment".into(),
            recommendation: "Remove urgency pressure around health decisions.".into(),
            alternatives: vec![],
            active: true,
        },
        Rule {
            id: "builtin-aa-003".into(),
            category: ComplianceCategory::AudienceAppropriateness,
            severity: Severity::Low,
            triggers: phrases(&["lose weight fast", "rapid weight loss", "drop a dress size"]),
            code: "TGA Advertising Code s.16".into(),
            description: "Rapid-result weight loss phrasing".into(),
            recommendation: "Describe weight management in realistic, sustainable terms.".into(),
            alternatives: vec!["supports gradual, sustainable weight management".into()],
            active: true,
        },
    ]
}

/// Soft-warning rules applied by the scorer
///
/// These never reduce a score; they flag a claim term used without any of
/// its required companion evidence terms appearing in the content.
pub fn warning_rules() -> Vec<WarningRule> {
    vec![
        WarningRule {
            category: ComplianceCategory::TherapeuticClaims,
            claim_terms: vec![
                "effective".into(),
                "proven".into(),
                "success rate".into(),
                "results".into(),
            ],
            evidence_terms: vec![
                "study".into(),
                "studies".into(),
                "clinical".into(),
                "evidence".into(),
                "research".into(),
                "trial".into(),
                "peer-reviewed".into(),
            ],
            patient_facing_only: false,
            description: "Efficacy language used without supporting evidence cited".into(),
            recommendation: "Cite the supporting study or reference, or soften the efficacy claim.".into(),
        },
        WarningRule {
            category: ComplianceCategory::MedicinesMention,
            claim_terms: vec!["medication".into(), "medicine".into(), "dosage".into()],
            evidence_terms: vec![
                "consult".into(),
                "doctor".into(),
                "gp".into(),
                "pharmacist".into(),
                "prescriber".into(),
            ],
            patient_facing_only: true,
            description: "Medication discussion without a consult-your-practitioner prompt".into(),
            recommendation: "Add a prompt to discuss medication decisions with a doctor or pharmacist.".into(),
        },
        WarningRule {
            category: ComplianceCategory::AudienceAppropriateness,
            claim_terms: vec![
                "contraindicated".into(),
                "comorbidity".into(),
                "idiopathic".into(),
                "aetiology".into(),
            ],
            evidence_terms: vec![
                "meaning".into(),
                "in other words".into(),
                "which means".into(),
                "that is,".into(),
            ],
            patient_facing_only: true,
            description: "Clinical jargon likely unfamiliar to a lay audience".into(),
            recommendation: "Explain clinical terms in plain language for patient-facing content.".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_ids_unique() {
        let rules = default_rules();
        let ids: HashSet<_> = rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn test_every_category_covered() {
        let rules = default_rules();
        for category in ComplianceCategory::ALL {
            assert!(
                rules.iter().any(|r| r.category == category),
                "no built-in rules for {category}"
            );
        }
    }

    #[test]
    fn test_all_rules_have_triggers_and_recommendations() {
        for rule in default_rules() {
            assert!(!rule.triggers.is_empty(), "{} has no triggers", rule.id);
            assert!(!rule.recommendation.is_empty(), "{} has no recommendation", rule.id);
            assert!(!rule.code.is_empty(), "{} has no regulatory code", rule.id);
            assert!(rule.active);
        }
    }

    #[test]
    fn test_cure_rule_is_critical() {
        let rules = default_rules();
        let cure = rules.iter().find(|r| r.id == "builtin-tc-001").unwrap();
        assert_eq!(cure.severity, Severity::Critical);
        assert_eq!(cure.category, ComplianceCategory::TherapeuticClaims);
    }
}
