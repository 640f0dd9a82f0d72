//! Type definitions for the compliance scoring engine

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Scored compliance category
///
/// Each category is scored independently before weighted aggregation, and the
/// set is closed so the scorer and aggregator can match exhaustively.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceCategory {
    TherapeuticClaims,
    MedicinesMention,
    ProfessionalBoundaries,
    PatientSafety,
    AudienceAppropriateness,
}

impl ComplianceCategory {
    /// All categories, in scoring/reporting order
    pub const ALL: [ComplianceCategory; 5] = [
        Self::TherapeuticClaims,
        Self::MedicinesMention,
        Self::ProfessionalBoundaries,
        Self::PatientSafety,
        Self::AudienceAppropriateness,
    ];
}

impl std::fmt::Display for ComplianceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TherapeuticClaims => write!(f, "Therapeutic Claims"),
            Self::MedicinesMention => write!(f, "Medicines Mention"),
            Self::ProfessionalBoundaries => write!(f, "Professional Boundaries"),
            Self::PatientSafety => write!(f, "Patient Safety"),
            Self::AudienceAppropriateness => write!(f, "Audience Appropriateness"),
        }
    }
}

/// Severity level of a rule
///
/// Ordered: `Low < Medium < High < Critical`. Severity controls both the
/// score penalty and veto power over the overall verdict.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

impl Severity {
    /// Parse severity from string (case-insensitive)
    pub fn from_str_lenient(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => Self::Medium,
        }
    }
}

/// Rule domain, matching the three validator surfaces in the product
///
/// The rule store may scope its result to a domain; the built-in defaults
/// cover all of them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceDomain {
    #[default]
    TherapeuticAdvertising,
    ProfessionalConduct,
    PatientAppropriateness,
}

impl std::fmt::Display for ComplianceDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TherapeuticAdvertising => write!(f, "therapeutic_advertising"),
            Self::ProfessionalConduct => write!(f, "professional_conduct"),
            Self::PatientAppropriateness => write!(f, "patient_appropriateness"),
        }
    }
}

/// A rule trigger: a literal phrase (case-insensitive, word-boundary matched)
/// or a raw regex pattern for rules that need more than a phrase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Phrase(String),
    Pattern(String),
}

/// A compliance rule as loaded from the store or the built-in defaults
///
/// Immutable once loaded; uniquely identified by `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rule {
    pub id: String,
    pub category: ComplianceCategory,
    pub severity: Severity,
    /// Ordered list of triggers; each one is matched independently
    pub triggers: Vec<Trigger>,
    /// External regulatory reference, e.g. "TGA Advertising Code s.9"
    pub code: String,
    pub description: String,
    pub recommendation: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Content type being validated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    BlogPost,
    SocialPost,
    WebsiteCopy,
    EmailNewsletter,
    PatientHandout,
}

/// Practitioner specialty of the authoring practice
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    #[default]
    GeneralPractice,
    Dentistry,
    Physiotherapy,
    Psychology,
    Podiatry,
    Pharmacy,
}

/// Intended audience for the content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TargetAudience {
    #[default]
    GeneralPublic,
    Patients,
    Practitioners,
}

impl TargetAudience {
    /// Whether this audience is lay (non-practitioner) readers
    pub fn is_patient_facing(&self) -> bool {
        matches!(self, Self::GeneralPublic | Self::Patients)
    }
}

/// Publication platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[default]
    Website,
    Facebook,
    Instagram,
    Email,
    GoogleAds,
}

/// Caller-declared flags about the content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContentFlags {
    #[serde(default)]
    pub includes_medical_claims: bool,
    #[serde(default)]
    pub mentions_medications: bool,
    #[serde(default)]
    pub includes_device_claims: bool,
}

/// A single content validation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    pub content: String,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub specialty: Specialty,
    #[serde(default)]
    pub target_audience: TargetAudience,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub flags: ContentFlags,
}

impl ValidationRequest {
    /// Build a request with default metadata (blog post, general practice,
    /// general public, website, no flags)
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: ContentType::default(),
            specialty: Specialty::default(),
            target_audience: TargetAudience::default(),
            platform: Platform::default(),
            flags: ContentFlags::default(),
        }
    }
}

/// A single trigger hit found by the scanner
///
/// One per matched trigger; a rule with five triggers can produce up to five
/// of these. Deduplication, if any, happens in the scorer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TriggerMatch {
    pub rule_id: String,
    /// Exact text matched in the content
    pub found_text: String,
    /// Byte offset of the match start in the content
    pub start: usize,
    /// Byte offset of the match end in the content
    pub end: usize,
    pub category: ComplianceCategory,
    pub severity: Severity,
    /// Index into the compiled rule set's trigger metadata
    pub trigger_index: usize,
}

/// A scored violation derived from a trigger match
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub category: ComplianceCategory,
    pub description: String,
    pub found_text: String,
    /// External regulatory reference from the rule
    pub reference: String,
    /// Points subtracted from the category score
    pub penalty: u32,
    pub suggested_fix: String,
}

/// A soft, non-penalized observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    pub category: ComplianceCategory,
    pub description: String,
    pub found_text: String,
    pub recommendation: String,
}

/// Per-category scoring outcome
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResult {
    pub category: ComplianceCategory,
    /// 0-100; starts at 100 and is decreased by penalties, floored at 0
    pub score: u8,
    pub compliant: bool,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Result of a full validation pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_compliant: bool,
    pub overall_score: u8,
    pub requires_review: bool,
    pub violations: Vec<Violation>,
    pub warnings: Vec<Warning>,
    /// Deduplicated, first-seen order
    pub recommendations: Vec<String>,
    pub categories: BTreeMap<ComplianceCategory, CategoryResult>,
    /// Number of compiled triggers evaluated
    pub rules_checked: usize,
    /// Wall-clock scan time; not part of the deterministic scoring output
    pub scan_duration_ms: u64,
}

impl ValidationResult {
    /// Check if any violations were found
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Check if any violation is critical
    pub fn has_critical(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Critical)
    }

    /// Highest severity among violations
    pub fn max_severity(&self) -> Option<Severity> {
        self.violations.iter().map(|v| v.severity).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
        assert_eq!(
            [Severity::High, Severity::Low, Severity::Critical]
                .iter()
                .max(),
            Some(&Severity::Critical)
        );
    }

    #[test]
    fn test_severity_from_str_lenient() {
        assert_eq!(Severity::from_str_lenient("CRITICAL"), Severity::Critical);
        assert_eq!(Severity::from_str_lenient("low"), Severity::Low);
        assert_eq!(Severity::from_str_lenient("bogus"), Severity::Medium);
    }

    #[test]
    fn test_violation_serializes_severity_as_type() {
        let v = Violation {
            severity: Severity::Critical,
            category: ComplianceCategory::TherapeuticClaims,
            description: "Claims to cure a condition".to_string(),
            found_text: "cure".to_string(),
            reference: "TGA Advertising Code s.9".to_string(),
            penalty: 30,
            suggested_fix: "Remove the cure claim".to_string(),
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["type"], "critical");
        assert_eq!(json["category"], "therapeutic_claims");
        assert_eq!(json["foundText"], "cure");
        assert_eq!(json["suggestedFix"], "Remove the cure claim");
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let req: ValidationRequest = serde_json::from_str(
            r#"{
                "content": "hello",
                "contentType": "social_post",
                "targetAudience": "patients",
                "flags": { "includesMedicalClaims": true }
            }"#,
        )
        .unwrap();
        assert_eq!(req.content_type, ContentType::SocialPost);
        assert_eq!(req.target_audience, TargetAudience::Patients);
        assert!(req.flags.includes_medical_claims);
        assert!(!req.flags.mentions_medications);
        assert_eq!(req.platform, Platform::Website);
    }

    #[test]
    fn test_rule_defaults_active() {
        let rule: Rule = serde_json::from_str(
            r#"{
                "id": "r1",
                "category": "patient_safety",
                "severity": "high",
                "triggers": [{"phrase": "self-diagnose"}],
                "code": "AHPRA Guidelines",
                "description": "d",
                "recommendation": "r"
            }"#,
        )
        .unwrap();
        assert!(rule.active);
        assert!(rule.alternatives.is_empty());
        assert_eq!(rule.triggers, vec![Trigger::Phrase("self-diagnose".into())]);
    }
}
