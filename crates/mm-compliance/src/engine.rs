//! Core validation engine
//!
//! Linear per-call pipeline: Request → Scan → Score → Aggregate → Recommend
//! → (async) Audit → Result. Each call is stateless and pure given the
//! active rule snapshot; concurrent calls need no locking.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use mm_types::AppResult;

use crate::aggregate::{self, CategoryWeights, VerdictThresholds};
use crate::audit::{self, AuditRecord, AuditSink};
use crate::catalog::RuleCatalog;
use crate::recommend;
use crate::scanner;
use crate::scoring::{self, ScoringConfig, WarningRule};
use crate::sources::builtin;
use crate::types::{
    CategoryResult, ComplianceCategory, Severity, ValidationRequest, ValidationResult, Violation,
};

/// Engine configuration; validated at construction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub weights: CategoryWeights,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub thresholds: VerdictThresholds,
}

/// The compliance scoring engine
pub struct ComplianceEngine {
    catalog: Arc<RuleCatalog>,
    config: EngineConfig,
    warning_rules: Vec<WarningRule>,
    audit_sink: Option<Arc<dyn AuditSink>>,
}

impl std::fmt::Debug for ComplianceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplianceEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ComplianceEngine {
    /// Create an engine over a catalog; fails fast on misconfigured weights
    pub fn new(catalog: Arc<RuleCatalog>, config: EngineConfig) -> AppResult<Self> {
        config.weights.validate()?;
        Ok(Self {
            catalog,
            config,
            warning_rules: builtin::warning_rules(),
            audit_sink: None,
        })
    }

    /// Attach an audit sink; evaluations are recorded fire-and-forget
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit_sink = Some(sink);
        self
    }

    /// Replace the default soft-warning rules
    pub fn with_warning_rules(mut self, rules: Vec<WarningRule>) -> Self {
        self.warning_rules = rules;
        self
    }

    /// The catalog backing this engine (for refresh scheduling)
    pub fn catalog(&self) -> &Arc<RuleCatalog> {
        &self.catalog
    }

    /// Validate one piece of content
    ///
    /// Always returns a well-formed result; input problems are reported as
    /// violations, never as errors.
    pub fn validate(&self, request: &ValidationRequest) -> ValidationResult {
        self.validate_for_actor(request, None)
    }

    /// Validate with an actor id recorded on the audit trail
    pub fn validate_for_actor(
        &self,
        request: &ValidationRequest,
        actor_id: Option<&str>,
    ) -> ValidationResult {
        let start = Instant::now();

        let mut result = if request.content.trim().is_empty() {
            missing_content_result(&self.config.scoring)
        } else {
            let set = self.catalog.active_set();
            let matches = scanner::scan(&request.content, &set);
            let breakdown = scoring::score(
                &matches,
                &set,
                request,
                &self.warning_rules,
                &self.config.scoring,
            );
            let mut result =
                aggregate::aggregate(breakdown, &self.config.weights, &self.config.thresholds);
            result.recommendations = recommend::recommend(&result);
            result.rules_checked = set.trigger_count;
            result
        };

        result.scan_duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Validated content: {} triggers checked, {} violations, {} warnings, score {}, {}ms",
            result.rules_checked,
            result.violations.len(),
            result.warnings.len(),
            result.overall_score,
            result.scan_duration_ms
        );

        if let Some(sink) = &self.audit_sink {
            audit::dispatch(
                sink.clone(),
                AuditRecord::new(request, &result, actor_id.map(str::to_string)),
            );
        }

        result
    }
}

/// Well-formed rejection for empty content
///
/// Reported under audience appropriateness, which owns content-presence
/// checks in the product's previewer.
fn missing_content_result(scoring: &ScoringConfig) -> ValidationResult {
    const FIX: &str = "Provide non-empty content to validate.";

    let violation = Violation {
        severity: Severity::Critical,
        category: ComplianceCategory::AudienceAppropriateness,
        description: "No content provided for validation".to_string(),
        found_text: String::new(),
        reference: "content_requirements".to_string(),
        penalty: 100,
        suggested_fix: FIX.to_string(),
    };

    let mut categories = std::collections::BTreeMap::new();
    for category in ComplianceCategory::ALL {
        let issues = if category == violation.category {
            vec![violation.description.clone()]
        } else {
            vec![]
        };
        categories.insert(
            category,
            CategoryResult {
                category,
                score: 0,
                compliant: scoring.category_compliance_threshold == 0,
                issues,
                recommendations: vec![],
            },
        );
    }

    ValidationResult {
        is_compliant: false,
        overall_score: 0,
        requires_review: true,
        violations: vec![violation],
        warnings: vec![],
        recommendations: vec![FIX.to_string()],
        categories,
        rules_checked: 0,
        scan_duration_ms: 0,
    }
}
