//! Regulatory content compliance scoring engine
//!
//! Scores practitioner-authored marketing content against regulatory rule
//! sets (therapeutic advertising claims, professional boundaries, patient
//! safety phrasing) before publication, producing a single compliance
//! verdict with per-category breakdowns and remediation advice.
//!
//! # Architecture
//!
//! - **Catalog**: versioned rule snapshots; built-in defaults, fail-closed
//!   refresh from a host-provided store, atomic swap for concurrent scans
//! - **Scanner**: compiled trigger matching (RegexSet) over content
//! - **Scorer**: per-category 0-100 scores, violations, and soft warnings
//! - **Aggregator**: weighted overall score plus compliant/requires-review
//!   verdicts with critical-severity veto
//! - **Recommendations**: deduplicated remediation list
//! - **AuditSink**: fire-and-forget redacted evaluation records
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use mm_compliance::{ComplianceEngine, EngineConfig, RuleCatalog, ValidationRequest};
//!
//! let catalog = Arc::new(RuleCatalog::builtin());
//! let engine = ComplianceEngine::new(catalog, EngineConfig::default()).unwrap();
//!
//! let result = engine.validate(&ValidationRequest::new(
//!     "This treatment will cure your condition.",
//! ));
//! assert!(!result.is_compliant);
//! ```

pub mod aggregate;
pub mod audit;
pub mod catalog;
pub mod compiled_rules;
pub mod engine;
pub mod recommend;
pub mod scanner;
pub mod scoring;
pub mod sources;
pub mod types;

pub use aggregate::{CategoryWeights, VerdictThresholds};
pub use audit::{AuditRecord, AuditSink};
pub use catalog::{CatalogError, RuleCatalog, RuleStore};
pub use engine::{ComplianceEngine, EngineConfig};
pub use scoring::{ScoringConfig, WarningRule};
pub use types::*;

/// Validate that a trigger regex pattern compiles successfully
pub fn validate_trigger_pattern(pattern: &str) -> Result<(), String> {
    regex::Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| e.to_string())
}
