//! Compiled rule set wrapping regex::RegexSet for fast matching
//!
//! Triggers are compiled once per rule set load; a scan never compiles a
//! pattern.

use regex::{Regex, RegexSet};
use tracing::warn;

use crate::types::{ComplianceCategory, Rule, Severity, Trigger};

/// Metadata for a single compiled trigger (indexed alongside RegexSet patterns)
#[derive(Debug, Clone)]
pub struct TriggerMetadata {
    pub rule_id: String,
    pub category: ComplianceCategory,
    pub severity: Severity,
    pub code: String,
    pub description: String,
    pub recommendation: String,
    pub alternatives: Vec<String>,
    /// Pattern string the trigger compiled to
    pub pattern: String,
    /// Individually compiled pattern, used to pull the matched span out of
    /// the content after the RegexSet pass
    pub regex: Regex,
}

/// An immutable, compiled snapshot of the active rules
#[derive(Debug)]
pub struct CompiledRuleSet {
    /// Monotonic snapshot revision assigned by the catalog
    pub revision: u64,
    /// One pattern per trigger of every active rule
    pub regex_set: Option<RegexSet>,
    /// Metadata indexed to match `regex_set` patterns
    pub metadata: Vec<TriggerMetadata>,
    /// Number of distinct rules in this set
    pub rule_count: usize,
    /// Number of compiled triggers in this set
    pub trigger_count: usize,
}

impl CompiledRuleSet {
    /// Compile a list of rules into an optimized rule set
    ///
    /// Inactive rules are skipped. Triggers whose pattern fails to compile
    /// are skipped with a warning rather than failing the whole set.
    pub fn compile(revision: u64, rules: &[Rule]) -> Self {
        let mut patterns = Vec::new();
        let mut metadata = Vec::new();
        let mut rule_count = 0;

        for rule in rules {
            if !rule.active {
                continue;
            }
            let mut compiled_any = false;

            for trigger in &rule.triggers {
                let pattern = trigger_pattern(trigger);
                match Regex::new(&pattern) {
                    Ok(regex) => {
                        patterns.push(pattern.clone());
                        metadata.push(TriggerMetadata {
                            rule_id: rule.id.clone(),
                            category: rule.category,
                            severity: rule.severity,
                            code: rule.code.clone(),
                            description: rule.description.clone(),
                            recommendation: rule.recommendation.clone(),
                            alternatives: rule.alternatives.clone(),
                            pattern,
                            regex,
                        });
                        compiled_any = true;
                    }
                    Err(e) => {
                        warn!(
                            "Skipping invalid trigger pattern '{}' from rule '{}': {}",
                            pattern, rule.id, e
                        );
                    }
                }
            }

            if compiled_any {
                rule_count += 1;
            }
        }

        let regex_set = if patterns.is_empty() {
            None
        } else {
            match RegexSet::new(&patterns) {
                Ok(set) => Some(set),
                Err(e) => {
                    // Scanner falls back to the per-trigger regexes
                    warn!("Failed to compile combined regex set: {}", e);
                    None
                }
            }
        };

        let trigger_count = metadata.len();

        Self {
            revision,
            regex_set,
            metadata,
            rule_count,
            trigger_count,
        }
    }
}

/// Build the regex pattern for a trigger
///
/// Phrases become case-insensitive, escaped patterns with word boundaries on
/// word-character edges; raw patterns are used as-is.
fn trigger_pattern(trigger: &Trigger) -> String {
    match trigger {
        Trigger::Phrase(phrase) => {
            let escaped = regex::escape(phrase);
            let lead = phrase
                .chars()
                .next()
                .map(|c| c.is_alphanumeric() || c == '_')
                .unwrap_or(false);
            let trail = phrase
                .chars()
                .last()
                .map(|c| c.is_alphanumeric() || c == '_')
                .unwrap_or(false);
            format!(
                "(?i){}{}{}",
                if lead { r"\b" } else { "" },
                escaped,
                if trail { r"\b" } else { "" }
            )
        }
        Trigger::Pattern(pattern) => pattern.clone(),
    }
}
