//! Trigger scanner: matches compiled rule triggers against submitted content

use crate::compiled_rules::{CompiledRuleSet, TriggerMetadata};
use crate::types::TriggerMatch;

/// Scan content against a compiled rule set
///
/// Every trigger of every rule is evaluated independently; a rule with five
/// triggers can produce up to five matches. The first occurrence of each
/// matched trigger is recorded as the match span. No deduplication happens
/// here.
pub fn scan(content: &str, set: &CompiledRuleSet) -> Vec<TriggerMatch> {
    let mut matches = Vec::new();

    match &set.regex_set {
        Some(regex_set) => {
            for idx in regex_set.matches(content) {
                if let Some(meta) = set.metadata.get(idx) {
                    if let Some(m) = meta.regex.find(content) {
                        matches.push(to_match(meta, m, idx));
                    }
                }
            }
        }
        // Combined set unavailable; fall back to the per-trigger regexes
        None => {
            for (idx, meta) in set.metadata.iter().enumerate() {
                if let Some(m) = meta.regex.find(content) {
                    matches.push(to_match(meta, m, idx));
                }
            }
        }
    }

    matches
}

fn to_match(meta: &TriggerMetadata, m: regex::Match<'_>, idx: usize) -> TriggerMatch {
    TriggerMatch {
        rule_id: meta.rule_id.clone(),
        found_text: m.as_str().to_string(),
        start: m.start(),
        end: m.end(),
        category: meta.category,
        severity: meta.severity,
        trigger_index: idx,
    }
}
