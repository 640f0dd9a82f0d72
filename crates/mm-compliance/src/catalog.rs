//! Rule catalog: versioned rule snapshots with built-in fallback
//!
//! The catalog owns the active `CompiledRuleSet` and swaps it atomically on
//! refresh, so concurrent scans always see one complete, consistent set. A
//! failed store fetch never reaches validation callers; the catalog fails
//! closed to whatever set is currently active (initially the built-in
//! defaults).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{info, warn};

use mm_types::AppResult;

use crate::compiled_rules::CompiledRuleSet;
use crate::sources::builtin;
use crate::types::{ComplianceDomain, Rule};

/// Why a catalog load could not use the remote store
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("rule store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("rule store returned no active rules")]
    EmptyRuleSet,

    #[error("malformed rule data: {0}")]
    Malformed(String),
}

/// Rule storage collaborator, implemented by the host application
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Fetch the rule table for a domain. The store may return inactive
    /// rules; the catalog filters on the `active` flag.
    async fn fetch_rules(&self, domain: ComplianceDomain) -> AppResult<Vec<Rule>>;
}

/// Owns the active rule snapshot and its refresh lifecycle
pub struct RuleCatalog {
    store: Option<Arc<dyn RuleStore>>,
    /// Active snapshot; replaced wholesale on refresh, never mutated
    active: RwLock<Arc<CompiledRuleSet>>,
    next_revision: AtomicU64,
}

impl RuleCatalog {
    /// Catalog backed only by the built-in default rules
    pub fn builtin() -> Self {
        Self::with_initial(None, builtin::default_rules())
    }

    /// Catalog that starts on the built-in defaults and refreshes from a store
    pub fn with_store(store: Arc<dyn RuleStore>) -> Self {
        Self::with_initial(Some(store), builtin::default_rules())
    }

    /// Catalog over an explicit rule table (tests, host-curated sets)
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self::with_initial(None, rules)
    }

    fn with_initial(store: Option<Arc<dyn RuleStore>>, rules: Vec<Rule>) -> Self {
        let set = Arc::new(CompiledRuleSet::compile(1, &rules));
        info!(
            "Loaded initial compliance rule set: {} rules, {} triggers",
            set.rule_count, set.trigger_count
        );
        Self {
            store,
            active: RwLock::new(set),
            next_revision: AtomicU64::new(2),
        }
    }

    /// Current snapshot; cheap to clone, stable for the duration of a scan
    pub fn active_set(&self) -> Arc<CompiledRuleSet> {
        self.active.read().clone()
    }

    /// Fetch and compile a fresh set from the store without touching the
    /// active snapshot
    ///
    /// The caller decides the fallback policy; `refresh` applies the
    /// fail-closed one.
    pub async fn load(
        &self,
        domain: ComplianceDomain,
    ) -> Result<Arc<CompiledRuleSet>, CatalogError> {
        let store = self.store.as_ref().ok_or_else(|| {
            CatalogError::StoreUnavailable("no rule store configured".to_string())
        })?;

        let rules = store
            .fetch_rules(domain)
            .await
            .map_err(|e| CatalogError::StoreUnavailable(e.to_string()))?;

        let active_rules: Vec<Rule> = rules.into_iter().filter(|r| r.active).collect();
        if active_rules.is_empty() {
            return Err(CatalogError::EmptyRuleSet);
        }
        if let Some(bad) = active_rules
            .iter()
            .find(|r| r.id.is_empty() || r.triggers.is_empty())
        {
            return Err(CatalogError::Malformed(format!(
                "rule '{}' is missing an id or triggers",
                bad.id
            )));
        }

        let revision = self.next_revision.fetch_add(1, Ordering::Relaxed);
        let set = Arc::new(CompiledRuleSet::compile(revision, &active_rules));
        if set.trigger_count == 0 {
            return Err(CatalogError::Malformed(
                "no trigger pattern compiled".to_string(),
            ));
        }
        Ok(set)
    }

    /// Refresh the active snapshot from the store
    ///
    /// Fails closed: on any store error the current snapshot stays active
    /// and the error is logged, never surfaced to validation callers.
    pub async fn refresh(&self, domain: ComplianceDomain) -> Arc<CompiledRuleSet> {
        match self.load(domain).await {
            Ok(set) => {
                info!(
                    "Rule catalog refreshed for {}: revision {}, {} rules, {} triggers",
                    domain, set.revision, set.rule_count, set.trigger_count
                );
                *self.active.write() = set.clone();
                set
            }
            Err(e) => {
                warn!(
                    "Rule catalog refresh for {} failed ({}); keeping active rule set",
                    domain, e
                );
                self.active_set()
            }
        }
    }
}

/// Parse rule records from a JSON document (the store table wire shape)
///
/// Lenient per entry: malformed rows are skipped with a warning so one bad
/// record cannot take down a whole rule set.
pub fn parse_rules_json(data: &[u8]) -> AppResult<Vec<Rule>> {
    let entries: Vec<serde_json::Value> = serde_json::from_slice(data)?;

    let mut rules = Vec::new();
    for (i, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Rule>(entry) {
            Ok(rule) => rules.push(rule),
            Err(e) => warn!("Skipping malformed rule entry {}: {}", i, e),
        }
    }
    Ok(rules)
}
