//! Audit trail collaborator interface
//!
//! The engine produces redacted, append-only records of each evaluation and
//! hands them to a host-implemented sink. Writes are fire-and-forget: a slow
//! or failing sink never delays or fails a validation result.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use mm_types::AppResult;

use crate::types::{
    ContentType, Platform, Specialty, TargetAudience, ValidationRequest, ValidationResult,
};

/// Redacted record of one evaluation; carries a content hash, never the raw
/// content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub content_hash: String,
    pub content_type: ContentType,
    pub specialty: Specialty,
    pub target_audience: TargetAudience,
    pub platform: Platform,
    pub result: ValidationResult,
    pub timestamp: DateTime<Utc>,
    pub actor_id: Option<String>,
}

impl AuditRecord {
    pub fn new(
        request: &ValidationRequest,
        result: &ValidationResult,
        actor_id: Option<String>,
    ) -> Self {
        Self {
            content_hash: hash_content(&request.content),
            content_type: request.content_type,
            specialty: request.specialty,
            target_audience: request.target_audience,
            platform: request.platform,
            result: result.clone(),
            timestamp: Utc::now(),
            actor_id,
        }
    }
}

/// Hex-encoded SHA-256 of the content body
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Audit persistence collaborator, implemented by the host application
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persist one record, append-only. Best-effort; the engine never awaits
    /// the outcome.
    async fn record(&self, record: AuditRecord) -> AppResult<()>;
}

/// Dispatch a record onto the current tokio runtime, fire-and-forget
///
/// Failures are logged and swallowed. With no runtime present the record is
/// dropped with a warning.
pub(crate) fn dispatch(sink: Arc<dyn AuditSink>, record: AuditRecord) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                if let Err(e) = sink.record(record).await {
                    warn!("Audit write failed: {}", e);
                }
            });
        }
        Err(_) => {
            warn!("No async runtime available; audit record dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_types::AppError;
    use parking_lot::Mutex;
    use std::collections::BTreeMap;
    use std::time::Duration;

    struct CollectingSink {
        records: Mutex<Vec<AuditRecord>>,
    }

    #[async_trait]
    impl AuditSink for CollectingSink {
        async fn record(&self, record: AuditRecord) -> AppResult<()> {
            self.records.lock().push(record);
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl AuditSink for FailingSink {
        async fn record(&self, _record: AuditRecord) -> AppResult<()> {
            Err(AppError::Audit("disk full".to_string()))
        }
    }

    fn empty_result() -> ValidationResult {
        ValidationResult {
            is_compliant: true,
            overall_score: 100,
            requires_review: false,
            violations: vec![],
            warnings: vec![],
            recommendations: vec![],
            categories: BTreeMap::new(),
            rules_checked: 0,
            scan_duration_ms: 0,
        }
    }

    #[test]
    fn test_hash_content_stable() {
        assert_eq!(
            hash_content("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_content("abc"), hash_content("abc"));
        assert_ne!(hash_content("abc"), hash_content("abd"));
    }

    #[test]
    fn test_record_redacts_content() {
        let request = ValidationRequest::new("Confidential draft about our new clinic.");
        let record = AuditRecord::new(&request, &empty_result(), Some("user-42".to_string()));
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("Confidential draft"));
        assert!(json.contains(&record.content_hash));
        assert_eq!(record.content_hash, hash_content(&request.content));
    }

    #[tokio::test]
    async fn test_dispatch_delivers_record() {
        let sink = Arc::new(CollectingSink {
            records: Mutex::new(vec![]),
        });
        let request = ValidationRequest::new("hello");
        dispatch(
            sink.clone(),
            AuditRecord::new(&request, &empty_result(), None),
        );

        for _ in 0..50 {
            if !sink.records.lock().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let records = sink.records.lock();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content_hash, hash_content("hello"));
    }

    #[tokio::test]
    async fn test_dispatch_swallows_sink_failure() {
        let request = ValidationRequest::new("hello");
        dispatch(
            Arc::new(FailingSink),
            AuditRecord::new(&request, &empty_result(), None),
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
        // Nothing to assert beyond "no panic, no propagation"
    }

    #[test]
    fn test_dispatch_without_runtime_is_noop() {
        let request = ValidationRequest::new("hello");
        dispatch(
            Arc::new(FailingSink),
            AuditRecord::new(&request, &empty_result(), None),
        );
    }
}
