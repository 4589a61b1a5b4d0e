// Path: crates/contract/src/audit.rs

//! The audit log: one structured record per operation outcome.
//!
//! Records are emitted in operation-completion order, for successes and
//! failures alike. Their content is deterministic but they are not part of
//! the state digest; routing them is the host's concern, so the sink is a
//! trait and the default implementation hands records to `tracing`.

use serde::Serialize;
use serde_json::Value;

/// One audit record.
#[derive(Serialize, Clone, Debug)]
pub struct AuditRecord {
    /// The round key the operation executed in.
    pub at: String,
    /// The operation kind.
    pub event: String,
    /// Whether the operation committed.
    pub success: bool,
    /// Outcome detail: response data on success, code and error id on
    /// failure. Never signatures, keys, or blob contents.
    pub detail: Value,
}

/// Where audit records go. Implementations must not block.
pub trait AuditSink: Send + Sync {
    /// Accepts one record.
    fn record(&self, record: &AuditRecord);
}

/// The default sink: one JSON `tracing` event per record under the
/// `xvault::audit` target.
#[derive(Default, Clone, Copy, Debug)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: &AuditRecord) {
        let detail = record.detail.to_string();
        if record.success {
            tracing::info!(
                target: "xvault::audit",
                at = %record.at,
                event = %record.event,
                success = record.success,
                detail = %detail,
            );
        } else {
            tracing::warn!(
                target: "xvault::audit",
                at = %record.at,
                event = %record.event,
                success = record.success,
                detail = %detail,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// A sink that captures records for assertions.
    #[derive(Default, Clone)]
    pub(crate) struct CapturingSink(pub Arc<Mutex<Vec<AuditRecord>>>);

    impl AuditSink for CapturingSink {
        fn record(&self, record: &AuditRecord) {
            if let Ok(mut records) = self.0.lock() {
                records.push(record.clone());
            }
        }
    }

    #[test]
    fn records_serialize_with_stable_fields() {
        let record = AuditRecord {
            at: "7".into(),
            event: "addEntry".into(),
            success: true,
            detail: serde_json::json!({"vaultId": "abc"}),
        };
        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["at"], "7");
        assert_eq!(v["event"], "addEntry");
        assert_eq!(v["success"], true);
    }

    #[test]
    fn capturing_sink_preserves_order() {
        let sink = CapturingSink::default();
        for i in 0..3 {
            sink.record(&AuditRecord {
                at: i.to_string(),
                event: "op".into(),
                success: i % 2 == 0,
                detail: Value::Null,
            });
        }
        let records = sink.0.lock().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].at, "1");
    }
}
