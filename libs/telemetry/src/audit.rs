//! Structured audit trail: one `tracing` event per operation plus a bounded
//! in-memory ring buffer an (out-of-scope) admin surface could poll.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde::Serialize;
use time::OffsetDateTime;

const DEFAULT_CAPACITY: usize = 500;

#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub timestamp: String,
    pub tenant_id: String,
    pub principal_id: String,
    pub operation: String,
    pub success: bool,
    pub details: Option<serde_json::Value>,
    pub error: Option<String>,
}

/// Bounded ring buffer of recent [`ActivityEntry`] values. Cheaply cloneable
/// (`Arc`-free by design — callers hold one instance behind their own
/// `Arc`/`Deps` bundle, matching how other shared state is threaded through
/// `ToolContext`/`Deps`).
pub struct ActivityFeed {
    capacity: usize,
    entries: Mutex<VecDeque<ActivityEntry>>,
}

impl ActivityFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY))),
        }
    }

    fn push(&self, entry: ActivityEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Returns up to `n` most recent entries, newest last.
    pub fn recent(&self, n: usize) -> Vec<ActivityEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    /// Records one operation: emits a structured `tracing` event and pushes
    /// onto the ring buffer. Never panics or returns an error — callers log
    /// an operation's outcome without that logging becoming a second
    /// failure mode.
    pub fn log_operation(
        &self,
        tenant_id: &str,
        principal_id: &str,
        operation: &str,
        success: bool,
        details: Option<serde_json::Value>,
        error: Option<String>,
    ) {
        let timestamp = OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| String::from("unknown"));

        if success {
            tracing::info!(
                tenant_id,
                principal_id,
                operation,
                success,
                ?details,
                "audit event"
            );
        } else {
            tracing::warn!(
                tenant_id,
                principal_id,
                operation,
                success,
                ?details,
                ?error,
                "audit event"
            );
        }

        self.push(ActivityEntry {
            timestamp,
            tenant_id: tenant_id.to_string(),
            principal_id: principal_id.to_string(),
            operation: operation.to_string(),
            success,
            details,
            error,
        });
    }
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_returns_newest_last_and_respects_n() {
        let feed = ActivityFeed::new(10);
        for i in 0..3 {
            feed.log_operation("tenant-a", "principal-1", &format!("op-{i}"), true, None, None);
        }
        let recent = feed.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].operation, "op-1");
        assert_eq!(recent[1].operation, "op-2");
    }

    #[test]
    fn ring_buffer_evicts_oldest_past_capacity() {
        let feed = ActivityFeed::new(2);
        feed.log_operation("t", "p", "op-0", true, None, None);
        feed.log_operation("t", "p", "op-1", true, None, None);
        feed.log_operation("t", "p", "op-2", true, None, None);
        let all = feed.recent(10);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].operation, "op-1");
        assert_eq!(all[1].operation, "op-2");
    }

    #[test]
    fn failure_records_error_without_panicking() {
        let feed = ActivityFeed::new(5);
        feed.log_operation(
            "t",
            "p",
            "create_media_buy",
            false,
            Some(serde_json::json!({"package_count": 2})),
            Some("manual approval required".to_string()),
        );
        let entry = feed.recent(1).pop().unwrap();
        assert!(!entry.success);
        assert_eq!(entry.error.as_deref(), Some("manual approval required"));
    }
}
