//! AuditStore - Storage backends for audit records

use crate::AuditRecord;
use async_trait::async_trait;
use shared::StoreError;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Where terminal audit records land
///
/// Implementations are driven by the sink's single writer task, one record
/// at a time, in queue order.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn insert(&self, record: AuditRecord) -> Result<(), StoreError>;
}

/// In-memory ring buffer store
///
/// Keeps the newest `max_entries` records and drops the oldest beyond that.
#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<VecDeque<AuditRecord>>,
    max_entries: usize,
}

impl MemoryStore {
    /// Create a store retaining at most `max_entries` records
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(max_entries)),
            max_entries,
        }
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, VecDeque<AuditRecord>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Get recent records, newest first
    pub fn get_recent(&self, limit: usize) -> Vec<AuditRecord> {
        self.lock_entries()
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Get recent blocked records (unauthorized or throttled), newest first
    pub fn get_recent_blocked(&self, limit: usize) -> Vec<AuditRecord> {
        self.lock_entries()
            .iter()
            .rev()
            .filter(|r| r.outcome.is_blocked())
            .take(limit)
            .cloned()
            .collect()
    }

    /// Get statistics over the retained records
    pub fn get_stats(&self) -> StoreStats {
        let entries = self.lock_entries();
        let total = entries.len();
        let blocked = entries.iter().filter(|r| r.outcome.is_blocked()).count();

        StoreStats {
            total_entries: total,
            blocked_count: blocked,
        }
    }

    /// Export retained records as JSON
    pub fn export_json(&self) -> serde_json::Value {
        serde_json::to_value(self.lock_entries().iter().collect::<Vec<_>>()).unwrap_or_default()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(10000)
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn insert(&self, record: AuditRecord) -> Result<(), StoreError> {
        let mut entries = self.lock_entries();
        if entries.len() >= self.max_entries {
            entries.pop_front();
        }
        entries.push_back(record);
        Ok(())
    }
}

/// Statistics over the retained records
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub total_entries: usize,
    pub blocked_count: usize,
}
