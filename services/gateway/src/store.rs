//! Time-windowed pet record store
//!
//! An append-only list with lazy age-based expiry. There is no background
//! sweep: callers prune before every observation, which guarantees no record
//! older than the window is ever returned.

use tracing::debug;
use types::record::PetRecord;

/// Records are retained for six minutes after ingestion.
pub const RETENTION_WINDOW_MS: i64 = 6 * 60 * 1000;

#[derive(Debug)]
pub struct PetStore {
    records: Vec<PetRecord>,
    window_ms: i64,
}

impl PetStore {
    pub fn new() -> Self {
        Self::with_window(RETENTION_WINDOW_MS)
    }

    pub fn with_window(window_ms: i64) -> Self {
        Self {
            records: Vec::new(),
            window_ms,
        }
    }

    pub fn append(&mut self, record: PetRecord) {
        self.records.push(record);
    }

    /// Drop every record whose age has reached the window.
    ///
    /// Returns the number of records removed.
    pub fn prune(&mut self, now: i64) -> usize {
        let before = self.records.len();
        let window_ms = self.window_ms;
        self.records.retain(|r| r.age_ms(now) < window_ms);

        let removed = before - self.records.len();
        if removed > 0 {
            debug!(removed, retained = self.records.len(), "Pruned expired pet records");
        }
        removed
    }

    /// Retained records, most recent first. Ties keep insertion order.
    pub fn list_descending(&self) -> Vec<PetRecord> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for PetStore {
    fn default() -> Self {
        Self::new()
    }
}
