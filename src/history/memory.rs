//! In-memory history store.
//!
//! Useful for testing.

use super::{normalize_user_id, HistoryStore, NewQaRecord, QaRecord};
use crate::error::{KikkError, Result};
use async_trait::async_trait;
use std::sync::RwLock;

/// In-memory history store.
#[derive(Default)]
pub struct MemoryHistoryStore {
    records: RwLock<Vec<QaRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn insert(&self, record: NewQaRecord) -> Result<QaRecord> {
        let record = QaRecord::from_new(record);
        let mut records = self
            .records
            .write()
            .map_err(|e| KikkError::History(format!("Failed to acquire lock: {}", e)))?;
        records.push(record.clone());
        Ok(record)
    }

    async fn list(&self, user_id: Option<&str>, limit: Option<usize>) -> Result<Vec<QaRecord>> {
        let user_id = normalize_user_id(user_id);
        let records = self
            .records
            .read()
            .map_err(|e| KikkError::History(format!("Failed to acquire lock: {}", e)))?;

        // Insertion order breaks timestamp ties, newest first
        let mut indexed: Vec<(usize, &QaRecord)> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| user_id.is_none() || r.user_id.as_deref() == user_id)
            .collect();
        indexed.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));

        Ok(indexed
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|(_, r)| r.clone())
            .collect())
    }
}
