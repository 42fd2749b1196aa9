//! In-memory implementation of RecordStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::TransactionRecord;
use crate::ports::{InsertOutcome, RecordStore, StoreError, StoreResult};

/// A thread-safe in-memory record store.
///
/// Backs the test suite and `STORE_BACKEND=memory` runs. Nothing survives a
/// restart.
#[derive(Default, Clone)]
pub struct MemoryRecordStore {
    records: Arc<RwLock<HashMap<String, TransactionRecord>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn find(&self, transaction_id: &str) -> StoreResult<Option<TransactionRecord>> {
        let records = self.records.read().await;
        Ok(records.get(transaction_id).cloned())
    }

    async fn insert(&self, record: &TransactionRecord) -> StoreResult<InsertOutcome> {
        let mut records = self.records.write().await;
        match records.entry(record.transaction_id.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn update_to_processed(
        &self,
        transaction_id: &str,
        processed_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(transaction_id)
            .ok_or_else(|| StoreError::NotFound(transaction_id.to_string()))?;
        Ok(record.mark_processed(processed_at))
    }
}
