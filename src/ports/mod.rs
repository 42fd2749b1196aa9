//! Storage port for transaction records.
//!
//! The record store exclusively owns persisted state. Handlers and the
//! completion worker go through `find` / `insert` / `update_to_processed`
//! and never hold a private copy across calls.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::TransactionRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Transaction {0} not found")]
    NotFound(String),

    #[error("Corrupt record {transaction_id}: {reason}")]
    Corrupt {
        transaction_id: String,
        reason: String,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Result of an insert-if-absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A record with the same `transaction_id` was already present.
    /// Nothing was written.
    AlreadyExists,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Point lookup by natural key.
    async fn find(&self, transaction_id: &str) -> StoreResult<Option<TransactionRecord>>;

    /// Atomically inserts `record` unless its `transaction_id` already exists.
    async fn insert(&self, record: &TransactionRecord) -> StoreResult<InsertOutcome>;

    /// Sets `status = PROCESSED` and `processed_at`. Returns `Ok(false)` when
    /// the record was already processed; the stored `processed_at` is kept.
    async fn update_to_processed(
        &self,
        transaction_id: &str,
        processed_at: DateTime<Utc>,
    ) -> StoreResult<bool>;
}
