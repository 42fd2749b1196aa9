//! Idempotent webhook ingest.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use super::dispatch::Dispatcher;
use crate::domain::TransactionRecord;
use crate::error::AppError;
use crate::ports::{InsertOutcome, RecordStore};
use crate::validation::validate_webhook;

/// Body of `POST /v1/webhooks/transactions`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookPayload {
    pub transaction_id: String,
    pub source_account: String,
    pub destination_account: String,
    #[serde(with = "crate::domain::amount")]
    pub amount: BigDecimal,
    pub currency: String,
}

/// Both variants are acknowledged the same way to the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// First sighting: record stored and completion dispatched.
    Accepted,
    /// The `transaction_id` was already known. Nothing was written or dispatched.
    Duplicate,
}

pub struct IngestService {
    store: Arc<dyn RecordStore>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl IngestService {
    pub fn new(store: Arc<dyn RecordStore>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self { store, dispatcher }
    }

    /// Validates and stores the payload, then hands it to the dispatcher.
    /// Suspends only on the store lookup and insert, never on completion.
    pub async fn ingest(&self, payload: WebhookPayload) -> Result<IngestOutcome, AppError> {
        validate_webhook(&payload)?;

        if self.store.find(&payload.transaction_id).await?.is_some() {
            debug!(
                transaction_id = %payload.transaction_id,
                "Duplicate webhook delivery ignored"
            );
            return Ok(IngestOutcome::Duplicate);
        }

        let record = TransactionRecord::new(
            payload.transaction_id,
            payload.source_account,
            payload.destination_account,
            payload.amount,
            payload.currency,
        );

        match self.store.insert(&record).await? {
            InsertOutcome::Inserted => {
                info!(
                    transaction_id = %record.transaction_id,
                    amount = %record.amount,
                    currency = %record.currency,
                    "Transaction accepted"
                );
                self.dispatcher.dispatch(record.transaction_id);
                Ok(IngestOutcome::Accepted)
            }
            InsertOutcome::AlreadyExists => {
                // Lost the race against a concurrent delivery of the same id;
                // the winner owns the completion run.
                debug!(
                    transaction_id = %record.transaction_id,
                    "Concurrent duplicate delivery ignored"
                );
                Ok(IngestOutcome::Duplicate)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryRecordStore;
    use crate::domain::TransactionStatus;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDispatcher {
        dispatched: Mutex<Vec<String>>,
    }

    impl RecordingDispatcher {
        fn dispatched(&self) -> Vec<String> {
            self.dispatched.lock().unwrap().clone()
        }
    }

    impl Dispatcher for RecordingDispatcher {
        fn dispatch(&self, transaction_id: String) {
            self.dispatched.lock().unwrap().push(transaction_id);
        }
    }

    fn payload(id: &str) -> WebhookPayload {
        WebhookPayload {
            transaction_id: id.to_string(),
            source_account: "A".to_string(),
            destination_account: "B".to_string(),
            amount: "100.0".parse().unwrap(),
            currency: "USD".to_string(),
        }
    }

    fn service() -> (IngestService, Arc<MemoryRecordStore>, Arc<RecordingDispatcher>) {
        let store = Arc::new(MemoryRecordStore::new());
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let service = IngestService::new(store.clone(), dispatcher.clone());
        (service, store, dispatcher)
    }

    #[tokio::test]
    async fn test_first_delivery_stores_and_dispatches() {
        let (service, store, dispatcher) = service();

        let outcome = service.ingest(payload("tx1")).await.unwrap();

        assert_eq!(outcome, IngestOutcome::Accepted);
        assert_eq!(dispatcher.dispatched(), vec!["tx1".to_string()]);
        let record = store.find("tx1").await.unwrap().unwrap();
        assert_eq!(record.status, TransactionStatus::Processing);
        assert!(record.processed_at.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_delivery_is_a_no_op() {
        let (service, store, dispatcher) = service();

        service.ingest(payload("tx1")).await.unwrap();
        let mut replay = payload("tx1");
        replay.amount = "999".parse().unwrap();
        let outcome = service.ingest(replay).await.unwrap();

        assert_eq!(outcome, IngestOutcome::Duplicate);
        assert_eq!(dispatcher.dispatched().len(), 1);
        assert_eq!(store.len().await, 1);
        let record = store.find("tx1").await.unwrap().unwrap();
        assert_eq!(record.amount, "100.0".parse().unwrap());
    }

    #[tokio::test]
    async fn test_invalid_payload_never_touches_store() {
        let (service, store, dispatcher) = service();

        let mut bad = payload("tx1");
        bad.source_account = String::new();
        let err = service.ingest(bad).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.is_empty().await);
        assert!(dispatcher.dispatched().is_empty());
    }

    #[tokio::test]
    async fn test_distinct_ids_each_dispatch() {
        let (service, store, dispatcher) = service();

        for id in ["tx1", "tx2", "tx3"] {
            service.ingest(payload(id)).await.unwrap();
        }

        assert_eq!(store.len().await, 3);
        assert_eq!(dispatcher.dispatched().len(), 3);
    }
}
