use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::ports::{RecordStore, StoreResult};

/// Default duration of the simulated external call.
pub const DEFAULT_PROCESSING_DELAY_SECS: u64 = 30;

/// The out-of-band step that runs before a record is marked processed.
///
/// Production uses [`FixedDelay`]; tests substitute zero-delay or gated
/// strategies.
#[async_trait]
pub trait CompletionStrategy: Send + Sync {
    async fn complete(&self, transaction_id: &str);
}

/// Simulates an external dependency call by sleeping for a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_PROCESSING_DELAY_SECS))
    }
}

#[async_trait]
impl CompletionStrategy for FixedDelay {
    async fn complete(&self, _transaction_id: &str) {
        tokio::time::sleep(self.delay).await;
    }
}

/// Runs the completion strategy for one transaction, then moves the record
/// to `PROCESSED`.
pub struct CompletionWorker {
    store: Arc<dyn RecordStore>,
    strategy: Arc<dyn CompletionStrategy>,
}

impl CompletionWorker {
    pub fn new(store: Arc<dyn RecordStore>, strategy: Arc<dyn CompletionStrategy>) -> Self {
        Self { store, strategy }
    }

    /// Returns whether this call performed the `PROCESSING -> PROCESSED`
    /// transition.
    pub async fn run(&self, transaction_id: &str) -> StoreResult<bool> {
        self.strategy.complete(transaction_id).await;
        self.store
            .update_to_processed(transaction_id, Utc::now())
            .await
    }

    /// Fire-and-forget entry point used by the dispatcher. Failures are
    /// logged and the record stays `PROCESSING`; there is no retry.
    pub async fn process(&self, transaction_id: String) {
        match self.run(&transaction_id).await {
            Ok(true) => info!(transaction_id = %transaction_id, "Transaction processed"),
            Ok(false) => warn!(
                transaction_id = %transaction_id,
                "Transaction was already processed; completion skipped"
            ),
            Err(e) => error!(
                transaction_id = %transaction_id,
                error = %e,
                "Completion failed; transaction left in PROCESSING"
            ),
        }
    }
}
