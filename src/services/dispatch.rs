use std::sync::Arc;
use tracing::{debug, info_span, Instrument};

use super::completion::CompletionWorker;

/// Hands accepted transactions to the completion worker.
///
/// Contract: each call schedules exactly one completion run that executes
/// independently of the caller. There is no ordering between dispatches and
/// pending work is not persisted; a run that has not finished before
/// shutdown is lost and its record stays `PROCESSING`.
pub trait Dispatcher: Send + Sync {
    /// Must not block on the completion itself.
    fn dispatch(&self, transaction_id: String);
}

/// Spawns one detached Tokio task per dispatched transaction.
#[derive(Clone)]
pub struct SpawnDispatcher {
    worker: Arc<CompletionWorker>,
}

impl SpawnDispatcher {
    pub fn new(worker: Arc<CompletionWorker>) -> Self {
        Self { worker }
    }
}

impl Dispatcher for SpawnDispatcher {
    fn dispatch(&self, transaction_id: String) {
        let worker = Arc::clone(&self.worker);
        let span = info_span!("completion", transaction_id = %transaction_id);

        debug!(transaction_id = %transaction_id, "Dispatching completion task");
        tokio::spawn(
            async move {
                worker.process(transaction_id).await;
            }
            .instrument(span),
        );
    }
}
