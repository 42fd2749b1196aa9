pub mod completion;
pub mod dispatch;
pub mod ingest;

pub use completion::{CompletionStrategy, CompletionWorker, FixedDelay};
pub use dispatch::{Dispatcher, SpawnDispatcher};
pub use ingest::{IngestOutcome, IngestService, WebhookPayload};
