pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod ports;
pub mod services;
pub mod validation;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::ports::RecordStore;
use crate::services::{
    CompletionStrategy, CompletionWorker, Dispatcher, IngestService, SpawnDispatcher,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub ingest: Arc<IngestService>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        let ingest = Arc::new(IngestService::new(store.clone(), dispatcher));
        Self { store, ingest }
    }

    /// Wires the store to a [`SpawnDispatcher`] running `strategy`.
    pub fn with_strategy(
        store: Arc<dyn RecordStore>,
        strategy: Arc<dyn CompletionStrategy>,
    ) -> Self {
        let worker = Arc::new(CompletionWorker::new(store.clone(), strategy));
        let dispatcher = Arc::new(SpawnDispatcher::new(worker));
        Self::new(store, dispatcher)
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route(
            "/v1/webhooks/transactions",
            post(handlers::webhook::receive_transaction),
        )
        .route(
            "/v1/transactions/:transaction_id",
            get(handlers::transactions::get_transaction),
        )
        .layer(axum::middleware::from_fn(
            middleware::request_logger_middleware,
        ))
        .with_state(state)
}
