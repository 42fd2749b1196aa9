#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use ledger_hook::adapters::MemoryRecordStore;
use ledger_hook::domain::TransactionRecord;
use ledger_hook::ports::RecordStore;
use ledger_hook::services::CompletionStrategy;
use ledger_hook::{create_app, AppState};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tower::ServiceExt;

/// Holds every completion until the test releases it, and counts how many
/// completion runs started.
pub struct GatedStrategy {
    gate: Semaphore,
    runs: AtomicUsize,
}

impl GatedStrategy {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: Semaphore::new(0),
            runs: AtomicUsize::new(0),
        })
    }

    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionStrategy for GatedStrategy {
    async fn complete(&self, _transaction_id: &str) {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if let Ok(permit) = self.gate.acquire().await {
            permit.forget();
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryRecordStore>,
    pub strategy: Arc<GatedStrategy>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryRecordStore::new());
        let strategy = GatedStrategy::new();
        let router = create_app(AppState::with_strategy(store.clone(), strategy.clone()));
        Self {
            router,
            store,
            strategy,
        }
    }

    pub async fn post_webhook(&self, body: Value) -> (u16, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/webhooks/transactions")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(&self.router, request).await
    }

    pub async fn post_raw(&self, body: &str, content_type: &str) -> (u16, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/webhooks/transactions")
            .header("content-type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        send(&self.router, request).await
    }

    pub async fn get(&self, uri: &str) -> (u16, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        send(&self.router, request).await
    }

    /// Polls the store until `transaction_id` is processed.
    pub async fn wait_until_processed(&self, transaction_id: &str) -> TransactionRecord {
        for _ in 0..200 {
            if let Some(record) = self.store.find(transaction_id).await.unwrap() {
                if record.is_processed() {
                    return record;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("transaction {} never reached PROCESSED", transaction_id);
    }
}

async fn send(router: &Router, request: Request<Body>) -> (u16, Value) {
    let response: Response<Body> = router.clone().oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub fn webhook(transaction_id: &str) -> Value {
    json!({
        "transaction_id": transaction_id,
        "source_account": "A",
        "destination_account": "B",
        "amount": 100.0,
        "currency": "USD"
    })
}
