//! Postgres implementation of RecordStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{TransactionRecord, TransactionStatus};
use crate::ports::{InsertOutcome, RecordStore, StoreError, StoreResult};

/// Postgres-backed record store.
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn exists(&self, transaction_id: &str) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM transactions WHERE transaction_id = $1)")
                .bind(transaction_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn find(&self, transaction_id: &str) -> StoreResult<Option<TransactionRecord>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT transaction_id, source_account, destination_account, amount, currency,
                status, created_at, processed_at
            FROM transactions
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TransactionRow::try_into_domain).transpose()
    }

    async fn insert(&self, record: &TransactionRecord) -> StoreResult<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (
                transaction_id, source_account, destination_account, amount, currency,
                status, created_at, processed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (transaction_id) DO NOTHING
            "#,
        )
        .bind(&record.transaction_id)
        .bind(&record.source_account)
        .bind(&record.destination_account)
        .bind(&record.amount)
        .bind(&record.currency)
        .bind(record.status.as_str())
        .bind(record.created_at)
        .bind(record.processed_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(InsertOutcome::AlreadyExists)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }

    async fn update_to_processed(
        &self,
        transaction_id: &str,
        processed_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = 'PROCESSED', processed_at = $2
            WHERE transaction_id = $1 AND status = 'PROCESSING'
            "#,
        )
        .bind(transaction_id)
        .bind(processed_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Nothing moved: either already processed or never ingested.
        if self.exists(transaction_id).await? {
            Ok(false)
        } else {
            Err(StoreError::NotFound(transaction_id.to_string()))
        }
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    transaction_id: String,
    source_account: String,
    destination_account: String,
    amount: bigdecimal::BigDecimal,
    currency: String,
    status: String,
    created_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
}

impl TransactionRow {
    fn try_into_domain(self) -> StoreResult<TransactionRecord> {
        let status = self
            .status
            .parse::<TransactionStatus>()
            .map_err(|e| StoreError::Corrupt {
                transaction_id: self.transaction_id.clone(),
                reason: e.to_string(),
            })?;

        Ok(TransactionRecord {
            transaction_id: self.transaction_id,
            source_account: self.source_account,
            destination_account: self.destination_account,
            amount: self.amount,
            currency: self.currency,
            status,
            created_at: self.created_at,
            processed_at: self.processed_at,
        })
    }
}
