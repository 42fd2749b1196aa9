//! Transaction record entity.
//! Framework-agnostic representation of an ingested webhook transaction.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a record. The only legal transition is `Processing -> Processed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Processing,
    Processed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Processing => "PROCESSING",
            TransactionStatus::Processed => "PROCESSED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Processed)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown transaction status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for TransactionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROCESSING" => Ok(TransactionStatus::Processing),
            "PROCESSED" => Ok(TransactionStatus::Processed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Domain entity keyed by the externally supplied `transaction_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub source_account: String,
    pub destination_account: String,
    #[serde(with = "crate::domain::amount")]
    pub amount: BigDecimal,
    pub currency: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl TransactionRecord {
    /// Builds a fresh record in `PROCESSING` with `created_at` set to now.
    pub fn new(
        transaction_id: String,
        source_account: String,
        destination_account: String,
        amount: BigDecimal,
        currency: String,
    ) -> Self {
        Self {
            transaction_id,
            source_account,
            destination_account,
            amount,
            currency,
            status: TransactionStatus::Processing,
            created_at: Utc::now(),
            processed_at: None,
        }
    }

    pub fn is_processed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Moves the record to `PROCESSED`. Returns `false` and leaves the record
    /// untouched if it was already processed, so the first `processed_at` wins.
    pub fn mark_processed(&mut self, processed_at: DateTime<Utc>) -> bool {
        if self.is_processed() {
            return false;
        }
        self.status = TransactionStatus::Processed;
        self.processed_at = Some(processed_at);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> TransactionRecord {
        TransactionRecord::new(
            "tx1".to_string(),
            "A".to_string(),
            "B".to_string(),
            "100.0".parse().unwrap(),
            "USD".to_string(),
        )
    }

    #[test]
    fn test_new_record_is_processing() {
        let record = sample();
        assert_eq!(record.status, TransactionStatus::Processing);
        assert!(record.processed_at.is_none());
        assert!(!record.is_processed());
    }

    #[test]
    fn test_mark_processed_sets_timestamp_once() {
        let mut record = sample();
        let first = record.created_at + Duration::seconds(30);

        assert!(record.mark_processed(first));
        assert_eq!(record.status, TransactionStatus::Processed);
        assert_eq!(record.processed_at, Some(first));

        assert!(!record.mark_processed(first + Duration::seconds(5)));
        assert_eq!(record.processed_at, Some(first));
    }

    #[test]
    fn test_status_ordering() {
        assert!(TransactionStatus::Processing < TransactionStatus::Processed);
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [TransactionStatus::Processing, TransactionStatus::Processed] {
            assert_eq!(status.as_str().parse::<TransactionStatus>(), Ok(status));
        }
        assert!("pending".parse::<TransactionStatus>().is_err());
    }

    #[test]
    fn test_record_serializes_wire_shape() {
        let record = sample();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["transaction_id"], "tx1");
        assert_eq!(json["status"], "PROCESSING");
        assert!(json["processed_at"].is_null());
        assert!(json["created_at"].is_string());
        assert_eq!(json["amount"], serde_json::json!(100.0));
        for field in [
            "source_account",
            "destination_account",
            "amount",
            "currency",
        ] {
            assert!(json.get(field).is_some(), "missing {}", field);
        }
    }
}
