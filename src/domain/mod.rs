pub mod amount;
pub mod transaction;

pub use transaction::{TransactionRecord, TransactionStatus};
