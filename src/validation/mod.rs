use std::fmt;

use crate::services::ingest::WebhookPayload;

pub const TRANSACTION_ID_MAX_LEN: usize = 255;
pub const ACCOUNT_MAX_LEN: usize = 255;
pub const CURRENCY_MAX_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.chars().count() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

pub fn validate_no_control_chars(field: &'static str, value: &str) -> ValidationResult {
    if value.chars().any(char::is_control) {
        return Err(ValidationError::new(
            field,
            "must not contain control characters",
        ));
    }

    Ok(())
}

fn validate_text(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    validate_required(field, value)?;
    validate_max_len(field, value, max_len)?;
    validate_no_control_chars(field, value)
}

/// Checks a webhook body that already deserialized. The amount is typed as a
/// decimal, so only the string fields need checking here.
pub fn validate_webhook(payload: &WebhookPayload) -> ValidationResult {
    validate_text(
        "transaction_id",
        &payload.transaction_id,
        TRANSACTION_ID_MAX_LEN,
    )?;
    validate_text("source_account", &payload.source_account, ACCOUNT_MAX_LEN)?;
    validate_text(
        "destination_account",
        &payload.destination_account,
        ACCOUNT_MAX_LEN,
    )?;
    validate_text("currency", &payload.currency, CURRENCY_MAX_LEN)?;

    Ok(())
}
