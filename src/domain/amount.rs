//! Exact JSON encoding for decimal amounts.
//!
//! Amounts are read from the raw JSON number text (or a decimal string) and
//! written back as a JSON number, so `19.99` never passes through `f64`.
//! Relies on serde_json's `arbitrary_precision` feature to keep the number
//! text intact.

use bigdecimal::BigDecimal;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::str::FromStr;

pub fn serialize<S>(amount: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let number = Number::from_str(&amount.to_string()).map_err(ser::Error::custom)?;
    number.serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text,
        other => {
            return Err(de::Error::custom(format!(
                "expected a decimal number, got {}",
                other
            )))
        }
    };

    BigDecimal::from_str(raw.trim())
        .map_err(|e| de::Error::custom(format!("invalid decimal amount '{}': {}", raw, e)))
}
