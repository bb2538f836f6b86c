//! Lenient JSON field helpers for marketplace payloads.
//!
//! Marketplaces are inconsistent about whether amounts and ids arrive as
//! strings or numbers. Adapters keep such fields as text and leave parsing to
//! the normalizer.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Render a scalar JSON value as text; `null`, arrays and objects yield `None`.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Deserialize an optional string-or-number field into `Option<String>`.
///
/// # Errors
///
/// Only fails when the input is not valid JSON.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_text))
}

/// Amount that may be a bare scalar or an object with an amount and currency.
///
/// Handles `"12.5"`, `12.5` and `{"amount": "12.5", "currency_code": "GBP"}`.
#[must_use]
pub fn amount_and_currency(value: &Value) -> (Option<String>, Option<String>) {
    match value {
        Value::Object(map) => {
            let amount = ["amount", "value"]
                .iter()
                .find_map(|k| map.get(*k).and_then(scalar_text));
            let currency = ["currency_code", "currency"]
                .iter()
                .find_map(|k| map.get(*k).and_then(scalar_text));
            (amount, currency)
        }
        other => (scalar_text(other), None),
    }
}
