pub mod report;
pub mod score;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A field of the wrong JSON type is treated as absent instead of failing the whole record.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    if raw.is_null() {
        return Ok(None);
    }
    match serde_json::from_value::<T>(raw.clone()) {
        Ok(v) => Ok(Some(v)),
        Err(err) => {
            tracing::debug!(value = %raw, error = %err, "ignoring malformed field");
            Ok(None)
        }
    }
}

/// Text field that also accepts numbers and booleans in their string form.
/// Arrays and objects are treated as absent.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => {
            tracing::debug!(value = %other, "ignoring malformed text field");
            None
        }
    })
}
