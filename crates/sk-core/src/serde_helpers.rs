//! Shared serde helper functions for lenient event-log fields.
//!
//! Event logs are produced by a JavaScript front end, so numeric identifiers
//! arrive as JSON numbers in some files and as strings in others. Logged-out
//! events carry `""` where an id would be.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an optional integer that may be encoded as a number, a numeric
/// string, or an empty string / null (both map to `None`).
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(i))
            } else if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0) {
                Ok(Some(f as i64))
            } else {
                Err(serde::de::Error::custom(format!(
                    "expected an integer, found {n}"
                )))
            }
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("expected an integer, found '{s}'")))
        }
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected an integer, found {other}"
        ))),
    }
}

/// Deserialize an optional string, mapping `""` to `None`.
pub fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
