//! Serde helpers shared by the wire DTOs

use serde::{Deserialize, Deserializer};

/// Accept ids encoded either as JSON strings or numbers
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Extract an id from a loosely typed JSON value: a string, a number, or an
/// object carrying an `id` field
pub fn loose_id(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Object(map) => map.get("id").and_then(loose_id),
        _ => None,
    }
}
