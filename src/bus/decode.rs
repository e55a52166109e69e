use serde_json::Value;

use super::RawMessage;
use crate::error::AppError;
use crate::models::ValuationEvent;

/// Decodes a flat key/value stream entry into a typed event.
///
/// Producers JSON-encode values per field; each one is JSON-decoded when
/// possible and kept as the raw string otherwise, so a malformed field
/// degrades instead of poisoning the whole entry. Only a missing listing
/// id or result id makes the entry undecodable.
pub fn decode(msg: &RawMessage) -> Result<ValuationEvent, AppError> {
    let mut map = serde_json::Map::new();
    for (key, raw) in &msg.fields {
        let value = serde_json::from_str::<Value>(raw)
            .unwrap_or_else(|_| Value::String(raw.clone()));
        map.insert(key.clone(), value);
    }

    let id = string_field(&map, "id")
        .ok_or_else(|| AppError::Decode(format!("message {} has no id", msg.id)))?;
    let result_id = string_field(&map, "resultId")
        .ok_or_else(|| AppError::Decode(format!("message {} has no resultId", msg.id)))?;

    Ok(ValuationEvent {
        id,
        result_id,
        score: map.get("score").and_then(Value::as_f64),
        source: string_field(&map, "source"),
        kind: string_field(&map, "type"),
        ts: map.get("ts").and_then(Value::as_i64),
    })
}

// String fields may arrive JSON-quoted or bare; numbers used as ids are
// kept in their textual form.
fn string_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
