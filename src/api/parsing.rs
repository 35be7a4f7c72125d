use serde_json::{Map, Value};

/// Parses a request body into its top-level JSON object.
///
/// Empty bodies, invalid JSON, non-objects and `{}` all count as "no data",
/// so every handler reports a missing payload the same way.
#[must_use]
pub fn parse_payload(body: &[u8]) -> Option<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => Some(map),
        _ => None,
    }
}

/// Looks up a top-level field of an optional payload.
#[must_use]
pub fn field<'a>(payload: Option<&'a Map<String, Value>>, name: &str) -> Option<&'a Value> {
    payload.and_then(|map| map.get(name))
}
