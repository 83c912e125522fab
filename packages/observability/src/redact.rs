//! Redaction of sensitive log fields.
//!
//! Session tokens, authorization codes and push tokens flow through the shell
//! as plain strings. Any structured field whose key looks like one of them is
//! replaced before the entry is written.

use serde_json::Value;
use std::collections::HashMap;

/// Replacement value for redacted fields.
pub const REDACTED: &str = "[REDACTED]";

const DENYLIST_KEYS: &[&str] = &[
    "token",
    "authorization",
    "secret",
    "password",
    "cookie",
];

/// Redact sensitive fields in place.
pub fn redact_fields(fields: &mut HashMap<String, Value>) {
    for (key, value) in fields.iter_mut() {
        *value = redact_value(key, value);
    }
}

fn redact_value(key: &str, value: &Value) -> Value {
    if is_sensitive_key(key) {
        return Value::String(REDACTED.to_string());
    }

    match value {
        Value::String(s) if looks_like_bearer(s) => Value::String(REDACTED.to_string()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_value(k, v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| redact_value(key, v)).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    DENYLIST_KEYS.iter().any(|entry| lower.contains(entry))
}

fn looks_like_bearer(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    // JWTs have exactly two dots and are long.
    lower.starts_with("bearer ") || (raw.matches('.').count() == 2 && raw.len() > 40)
}
