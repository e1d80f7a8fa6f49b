//! Legacy text rendering
//!
//! The destination table stores most document fields as text in the format
//! downstream consumers already parse: `None` for missing values,
//! `True`/`False` for booleans, `['a', 'b']` for lists and `{'k': v}` for maps.
//! Extended-JSON wrappers (`$oid`, `$date`, `$numberLong`) collapse to their
//! payload.

use serde_json::Value;

/// Placeholder written for absent values.
pub const NONE: &str = "None";

/// Render an optional top-level value. Strings are written bare.
pub fn render_opt(value: Option<&Value>) -> String {
    match value {
        Some(v) => render(v),
        None => NONE.to_string(),
    }
}

/// Render a top-level value. Strings are written bare.
pub fn render(value: &Value) -> String {
    if let Some(inner) = unwrap_extended(value) {
        return render(inner);
    }
    match value {
        Value::String(s) => s.clone(),
        other => repr(other),
    }
}

/// Render a nested value. Strings are single-quoted.
fn repr(value: &Value) -> String {
    if let Some(inner) = unwrap_extended(value) {
        return repr(inner);
    }
    match value {
        Value::Null => NONE.to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(repr).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote(k), repr(v)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
    }
}

/// Render a list of plain ids the way list columns are stored.
pub fn render_id_list(ids: &[String]) -> String {
    let parts: Vec<String> = ids.iter().map(|id| quote(id)).collect();
    format!("[{}]", parts.join(", "))
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Single-key extended-JSON wrappers: `{"$oid": ..}`, `{"$date": ..}`, `{"$numberLong": ..}`.
pub fn unwrap_extended(value: &Value) -> Option<&Value> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    ["$oid", "$date", "$numberLong", "$numberInt"]
        .iter()
        .find_map(|key| map.get(*key))
}

/// Read a value as a plain id string (bare string or `$oid`).
pub fn as_id(value: &Value) -> Option<String> {
    match unwrap_extended(value).unwrap_or(value) {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Read a value as an integer (number, numeric string or `$numberLong`).
pub fn as_i64(value: &Value) -> Option<i64> {
    match unwrap_extended(value).unwrap_or(value) {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
