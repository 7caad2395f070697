use log::warn;
use serde_json::{Map, Value};

use super::records::Record;

/// Fill every leaf of `server` that is missing or null from `defaults`, recursively.
///
/// - objects merge key by key; keys only the server knows are kept
/// - arrays come from the server when present; object elements are merged against
///   the first element of the default array, which acts as the element template
/// - a server value of a different JSON kind than its default is replaced by the default
pub fn merge_with_defaults(server: &Value, defaults: &Value) -> Value {
    match (server, defaults) {
        (Value::Null, d) => d.clone(),
        (Value::Object(s), Value::Object(d)) => {
            let mut out = Map::new();
            for (key, default) in d {
                let merged = match s.get(key) {
                    Some(value) => merge_with_defaults(value, default),
                    None => default.clone(),
                };
                out.insert(key.clone(), merged);
            }
            for (key, value) in s {
                if !d.contains_key(key) {
                    out.insert(key.clone(), value.clone());
                }
            }
            Value::Object(out)
        }
        (Value::Array(s), Value::Array(d)) => match d.first() {
            Some(template) => Value::Array(
                s.iter()
                    .map(|item| merge_with_defaults(item, template))
                    .collect(),
            ),
            None => Value::Array(s.clone()),
        },
        (s, d) if same_kind(s, d) => s.clone(),
        (_, d) => d.clone(),
    }
}

/// Decode stored list values into records, each element merged against a blank
/// record first. A field that will not decode falls back to its default; the
/// record itself is kept.
pub fn parse_records<R: Record>(values: &Value) -> Vec<R> {
    let Some(items) = values.as_array() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let template = serde_json::to_value(R::blank(position)).unwrap_or(Value::Null);
        let merged = merge_with_defaults(item, &template);
        match serde_json::from_value::<R>(merged.clone()) {
            Ok(record) => out.push(record),
            Err(e) => {
                warn!("Malformed {} record {}: {}", R::KIND, position, e);
                out.push(salvage(&merged, &template).unwrap_or_else(|| R::blank(position)));
            }
        }
    }
    out
}

/// Rebuild a record from the template, taking each stored field only if the
/// record still decodes with it.
fn salvage<R: Record>(merged: &Value, template: &Value) -> Option<R> {
    let (Value::Object(fields), Value::Object(base)) = (merged, template) else {
        return None;
    };
    let mut current = base.clone();
    for (key, value) in fields {
        let previous = current.insert(key.clone(), value.clone());
        if serde_json::from_value::<R>(Value::Object(current.clone())).is_err() {
            warn!("Dropping unreadable {}.{}", R::KIND, key);
            match previous {
                Some(p) => current.insert(key.clone(), p),
                None => current.remove(key),
            };
        }
    }
    serde_json::from_value(Value::Object(current)).ok()
}

fn same_kind(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Bool(_), Value::Bool(_))
            | (Value::Number(_), Value::Number(_))
            | (Value::String(_), Value::String(_))
            | (Value::Array(_), Value::Array(_))
            | (Value::Object(_), Value::Object(_))
    )
}
