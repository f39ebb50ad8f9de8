//! Permissive dot-path reads over JSON values

use serde_json::Value;

/// Read a nested value by a dot-separated path such as `result.parts.0.text`
///
/// Object segments are looked up by key; numeric segments index into arrays.
/// A missing key, an out-of-range index or stepping into a scalar all give
/// `None`. Meant for logging and display, not for protocol decoding.
pub fn extract<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index)),
        _ => None,
    })
}

/// Like [`extract`], but only yields string leaves
pub fn extract_str<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    extract(value, path).and_then(Value::as_str)
}
