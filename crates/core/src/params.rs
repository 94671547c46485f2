//! Lenient accessors for engine parameters stored as a JSON object.
//!
//! A missing key or a value of the wrong JSON type falls back to the
//! caller's default; these helpers never fail. Range validation belongs to
//! the engine's own params type.

use serde_json::Value;

/// Number at `params[name]` (integers accepted), else `default`.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Non-negative integer at `params[name]`, else `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Two-element numeric array `[lo, hi]` at `params[name]`, else `default`.
///
/// Arrays of any other length, or with non-numeric entries, are ignored.
pub fn param_range(params: &Value, name: &str, default: (f64, f64)) -> (f64, f64) {
    match params.get(name).and_then(Value::as_array).map(Vec::as_slice) {
        Some([lo, hi]) => match (lo.as_f64(), hi.as_f64()) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => default,
        },
        _ => default,
    }
}

/// Optional number: `Some` when present and numeric, `None` when the key is
/// missing or explicitly `null`, `default` otherwise.
pub fn param_opt_f64(params: &Value, name: &str, default: Option<f64>) -> Option<f64> {
    match params.get(name) {
        Some(Value::Null) => None,
        Some(v) => v.as_f64().or(default),
        None => default,
    }
}
