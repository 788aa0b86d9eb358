//! Helpers for pulling typed engine parameters out of a `serde_json::Value`.
//!
//! The lenient helpers (`param_f64`, `param_usize`, `param_bool`,
//! `param_string`) never fail: a missing or wrongly-typed key yields the
//! default. [`param_count`] rejects negative populations.

use crate::error::EngineError;
use serde_json::Value;

/// Reads `params[name]` as `f64`, or `default` if missing or not a number.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Reads `params[name]` as a non-negative integer, or `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// Reads `params[name]` as `u32`, or `default` if missing or out of range.
pub fn param_u32(params: &Value, name: &str, default: u32) -> u32 {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}

/// Reads `params[name]` as `bool`, or `default`.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Reads `params[name]` as a `String`, or `default`.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// Reads a population count.
///
/// Missing keys yield `default`. Negative integers are rejected with
/// [`EngineError::InvalidVehicleCount`]; any other non-integer value is a
/// [`EngineError::ParamTypeMismatch`].
pub fn param_count(params: &Value, name: &str, default: usize) -> Result<usize, EngineError> {
    let Some(value) = params.get(name) else {
        return Ok(default);
    };
    if let Some(n) = value.as_u64() {
        return Ok(n as usize);
    }
    if let Some(n) = value.as_i64() {
        return Err(EngineError::InvalidVehicleCount(n));
    }
    Err(EngineError::ParamTypeMismatch {
        name: name.to_owned(),
        expected: "non-negative integer".into(),
        got: json_type_name(value).into(),
    })
}

/// Checks that `[min, max]` is a usable positive range.
pub fn validate_range(name: &str, min: f64, max: f64) -> Result<(f64, f64), EngineError> {
    let finite = min.is_finite() && max.is_finite();
    if !finite || min <= 0.0 || min > max {
        return Err(EngineError::InvalidRange {
            name: name.to_owned(),
            min,
            max,
        });
    }
    Ok((min, max))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
