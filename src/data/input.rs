//! Boundary coercion for user-entered numbers. Invalid input never errors: it becomes 0.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Upper bound on the employee-count field, so a stray entry cannot allocate millions of rows.
pub const MAX_EMPLOYEE_COUNT: usize = 10_000;

/// Parses a currency or percent field. Empty, non-numeric, non-finite and negative input yields 0.
pub fn coerce_amount(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map(sanitize_amount).unwrap_or(0.0)
}

pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parses the employee-count field. Fractions truncate; anything not positive yields 0.
pub fn coerce_count(raw: &str) -> usize {
    raw.trim().parse::<f64>().map(sanitize_count).unwrap_or(0)
}

pub fn sanitize_count(value: f64) -> usize {
    if !value.is_finite() || value < 1.0 {
        return 0;
    }
    let truncated = value.trunc();
    if truncated >= MAX_EMPLOYEE_COUNT as f64 {
        MAX_EMPLOYEE_COUNT
    } else {
        truncated as usize
    }
}

/// Amount from any JSON value: numbers are sanitized, strings parsed, everything else is 0.
pub fn amount_from_value(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().map(sanitize_amount).unwrap_or(0.0),
        Value::String(raw) => coerce_amount(raw),
        _ => 0.0,
    }
}

pub fn count_from_value(value: &Value) -> usize {
    match value {
        Value::Number(number) => number.as_f64().map(sanitize_count).unwrap_or(0),
        Value::String(raw) => coerce_count(raw),
        _ => 0,
    }
}

/// `deserialize_with` target for amount fields that must not reject a request.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| amount_from_value(&value))
}

pub fn deserialize_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| count_from_value(&value))
}
