pub mod acid;
pub mod analytics;
pub mod inventory;
pub mod order;
pub mod payment;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};

/// Business-level refusal (entity missing, empty input). Rendered with a 200
/// and `success: false`, distinct from transport-level 4xx/5xx envelopes.
pub(crate) fn rejection(message: impl Into<String>) -> JsonValue {
    json!({"success": false, "error": message.into()})
}

pub(crate) fn field_i64(row: &JsonValue, key: &str) -> Option<i64> {
    row.get(key).and_then(JsonValue::as_i64)
}

pub(crate) fn field_f64(row: &JsonValue, key: &str) -> Option<f64> {
    row.get(key).and_then(JsonValue::as_f64)
}

pub(crate) fn field_str<'a>(row: &'a JsonValue, key: &str) -> Option<&'a str> {
    row.get(key).and_then(JsonValue::as_str)
}

/// Money and tax columns arrive as JSON numbers through the positional
/// fallback but as strings when NUMERIC passes through driver metadata.
pub(crate) fn decimal_field(row: &JsonValue, key: &str) -> anyhow::Result<Decimal> {
    let value = row
        .get(key)
        .ok_or_else(|| crate::lined_err!("Missing column: {}", key))?;
    match value {
        JsonValue::Number(n) => n
            .as_f64()
            .and_then(Decimal::from_f64)
            .ok_or_else(|| crate::lined_err!("Non-finite number in column: {}", key)),
        JsonValue::String(s) => s
            .parse::<Decimal>()
            .map_err(|e| crate::lined_err!("Bad decimal in column {}: {}", key, e)),
        _ => Err(crate::lined_err!("Non-numeric column: {}", key)),
    }
}

/// `"c_first c_middle c_last"`, skipping empty parts.
pub(crate) fn customer_name(row: &JsonValue) -> String {
    ["c_first", "c_middle", "c_last"]
        .iter()
        .filter_map(|key| field_str(row, key))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
