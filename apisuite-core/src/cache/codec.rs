//! Cache value encoding.
//!
//! Numbers are stored as bare decimal text, everything else as JSON text.

use serde_json::Value;

use crate::error::{ApiSuiteError, Result};

pub fn encode(value: &Value) -> Result<String> {
    match value {
        Value::Number(n) => Ok(n.to_string()),
        other => Ok(serde_json::to_string(other)?),
    }
}

pub fn decode(raw: &str) -> Result<Value> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(Value::from(n));
    }
    if let Ok(n) = trimmed.parse::<u64>() {
        return Ok(Value::from(n));
    }
    if let Ok(f) = trimmed.parse::<f64>()
        && let Some(n) = serde_json::Number::from_f64(f)
    {
        return Ok(Value::Number(n));
    }
    serde_json::from_str(raw)
        .map_err(|e| ApiSuiteError::CacheError(format!("corrupt cache entry: {e}")))
}
