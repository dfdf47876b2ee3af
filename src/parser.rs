use serde_json::Value;

use crate::error::Result;
use crate::models::Page;

pub fn parse_page(body: &str) -> Result<Page> {
    Ok(serde_json::from_str(body)?)
}

pub fn parse_record(body: &str) -> Result<Value> {
    Ok(serde_json::from_str(body)?)
}

/// Numeric `id` of a listing entry, if it has one.
pub fn product_id(summary: &Value) -> Option<u64> {
    summary.get("id").and_then(Value::as_u64)
}
