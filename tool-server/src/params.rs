//! Typed extraction helpers over a tool invocation's string-keyed
//! parameter map (`spec.md` §6: "each tool declares its validated schema").

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ToolError;

pub fn require_str<'a>(params: &'a Map<String, Value>, key: &str) -> Result<&'a str, ToolError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::bad_params(format!("missing or non-string '{key}'")))
}

pub fn optional_str<'a>(params: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    params.get(key).and_then(Value::as_str)
}

pub fn require_f64(params: &Map<String, Value>, key: &str) -> Result<f64, ToolError> {
    params
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| ToolError::bad_params(format!("missing or non-numeric '{key}'")))
}

pub fn optional_f64(params: &Map<String, Value>, key: &str) -> Option<f64> {
    params.get(key).and_then(Value::as_f64)
}

pub fn require_uuid(params: &Map<String, Value>, key: &str) -> Result<Uuid, ToolError> {
    let raw = require_str(params, key)?;
    Uuid::parse_str(raw).map_err(|e| ToolError::bad_params(format!("'{key}' is not a valid id: {e}")))
}

pub fn optional_string_vec(params: &Map<String, Value>, key: &str) -> Vec<String> {
    params
        .get(key)
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

pub fn optional_usize(params: &Map<String, Value>, key: &str) -> Option<usize> {
    params.get(key).and_then(Value::as_u64).map(|n| n as usize)
}
