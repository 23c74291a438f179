#![forbid(unsafe_code)]

use super::ai::ai_error;
use gl_core::ids::IdError;
use serde_json::Value;

pub(crate) type Args = serde_json::Map<String, Value>;

pub(crate) fn require_object(args: &Value) -> Result<&Args, Value> {
    args.as_object()
        .ok_or_else(|| ai_error("INVALID_INPUT", "arguments must be an object"))
}

pub(crate) fn require_string(args: &Args, key: &str) -> Result<String, Value> {
    match args.get(key) {
        Some(Value::String(v)) => Ok(v.to_string()),
        Some(Value::Null) | None => Err(ai_error("INVALID_INPUT", &format!("{key} is required"))),
        Some(_) => Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be a string"),
        )),
    }
}

pub(crate) fn optional_string(args: &Args, key: &str) -> Result<Option<String>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::String(v) => Ok(Some(v.to_string())),
        _ => Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be a string"),
        )),
    }
}

pub(crate) fn optional_bool(args: &Args, key: &str) -> Result<Option<bool>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::Bool(v) => Ok(Some(*v)),
        _ => Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be a boolean"),
        )),
    }
}

pub(crate) fn optional_usize(args: &Args, key: &str) -> Result<Option<usize>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| usize::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| {
                ai_error(
                    "INVALID_INPUT",
                    &format!("{key} must be a non-negative integer"),
                )
            }),
        _ => Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be a non-negative integer"),
        )),
    }
}

/// Required positive row id, validated through the id newtype constructor.
pub(crate) fn require_id<T>(
    args: &Args,
    key: &str,
    make: fn(i64) -> Result<T, IdError>,
) -> Result<T, Value> {
    let raw = match args.get(key) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::Null) | None => {
            return Err(ai_error("INVALID_INPUT", &format!("{key} is required")));
        }
        Some(_) => None,
    };
    let Some(raw) = raw else {
        return Err(ai_error(
            "INVALID_INPUT",
            &format!("{key} must be an integer"),
        ));
    };
    make(raw).map_err(|err| ai_error("INVALID_INPUT", &format!("{key}: {}", err.message())))
}
