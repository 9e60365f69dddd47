//! Response normalization
//!
//! The endpoint is loosely specified: it may answer with JSON or plain text,
//! may put an `error` field on a 200, and may fail with a bare status. The
//! functions here reduce all of that to a [`CompletionOutcome`].

use serde_json::Value;

use crate::{CompletionOutcome, Result, Usage};

/// Text used when a non-JSON body is empty
pub const UNKNOWN_FORMAT: &str = "Unknown response format";

/// Whether a `Content-Type` header value declares JSON
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}

/// Decode a response body into a JSON payload.
///
/// A body declared as JSON must parse. Anything else is parsed best-effort and
/// wrapped as `{ "error": <text> }` when it isn't JSON.
pub fn decode_body(content_type: Option<&str>, body: &str) -> Result<Value> {
    if is_json_content_type(content_type) {
        return Ok(serde_json::from_str(body)?);
    }

    match serde_json::from_str(body) {
        Ok(value) => Ok(value),
        Err(_) => {
            let text = if body.is_empty() { UNKNOWN_FORMAT } else { body };
            Ok(serde_json::json!({ "error": text }))
        }
    }
}

/// Turn a decoded payload and the transport status into an outcome.
pub fn resolve(status: u16, success: bool, payload: &Value) -> CompletionOutcome {
    let error = payload.get("error").and_then(truthy_text);

    if !success {
        return CompletionOutcome::failure(error.unwrap_or_else(|| format!("HTTP {}", status)));
    }

    if let Some(error) = error {
        return CompletionOutcome::failure(error);
    }

    let response = match payload.get("response") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let usage = payload
        .get("usage")
        .filter(|u| !u.is_null())
        .and_then(|u| serde_json::from_value::<Usage>(u.clone()).ok());

    CompletionOutcome::Success { response, usage }
}

/// Text of a JSON value if it would count as set: non-empty strings, non-zero
/// numbers, `true`, and any array or object.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
