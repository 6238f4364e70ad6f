//! Compatibility middleware, mirroring the original's
//! `messageId_compatibility_middleware`: some older clients send the
//! JSON-RPC envelope `id` and the message's `message_id` as a bare JSON
//! number rather than a string. Coerced to strings here, once, before any
//! handler or `serde_json::from_value` call has to account for both shapes.

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use serde_json::Value;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub async fn coerce_numeric_ids(request: Request, next: Next) -> Result<Response, StatusCode> {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;

    if bytes.is_empty() {
        let request = Request::from_parts(parts, Body::from(bytes));
        return Ok(next.run(request).await);
    }

    let rewritten = match serde_json::from_slice::<Value>(&bytes) {
        Ok(mut value) => {
            coerce_in_place(&mut value);
            serde_json::to_vec(&value).unwrap_or_else(|_| bytes.to_vec())
        }
        Err(_) => bytes.to_vec(),
    };

    let request = Request::from_parts(parts, Body::from(rewritten));
    Ok(next.run(request).await)
}

fn coerce_in_place(value: &mut Value) {
    if let Some(obj) = value.as_object_mut() {
        coerce_field(obj, "id");

        if let Some(params) = obj.get_mut("params").and_then(Value::as_object_mut) {
            if let Some(message) = params.get_mut("message").and_then(Value::as_object_mut) {
                coerce_field(message, "message_id");
                coerce_field(message, "messageId");
            }
        }
    }
}

fn coerce_field(obj: &mut serde_json::Map<String, Value>, key: &str) {
    if let Some(Value::Number(n)) = obj.get(key) {
        obj.insert(key.to_string(), Value::String(n.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_numeric_top_level_id() {
        let mut value = serde_json::json!({"jsonrpc": "2.0", "id": 42, "method": "tasks/get"});
        coerce_in_place(&mut value);
        assert_eq!(value["id"], serde_json::json!("42"));
    }

    #[test]
    fn coerces_numeric_message_id_in_params() {
        let mut value = serde_json::json!({
            "id": "a",
            "params": {"message": {"message_id": 7, "parts": []}},
        });
        coerce_in_place(&mut value);
        assert_eq!(value["params"]["message"]["message_id"], serde_json::json!("7"));
    }

    #[test]
    fn leaves_string_ids_untouched() {
        let mut value = serde_json::json!({"id": "already-a-string"});
        coerce_in_place(&mut value);
        assert_eq!(value["id"], serde_json::json!("already-a-string"));
    }
}
