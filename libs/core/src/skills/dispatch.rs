//! Name-indexed skill dispatch shared by every transport wrapper (A2A
//! explicit-skill calls, MCP tool calls). Each transport owns its own
//! envelope/task/lifecycle concerns; this is the one place that knows how to
//! turn a skill name plus a raw JSON payload into a typed request, invoke the
//! handler, and decide whether the call counts as a success.

use serde_json::{json, Value};

use crate::context::ToolContext;
use crate::error::Severity;
use crate::schema::creative::{CreativeAction, SyncCreativesRequest};
use crate::schema::delivery::{GetMediaBuyDeliveryRequest, UpdatePerformanceIndexRequest};
use crate::schema::media_buy::{CreateMediaBuyRequestInput, UpdateMediaBuyRequestInput};
use crate::schema::product::GetProductsRequest;
use crate::schema::signals::{ActivateSignalRequest, GetSignalsRequest};

use super::{aliases, creatives, media_buy, products, signals, Deps};

pub fn errors_array_is_empty(value: &Value) -> bool {
    value.get("errors").and_then(Value::as_array).map(|a| a.is_empty()).unwrap_or(true)
}

pub fn as_object_or_empty(value: Value) -> Value {
    if value.is_object() {
        value
    } else {
        json!({})
    }
}

pub fn parse_error_value(err: impl std::fmt::Display) -> Value {
    json!({ "errors": [{ "code": "validation_error", "message": err.to_string(), "severity": "error" }] })
}

/// Dispatches one skill call by name. Never panics and never surfaces a raw
/// `serde_json`/domain error to the caller — a malformed or domain-rejected
/// input becomes `(value, false)`, leaving the caller free to decide what a
/// failed call means for its own response shape (a failed task artifact for
/// A2A, a tool-error result for MCP).
pub async fn dispatch_skill(name: &str, raw_input: Value, ctx: &ToolContext, deps: &Deps) -> (Value, bool) {
    let raw_input = as_object_or_empty(raw_input);

    match name {
        "get_products" => {
            let req: GetProductsRequest = serde_json::from_value(raw_input).unwrap_or_default();
            let resp = products::get_products(&req, ctx, deps).await;
            let success = resp.errors.iter().all(|e| e.severity != Severity::Error);
            (serde_json::to_value(resp).unwrap_or(Value::Null), success)
        }
        "create_media_buy" => {
            let input: CreateMediaBuyRequestInput = match serde_json::from_value(raw_input) {
                Ok(v) => v,
                Err(e) => return (parse_error_value(e), false),
            };
            match input.normalize() {
                Ok((req, _warnings)) => {
                    let resp = media_buy::create_media_buy(&req, ctx, deps).await;
                    let success = resp.media_buy_id.is_some() && resp.errors.iter().all(|e| e.severity != Severity::Error);
                    (serde_json::to_value(resp).unwrap_or(Value::Null), success)
                }
                Err(schema_err) => (json!({ "errors": [schema_err] }), false),
            }
        }
        "update_media_buy" => {
            let input: UpdateMediaBuyRequestInput = match serde_json::from_value(raw_input) {
                Ok(v) => v,
                Err(e) => return (parse_error_value(e), false),
            };
            match input.normalize() {
                Ok((req, _warnings)) => {
                    let resp = media_buy::update_media_buy(&req, ctx, deps).await;
                    let success = resp.errors.is_empty();
                    (serde_json::to_value(resp).unwrap_or(Value::Null), success)
                }
                Err(schema_err) => (json!({ "errors": [schema_err] }), false),
            }
        }
        "get_media_buy_delivery" => {
            let req: GetMediaBuyDeliveryRequest = serde_json::from_value(raw_input).unwrap_or(GetMediaBuyDeliveryRequest {
                media_buy_ids: Vec::new(),
                media_buy_id: None,
            });
            let resp = media_buy::get_media_buy_delivery(&req, ctx, deps).await;
            (serde_json::to_value(resp).unwrap_or(Value::Null), true)
        }
        "sync_creatives" => {
            let req: SyncCreativesRequest = match serde_json::from_value(raw_input) {
                Ok(v) => v,
                Err(e) => return (parse_error_value(e), false),
            };
            let resp = creatives::sync_creatives(&req, ctx, deps).await;
            let success = resp.creatives.iter().all(|c| !matches!(c.action, CreativeAction::Rejected));
            (serde_json::to_value(resp).unwrap_or(Value::Null), success)
        }
        "list_creatives" => {
            let filters: crate::schema::creative::ListCreativesFilters =
                serde_json::from_value(raw_input).unwrap_or_default();
            let resp = creatives::list_creatives(&filters, ctx, deps).await;
            (serde_json::to_value(resp).unwrap_or(Value::Null), true)
        }
        "list_creative_formats" => {
            let filter = crate::collaborators::FormatFilter {
                format_type: raw_input.get("format_type").and_then(Value::as_str).map(str::to_string),
                channel: raw_input.get("channel").and_then(Value::as_str).map(str::to_string),
            };
            let formats = products::list_creative_formats(&filter, deps);
            (json!({ "formats": formats }), true)
        }
        "list_authorized_properties" => {
            let resp = products::list_authorized_properties(ctx);
            (serde_json::to_value(resp).unwrap_or(Value::Null), true)
        }
        "get_signals" | "search_signals" => {
            let req: GetSignalsRequest = match serde_json::from_value(raw_input) {
                Ok(v) => v,
                Err(e) => return (parse_error_value(e), false),
            };
            let resp = signals::get_signals(&req, ctx, deps).await;
            (serde_json::to_value(resp).unwrap_or(Value::Null), true)
        }
        "activate_signal" => {
            let req: ActivateSignalRequest = match serde_json::from_value(raw_input) {
                Ok(v) => v,
                Err(e) => return (parse_error_value(e), false),
            };
            let resp = signals::activate_signal(&req, ctx, deps).await;
            let success = resp.errors.is_empty();
            (serde_json::to_value(resp).unwrap_or(Value::Null), success)
        }
        "update_performance_index" => {
            let req: UpdatePerformanceIndexRequest = match serde_json::from_value(raw_input) {
                Ok(v) => v,
                Err(e) => return (parse_error_value(e), false),
            };
            let resp = media_buy::update_performance_index(&req, ctx, deps).await;
            let success = resp.status == "accepted";
            (serde_json::to_value(resp).unwrap_or(Value::Null), success)
        }
        "approve_creative" => match raw_input.get("creative_id").and_then(Value::as_str) {
            Some(creative_id) => {
                let result = aliases::approve_creative(creative_id);
                let success = !matches!(result.action, CreativeAction::Rejected);
                (serde_json::to_value(result).unwrap_or(Value::Null), success)
            }
            None => (parse_error_value("approve_creative requires `creative_id`"), false),
        },
        "get_media_buy_status" => match raw_input.get("media_buy_id").and_then(Value::as_str) {
            Some(media_buy_id) => {
                let resp = aliases::get_media_buy_status(media_buy_id, ctx, deps).await;
                (serde_json::to_value(resp).unwrap_or(Value::Null), true)
            }
            None => (parse_error_value("get_media_buy_status requires `media_buy_id`"), false),
        },
        "optimize_media_buy" => match raw_input.get("media_buy_id").and_then(Value::as_str) {
            Some(media_buy_id) => {
                let resp = aliases::optimize_media_buy(media_buy_id, ctx, deps).await;
                let success = resp.errors.is_empty();
                (serde_json::to_value(resp).unwrap_or(Value::Null), success)
            }
            None => (parse_error_value("optimize_media_buy requires `media_buy_id`"), false),
        },
        "get_pricing" => {
            let req: GetProductsRequest = serde_json::from_value(raw_input).unwrap_or_default();
            let value = aliases::get_pricing(&req, ctx, deps).await;
            let success = errors_array_is_empty(&value);
            (value, success)
        }
        "get_targeting" => {
            let req: GetProductsRequest = serde_json::from_value(raw_input).unwrap_or_default();
            let value = aliases::get_targeting(&req, ctx, deps).await;
            let success = errors_array_is_empty(&value);
            (value, success)
        }
        other => (parse_error_value(format!("unknown skill '{other}'")), false),
    }
}
