//! MCP tool-call dispatch: `tools/list` and `tools/call`, the two methods
//! this transport supports. Both are plain JSON-RPC 2.0, same envelope shape
//! as the A2A transport, but tool calls are synchronous — no task table, no
//! push-notification lifecycle, just a skill invocation and its result.

use adcp_core::auth::{build_context, build_context_auth_optional, RequestHeaders};
use adcp_core::context::Protocol;
use adcp_core::skills::dispatch_skill;
use adcp_core::skills::table::{self, SKILL_TABLE};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::rpc_error::McpError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, serde::Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, serde::Serialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
}

impl JsonRpcResponse {
    fn ok(id: Value, result: Value) -> Self {
        JsonRpcResponse { jsonrpc: "2.0", id, result: Some(result), error: None }
    }

    fn err(id: Value, err: McpError) -> Self {
        JsonRpcResponse {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcErrorObject { code: err.json_rpc_code(), message: err.to_string() }),
        }
    }
}

pub async fn handle_rpc(state: &SharedState, headers: RequestHeaders, req: JsonRpcRequest) -> JsonRpcResponse {
    let id = req.id.clone();
    match dispatch_method(state, &headers, &req.method, req.params).await {
        Ok(result) => JsonRpcResponse::ok(id, result),
        Err(err) => JsonRpcResponse::err(id, err),
    }
}

async fn dispatch_method(state: &SharedState, headers: &RequestHeaders, method: &str, params: Value) -> Result<Value, McpError> {
    match method {
        "tools/list" => Ok(tools_list()),
        "tools/call" => tools_call(state, headers, params).await,
        other => Err(McpError::MethodNotFound(other.to_string())),
    }
}

fn tools_list() -> Value {
    let tools: Vec<_> = SKILL_TABLE
        .iter()
        .map(|s| {
            json!({
                "name": s.name,
                "description": s.description,
                "inputSchema": { "type": "object" },
            })
        })
        .collect();
    json!({ "tools": tools })
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Runs one tool call and reports it in the MCP `content`/`isError` shape.
/// A domain-level failure (bad input, rejected creative, unsupported pricing
/// model) becomes `isError: true` with the failure details in `content`,
/// never a JSON-RPC protocol error — that's reserved for an unresolvable
/// tenant/principal or a tool name this agent doesn't advertise at all.
async fn tools_call(state: &SharedState, headers: &RequestHeaders, params: Value) -> Result<Value, McpError> {
    let params: ToolCallParams = serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let descriptor = table::find(&params.name).ok_or_else(|| McpError::MethodNotFound(params.name.clone()))?;

    let ctx = if descriptor.auth_optional {
        build_context_auth_optional(state.deps.principals.clone(), headers, &params.name, Protocol::Mcp, None).await?
    } else {
        build_context(state.deps.principals.clone(), headers, &params.name, Protocol::Mcp, None).await?
    };

    let (value, success) = dispatch_skill(&params.name, params.arguments, &ctx, &state.deps).await;
    state
        .activity
        .log_operation(ctx.tenant_id.as_str(), ctx.principal_id.as_str(), &params.name, success, None, None);

    Ok(json!({
        "content": [{ "type": "text", "text": serde_json::to_string(&value).unwrap_or_default() }],
        "isError": !success,
    }))
}
