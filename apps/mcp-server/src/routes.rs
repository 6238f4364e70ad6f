//! Router assembly for the MCP transport: one `POST /mcp/` endpoint plus a
//! liveness probe, `Extension<Arc<AppState>>` layered over the route table
//! the same way the A2A transport's `build_router` does it.

use axum::extract::Extension;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{debug_handler, Json, Router};
use serde_json::Value;

use adcp_core::auth::RequestHeaders;

use crate::dispatcher::{handle_rpc, JsonRpcRequest};
use crate::state::SharedState;

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/mcp/", post(mcp_endpoint))
        .route("/healthz", get(healthz))
        .layer(Extension(state))
}

async fn healthz() -> &'static str {
    "ok"
}

fn headers_from(headers: &HeaderMap) -> RequestHeaders {
    let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    RequestHeaders {
        apx_incoming_host: header_str("apx-incoming-host"),
        host: header_str("host"),
        x_adcp_tenant: header_str("x-adcp-tenant"),
        bearer_token: header_str("x-adcp-auth"),
    }
}

#[debug_handler]
async fn mcp_endpoint(Extension(state): Extension<SharedState>, headers: HeaderMap, Json(req): Json<JsonRpcRequest>) -> Json<Value> {
    let request_headers = headers_from(&headers);
    let response = handle_rpc(&state, request_headers, req).await;
    Json(serde_json::to_value(response).unwrap_or(Value::Null))
}
