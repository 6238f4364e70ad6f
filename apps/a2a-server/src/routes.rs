//! Router assembly, following the teacher's `build_router` shape:
//! `Extension<Arc<State>>` layered over a flat route table, handlers kept
//! thin and `#[debug_handler]`-annotated.

use axum::extract::Extension;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{debug_handler, Json, Router};
use serde_json::{json, Value};

use adcp_core::auth::{resolve_tenant, RequestHeaders};

use crate::agent_card;
use crate::dispatcher::{handle_rpc, JsonRpcRequest};
use crate::middleware::coerce_numeric_ids;
use crate::state::SharedState;

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/a2a", post(a2a_endpoint))
        .route("/.well-known/agent-card.json", get(agent_card::serve))
        .route("/.well-known/agent.json", get(agent_card::serve))
        .route("/agent.json", get(agent_card::serve))
        .route("/debug/tenant", get(debug_tenant))
        .route_layer(axum::middleware::from_fn(coerce_numeric_ids))
        .layer(Extension(state))
}

fn headers_from(headers: &HeaderMap) -> RequestHeaders {
    let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    let bearer_token = header_str("authorization")
        .and_then(|v| v.strip_prefix("Bearer ").map(str::to_string))
        .or_else(|| header_str("x-adcp-auth"));

    RequestHeaders {
        apx_incoming_host: header_str("apx-incoming-host"),
        host: header_str("host"),
        x_adcp_tenant: header_str("x-adcp-tenant"),
        bearer_token,
    }
}

#[debug_handler]
async fn a2a_endpoint(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
    Json(req): Json<JsonRpcRequest>,
) -> Json<Value> {
    let request_headers = headers_from(&headers);
    let response = handle_rpc(&state, request_headers, req).await;
    Json(serde_json::to_value(response).unwrap_or(Value::Null))
}

#[debug_handler]
async fn debug_tenant(
    Extension(state): Extension<SharedState>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<Value>), (StatusCode, Json<Value>)> {
    let request_headers = headers_from(&headers);
    let tenant = resolve_tenant(state.deps.principals.as_ref(), &request_headers)
        .await
        .map_err(|err| (StatusCode::NOT_FOUND, Json(json!({ "error": err.to_string() }))))?;

    let mut response_headers = HeaderMap::new();
    if let Ok(value) = tenant.tenant_id.as_str().parse() {
        response_headers.insert("x-tenant-id", value);
    }

    Ok((response_headers, Json(json!({ "tenant_id": tenant.tenant_id.as_str(), "subdomain": tenant.subdomain }))))
}
