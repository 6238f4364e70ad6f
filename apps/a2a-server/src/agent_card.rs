//! Dynamic agent-card discovery document, served at three paths for
//! compatibility with older A2A clients. One handler backs all three, the
//! way the original's `create_dynamic_agent_card` recomputes `url` from
//! request headers rather than baking a static host into the card.

use axum::extract::Extension;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use adcp_core::skills::table::SKILL_TABLE;

use crate::state::SharedState;

fn incoming_host(headers: &HeaderMap) -> Option<String> {
    headers
        .get("apx-incoming-host")
        .or_else(|| headers.get(axum::http::header::HOST))
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn scheme_for(host: &str) -> &'static str {
    let bare = host.split(':').next().unwrap_or(host);
    if bare == "localhost" || bare == "127.0.0.1" {
        "http"
    } else {
        "https"
    }
}

pub async fn serve(Extension(_state): Extension<SharedState>, headers: HeaderMap) -> Json<Value> {
    let host = incoming_host(&headers).unwrap_or_else(|| "localhost:8091".to_string());
    let url = format!("{}://{}/a2a", scheme_for(&host), host);

    let skills: Vec<_> = SKILL_TABLE
        .iter()
        .map(|s| json!({ "name": s.name, "description": s.description, "legacy_alias": s.legacy_alias }))
        .collect();

    Json(json!({
        "name": "AdCP Sales Agent",
        "description": "Multi-tenant advertising sales agent speaking AdCP over A2A and MCP.",
        "url": url,
        "version": env!("CARGO_PKG_VERSION"),
        "capabilities": { "streaming": true, "push_notifications": true },
        "skills": skills,
    }))
}
