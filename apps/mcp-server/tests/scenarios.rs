//! Integration scenarios for the MCP transport, same `oneshot`-through-the-
//! router style as the A2A transport's test suite.

use std::sync::Arc;

use adcp_core::schema::product::{Product, ProductProperties};
use adcp_core::skills::Deps;
use adcp_core::tenant::{AdServerKind, Principal, Tenant};
use adcp_core::testkit::{InMemoryFormatRegistry, InMemoryPrincipalStore, InMemoryProductCatalog, MockAdServerAdapter};
use adcp_mcp_server::config::ServerConfig;
use adcp_mcp_server::routes::build_router;
use adcp_mcp_server::state::AppState;
use adcp_telemetry::audit::ActivityFeed;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_state() -> Arc<AppState> {
    let principals = Arc::new(InMemoryPrincipalStore::new());
    let catalog = Arc::new(InMemoryProductCatalog::new());
    let formats = Arc::new(InMemoryFormatRegistry::new());
    let adapter = Arc::new(MockAdServerAdapter::default());

    let tenant_id: adcp_core::ids::TenantId = "acme".into();
    principals.add_tenant(Tenant {
        tenant_id: tenant_id.clone(),
        subdomain: "acme".to_string(),
        virtual_host: None,
        ad_server: AdServerKind::Mock,
        admin_token: "acme-admin-token".to_string(),
        auto_approve_formats: Vec::new(),
        human_review_required: false,
        max_daily_budget: None,
        webhook_url: None,
        is_active: true,
    });
    principals.add_principal(Principal {
        principal_id: "buyer_1".into(),
        tenant_id: tenant_id.clone(),
        name: "Test Buyer".to_string(),
        access_token: "buyer-token".to_string(),
        platform_mappings: Default::default(),
    });

    catalog.add_product(
        tenant_id,
        Product {
            product_id: "homepage_takeover".to_string(),
            name: "Homepage Takeover".to_string(),
            description: "Full-page homepage placement.".to_string(),
            properties: ProductProperties::Tags(vec!["homepage".to_string()]),
            pricing_options: Vec::new(),
            format_ids: Vec::new(),
            delivery_type: Some("guaranteed".to_string()),
            is_fixed_price: true,
            is_standard: true,
        },
    );

    let deps = Deps::new(adapter, catalog, principals, formats, "https://formats.example.com/agent");

    Arc::new(AppState { activity: ActivityFeed::new(500), config: ServerConfig::for_testing(), deps })
}

fn rpc_request(id: Value, method: &str, params: Value) -> Request<Body> {
    let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
    Request::builder()
        .method("POST")
        .uri("/mcp/")
        .header("content-type", "application/json")
        .header("x-adcp-tenant", "acme")
        .header("x-adcp-auth", "buyer-token")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn tools_list_advertises_every_skill() {
    let router = build_router(test_state());
    let req = rpc_request(json!(1), "tools/list", json!({}));
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let tools = body["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), adcp_core::skills::table::SKILL_TABLE.len());
}

#[tokio::test]
async fn tools_call_get_products_succeeds() {
    let router = build_router(test_state());
    let req = rpc_request(
        json!(2),
        "tools/call",
        json!({"name": "get_products", "arguments": {"brief": "homepage", "brand_manifest": {"name": "Acme Corp"}}}),
    );
    let response = router.oneshot(req).await.unwrap();
    let body = body_json(response).await;

    assert!(body.get("error").is_none(), "unexpected error: {body:?}");
    assert_eq!(body["result"]["isError"], json!(false));
    let content = body["result"]["content"][0]["text"].as_str().unwrap();
    assert!(content.contains("homepage_takeover"));
}

#[tokio::test]
async fn tools_call_unknown_tool_is_method_not_found() {
    let router = build_router(test_state());
    let req = rpc_request(json!(3), "tools/call", json!({"name": "not_a_real_tool", "arguments": {}}));
    let response = router.oneshot(req).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!(-32601));
}

#[tokio::test]
async fn tools_call_surfaces_domain_failure_as_is_error_not_protocol_error() {
    let router = build_router(test_state());
    let req = rpc_request(
        json!(4),
        "tools/call",
        json!({
            "name": "create_media_buy",
            "arguments": {
                "brand_manifest": {"name": "Acme Corp"},
                "buyer_ref": "buyer-ref-1",
                "packages": [{"product_id": "homepage_takeover"}],
                "budget": {"total": 1000.0, "currency": "USD"}
            }
        }),
    );
    let response = router.oneshot(req).await.unwrap();
    let body = body_json(response).await;

    assert!(body.get("error").is_none());
    assert_eq!(body["result"]["isError"], json!(true));
}

#[tokio::test]
async fn missing_auth_header_fails_before_the_tool_runs() {
    let router = build_router(test_state());
    let body = json!({
        "jsonrpc": "2.0",
        "id": 5,
        "method": "tools/call",
        "params": {"name": "get_products", "arguments": {}}
    });
    let req = Request::builder()
        .method("POST")
        .uri("/mcp/")
        .header("content-type", "application/json")
        .header("x-adcp-tenant", "acme")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();

    let response = router.oneshot(req).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!(-32600));
}

#[tokio::test]
async fn anonymous_get_products_succeeds_without_a_token() {
    let router = build_router(test_state());
    let body = json!({
        "jsonrpc": "2.0",
        "id": 6,
        "method": "tools/call",
        "params": {"name": "get_products", "arguments": {"brand_manifest": {"name": "Acme Corp"}}}
    });
    let req = Request::builder()
        .method("POST")
        .uri("/mcp/")
        .header("content-type", "application/json")
        .header("x-adcp-tenant", "acme")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();

    let response = router.oneshot(req).await.unwrap();
    let body = body_json(response).await;
    assert!(body.get("error").is_none(), "unexpected error: {body:?}");
    assert_eq!(body["result"]["isError"], json!(false));
}

#[tokio::test]
async fn invalid_token_is_rejected_even_for_an_auth_optional_tool() {
    let router = build_router(test_state());
    let req = rpc_request(json!(7), "tools/call", json!({"name": "get_products", "arguments": {"brand_manifest": {"name": "Acme Corp"}}}));
    let req = {
        let (mut parts, body) = req.into_parts();
        parts.headers.insert("x-adcp-auth", "not-a-real-token".parse().unwrap());
        Request::from_parts(parts, body)
    };

    let response = router.oneshot(req).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!(-32600));
}
