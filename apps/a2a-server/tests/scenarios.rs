//! End-to-end scenarios driven straight through the router with
//! `tower::ServiceExt::oneshot`, the way the teacher's gateway integration
//! tests exercise `build_router` rather than individual handlers.

use std::sync::Arc;

use adcp_core::schema::product::{Product, ProductProperties};
use adcp_core::skills::Deps;
use adcp_core::task::TaskTable;
use adcp_core::tenant::{AdServerKind, Principal, Tenant};
use adcp_core::testkit::{InMemoryFormatRegistry, InMemoryPrincipalStore, InMemoryProductCatalog, MockAdServerAdapter};
use adcp_core::webhook::PushNotificationService;
use adcp_telemetry::audit::ActivityFeed;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use adcp_a2a_server::config::ServerConfig;
use adcp_a2a_server::routes::build_router;
use adcp_a2a_server::state::{AppState, PushConfigStore};

const TENANT_HEADER: &str = "x-adcp-tenant";
const AUTH_HEADER: &str = "authorization";

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

    Arc::new(AppState {
        tasks: TaskTable::default(),
        push_configs: PushConfigStore::new(),
        push_service: PushNotificationService::new(),
        activity: ActivityFeed::new(500),
        config: ServerConfig::for_testing(),
        deps,
    })
}

fn rpc_request(id: Value, method: &str, params: Value) -> Request<Body> {
    let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
    Request::builder()
        .method("POST")
        .uri("/a2a")
        .header("content-type", "application/json")
        .header(TENANT_HEADER, "acme")
        .header(AUTH_HEADER, "Bearer buyer-token")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn explicit_get_products_skill_succeeds() {
    let state = test_state();
    let router = build_router(state);

    let req = rpc_request(
        json!(1),
        "message/send",
        json!({
            "message": {
                "parts": [{"kind": "data", "data": {"skill": "get_products", "input": {"brief": "homepage", "brand_manifest": {"name": "Acme Corp"}}}}]
            }
        }),
    );

    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert!(body.get("error").is_none(), "unexpected error: {body:?}");
    let result = &body["result"];
    assert_eq!(result["status"], json!("completed"));
    assert!(result["task_id"].is_string());
}

#[tokio::test]
async fn create_media_buy_missing_schedule_fails_without_protocol_error() {
    let state = test_state();
    let router = build_router(state);

    let req = rpc_request(
        json!(2),
        "message/send",
        json!({
            "message": {
                "parts": [{
                    "kind": "data",
                    "data": {
                        "skill": "create_media_buy",
                        "input": {
                            "brand_manifest": {"name": "Acme Corp"},
                            "buyer_ref": "buyer-ref-1",
                            "packages": [{"product_id": "homepage_takeover"}],
                            "budget": {"total": 1000.0, "currency": "USD"}
                        }
                    }
                }]
            }
        }),
    );

    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    // Missing start_time/end_time is a validation failure surfaced as a
    // failed task artifact, not a JSON-RPC protocol error.
    assert!(body.get("error").is_none());
    assert_eq!(body["result"]["status"], json!("failed"));
}

#[tokio::test]
async fn natural_language_routes_to_product_discovery() {
    let state = test_state();
    let router = build_router(state);

    let req = rpc_request(
        json!(3),
        "message/send",
        json!({
            "message": {
                "parts": [{"kind": "text", "text": "What products do you have available for a homepage campaign?"}]
            }
        }),
    );

    let response = router.oneshot(req).await.unwrap();
    let body = body_json(response).await;

    assert!(body.get("error").is_none());
    assert_eq!(body["result"]["status"], json!("completed"));
    let artifacts = body["result"]["payload"]["artifacts"].as_array().expect("artifacts array");
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0]["name"], json!("product_catalog"));
}

#[tokio::test]
async fn unknown_skill_is_a_method_not_found_protocol_error() {
    let state = test_state();
    let router = build_router(state);

    let req = rpc_request(
        json!(4),
        "message/send",
        json!({
            "message": {
                "parts": [{"kind": "data", "data": {"skill": "not_a_real_skill", "input": {}}}]
            }
        }),
    );

    let response = router.oneshot(req).await.unwrap();
    let body = body_json(response).await;

    assert_eq!(body["error"]["code"], json!(-32601));
}

#[tokio::test]
async fn cancel_is_idempotent_and_fires_no_second_webhook() {
    let state = test_state();
    let router = build_router(state);

    let send_req = rpc_request(
        json!(5),
        "message/send",
        json!({
            "message": {
                "parts": [{"kind": "data", "data": {"skill": "get_products", "input": {}}}]
            }
        }),
    );
    let send_resp = router.clone().oneshot(send_req).await.unwrap();
    let send_body = body_json(send_resp).await;
    let task_id = send_body["result"]["task_id"].as_str().unwrap().to_string();

    let cancel_req = rpc_request(json!(6), "tasks/cancel", json!({ "task_id": task_id }));
    let first = router.clone().oneshot(cancel_req).await.unwrap();
    let first_body = body_json(first).await;
    assert_eq!(first_body["result"]["status"], json!("canceled"));

    let cancel_again = rpc_request(json!(7), "tasks/cancel", json!({ "task_id": task_id }));
    let second = router.oneshot(cancel_again).await.unwrap();
    let second_body = body_json(second).await;
    assert_eq!(second_body["result"]["status"], json!("canceled"));
}

#[tokio::test]
async fn push_notification_config_crud_round_trips_with_soft_delete() {
    let state = test_state();
    let router = build_router(state);

    let set_req = rpc_request(
        json!(8),
        "tasks/pushNotificationConfig/set",
        json!({
            "push_notification_config": {
                "id": "cfg-1",
                "url": "https://webhook.example.com/notify",
                "authentication": {"scheme": "bearer", "token": "secret-token"}
            }
        }),
    );
    let set_resp = router.clone().oneshot(set_req).await.unwrap();
    let set_body = body_json(set_resp).await;
    assert_eq!(set_body["result"]["id"], json!("cfg-1"));

    let list_req = rpc_request(json!(9), "tasks/pushNotificationConfig/list", json!({}));
    let list_resp = router.clone().oneshot(list_req).await.unwrap();
    let list_body = body_json(list_resp).await;
    assert_eq!(list_body["result"]["push_notification_configs"].as_array().unwrap().len(), 1);

    let get_req = rpc_request(json!(10), "tasks/pushNotificationConfig/get", json!({ "config_id": "cfg-1" }));
    let get_resp = router.clone().oneshot(get_req).await.unwrap();
    let get_body = body_json(get_resp).await;
    assert_eq!(get_body["result"]["id"], json!("cfg-1"));

    let delete_req = rpc_request(json!(11), "tasks/pushNotificationConfig/delete", json!({ "config_id": "cfg-1" }));
    let delete_resp = router.clone().oneshot(delete_req).await.unwrap();
    let delete_body = body_json(delete_resp).await;
    assert_eq!(delete_body["result"]["deleted"], json!(true));

    let get_after_delete = rpc_request(json!(12), "tasks/pushNotificationConfig/get", json!({ "config_id": "cfg-1" }));
    let after = router.oneshot(get_after_delete).await.unwrap();
    let after_body = body_json(after).await;
    assert!(after_body.get("error").is_some(), "deleted config should no longer resolve");
}

#[tokio::test]
async fn unknown_tenant_header_fails_authentication_before_handler_runs() {
    let state = test_state();
    let router = build_router(state);

    let body = json!({
        "jsonrpc": "2.0",
        "id": 13,
        "method": "message/send",
        "params": {
            "message": { "parts": [{"kind": "text", "text": "hello"}] }
        }
    });
    let req = Request::builder()
        .method("POST")
        .uri("/a2a")
        .header("content-type", "application/json")
        .header(TENANT_HEADER, "nonexistent-tenant")
        .header(AUTH_HEADER, "Bearer buyer-token")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();

    let response = router.oneshot(req).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!(-32600));
}

#[tokio::test]
async fn numeric_ids_are_coerced_to_strings_by_compatibility_middleware() {
    let state = test_state();
    let router = build_router(state);

    // `id` sent as a bare JSON number rather than a string, matching older
    // clients the compatibility middleware exists for.
    let raw_body = r#"{"jsonrpc":"2.0","id":42,"method":"tasks/pushNotificationConfig/list","params":{}}"#;
    let req = Request::builder()
        .method("POST")
        .uri("/a2a")
        .header("content-type", "application/json")
        .header(TENANT_HEADER, "acme")
        .header(AUTH_HEADER, "Bearer buyer-token")
        .body(Body::from(raw_body))
        .unwrap();

    let response = router.oneshot(req).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["id"], json!("42"));
}

#[tokio::test]
async fn anonymous_get_products_succeeds_without_a_token() {
    let state = test_state();
    let router = build_router(state);

    let body = json!({
        "jsonrpc": "2.0",
        "id": 14,
        "method": "message/send",
        "params": {
            "message": {
                "parts": [{"kind": "data", "data": {"skill": "get_products", "input": {"brand_manifest": {"name": "Acme Corp"}}}}]
            }
        }
    });
    let req = Request::builder()
        .method("POST")
        .uri("/a2a")
        .header("content-type", "application/json")
        .header(TENANT_HEADER, "acme")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();

    let response = router.oneshot(req).await.unwrap();
    let body = body_json(response).await;
    assert!(body.get("error").is_none(), "unexpected error: {body:?}");
    assert_eq!(body["result"]["status"], json!("completed"));
}

#[tokio::test]
async fn invalid_token_is_rejected_even_for_an_auth_optional_skill() {
    let state = test_state();
    let router = build_router(state);

    let body = json!({
        "jsonrpc": "2.0",
        "id": 15,
        "method": "message/send",
        "params": {
            "message": {
                "parts": [{"kind": "data", "data": {"skill": "get_products", "input": {"brand_manifest": {"name": "Acme Corp"}}}}]
            }
        }
    });
    let req = Request::builder()
        .method("POST")
        .uri("/a2a")
        .header("content-type", "application/json")
        .header(TENANT_HEADER, "acme")
        .header(AUTH_HEADER, "Bearer not-a-real-token")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();

    let response = router.oneshot(req).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!(-32600));
}
