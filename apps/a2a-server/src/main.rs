use std::sync::Arc;
use std::time::Duration;

use adcp_a2a_server::config::ServerConfig;
use adcp_a2a_server::routes::build_router;
use adcp_a2a_server::state::{AppState, PushConfigStore};
use adcp_core::schema::product::Product;
use adcp_core::skills::Deps;
use adcp_core::tenant::{AdServerKind, Principal, Tenant};
use adcp_core::testkit::{InMemoryFormatRegistry, InMemoryPrincipalStore, InMemoryProductCatalog, MockAdServerAdapter};
use adcp_core::webhook::PushNotificationService;
use adcp_telemetry::audit::ActivityFeed;
use anyhow::Result;
use axum::serve;
use tokio::net::TcpListener;
use tracing::info;

const ACTIVITY_FEED_CAPACITY: usize = 500;

/// No real tenant/principal/catalog backend is in scope (those are
/// out-of-scope binding collaborators — see `adcp_core::collaborators`), so
/// this binary seeds one illustrative `demo` tenant from env vars, the same
/// role `messaging-tenants` plays for the teacher's gateway in local runs.
fn seed_demo_deps(config: &ServerConfig) -> Deps {
    let principals = Arc::new(InMemoryPrincipalStore::new());
    let catalog = Arc::new(InMemoryProductCatalog::new());
    let formats = Arc::new(InMemoryFormatRegistry::new());
    let adapter = Arc::new(MockAdServerAdapter::default());

    let demo_tenant_id: adcp_core::ids::TenantId = "demo".into();
    principals.add_tenant(Tenant {
        tenant_id: demo_tenant_id.clone(),
        subdomain: "demo".to_string(),
        virtual_host: None,
        ad_server: AdServerKind::Mock,
        admin_token: std::env::var("ADCP_DEMO_ADMIN_TOKEN").unwrap_or_else(|_| "demo-admin-token".to_string()),
        auto_approve_formats: Vec::new(),
        human_review_required: false,
        max_daily_budget: None,
        webhook_url: None,
        is_active: true,
    });
    principals.add_principal(Principal {
        principal_id: "demo_buyer".into(),
        tenant_id: demo_tenant_id.clone(),
        name: "Demo Buyer".to_string(),
        access_token: std::env::var("ADCP_DEMO_BUYER_TOKEN").unwrap_or_else(|_| "demo-buyer-token".to_string()),
        platform_mappings: Default::default(),
    });

    catalog.add_product(
        demo_tenant_id,
        Product {
            product_id: "demo_homepage".to_string(),
            name: "Demo Homepage Takeover".to_string(),
            description: "Illustrative product seeded for local development.".to_string(),
            properties: adcp_core::schema::product::ProductProperties::Tags(vec!["homepage".to_string()]),
            pricing_options: Vec::new(),
            format_ids: Vec::new(),
            delivery_type: Some("guaranteed".to_string()),
            is_fixed_price: true,
            is_standard: true,
        },
    );

    Deps::new(adapter, catalog, principals, formats, config.core.default_format_agent_url.clone())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env()?;
    adcp_telemetry::init_tracing(config.json_logs)?;

    let deps = seed_demo_deps(&config);
    let state = Arc::new(AppState {
        tasks: adcp_core::task::TaskTable::default(),
        push_configs: PushConfigStore::new(),
        push_service: PushNotificationService::new(),
        activity: ActivityFeed::new(ACTIVITY_FEED_CAPACITY),
        config: config.clone(),
        deps,
    });

    let sweep_state = Arc::clone(&state);
    let retention = sweep_state.config.core.task_retention;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            adcp_core::task::sweep_expired(&sweep_state.tasks, retention);
        }
    });

    let router = build_router(state);
    let listener = TcpListener::bind(config.addr).await?;
    info!("adcp-a2a-server listening on {}", config.addr);

    serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
