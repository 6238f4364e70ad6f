use std::sync::Arc;

use adcp_core::schema::product::{Product, ProductProperties};
use adcp_core::skills::Deps;
use adcp_core::tenant::{AdServerKind, Principal, Tenant};
use adcp_core::testkit::{InMemoryFormatRegistry, InMemoryPrincipalStore, InMemoryProductCatalog, MockAdServerAdapter};
use adcp_mcp_server::config::ServerConfig;
use adcp_mcp_server::routes::build_router;
use adcp_mcp_server::state::AppState;
use adcp_telemetry::audit::ActivityFeed;
use anyhow::Result;
use axum::serve;
use tokio::net::TcpListener;
use tracing::info;

const ACTIVITY_FEED_CAPACITY: usize = 500;

/// Same illustrative `demo` tenant the A2A binary seeds — no real
/// tenant/principal/catalog backend is in scope, so both transport binaries
/// fall back to the same in-memory fixture for local runs.
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
            properties: ProductProperties::Tags(vec!["homepage".to_string()]),
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
    let state = Arc::new(AppState { activity: ActivityFeed::new(ACTIVITY_FEED_CAPACITY), config: config.clone(), deps });

    let router = build_router(state);
    let listener = TcpListener::bind(config.addr).await?;
    info!("adcp-mcp-server listening on {}", config.addr);

    serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
