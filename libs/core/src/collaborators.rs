//! Narrow, async-trait-object interfaces to systems this crate does not own:
//! the ad server, the product catalog, the tenant/principal directory, and
//! the creative format registry. Production wiring supplies real
//! implementations; [`crate::testkit`] supplies in-memory ones for tests and
//! local development.

use async_trait::async_trait;

use crate::ids::TenantId;
use crate::schema::product::PricingModel;
use crate::tenant::{Principal, Tenant};

#[async_trait]
pub trait PrincipalStore: Send + Sync {
    async fn find_tenant_by_virtual_host(&self, host: &str) -> Option<Tenant>;
    async fn find_tenant_by_subdomain(&self, sub: &str) -> Option<Tenant>;
    /// Scoped lookup only — see [`crate::auth::resolve_principal`] for why
    /// implementers must not fall back to a cross-tenant search when
    /// `tenant_id` yields no match.
    async fn find_principal(&self, tenant_id: &TenantId, token: &str) -> Option<Principal>;
    /// Looks up a tenant by its own id, for skill handlers that already hold
    /// a resolved `tenant_id` (from `ToolContext`) and need the tenant's
    /// approval policy (`human_review_required`, `auto_approve_formats`).
    async fn find_tenant(&self, tenant_id: &TenantId) -> Option<Tenant>;
}

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("pricing model {0:?} is not supported by this adapter")]
    UnsupportedPricingModel(PricingModel),
    #[error("ad server rejected the request: {0}")]
    Rejected(String),
    #[error("ad server adapter transport error: {0}")]
    Transport(String),
}

/// Placeholder result types: a full adapter would return the ad server's
/// native media buy id plus whatever line-item/creative associations it
/// created. Kept intentionally thin here — orchestrating a real ad server
/// integration is out of scope.
#[derive(Debug, Clone)]
pub struct AdapterMediaBuyResult {
    pub external_media_buy_id: String,
}

#[derive(Debug, Clone)]
pub struct AdapterUpdateResult {
    pub accepted: bool,
}

#[async_trait]
pub trait AdServerAdapter: Send + Sync {
    fn supported_pricing_models(&self) -> &[PricingModel];

    async fn create_media_buy(
        &self,
        req: &crate::schema::media_buy::CreateMediaBuyRequest,
        ctx: &crate::context::ToolContext,
    ) -> Result<AdapterMediaBuyResult, AdapterError>;

    async fn update_media_buy(
        &self,
        req: &crate::schema::media_buy::UpdateMediaBuyRequest,
        ctx: &crate::context::ToolContext,
    ) -> Result<AdapterUpdateResult, AdapterError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn search(
        &self,
        tenant_id: &TenantId,
        filters: &crate::schema::product::ProductFilters,
        brief: Option<&str>,
    ) -> Result<Vec<crate::schema::product::Product>, CatalogError>;

    async fn get(
        &self,
        tenant_id: &TenantId,
        product_id: &str,
    ) -> Result<Option<crate::schema::product::Product>, CatalogError>;
}

#[derive(Debug, Clone, Default)]
pub struct FormatFilter {
    pub format_type: Option<String>,
    pub channel: Option<String>,
}

/// Synchronous on purpose: format registries are expected to be static,
/// process-local lookups (a baked-in table or a hot-reloaded snapshot), never
/// a per-call network round trip.
pub trait FormatRegistry: Send + Sync {
    fn resolve(&self, format_id: &crate::schema::formats::FormatId) -> Option<crate::schema::formats::CreativeFormat>;
    fn list(&self, filter: &FormatFilter) -> Vec<crate::schema::formats::CreativeFormat>;
}
