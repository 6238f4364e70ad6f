//! In-memory implementations of every binding-collaborator trait, used by
//! default in tests and by `adcp-tools` for local fixture seeding. None of
//! these are meant to back a real deployment — swap each for a real
//! datastore/adapter client behind the same trait.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::collaborators::{
    AdServerAdapter, AdapterError, AdapterMediaBuyResult, AdapterUpdateResult, CatalogError,
    FormatFilter, FormatRegistry, PrincipalStore, ProductCatalog,
};
use crate::context::ToolContext;
use crate::ids::TenantId;
use crate::schema::formats::{CreativeFormat, FormatId};
use crate::schema::media_buy::{CreateMediaBuyRequest, UpdateMediaBuyRequest};
use crate::schema::product::{PricingModel, Product, ProductFilters};
use crate::tenant::{Principal, Tenant};

#[derive(Default)]
pub struct InMemoryPrincipalStore {
    tenants_by_subdomain: DashMap<String, Tenant>,
    tenants_by_virtual_host: DashMap<String, Tenant>,
    principals: DashMap<(TenantId, String), Principal>,
}

impl InMemoryPrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tenant(&self, tenant: Tenant) {
        self.tenants_by_subdomain
            .insert(tenant.subdomain.clone(), tenant.clone());
        if let Some(vhost) = &tenant.virtual_host {
            self.tenants_by_virtual_host.insert(vhost.clone(), tenant.clone());
        }
    }

    pub fn add_principal(&self, principal: Principal) {
        self.principals
            .insert((principal.tenant_id.clone(), principal.access_token.clone()), principal);
    }
}

#[async_trait]
impl PrincipalStore for InMemoryPrincipalStore {
    async fn find_tenant_by_virtual_host(&self, host: &str) -> Option<Tenant> {
        self.tenants_by_virtual_host.get(host).map(|t| t.clone())
    }

    async fn find_tenant_by_subdomain(&self, sub: &str) -> Option<Tenant> {
        self.tenants_by_subdomain.get(sub).map(|t| t.clone())
    }

    async fn find_principal(&self, tenant_id: &TenantId, token: &str) -> Option<Principal> {
        if let Some(principal) = self
            .principals
            .get(&(tenant_id.clone(), token.to_string()))
        {
            return Some(principal.clone());
        }

        let tenant = self.tenants_by_subdomain.iter().find(|t| &t.tenant_id == tenant_id)?;
        if tenant.admin_token == token {
            return Some(Principal {
                principal_id: tenant.admin_principal_id(),
                tenant_id: tenant_id.clone(),
                name: format!("{} admin", tenant.subdomain),
                access_token: token.to_string(),
                platform_mappings: BTreeMap::new(),
            });
        }
        None
    }

    async fn find_tenant(&self, tenant_id: &TenantId) -> Option<Tenant> {
        self.tenants_by_subdomain
            .iter()
            .find(|t| &t.tenant_id == tenant_id)
            .map(|t| t.clone())
    }
}

#[derive(Default)]
pub struct InMemoryProductCatalog {
    products: DashMap<TenantId, Vec<Product>>,
}

impl InMemoryProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_product(&self, tenant_id: TenantId, product: Product) {
        self.products.entry(tenant_id).or_default().push(product);
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn search(
        &self,
        tenant_id: &TenantId,
        filters: &ProductFilters,
        brief: Option<&str>,
    ) -> Result<Vec<Product>, CatalogError> {
        let products = self
            .products
            .get(tenant_id)
            .map(|p| p.clone())
            .unwrap_or_default();

        Ok(products
            .into_iter()
            .filter(|p| filters.matches(p))
            .filter(|p| brief.map(|b| crate::schema::product::matches_brief(p, b)).unwrap_or(true))
            .collect())
    }

    async fn get(&self, tenant_id: &TenantId, product_id: &str) -> Result<Option<Product>, CatalogError> {
        Ok(self
            .products
            .get(tenant_id)
            .and_then(|p| p.iter().find(|p| p.product_id == product_id).cloned()))
    }
}

pub struct MockAdServerAdapter {
    supported: Vec<PricingModel>,
}

impl MockAdServerAdapter {
    pub fn new(supported: Vec<PricingModel>) -> Self {
        Self { supported }
    }
}

impl Default for MockAdServerAdapter {
    fn default() -> Self {
        Self::new(vec![PricingModel::Cpm, PricingModel::FlatRate])
    }
}

#[async_trait]
impl AdServerAdapter for MockAdServerAdapter {
    fn supported_pricing_models(&self) -> &[PricingModel] {
        &self.supported
    }

    async fn create_media_buy(
        &self,
        _req: &CreateMediaBuyRequest,
        _ctx: &ToolContext,
    ) -> Result<AdapterMediaBuyResult, AdapterError> {
        Ok(AdapterMediaBuyResult {
            external_media_buy_id: format!("mock_mb_{}", uuid::Uuid::new_v4()),
        })
    }

    async fn update_media_buy(
        &self,
        _req: &UpdateMediaBuyRequest,
        _ctx: &ToolContext,
    ) -> Result<AdapterUpdateResult, AdapterError> {
        Ok(AdapterUpdateResult { accepted: true })
    }
}

#[derive(Default)]
pub struct InMemoryFormatRegistry {
    formats: RwLock<Vec<CreativeFormat>>,
}

impl InMemoryFormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, format: CreativeFormat) {
        self.formats.write().expect("format registry lock poisoned").push(format);
    }
}

impl FormatRegistry for InMemoryFormatRegistry {
    fn resolve(&self, format_id: &FormatId) -> Option<CreativeFormat> {
        self.formats
            .read()
            .expect("format registry lock poisoned")
            .iter()
            .find(|f| &f.format_id == format_id)
            .cloned()
    }

    fn list(&self, filter: &FormatFilter) -> Vec<CreativeFormat> {
        self.formats
            .read()
            .expect("format registry lock poisoned")
            .iter()
            .filter(|f| {
                filter
                    .format_type
                    .as_ref()
                    .map(|t| format!("{:?}", f.format_type).to_lowercase() == t.to_lowercase())
                    .unwrap_or(true)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenant::AdServerKind;

    fn tenant(subdomain: &str) -> Tenant {
        Tenant {
            tenant_id: subdomain.into(),
            subdomain: subdomain.to_string(),
            virtual_host: None,
            ad_server: AdServerKind::Mock,
            admin_token: format!("{subdomain}-admin-token"),
            auto_approve_formats: vec![],
            human_review_required: false,
            max_daily_budget: None,
            webhook_url: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn admin_token_only_authenticates_its_own_tenant() {
        let store = InMemoryPrincipalStore::new();
        store.add_tenant(tenant("acme"));
        store.add_tenant(tenant("globex"));

        let acme_admin = store
            .find_principal(&"acme".into(), "acme-admin-token")
            .await
            .expect("acme admin token should resolve within acme");
        assert_eq!(acme_admin.tenant_id, "acme".into());

        assert!(store.find_principal(&"globex".into(), "acme-admin-token").await.is_none());
    }
}
