use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ids::{PrincipalId, TenantId};

/// Which ad-server backs a tenant's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdServerKind {
    GoogleAdManager,
    Mock,
    Kevel,
    Triton,
}

/// Publisher identity. Read-only from the core's perspective; provisioned
/// out-of-band via the Admin subsystem and looked up through
/// [`crate::collaborators::PrincipalStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub tenant_id: TenantId,
    pub subdomain: String,
    pub virtual_host: Option<String>,
    pub ad_server: AdServerKind,
    pub admin_token: String,
    pub auto_approve_formats: Vec<String>,
    pub human_review_required: bool,
    pub max_daily_budget: Option<f64>,
    pub webhook_url: Option<String>,
    pub is_active: bool,
}

impl Tenant {
    /// Synthesizes the admin principal id this tenant's admin token authenticates as.
    pub fn admin_principal_id(&self) -> PrincipalId {
        PrincipalId::from(format!("admin_{}", self.tenant_id.as_str()))
    }
}

/// Advertiser identity scoped to exactly one tenant.
///
/// Invariant: `(tenant_id, access_token)` is unique, and `access_token` is
/// also globally unique across tenants — see
/// [`crate::auth::resolve_principal`] for why a global lookup is still
/// forbidden from the request path despite that uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub principal_id: PrincipalId,
    pub tenant_id: TenantId,
    pub name: String,
    pub access_token: String,
    #[serde(default)]
    pub platform_mappings: BTreeMap<String, serde_json::Value>,
}
