use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::collaborators::PrincipalStore;
use crate::context::{Protocol, ToolContext};
use crate::ids::{ContextId, PrincipalId, TenantId};
use crate::tenant::{Principal, Tenant};

/// The principal id stamped on a [`ToolContext`] built for a discovery-style
/// request with no bearer token presented.
pub const ANONYMOUS_PRINCIPAL_ID: &str = "anonymous";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no tenant could be resolved from the request's host or headers")]
    TenantNotFound,
    #[error("tenant '{0}' is not active")]
    TenantInactive(TenantId),
    #[error("no bearer token supplied")]
    MissingToken,
    #[error("token does not match any principal for tenant '{0}'")]
    PrincipalNotFound(TenantId),
}

/// The raw material out of which a [`ToolContext`] is built, carried by the
/// transport layer (A2A or MCP) from whatever headers it received. The server
/// maps its own header names onto this before calling [`build_context`].
#[derive(Debug, Clone, Default)]
pub struct RequestHeaders {
    /// `Apx-Incoming-Host`, set by the reverse proxy to the original Host the
    /// client dialed, before any internal routing rewrote it.
    pub apx_incoming_host: Option<String>,
    /// The `Host` header as received by this process.
    pub host: Option<String>,
    /// `x-adcp-tenant`, an explicit override for local/dev use.
    pub x_adcp_tenant: Option<String>,
    /// Bearer token from `Authorization`, or the `x-adcp-auth` header on MCP.
    pub bearer_token: Option<String>,
}

/// Resolves the request's tenant from, in order: `Apx-Incoming-Host`, the
/// `Host` header's subdomain, then the `x-adcp-tenant` override header.
///
/// There is deliberately no fallback to a "default" tenant when none of the
/// three resolve — unlike the subdomain-less global principal lookup this
/// crate's `auth_utils` equivalent must not replicate (see
/// [`resolve_principal`]), an unresolved tenant is always a hard failure.
pub async fn resolve_tenant(
    store: &dyn PrincipalStore,
    headers: &RequestHeaders,
) -> Result<Tenant, AuthError> {
    if let Some(host) = headers.apx_incoming_host.as_deref() {
        if let Some(tenant) = store.find_tenant_by_virtual_host(host).await {
            return ensure_active(tenant);
        }
        if let Some(sub) = subdomain_of(host) {
            if let Some(tenant) = store.find_tenant_by_subdomain(&sub).await {
                return ensure_active(tenant);
            }
        }
    }

    if let Some(host) = headers.host.as_deref() {
        if let Some(tenant) = store.find_tenant_by_virtual_host(host).await {
            return ensure_active(tenant);
        }
        if let Some(sub) = subdomain_of(host) {
            if let Some(tenant) = store.find_tenant_by_subdomain(&sub).await {
                return ensure_active(tenant);
            }
        }
    }

    if let Some(tenant_hint) = headers.x_adcp_tenant.as_deref() {
        if let Some(tenant) = store.find_tenant_by_subdomain(tenant_hint).await {
            return ensure_active(tenant);
        }
    }

    Err(AuthError::TenantNotFound)
}

fn ensure_active(tenant: Tenant) -> Result<Tenant, AuthError> {
    if !tenant.is_active {
        return Err(AuthError::TenantInactive(tenant.tenant_id));
    }
    Ok(tenant)
}

/// Labels that are never a tenant subdomain, no matter what precedes them in
/// the `Host` header: the bare local/dev host, the root sales-agent host
/// itself, and its `www` alias.
const RESERVED_SUBDOMAINS: &[&str] = &["localhost", "adcp-sales-agent", "www", "sales-agent"];

fn subdomain_of(host: &str) -> Option<String> {
    let host = host.split(':').next().unwrap_or(host);
    let mut labels = host.split('.');
    let first = labels.next()?;
    // A bare two-label host (e.g. "adcp.example.com" with no subdomain, or a
    // raw IP) has no subdomain to extract.
    if labels.clone().count() < 2 || first.is_empty() {
        return None;
    }
    if RESERVED_SUBDOMAINS.contains(&first) {
        return None;
    }
    Some(first.to_string())
}

/// Resolves the bearer token to a principal, scoped to `tenant_id`.
///
/// This signature has no all-tenants code path and never will: the token is
/// looked up only within the already-resolved tenant. A token that
/// authenticates a principal in a different tenant is indistinguishable from
/// an invalid token here, by design — crossing that boundary is exactly the
/// cross-tenant authentication bypass this resolver exists to prevent.
pub async fn resolve_principal(
    store: &dyn PrincipalStore,
    tenant_id: &TenantId,
    token: &str,
) -> Result<Principal, AuthError> {
    store
        .find_principal(tenant_id, token)
        .await
        .ok_or_else(|| AuthError::PrincipalNotFound(tenant_id.clone()))
}

/// Builds a [`ToolContext`] for one incoming request: resolves the tenant,
/// resolves the principal within that tenant, and stamps a fresh
/// [`ContextId`] unless the transport already assigned one (e.g. a
/// continuation of an existing A2A task).
pub async fn build_context(
    store: Arc<dyn PrincipalStore>,
    headers: &RequestHeaders,
    tool_name: &str,
    protocol: Protocol,
    existing_context_id: Option<ContextId>,
) -> Result<ToolContext, AuthError> {
    let tenant = resolve_tenant(store.as_ref(), headers).await?;

    let token = headers
        .bearer_token
        .as_deref()
        .ok_or(AuthError::MissingToken)?;
    let principal = resolve_principal(store.as_ref(), &tenant.tenant_id, token).await?;

    let context_id =
        existing_context_id.unwrap_or_else(|| ContextId::from(Uuid::new_v4().to_string()));

    Ok(ToolContext::new(
        context_id,
        tenant.tenant_id,
        principal.principal_id,
        tool_name,
        protocol,
    ))
}

/// The discovery-endpoint variant of [`build_context`]: a token that is
/// present but doesn't resolve to a principal is still rejected, but an
/// absent token builds an anonymous context rather than failing, so
/// auth-optional skills (`get_products`, `list_creative_formats`,
/// `list_authorized_properties`, and their legacy aliases) can serve an
/// anonymous catalog.
pub async fn build_context_auth_optional(
    store: Arc<dyn PrincipalStore>,
    headers: &RequestHeaders,
    tool_name: &str,
    protocol: Protocol,
    existing_context_id: Option<ContextId>,
) -> Result<ToolContext, AuthError> {
    let tenant = resolve_tenant(store.as_ref(), headers).await?;

    let principal_id = match headers.bearer_token.as_deref() {
        Some(token) => resolve_principal(store.as_ref(), &tenant.tenant_id, token).await?.principal_id,
        None => PrincipalId::from(ANONYMOUS_PRINCIPAL_ID),
    };

    let context_id = existing_context_id.unwrap_or_else(|| ContextId::from(Uuid::new_v4().to_string()));

    Ok(ToolContext::new(context_id, tenant.tenant_id, principal_id, tool_name, protocol))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdomain_of_strips_port_and_requires_three_labels() {
        assert_eq!(subdomain_of("acme.sales.example.com"), Some("acme".into()));
        assert_eq!(
            subdomain_of("acme.sales.example.com:8443"),
            Some("acme".into())
        );
        assert_eq!(subdomain_of("example.com"), None);
        assert_eq!(subdomain_of("localhost"), None);
    }

    #[test]
    fn subdomain_of_excludes_reserved_labels() {
        assert_eq!(subdomain_of("www.example.com"), None);
        assert_eq!(subdomain_of("adcp-sales-agent.example.com"), None);
        assert_eq!(subdomain_of("sales-agent.example.com"), None);
    }
}
