//! Protocol-tier error mapping to JSON-RPC 2.0 error codes. Distinct from
//! `adcp_core`'s `DomainError`/`SchemaError`, which never cross this
//! boundary — those are collected into a response's own `errors[]` and
//! still ride back inside a `2xx` JSON-RPC *result*.

use adcp_core::auth::AuthError;
use adcp_core::error::DomainErrorCode;
use adcp_core::schema::SchemaError;

#[derive(Debug, thiserror::Error)]
pub enum A2aError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("method not found: {0}")]
    MethodNotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl A2aError {
    pub fn json_rpc_code(&self) -> i64 {
        match self {
            A2aError::InvalidRequest(_) => -32600,
            A2aError::MethodNotFound(_) => -32601,
            A2aError::InvalidParams(_) => -32602,
            A2aError::Internal(_) => -32603,
        }
    }

    /// An error-code string matching `DomainErrorCode`'s wire form, carried
    /// in the JSON-RPC error object's `data` so callers get the same
    /// vocabulary domain errors use, even for a protocol-tier rejection.
    pub fn domain_code(&self) -> Option<&'static str> {
        match self {
            A2aError::InvalidRequest(msg) if msg.contains("principal_not_in_tenant") => {
                Some("principal_not_in_tenant")
            }
            A2aError::InvalidRequest(_) => Some("authentication_error"),
            _ => None,
        }
    }
}

/// Maps tenant/principal resolution failures onto the JSON-RPC error
/// surface. `AuthError::PrincipalNotFound` is the tenant-isolation property
/// in disguise: a token that only matches a principal in a *different*
/// tenant looks identical to "no such token" here, and is reported with the
/// `principal_not_in_tenant` domain code so a caller probing for a
/// cross-tenant bypass gets a legible, stable error string rather than a
/// generic auth failure.
impl From<AuthError> for A2aError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TenantNotFound | AuthError::TenantInactive(_) => {
                A2aError::InvalidRequest(format!("tenant_detection_failed: {err}"))
            }
            AuthError::MissingToken => A2aError::InvalidRequest(format!("authentication_error: {err}")),
            AuthError::PrincipalNotFound(_) => {
                A2aError::InvalidRequest(format!("principal_not_in_tenant: {err}"))
            }
        }
    }
}

impl From<SchemaError> for A2aError {
    fn from(err: SchemaError) -> Self {
        A2aError::InvalidParams(err.message)
    }
}

pub fn domain_error_code_str(code: DomainErrorCode) -> &'static str {
    match code {
        DomainErrorCode::ValidationError => "validation_error",
        DomainErrorCode::AuthenticationError => "authentication_error",
        DomainErrorCode::AuthorizationError => "authorization_error",
        DomainErrorCode::TenantDetectionFailed => "tenant_detection_failed",
        DomainErrorCode::PrincipalNotInTenant => "principal_not_in_tenant",
        DomainErrorCode::PricingModelUnsupported => "pricing_model_unsupported",
        DomainErrorCode::ProductNotFound => "product_not_found",
        DomainErrorCode::FormatNotFound => "format_not_found",
        DomainErrorCode::AdapterError => "adapter_error",
        DomainErrorCode::ManualApprovalRequired => "manual_approval_required",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adcp_core::ids::TenantId;

    #[test]
    fn principal_not_found_maps_to_principal_not_in_tenant() {
        let err: A2aError = AuthError::PrincipalNotFound(TenantId::from("acme")).into();
        assert_eq!(err.json_rpc_code(), -32600);
        assert_eq!(err.domain_code(), Some("principal_not_in_tenant"));
    }
}
