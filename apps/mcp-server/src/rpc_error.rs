//! Protocol-tier error mapping to JSON-RPC 2.0 error codes, mirroring the
//! A2A transport's `A2aError` — distinct from `adcp_core`'s
//! `DomainError`/`SchemaError`, which never cross this boundary.

use adcp_core::auth::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("method not found: {0}")]
    MethodNotFound(String),
}

impl McpError {
    pub fn json_rpc_code(&self) -> i64 {
        match self {
            McpError::InvalidRequest(_) => -32600,
            McpError::MethodNotFound(_) => -32601,
            McpError::InvalidParams(_) => -32602,
        }
    }
}

impl From<AuthError> for McpError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TenantNotFound | AuthError::TenantInactive(_) => {
                McpError::InvalidRequest(format!("tenant_detection_failed: {err}"))
            }
            AuthError::MissingToken => McpError::InvalidRequest(format!("authentication_error: {err}")),
            AuthError::PrincipalNotFound(_) => McpError::InvalidRequest(format!("principal_not_in_tenant: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adcp_core::ids::TenantId;

    #[test]
    fn principal_not_found_maps_to_invalid_request() {
        let err: McpError = AuthError::PrincipalNotFound(TenantId::from("acme")).into();
        assert_eq!(err.json_rpc_code(), -32600);
    }
}
