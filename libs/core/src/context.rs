use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::{ContextId, PrincipalId, TenantId};

/// Optional dry-run/time-override hooks a test harness can attach to a request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestingContext {
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_time: Option<String>,
}

/// Per-request carrier, constructed once per request and passed by reference
/// into every handler. Never a thread-local or task-local: those leak across
/// pooled-task reuse and concurrent in-flight requests under a multi-threaded
/// scheduler, silently mixing one tenant's context into another's request.
///
/// Invariant: never empty. If a [`ToolContext`] cannot be built (tenant or
/// principal unresolved), the request is rejected before one is constructed;
/// there is no "default" or placeholder variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolContext {
    pub context_id: ContextId,
    pub tenant_id: TenantId,
    pub principal_id: PrincipalId,
    pub tool_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub request_timestamp: OffsetDateTime,
    pub metadata: RequestMetadata,
    #[serde(default)]
    pub testing_context: TestingContext,
}

/// Transport-level provenance recorded on every [`ToolContext`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMetadata {
    pub source: String,
    pub protocol: Protocol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    A2aJsonRpc,
    Mcp,
}

impl ToolContext {
    pub fn new(
        context_id: ContextId,
        tenant_id: TenantId,
        principal_id: PrincipalId,
        tool_name: impl Into<String>,
        protocol: Protocol,
    ) -> Self {
        Self {
            context_id,
            tenant_id,
            principal_id,
            tool_name: tool_name.into(),
            request_timestamp: OffsetDateTime::now_utc(),
            metadata: RequestMetadata {
                source: match protocol {
                    Protocol::A2aJsonRpc => "a2a_server".to_string(),
                    Protocol::Mcp => "mcp_server".to_string(),
                },
                protocol,
            },
            testing_context: TestingContext::default(),
        }
    }
}
