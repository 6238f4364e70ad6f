//! Shared env-var configuration pieces used by both transport binaries,
//! following the teacher's `GatewayConfig::load`/`from_env` shape: a small
//! typed loader with helper functions per sub-value, not a bespoke parser.

use std::env;

/// Dev vs. prod leniency for unknown fields on wire input. Not a compile-time
/// cfg — the same binary is strict in dev and lenient in production, chosen
/// at startup from `ADCP_SCHEMA_MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaMode {
    Strict,
    Lenient,
}

impl SchemaMode {
    pub fn from_env() -> Self {
        match env::var("ADCP_SCHEMA_MODE").as_deref() {
            Ok("strict") => SchemaMode::Strict,
            _ => SchemaMode::Lenient,
        }
    }
}

/// Config shared across both the A2A and MCP binaries; each binary layers
/// its own bind-address/port on top of this.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub schema_mode: SchemaMode,
    pub dry_run: bool,
    pub default_format_agent_url: String,
    pub task_retention: time::Duration,
}

impl CoreConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(CoreConfig {
            schema_mode: SchemaMode::from_env(),
            dry_run: bool_env("ADCP_DRY_RUN", false),
            default_format_agent_url: env::var("ADCP_DEFAULT_FORMAT_AGENT_URL")
                .unwrap_or_else(|_| "https://adcp-formats.example.com".to_string()),
            task_retention: time::Duration::minutes(15),
        })
    }
}

fn bool_env(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => !matches!(value.as_str(), "0" | "false" | "False" | "FALSE" | ""),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_mode_defaults_to_lenient() {
        // SAFETY: single-threaded test, no concurrent env access in this crate's test binary.
        unsafe {
            env::remove_var("ADCP_SCHEMA_MODE");
        }
        assert_eq!(SchemaMode::from_env(), SchemaMode::Lenient);
    }
}
