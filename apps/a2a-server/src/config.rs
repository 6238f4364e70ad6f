//! Env-var configuration for the A2A binary, layering its own bind address
//! on top of `adcp_core::config::CoreConfig` the way the teacher layers
//! `GatewayConfig` on a shared core config.

use std::env;
use std::net::SocketAddr;

use adcp_core::config::CoreConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub core: CoreConfig,
    pub addr: SocketAddr,
    pub json_logs: bool,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let core = CoreConfig::from_env()?;
        let host = env::var("A2A_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("A2A_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8091);
        let addr = format!("{host}:{port}")
            .parse()
            .map_err(|err| anyhow::anyhow!("invalid A2A_HOST/A2A_PORT combination: {err}"))?;

        Ok(ServerConfig {
            core,
            addr,
            json_logs: env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false),
        })
    }

    /// A fixed, env-independent config for integration tests that build an
    /// `AppState` directly rather than through `from_env`.
    pub fn for_testing() -> Self {
        ServerConfig {
            core: CoreConfig {
                schema_mode: adcp_core::config::SchemaMode::Lenient,
                dry_run: true,
                default_format_agent_url: "https://adcp-formats.example.com".to_string(),
                task_retention: time::Duration::minutes(15),
            },
            addr: "127.0.0.1:0".parse().expect("valid socket addr literal"),
            json_logs: false,
        }
    }
}
