//! Shared server state, bundled behind one `Arc` the same way the A2A
//! transport's `AppState` is — generalized here to the `Deps` bundle and the
//! audit feed only, since the MCP transport has no task table or push
//! notification lifecycle of its own: a tool call is synchronous
//! request/response, not a polled task.

use adcp_core::skills::Deps;
use adcp_telemetry::audit::ActivityFeed;

use crate::config::ServerConfig;

pub struct AppState {
    pub deps: Deps,
    pub activity: ActivityFeed,
    pub config: ServerConfig,
}

pub type SharedState = std::sync::Arc<AppState>;
