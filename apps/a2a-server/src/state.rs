//! Shared server state bundled behind one `Arc`, following the teacher's
//! `GatewayState` shape (`Arc<State>` handed to every handler via
//! `Extension`), generalized from a single NATS client to the skill `Deps`
//! bundle plus task table, push service, and audit feed.

use std::collections::BTreeMap;
use std::sync::Arc;

use adcp_core::ids::{PrincipalId, TenantId};
use adcp_core::skills::Deps;
use adcp_core::task::TaskTable;
use adcp_core::webhook::{PushNotificationConfig, PushNotificationService};
use adcp_telemetry::audit::ActivityFeed;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::config::ServerConfig;

/// One registered push-notification config, plus whether it's still active.
/// Deletes are soft: the row is kept (so `get` on a deleted id still reports
/// "not found" rather than silently reusing the id) but excluded from
/// `list`/delivery.
#[derive(Debug, Clone)]
pub struct PushConfigRecord {
    pub config: PushNotificationConfig,
    pub active: bool,
}

/// Keyed `(tenant_id, principal_id)`, each bucket guarded by its own
/// `tokio::sync::Mutex` so two concurrent `set` calls for the same principal
/// can't race into two active configs sharing an id — the same single-point
/// serialization a one-time-use nonce store provides.
#[derive(Default)]
pub struct PushConfigStore {
    buckets: DashMap<(TenantId, PrincipalId), Mutex<BTreeMap<String, PushConfigRecord>>>,
}

impl PushConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn with_bucket<R>(
        &self,
        tenant_id: &TenantId,
        principal_id: &PrincipalId,
        f: impl FnOnce(&mut BTreeMap<String, PushConfigRecord>) -> R,
    ) -> R {
        let key = (tenant_id.clone(), principal_id.clone());
        let entry = self.buckets.entry(key).or_default();
        let mut guard = entry.lock().await;
        f(&mut guard)
    }

    pub async fn set(
        &self,
        tenant_id: &TenantId,
        principal_id: &PrincipalId,
        config: PushNotificationConfig,
    ) -> PushNotificationConfig {
        self.with_bucket(tenant_id, principal_id, |bucket| {
            bucket.insert(config.id.clone(), PushConfigRecord { config: config.clone(), active: true });
            config
        })
        .await
    }

    pub async fn get(
        &self,
        tenant_id: &TenantId,
        principal_id: &PrincipalId,
        config_id: &str,
    ) -> Option<PushNotificationConfig> {
        self.with_bucket(tenant_id, principal_id, |bucket| {
            bucket.get(config_id).filter(|r| r.active).map(|r| r.config.clone())
        })
        .await
    }

    pub async fn list(&self, tenant_id: &TenantId, principal_id: &PrincipalId) -> Vec<PushNotificationConfig> {
        self.with_bucket(tenant_id, principal_id, |bucket| {
            bucket.values().filter(|r| r.active).map(|r| r.config.clone()).collect()
        })
        .await
    }

    /// Returns `true` if a previously-active config was deleted.
    pub async fn delete(&self, tenant_id: &TenantId, principal_id: &PrincipalId, config_id: &str) -> bool {
        self.with_bucket(tenant_id, principal_id, |bucket| match bucket.get_mut(config_id) {
            Some(record) if record.active => {
                record.active = false;
                true
            }
            _ => false,
        })
        .await
    }
}

pub struct AppState {
    pub deps: Deps,
    pub tasks: TaskTable,
    pub push_configs: PushConfigStore,
    pub push_service: PushNotificationService,
    pub activity: ActivityFeed,
    pub config: ServerConfig,
}

pub type SharedState = Arc<AppState>;
