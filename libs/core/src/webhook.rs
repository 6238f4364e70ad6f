//! Fire-and-forget webhook delivery for task lifecycle notifications.
//!
//! Mirrors the swallow-and-log contract of the original protocol webhook
//! service: `send` is always called from `tokio::spawn`, never awaited by
//! the caller, and a delivery failure is logged at `warn!` and discarded —
//! there is no retry queue or dead-letter store.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::schema::datetime::to_rfc3339;
use crate::schema::{SchemaError, SchemaErrorCode};

/// AdCP spec version this agent implements, echoed on every webhook payload.
pub const ADCP_VERSION: &str = "2.2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    Hmac,
    Bearer,
}

/// Raw wire shape accepted for `push_notification_config`, both inline on
/// `create_media_buy`/`message/send` and on the `tasks/pushNotificationConfig/set`
/// CRUD methods.
#[derive(Debug, Clone, Deserialize)]
pub struct PushNotificationConfigInput {
    #[serde(default)]
    pub id: Option<String>,
    pub url: String,
    pub authentication: AuthenticationInput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticationInput {
    pub scheme: AuthScheme,
    /// HMAC secret or bearer token, stored exactly as received and used only
    /// to authenticate outgoing webhook calls — never echoed back on the
    /// wire.
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushNotificationConfig {
    pub id: String,
    pub url: String,
    pub scheme: AuthScheme,
    #[serde(skip_serializing)]
    pub token: String,
}

impl PushNotificationConfigInput {
    pub fn normalize(self) -> Result<PushNotificationConfig, SchemaError> {
        if self.url.is_empty() {
            return Err(SchemaError::new(
                SchemaErrorCode::ValidationError,
                "push_notification_config.url must not be empty",
            )
            .with_field("push_notification_config.url"));
        }
        Ok(PushNotificationConfig {
            id: self.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            url: self.url,
            scheme: self.authentication.scheme,
            token: self.authentication.token,
        })
    }
}

/// External wire form: omits the secret entirely.
#[derive(Debug, Clone, Serialize)]
pub struct PushNotificationConfigWire {
    pub id: String,
    pub url: String,
    pub scheme: AuthScheme,
}

impl PushNotificationConfig {
    pub fn to_wire(&self) -> PushNotificationConfigWire {
        PushNotificationConfigWire {
            id: self.id.clone(),
            url: self.url.clone(),
            scheme: self.scheme,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct WebhookPayload<'a> {
    task_id: &'a str,
    task_type: &'a str,
    status: &'a str,
    timestamp: String,
    adcp_version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Rewrites a `localhost`/`127.0.0.1` webhook target to
/// `host.docker.internal`, preserving scheme, userinfo, port, and path —
/// needed so a webhook receiver running in a sibling container (rather than
/// on the host network) can still be reached during local development.
pub fn rewrite_localhost_url(url: &str) -> String {
    for host in ["localhost", "127.0.0.1"] {
        if let Some(pos) = url.find(host) {
            let mut rewritten = String::with_capacity(url.len());
            rewritten.push_str(&url[..pos]);
            rewritten.push_str("host.docker.internal");
            rewritten.push_str(&url[pos + host.len()..]);
            return rewritten;
        }
    }
    url.to_string()
}

pub struct PushNotificationService {
    client: reqwest::Client,
}

impl Default for PushNotificationService {
    fn default() -> Self {
        Self::new()
    }
}

impl PushNotificationService {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .user_agent("AdCP-Sales-Agent/1.0")
            .build()
            .expect("reqwest client configuration is static and always valid");
        Self { client }
    }

    /// Sends one webhook notification. Returns whether delivery succeeded;
    /// callers invoke this inside `tokio::spawn` and only log the result.
    pub async fn send(
        &self,
        config: &PushNotificationConfig,
        task_id: &str,
        task_type: &str,
        status: &str,
        result: Option<serde_json::Value>,
        error: Option<&str>,
    ) -> bool {
        let payload = WebhookPayload {
            task_id,
            task_type,
            status,
            timestamp: to_rfc3339(time::OffsetDateTime::now_utc()),
            adcp_version: ADCP_VERSION,
            result,
            error,
        };

        let body = match serde_json::to_string(&payload) {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(%task_id, %err, "failed to serialize webhook payload");
                return false;
            }
        };

        let url = rewrite_localhost_url(&config.url);
        let mut request = self.client.post(&url).header("Content-Type", "application/json").body(body.clone());

        request = match config.scheme {
            AuthScheme::Bearer => request.header("Authorization", format!("Bearer {}", config.token)),
            AuthScheme::Hmac => {
                let ts = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                let canonical = format!("{ts}.{body}");
                let signature = adcp_security::hmac_sig::sign(&config.token, &canonical);
                request
                    .header("X-AdCP-Signature", format!("sha256={signature}"))
                    .header("X-AdCP-Timestamp", ts.to_string())
            }
        };

        match request.send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                tracing::warn!(%task_id, status = %resp.status(), "webhook delivery rejected");
                false
            }
            Err(err) => {
                tracing::warn!(%task_id, %err, "webhook delivery failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_rewrite_preserves_path_and_port() {
        assert_eq!(
            rewrite_localhost_url("http://localhost:8080/hook"),
            "http://host.docker.internal:8080/hook"
        );
        assert_eq!(
            rewrite_localhost_url("http://127.0.0.1:8080/hook"),
            "http://host.docker.internal:8080/hook"
        );
        assert_eq!(
            rewrite_localhost_url("https://example.com/hook"),
            "https://example.com/hook"
        );
    }
}
