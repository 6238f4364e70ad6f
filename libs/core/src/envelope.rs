use serde::Serialize;

use crate::schema::datetime::to_rfc3339;
use crate::webhook::PushNotificationConfigWire;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeStatus {
    Completed,
    Failed,
    Submitted,
    Working,
    InputRequired,
    Canceled,
    Rejected,
    AuthRequired,
}

/// Generic wrapper around a domain type's wire form. Domain types themselves
/// never carry `adcp_version` or an envelope-level `status` field — that
/// belongs exclusively here, at the one seam every response passes through.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: EnvelopeStatus,
    pub payload: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_notification_config: Option<PushNotificationConfigWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(status: EnvelopeStatus, payload: T) -> Self {
        Self {
            status,
            payload,
            message: None,
            task_id: None,
            context_id: None,
            push_notification_config: None,
            timestamp: Some(to_rfc3339(time::OffsetDateTime::now_utc())),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_task(mut self, task_id: impl Into<String>, context_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self.context_id = Some(context_id.into());
        self
    }

    pub fn with_push_config(mut self, config: Option<PushNotificationConfigWire>) -> Self {
        self.push_notification_config = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_null_optional_fields_on_the_wire() {
        let env = Envelope::new(EnvelopeStatus::Completed, serde_json::json!({"a": 1}));
        let value = serde_json::to_value(&env).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("task_id"));
        assert!(!obj.contains_key("context_id"));
        assert!(!obj.contains_key("push_notification_config"));
        assert!(!obj.contains_key("message"));
    }
}
