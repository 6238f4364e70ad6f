use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::{ContextId, TaskId};
use crate::schema::datetime::to_rfc3339;
use crate::webhook::PushNotificationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
    Completed,
    Failed,
    Canceled,
    Rejected,
    AuthRequired,
    Unknown,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Canceled | TaskState::Rejected
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Part {
    Text { text: String },
    Data { data: serde_json::Value },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub parts: Vec<Part>,
}

impl Artifact {
    pub fn named(name: impl Into<String>, result: serde_json::Value) -> Self {
        Artifact {
            name: name.into(),
            parts: vec![Part::Data { data: result }],
        }
    }
}

/// What originally invoked this task — recorded so natural-language text is
/// preserved in metadata even when it didn't end up routing anything (an
/// explicit skill DataPart takes priority; see the dispatcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationType {
    ExplicitSkill,
    NaturalLanguage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskMetadata {
    pub request_text: String,
    pub invocation_type: InvocationType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills_requested: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    pub context_id: ContextId,
    pub state: TaskState,
    pub metadata: TaskMetadata,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip)]
    pub push_notification_config: Option<PushNotificationConfig>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Task {
    pub fn new(task_id: TaskId, context_id: ContextId, metadata: TaskMetadata) -> Self {
        let now = OffsetDateTime::now_utc();
        Task {
            task_id,
            context_id,
            state: TaskState::Working,
            metadata,
            artifacts: Vec::new(),
            error_message: None,
            push_notification_config: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn transition(&mut self, state: TaskState) {
        self.state = state;
        self.updated_at = OffsetDateTime::now_utc();
    }

    pub fn to_wire(&self) -> serde_json::Value {
        serde_json::json!({
            "task_id": self.task_id.as_str(),
            "context_id": self.context_id.as_str(),
            "state": self.state,
            "artifacts": self.artifacts,
            "error_message": self.error_message,
            "created_at": to_rfc3339(self.created_at),
            "updated_at": to_rfc3339(self.updated_at),
        })
    }
}

/// Everything needed to reconstruct a [`Task`] row from a persisted record;
/// includes fields `to_wire` deliberately omits, such as the webhook secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInternalRecord {
    pub task_id: TaskId,
    pub context_id: ContextId,
    pub state: TaskState,
    pub metadata: TaskMetadata,
    pub artifacts: Vec<Artifact>,
    pub push_notification_config: Option<PushNotificationConfig>,
}

impl Task {
    pub fn to_internal(&self) -> TaskInternalRecord {
        TaskInternalRecord {
            task_id: self.task_id.clone(),
            context_id: self.context_id.clone(),
            state: self.state,
            metadata: self.metadata.clone(),
            artifacts: self.artifacts.clone(),
            push_notification_config: self.push_notification_config.clone(),
        }
    }
}

pub type TaskTable = dashmap::DashMap<TaskId, Task>;

/// Removes every task that reached a terminal state more than `retention`
/// ago. Intended to run on a background `tokio::time::interval` loop; the
/// table is otherwise unbounded, so without this sweep a long-lived process
/// accumulates one entry per completed task forever.
pub fn sweep_expired(table: &TaskTable, retention: time::Duration) {
    let cutoff = OffsetDateTime::now_utc() - retention;
    table.retain(|_, task| !(task.state.is_terminal() && task.updated_at < cutoff));
}

/// Per-run metadata tracking for explicit-skill task dispatch: which skills
/// were requested, in which order, and what their results were.
#[derive(Debug, Clone, Default)]
pub struct SkillRunSummary {
    pub skill_names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_classified_correctly() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(TaskState::Canceled.is_terminal());
        assert!(TaskState::Rejected.is_terminal());
        assert!(!TaskState::Working.is_terminal());
        assert!(!TaskState::Submitted.is_terminal());
    }
}
