//! JSON-RPC 2.0 method dispatch: message/send, message/stream, tasks/get,
//! tasks/cancel, and the push-notification-config CRUD methods. All run
//! through one entry point, [`handle_rpc`], the way the teacher's
//! `handle_ingress` centralizes request-handling ahead of its per-path
//! wrappers.

use std::sync::Arc;

use adcp_core::auth::{build_context, build_context_auth_optional, RequestHeaders};
use adcp_core::context::{Protocol, ToolContext};
use adcp_core::envelope::{Envelope, EnvelopeStatus};
use adcp_core::ids::{ContextId, TaskId};
use adcp_core::routing::{self, Intent};
use adcp_core::schema::product::GetProductsRequest;
use adcp_core::skills::dispatch::{dispatch_skill, errors_array_is_empty};
use adcp_core::skills::{aliases, products, table, Deps};
use adcp_core::task::{Artifact, InvocationType, Part, Task, TaskMetadata, TaskState};
use adcp_core::webhook::{PushNotificationConfig, PushNotificationConfigInput};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::rpc_error::A2aError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, serde::Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, serde::Serialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    fn ok(id: Value, result: Value) -> Self {
        JsonRpcResponse { jsonrpc: "2.0", id, result: Some(result), error: None }
    }

    fn err(id: Value, err: A2aError) -> Self {
        let data = err.domain_code().map(|code| json!({ "code": code }));
        JsonRpcResponse {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcErrorObject { code: err.json_rpc_code(), message: err.to_string(), data }),
        }
    }
}

pub async fn handle_rpc(state: &SharedState, headers: RequestHeaders, req: JsonRpcRequest) -> JsonRpcResponse {
    let id = req.id.clone();
    match dispatch_method(state, &headers, &req.method, req.params).await {
        Ok(result) => JsonRpcResponse::ok(id, result),
        Err(err) => JsonRpcResponse::err(id, err),
    }
}

async fn dispatch_method(state: &SharedState, headers: &RequestHeaders, method: &str, params: Value) -> Result<Value, A2aError> {
    match method {
        "message/send" | "message/stream" => {
            let params: MessageSendParams =
                serde_json::from_value(params).map_err(|e| A2aError::InvalidParams(e.to_string()))?;
            let task = message_send(state, headers, params).await?;
            Ok(envelope_for_task(&task))
        }
        "tasks/get" => {
            let params: TaskIdParams = serde_json::from_value(params).map_err(|e| A2aError::InvalidParams(e.to_string()))?;
            let task = state
                .tasks
                .get(&TaskId::from(params.task_id.clone()))
                .ok_or_else(|| A2aError::InvalidParams(format!("no task with id '{}'", params.task_id)))?;
            Ok(envelope_for_task(&task))
        }
        "tasks/cancel" => tasks_cancel(state, params).await,
        "tasks/pushNotificationConfig/get" => push_config_get(state, headers, params).await,
        "tasks/pushNotificationConfig/set" => push_config_set(state, headers, params).await,
        "tasks/pushNotificationConfig/list" => push_config_list(state, headers).await,
        "tasks/pushNotificationConfig/delete" => push_config_delete(state, headers, params).await,
        other => Err(A2aError::MethodNotFound(other.to_string())),
    }
}

#[derive(Debug, Deserialize)]
struct TaskIdParams {
    task_id: String,
}

async fn tasks_cancel(state: &SharedState, params: Value) -> Result<Value, A2aError> {
    let params: TaskIdParams = serde_json::from_value(params).map_err(|e| A2aError::InvalidParams(e.to_string()))?;
    let task_id = TaskId::from(params.task_id.clone());

    let mut task = state
        .tasks
        .get(&task_id)
        .map(|t| t.clone())
        .ok_or_else(|| A2aError::InvalidParams(format!("no task with id '{}'", params.task_id)))?;

    if task.state == TaskState::Canceled {
        return Ok(envelope_for_task(&task));
    }

    task.transition(TaskState::Canceled);
    state.tasks.insert(task_id.clone(), task.clone());

    if let Some(config) = task.push_notification_config.clone() {
        spawn_webhook(state, config, task_id, "message", "canceled", None);
    }

    Ok(envelope_for_task(&task))
}

fn task_state_to_envelope_status(state: TaskState) -> EnvelopeStatus {
    match state {
        TaskState::Submitted => EnvelopeStatus::Submitted,
        TaskState::Working => EnvelopeStatus::Working,
        TaskState::InputRequired => EnvelopeStatus::InputRequired,
        TaskState::Completed => EnvelopeStatus::Completed,
        TaskState::Failed => EnvelopeStatus::Failed,
        TaskState::Canceled => EnvelopeStatus::Canceled,
        TaskState::Rejected => EnvelopeStatus::Rejected,
        TaskState::AuthRequired => EnvelopeStatus::AuthRequired,
        TaskState::Unknown => EnvelopeStatus::Failed,
    }
}

fn envelope_for_task(task: &Task) -> Value {
    let envelope = Envelope::new(task_state_to_envelope_status(task.state), task.to_wire())
        .with_task(task.task_id.as_str(), task.context_id.as_str())
        .with_message(derive_task_message(task))
        .with_push_config(task.push_notification_config.as_ref().map(PushNotificationConfig::to_wire));
    serde_json::to_value(envelope).unwrap_or(Value::Null)
}

/// Human-readable one-liner summarizing a task's outcome, derived from its
/// artifacts when a skill-specific summary is available and from its state
/// otherwise. `get_products` and its pricing/targeting aliases all project
/// onto a `{"products": [...]}` shape, the one detailed enough to report a
/// count from; every other skill falls back to a generic, state-driven
/// message.
fn derive_task_message(task: &Task) -> String {
    if let Some(count) = product_count(&task.artifacts) {
        return format!("Found {count} product{} that match your requirements.", if count == 1 { "" } else { "s" });
    }

    match task.state {
        TaskState::Completed => match task.metadata.skills_requested.first() {
            Some(skill) => format!("{skill} completed successfully."),
            None => "Request completed successfully.".to_string(),
        },
        TaskState::Failed => task
            .error_message
            .clone()
            .unwrap_or_else(|| "Request failed; see errors for details.".to_string()),
        TaskState::Rejected => "Request rejected.".to_string(),
        TaskState::Canceled => "Task canceled.".to_string(),
        TaskState::Submitted => "Submitted for manual approval.".to_string(),
        TaskState::InputRequired => "Additional input required before this request can proceed.".to_string(),
        TaskState::AuthRequired => "Authentication required.".to_string(),
        TaskState::Working => "Request is in progress.".to_string(),
        TaskState::Unknown => "Request status is unknown.".to_string(),
    }
}

fn product_count(artifacts: &[Artifact]) -> Option<usize> {
    artifacts.iter().find_map(|artifact| {
        artifact.parts.iter().find_map(|part| match part {
            Part::Data { data } => data.get("products").and_then(Value::as_array).map(Vec::len),
            Part::Text { .. } => None,
        })
    })
}

#[derive(Debug, Deserialize)]
struct PushConfigIdParams {
    config_id: String,
}

#[derive(Debug, Deserialize)]
struct PushConfigSetParams {
    push_notification_config: PushNotificationConfigInput,
}

async fn resolve_ctx(state: &SharedState, headers: &RequestHeaders, tool_name: &str) -> Result<ToolContext, A2aError> {
    Ok(build_context(state.deps.principals.clone(), headers, tool_name, Protocol::A2aJsonRpc, None).await?)
}

async fn push_config_get(state: &SharedState, headers: &RequestHeaders, params: Value) -> Result<Value, A2aError> {
    let ctx = resolve_ctx(state, headers, "tasks/pushNotificationConfig/get").await?;
    let params: PushConfigIdParams = serde_json::from_value(params).map_err(|e| A2aError::InvalidParams(e.to_string()))?;
    let config = state
        .push_configs
        .get(&ctx.tenant_id, &ctx.principal_id, &params.config_id)
        .await
        .ok_or_else(|| A2aError::InvalidParams(format!("no push_notification_config with id '{}'", params.config_id)))?;
    Ok(serde_json::to_value(config.to_wire()).unwrap_or(Value::Null))
}

async fn push_config_set(state: &SharedState, headers: &RequestHeaders, params: Value) -> Result<Value, A2aError> {
    let ctx = resolve_ctx(state, headers, "tasks/pushNotificationConfig/set").await?;
    let params: PushConfigSetParams = serde_json::from_value(params).map_err(|e| A2aError::InvalidParams(e.to_string()))?;
    let config = params.push_notification_config.normalize()?;
    let stored = state.push_configs.set(&ctx.tenant_id, &ctx.principal_id, config).await;
    Ok(serde_json::to_value(stored.to_wire()).unwrap_or(Value::Null))
}

async fn push_config_list(state: &SharedState, headers: &RequestHeaders) -> Result<Value, A2aError> {
    let ctx = resolve_ctx(state, headers, "tasks/pushNotificationConfig/list").await?;
    let configs = state.push_configs.list(&ctx.tenant_id, &ctx.principal_id).await;
    let wire: Vec<_> = configs.iter().map(PushNotificationConfig::to_wire).collect();
    Ok(json!({ "push_notification_configs": wire }))
}

async fn push_config_delete(state: &SharedState, headers: &RequestHeaders, params: Value) -> Result<Value, A2aError> {
    let ctx = resolve_ctx(state, headers, "tasks/pushNotificationConfig/delete").await?;
    let params: PushConfigIdParams = serde_json::from_value(params).map_err(|e| A2aError::InvalidParams(e.to_string()))?;
    let deleted = state.push_configs.delete(&ctx.tenant_id, &ctx.principal_id, &params.config_id).await;
    Ok(json!({ "deleted": deleted }))
}

fn spawn_webhook(
    state: &SharedState,
    config: PushNotificationConfig,
    task_id: TaskId,
    task_type: &'static str,
    status: &'static str,
    result: Option<Value>,
) {
    let state = Arc::clone(state);
    tokio::spawn(async move {
        let ok = state.push_service.send(&config, task_id.as_str(), task_type, status, result, None).await;
        if !ok {
            tracing::warn!(task_id = %task_id, status, "push notification delivery did not succeed");
        }
    });
}

#[derive(Debug, Deserialize)]
pub struct MessageSendParams {
    pub message: MessageInput,
    #[serde(default)]
    pub configuration: Option<MessageSendConfiguration>,
    #[serde(default)]
    pub context_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessageInput {
    #[serde(default)]
    pub parts: Vec<Part>,
    /// Coerced to a string by the compatibility middleware before this
    /// struct ever sees it; carried through only for echo/logging.
    #[serde(default)]
    pub message_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessageSendConfiguration {
    #[serde(default)]
    pub push_notification_config: Option<PushNotificationConfigInput>,
}

struct ExplicitSkillCall {
    skill: String,
    input: Value,
}

/// Parts carrying a `DataPart` whose `data.skill` is present trigger the
/// explicit-skill path; `data.input` is preferred over the legacy
/// `data.parameters`.
fn extract_skill_calls(parts: &[Part]) -> Vec<ExplicitSkillCall> {
    parts
        .iter()
        .filter_map(|part| match part {
            Part::Data { data } => {
                let skill = data.get("skill")?.as_str()?.to_string();
                let input = data
                    .get("input")
                    .cloned()
                    .or_else(|| data.get("parameters").cloned())
                    .unwrap_or(Value::Null);
                Some(ExplicitSkillCall { skill, input })
            }
            Part::Text { .. } => None,
        })
        .collect()
}

fn concat_text(parts: &[Part]) -> String {
    parts
        .iter()
        .filter_map(|part| match part {
            Part::Text { text } => Some(text.as_str()),
            Part::Data { .. } => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

async fn message_send(state: &SharedState, headers: &RequestHeaders, params: MessageSendParams) -> Result<Task, A2aError> {
    let context_id = params.context_id.clone().map(ContextId::from);

    let explicit_calls = extract_skill_calls(&params.message.parts);
    let mut descriptors = Vec::with_capacity(explicit_calls.len());
    for call in &explicit_calls {
        match table::find(&call.skill) {
            Some(descriptor) => descriptors.push(descriptor),
            None => return Err(A2aError::MethodNotFound(call.skill.clone())),
        }
    }

    // A request is served anonymously only when every explicit skill it
    // names allows it; a free-text message always requires auth, since
    // natural-language routing can land on `create_media_buy`'s explanatory
    // response, which does not.
    let auth_optional = !descriptors.is_empty() && descriptors.iter().all(|d| d.auth_optional);
    let ctx = if auth_optional {
        build_context_auth_optional(state.deps.principals.clone(), headers, "message/send", Protocol::A2aJsonRpc, context_id).await?
    } else {
        build_context(state.deps.principals.clone(), headers, "message/send", Protocol::A2aJsonRpc, context_id).await?
    };

    let text = concat_text(&params.message.parts);
    let (invocation_type, skills_requested) = if explicit_calls.is_empty() {
        (InvocationType::NaturalLanguage, Vec::new())
    } else {
        (InvocationType::ExplicitSkill, explicit_calls.iter().map(|c| c.skill.clone()).collect())
    };

    let task_id = TaskId::from(Uuid::new_v4().to_string());
    let metadata = TaskMetadata { request_text: text.clone(), invocation_type, skills_requested };
    let mut task = Task::new(task_id.clone(), ctx.context_id.clone(), metadata);

    // A per-call push config takes precedence over a previously-registered
    // one; the registered config is used only when the call omits one.
    let push_config = match params.configuration.and_then(|c| c.push_notification_config) {
        Some(input) => Some(input.normalize()?),
        None => state.push_configs.list(&ctx.tenant_id, &ctx.principal_id).await.into_iter().next(),
    };
    task.push_notification_config = push_config.clone();
    state.tasks.insert(task_id.clone(), task.clone());

    if let Some(config) = push_config.clone() {
        spawn_webhook(state, config, task_id.clone(), "message", "working", None);
    }

    let mut any_success = false;

    if explicit_calls.is_empty() {
        let intent = routing::route(&text);
        let (artifact_name, value, success) = run_intent(intent, &text, &ctx, &state.deps).await;
        any_success = success;
        state
            .activity
            .log_operation(ctx.tenant_id.as_str(), ctx.principal_id.as_str(), artifact_name, success, None, None);
        task.artifacts.push(Artifact::named(artifact_name, value));
    } else {
        for call in explicit_calls {
            let (value, success) = dispatch_skill(&call.skill, call.input, &ctx, &state.deps).await;
            any_success = any_success || success;
            state
                .activity
                .log_operation(ctx.tenant_id.as_str(), ctx.principal_id.as_str(), &call.skill, success, None, None);
            task.artifacts.push(Artifact::named(format!("{}_result", call.skill), value));
        }
    }

    task.transition(if any_success { TaskState::Completed } else { TaskState::Failed });
    state.tasks.insert(task_id.clone(), task.clone());

    if let Some(config) = push_config {
        let status = if task.state == TaskState::Completed { "completed" } else { "failed" };
        let artifacts = serde_json::to_value(&task.artifacts).ok();
        spawn_webhook(state, config, task_id, "message", status, artifacts);
    }

    Ok(task)
}

/// The natural-language fallback maps each routed [`Intent`] onto the
/// closest existing skill (or, for `MediaBuyCreation`, onto an explanatory
/// response — free text doesn't carry the structured packages/budget/dates
/// a media buy requires).
async fn run_intent(intent: Intent, text: &str, ctx: &ToolContext, deps: &Deps) -> (&'static str, Value, bool) {
    match intent {
        Intent::ProductsDiscovery => {
            let req = GetProductsRequest {
                brief: Some(text.to_string()),
                brand_manifest: Some(serde_json::json!({})),
                filters: Default::default(),
            };
            let resp = products::get_products(&req, ctx, deps).await;
            let success = resp.errors.is_empty();
            ("product_catalog", serde_json::to_value(resp).unwrap_or(Value::Null), success)
        }
        Intent::Pricing => {
            let req = GetProductsRequest {
                brief: Some(text.to_string()),
                brand_manifest: Some(serde_json::json!({})),
                filters: Default::default(),
            };
            let value = aliases::get_pricing(&req, ctx, deps).await;
            let success = errors_array_is_empty(&value);
            ("pricing", value, success)
        }
        Intent::Targeting => {
            let req = GetProductsRequest {
                brief: Some(text.to_string()),
                brand_manifest: Some(serde_json::json!({})),
                filters: Default::default(),
            };
            let value = aliases::get_targeting(&req, ctx, deps).await;
            let success = errors_array_is_empty(&value);
            ("targeting", value, success)
        }
        Intent::MediaBuyCreation => {
            let value = json!({
                "message": "Creating a media buy needs structured packages, a budget, and start/end times — invoke the create_media_buy skill explicitly rather than through free text.",
            });
            ("capabilities_help", value, true)
        }
        Intent::CapabilitiesHelp => {
            let skills: Vec<_> = table::SKILL_TABLE
                .iter()
                .map(|s| json!({ "name": s.name, "description": s.description, "legacy_alias": s.legacy_alias }))
                .collect();
            ("capabilities_help", json!({ "skills": skills }), true)
        }
    }
}

