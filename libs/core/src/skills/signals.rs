use crate::context::ToolContext;
use crate::schema::signals::{
    ActivateSignalRequest, ActivateSignalResponse, GetSignalsRequest, GetSignalsResponse,
};
use crate::schema::SchemaError;

use super::deps::Deps;

/// No signal-discovery collaborator is in scope for this deployment (a real
/// signals platform integration is out of scope per the external-interfaces
/// section); this returns an empty catalog rather than fabricating signals.
pub async fn get_signals(_req: &GetSignalsRequest, _ctx: &ToolContext, _deps: &Deps) -> GetSignalsResponse {
    GetSignalsResponse { signals: Vec::new(), errors: Vec::new() }
}

pub async fn activate_signal(
    req: &ActivateSignalRequest,
    _ctx: &ToolContext,
    _deps: &Deps,
) -> ActivateSignalResponse {
    ActivateSignalResponse {
        signal_id: req.signal_id.clone(),
        activation_details: serde_json::Value::Null,
        errors: vec![SchemaError::new(
            crate::schema::SchemaErrorCode::ValidationError,
            format!("signal '{}' was not found", req.signal_id),
        )],
    }
}
