use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    Audience,
    Contextual,
    Geographic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalDeployment {
    pub platform: String,
    pub is_live: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalPricing {
    pub cpm_uplift: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub signal_agent_segment_id: String,
    pub name: String,
    pub description: String,
    pub signal_type: SignalType,
    pub data_provider: String,
    pub coverage_percentage: f64,
    pub deployments: Vec<SignalDeployment>,
    pub pricing: SignalPricing,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetSignalsRequest {
    pub signal_spec: String,
    pub deliver_to: serde_json::Value,
    #[serde(default)]
    pub filters: Option<serde_json::Value>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetSignalsResponse {
    pub signals: Vec<Signal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<super::SchemaError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivateSignalRequest {
    pub signal_id: String,
    #[serde(default)]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivateSignalResponse {
    pub signal_id: String,
    pub activation_details: serde_json::Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<super::SchemaError>,
}
