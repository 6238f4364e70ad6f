use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct GetMediaBuyDeliveryRequest {
    #[serde(default)]
    pub media_buy_ids: Vec<String>,
    #[serde(default)]
    pub media_buy_id: Option<String>,
}

impl GetMediaBuyDeliveryRequest {
    pub fn merged_media_buy_ids(&self) -> Vec<String> {
        let mut merged = self.media_buy_ids.clone();
        if let Some(id) = &self.media_buy_id {
            if !merged.iter().any(|m| m == id) {
                merged.push(id.clone());
            }
        }
        merged
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregatedTotals {
    pub impressions: u64,
    pub spend: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaBuyDelivery {
    pub media_buy_id: String,
    pub impressions: u64,
    pub spend: f64,
    pub clicks: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetMediaBuyDeliveryResponse {
    pub reporting_period: String,
    pub currency: String,
    pub aggregated_totals: AggregatedTotals,
    pub media_buy_deliveries: Vec<MediaBuyDelivery>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<super::SchemaError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PerformanceDatum {
    pub package_id: String,
    pub metric: String,
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePerformanceIndexRequest {
    pub media_buy_id: String,
    pub performance_data: Vec<PerformanceDatum>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatePerformanceIndexResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<super::SchemaError>,
}
