use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single identified advertising property (site, app, or DOOH network) a
/// product can be sold against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub property_id: String,
    pub name: String,
    pub property_type: String,
    #[serde(default)]
    pub identifiers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAuthorizedPropertiesResponse {
    pub publisher_domains: Vec<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_channels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_countries: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<super::SchemaError>,
}
