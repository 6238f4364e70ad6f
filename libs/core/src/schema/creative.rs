use serde::{Deserialize, Serialize};

use super::{SchemaError, SchemaErrorCode, Warning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnippetType {
    VastXml,
    Html,
    Javascript,
}

/// Internal review state. Never appears in `to_wire()` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreativeInput {
    pub creative_id: String,
    pub name: String,
    pub format_id: super::formats::FormatIdInput,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub snippet_type: Option<SnippetType>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Heuristic content/type match, the same checks the original schema layer
/// applied before accepting a snippet: a bare plain-text string or a snippet
/// under the length floor is rejected regardless of declared type, and each
/// declared `snippet_type` must find its characteristic token.
pub fn validate_snippet(snippet_type: SnippetType, snippet: &str) -> Result<(), SchemaError> {
    const MIN_LEN: usize = 12;
    if snippet.trim().len() < MIN_LEN {
        return Err(SchemaError::new(
            SchemaErrorCode::InvalidSnippet,
            "snippet is too short to be a valid creative payload",
        )
        .with_field("snippet"));
    }

    let lower = snippet.to_lowercase();
    let looks_right = match snippet_type {
        SnippetType::VastXml => lower.contains("<vast"),
        SnippetType::Html => lower.contains('<') && lower.contains('>'),
        SnippetType::Javascript => {
            lower.contains("function") || lower.contains("=>") || lower.contains("document.")
        }
    };

    if !looks_right {
        return Err(SchemaError::new(
            SchemaErrorCode::InvalidSnippet,
            format!("snippet content does not match declared snippet_type {snippet_type:?}"),
        )
        .with_field("snippet_type"));
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreativeAction {
    Created,
    Updated,
    Unchanged,
    Rejected,
    Deleted,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreativeResult {
    pub creative_id: String,
    pub action: CreativeAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SchemaError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assigned_to: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncCreativesRequest {
    pub creatives: Vec<CreativeInput>,
    #[serde(default)]
    pub creative_ids: Option<Vec<String>>,
    #[serde(default)]
    pub assignments: Option<std::collections::BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub delete_missing: bool,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub validation_mode: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncCreativesResponse {
    pub creatives: Vec<CreativeResult>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListCreativesFilters {
    #[serde(default)]
    pub media_buy_ids: Vec<String>,
    #[serde(default)]
    pub media_buy_id: Option<String>,
    #[serde(default)]
    pub buyer_refs: Vec<String>,
    #[serde(default)]
    pub buyer_ref: Option<String>,
}

impl ListCreativesFilters {
    /// Merges the plural and legacy-singular forms, deduplicated, per
    /// `list_creatives`'s back-compat contract.
    pub fn merged_media_buy_ids(&self) -> Vec<String> {
        merge_dedup(&self.media_buy_ids, self.media_buy_id.as_deref())
    }

    pub fn merged_buyer_refs(&self) -> Vec<String> {
        merge_dedup(&self.buyer_refs, self.buyer_ref.as_deref())
    }
}

fn merge_dedup(plural: &[String], singular: Option<&str>) -> Vec<String> {
    let mut merged = plural.to_vec();
    if let Some(s) = singular {
        if !merged.iter().any(|m| m == s) {
            merged.push(s.to_string());
        }
    }
    merged
}

#[derive(Debug, Clone, Serialize)]
pub struct QuerySummary {
    pub total_matched: usize,
    pub total_returned: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListCreativesResponse {
    pub creatives: Vec<serde_json::Value>,
    pub query_summary: QuerySummary,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vast_requires_vast_tag() {
        assert!(validate_snippet(SnippetType::VastXml, "<VAST version=\"4.0\"></VAST>").is_ok());
        assert!(validate_snippet(SnippetType::VastXml, "just some plain text here").is_err());
    }

    #[test]
    fn short_snippet_rejected_regardless_of_type() {
        assert!(validate_snippet(SnippetType::Html, "<a>x</a>").is_err());
    }

    #[test]
    fn buyer_ref_merge_dedupes() {
        let filters = ListCreativesFilters {
            media_buy_ids: vec!["mb1".into()],
            media_buy_id: Some("mb1".into()),
            buyer_refs: vec![],
            buyer_ref: Some("buyer-1".into()),
        };
        assert_eq!(filters.merged_media_buy_ids(), vec!["mb1".to_string()]);
        assert_eq!(filters.merged_buyer_refs(), vec!["buyer-1".to_string()]);
    }
}
