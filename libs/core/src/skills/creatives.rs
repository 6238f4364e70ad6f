use crate::context::ToolContext;
use crate::schema::creative::{
    validate_snippet, CreativeAction, CreativeResult, ListCreativesFilters, ListCreativesResponse,
    Pagination, QuerySummary, SyncCreativesRequest, SyncCreativesResponse,
};
use crate::schema::SchemaError;

use super::deps::Deps;

/// `validation_mode: "lenient"` downgrades a creative's validation errors to
/// warnings instead of rejecting it; any other value (including the default,
/// unset case) is strict rejection. Matches the only two modes the original
/// schema layer recognized.
fn is_lenient(validation_mode: &Option<String>) -> bool {
    validation_mode.as_deref() == Some("lenient")
}

pub async fn sync_creatives(
    req: &SyncCreativesRequest,
    _ctx: &ToolContext,
    deps: &Deps,
) -> SyncCreativesResponse {
    let in_scope = |creative_id: &str| req.creative_ids.as_ref().map_or(true, |ids| ids.iter().any(|id| id == creative_id));

    let mut results = Vec::new();

    for creative in req.creatives.iter().filter(|c| in_scope(&c.creative_id)) {
        let format_id = creative.format_id.clone().normalize(&deps.default_format_agent_url);
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if deps.formats.resolve(&format_id).is_none() {
            errors.push(SchemaError::new(
                crate::schema::SchemaErrorCode::ValidationError,
                format!("format '{}' is not registered with this agent", format_id.id),
            ));
        }

        if let (Some(snippet), Some(snippet_type)) = (&creative.snippet, creative.snippet_type) {
            if let Err(err) = validate_snippet(snippet_type, snippet) {
                errors.push(err);
            }
        }

        let assigned_to = req
            .assignments
            .as_ref()
            .and_then(|a| a.get(&creative.creative_id))
            .cloned()
            .unwrap_or_default();

        let lenient = is_lenient(&req.validation_mode);
        let action = if !errors.is_empty() && !lenient {
            CreativeAction::Rejected
        } else if req.dry_run {
            warnings.push(crate::schema::Warning {
                field: "dry_run".into(),
                message: "dry run: no creative was persisted".into(),
            });
            CreativeAction::Unchanged
        } else {
            CreativeAction::Created
        };

        if !errors.is_empty() && lenient {
            warnings.extend(errors.drain(..).map(|e| crate::schema::Warning { field: e.field.unwrap_or_default(), message: e.message }));
        }

        results.push(CreativeResult {
            creative_id: creative.creative_id.clone(),
            action,
            platform_id: None,
            changes: None,
            errors,
            warnings,
            assigned_to,
        });
    }

    // `delete_missing` is scoped to `creative_ids`: an id the caller named as
    // part of the intended full set but didn't submit a creative for is
    // reported as deleted. With no creative store in scope there is nothing
    // to actually remove; this reports the outcome a store-backed
    // implementation would have performed.
    if req.delete_missing {
        if let Some(ids) = &req.creative_ids {
            let submitted: std::collections::BTreeSet<&str> = req.creatives.iter().map(|c| c.creative_id.as_str()).collect();
            for missing_id in ids.iter().filter(|id| !submitted.contains(id.as_str())) {
                results.push(CreativeResult {
                    creative_id: missing_id.clone(),
                    action: CreativeAction::Deleted,
                    platform_id: None,
                    changes: None,
                    errors: Vec::new(),
                    warnings: Vec::new(),
                    assigned_to: Vec::new(),
                });
            }
        }
    }

    SyncCreativesResponse { creatives: results, dry_run: req.dry_run }
}

/// No creative store collaborator is in scope — `sync_creatives` doesn't
/// persist anything for this implementation to list back. Returns an empty,
/// correctly-shaped page so the contract exists for a future store-backed
/// implementation.
pub async fn list_creatives(_filters: &ListCreativesFilters, _ctx: &ToolContext, _deps: &Deps) -> ListCreativesResponse {
    ListCreativesResponse {
        creatives: Vec::new(),
        query_summary: QuerySummary { total_matched: 0, total_returned: 0 },
        pagination: Pagination { offset: 0, limit: 0, has_more: false },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::context::{Protocol, ToolContext};
    use crate::schema::formats::{CreativeFormat, FormatId, FormatIdInput, FormatType};
    use crate::testkit::{InMemoryFormatRegistry, InMemoryPrincipalStore, InMemoryProductCatalog, MockAdServerAdapter};

    use super::*;

    fn test_deps() -> Deps {
        let formats = Arc::new(InMemoryFormatRegistry::new());
        formats.add(CreativeFormat {
            format_id: FormatId { agent_url: "https://formats.example.com/agent".to_string(), id: "display_300x250".to_string() },
            name: "Medium Rectangle".to_string(),
            format_type: FormatType::Display,
            is_standard: true,
            requirements: serde_json::Value::Null,
        });
        Deps::new(
            Arc::new(MockAdServerAdapter::default()),
            Arc::new(InMemoryProductCatalog::new()),
            Arc::new(InMemoryPrincipalStore::new()),
            formats,
            "https://formats.example.com/agent",
        )
    }

    fn test_ctx() -> ToolContext {
        ToolContext::new("ctx_1".into(), "tenant_1".into(), "principal_1".into(), "sync_creatives", Protocol::A2aJsonRpc)
    }

    fn creative(id: &str) -> crate::schema::creative::CreativeInput {
        crate::schema::creative::CreativeInput {
            creative_id: id.to_string(),
            name: format!("Creative {id}"),
            format_id: FormatIdInput::Legacy("display_300x250".to_string()),
            snippet: None,
            snippet_type: None,
            url: Some("https://example.com/creative.png".to_string()),
        }
    }

    #[tokio::test]
    async fn creative_ids_narrows_which_submitted_creatives_are_synced() {
        let req = SyncCreativesRequest {
            creatives: vec![creative("c1"), creative("c2")],
            creative_ids: Some(vec!["c1".to_string()]),
            assignments: None,
            delete_missing: false,
            dry_run: false,
            validation_mode: None,
        };
        let resp = sync_creatives(&req, &test_ctx(), &test_deps()).await;
        assert_eq!(resp.creatives.len(), 1);
        assert_eq!(resp.creatives[0].creative_id, "c1");
    }

    #[tokio::test]
    async fn delete_missing_reports_ids_absent_from_the_submitted_set() {
        let req = SyncCreativesRequest {
            creatives: vec![creative("c1")],
            creative_ids: Some(vec!["c1".to_string(), "c2".to_string()]),
            assignments: None,
            delete_missing: true,
            dry_run: false,
            validation_mode: None,
        };
        let resp = sync_creatives(&req, &test_ctx(), &test_deps()).await;
        let deleted = resp.creatives.iter().find(|c| c.creative_id == "c2").unwrap();
        assert_eq!(deleted.action, CreativeAction::Deleted);
    }

    #[tokio::test]
    async fn lenient_validation_mode_downgrades_errors_to_warnings() {
        let mut bad = creative("c1");
        bad.format_id = FormatIdInput::Legacy("not_registered".to_string());
        let req = SyncCreativesRequest {
            creatives: vec![bad],
            creative_ids: None,
            assignments: None,
            delete_missing: false,
            dry_run: false,
            validation_mode: Some("lenient".to_string()),
        };
        let resp = sync_creatives(&req, &test_ctx(), &test_deps()).await;
        assert_eq!(resp.creatives[0].action, CreativeAction::Created);
        assert!(resp.creatives[0].errors.is_empty());
        assert!(!resp.creatives[0].warnings.is_empty());
    }

    #[tokio::test]
    async fn strict_validation_mode_is_the_default() {
        let mut bad = creative("c1");
        bad.format_id = FormatIdInput::Legacy("not_registered".to_string());
        let req = SyncCreativesRequest {
            creatives: vec![bad],
            creative_ids: None,
            assignments: None,
            delete_missing: false,
            dry_run: false,
            validation_mode: None,
        };
        let resp = sync_creatives(&req, &test_ctx(), &test_deps()).await;
        assert_eq!(resp.creatives[0].action, CreativeAction::Rejected);
    }
}
