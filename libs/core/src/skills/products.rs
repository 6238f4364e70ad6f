use std::collections::BTreeMap;

use crate::collaborators::FormatFilter;
use crate::context::ToolContext;
use crate::schema::formats::CreativeFormat;
use crate::schema::product::{GetProductsRequest, GetProductsResponse};
use crate::schema::properties::ListAuthorizedPropertiesResponse;

use super::deps::Deps;

pub async fn get_products(
    req: &GetProductsRequest,
    ctx: &ToolContext,
    deps: &Deps,
) -> GetProductsResponse {
    if req.brand_manifest.is_none() {
        return GetProductsResponse {
            products: Vec::new(),
            errors: vec![crate::schema::SchemaError::new(
                crate::schema::SchemaErrorCode::MissingField,
                "brand_manifest is required".to_string(),
            )],
        };
    }

    let products = match deps.catalog.search(&ctx.tenant_id, &req.filters, None).await {
        Ok(products) => products,
        Err(err) => {
            tracing::warn!(tenant_id = %ctx.tenant_id, %err, "product catalog search failed");
            return GetProductsResponse {
                products: Vec::new(),
                errors: vec![crate::schema::SchemaError::new(
                    crate::schema::SchemaErrorCode::ValidationError,
                    format!("product catalog unavailable: {err}"),
                )],
            };
        }
    };

    let products = match &req.brief {
        Some(brief) if !brief.is_empty() => products
            .into_iter()
            .filter(|p| crate::schema::product::matches_brief(p, brief))
            .collect(),
        _ => products,
    };

    let products = if req.filters.format_types.is_empty() {
        products
    } else {
        products
            .into_iter()
            .filter(|p| product_has_requested_format_type(p, &req.filters.format_types, deps))
            .collect()
    };

    GetProductsResponse { products, errors: Vec::new() }
}

/// `ProductFilters::matches` can't check `format_types` on its own — a
/// product only carries `format_ids`, and the type behind each id lives in
/// the format registry. Resolved here instead, one registry lookup per
/// format id the product carries.
fn product_has_requested_format_type(
    product: &crate::schema::product::Product,
    requested: &[String],
    deps: &Deps,
) -> bool {
    product.format_ids.iter().any(|raw_id| {
        let format_id = crate::schema::formats::FormatId::expand(raw_id, &deps.default_format_agent_url);
        deps.formats
            .resolve(&format_id)
            .map(|f| requested.iter().any(|want| want.eq_ignore_ascii_case(format_type_name(f.format_type))))
            .unwrap_or(false)
    })
}

fn format_type_name(ft: crate::schema::formats::FormatType) -> &'static str {
    use crate::schema::formats::FormatType;
    match ft {
        FormatType::Display => "display",
        FormatType::Video => "video",
        FormatType::Audio => "audio",
        FormatType::Native => "native",
        FormatType::Dooh => "dooh",
    }
}

pub fn list_creative_formats(filter: &FormatFilter, deps: &Deps) -> Vec<CreativeFormat> {
    deps.formats.list(filter)
}

/// Publisher properties behind this tenant's account. There is no property
/// directory collaborator trait in scope (§1 Non-goals), so this derives a
/// single synthetic domain from the tenant id, documenting the contract's
/// shape for a future real implementation to fill in.
pub fn list_authorized_properties(ctx: &ToolContext) -> ListAuthorizedPropertiesResponse {
    ListAuthorizedPropertiesResponse {
        publisher_domains: vec![format!("{}.adcp-publishers.example.com", ctx.tenant_id.as_str())],
        tags: BTreeMap::new(),
        primary_channels: None,
        primary_countries: None,
        errors: Vec::new(),
    }
}
