use crate::context::ToolContext;
use crate::error::{DomainError, DomainErrorCode};
use crate::schema::datetime::to_rfc3339;
use crate::schema::delivery::{
    AggregatedTotals, GetMediaBuyDeliveryRequest, GetMediaBuyDeliveryResponse, MediaBuyDelivery,
    UpdatePerformanceIndexRequest, UpdatePerformanceIndexResponse,
};
use crate::schema::media_buy::{
    AffectedPackage, CreateMediaBuyRequest, CreateMediaBuyResponse, UpdateMediaBuyRequest,
    UpdateMediaBuyResponse,
};
use crate::schema::SchemaError;

use super::deps::Deps;

/// Enforces `chosen_model ∈ product.pricing_options ∩
/// adapter.supported_pricing_models()` for one package, returning the
/// model that will actually be booked.
fn resolve_pricing_model(
    package_index: usize,
    package: &crate::schema::media_buy::Package,
    product: &crate::schema::product::Product,
    deps: &Deps,
) -> Result<crate::schema::product::PricingModel, DomainError> {
    let chosen = package
        .pricing_model
        .or_else(|| product.pricing_options.first().map(|po| po.pricing_model));

    let Some(chosen) = chosen else {
        return Err(DomainError::new(
            DomainErrorCode::PricingModelUnsupported,
            format!("product '{}' has no pricing options to choose from", product.product_id),
        )
        .with_field(format!("packages[{package_index}].pricing_model")));
    };

    let offered_by_product = product.pricing_options.iter().any(|po| po.pricing_model == chosen);
    let supported_by_adapter = deps.adapter.supported_pricing_models().contains(&chosen);

    if !offered_by_product || !supported_by_adapter {
        return Err(DomainError::new(
            DomainErrorCode::PricingModelUnsupported,
            format!(
                "pricing model {chosen:?} is not offered by product '{}' and supported by the ad server adapter at the same time",
                product.product_id
            ),
        )
        .with_field(format!("packages[{package_index}].pricing_model")));
    }

    Ok(chosen)
}

/// Decides whether a media buy needs manual review before it is sent to the
/// ad server adapter: the tenant-wide flag, or any package's product using a
/// creative format not in the tenant's auto-approve allowlist.
fn needs_manual_review(
    tenant: &crate::tenant::Tenant,
    products: &[crate::schema::product::Product],
) -> bool {
    if tenant.human_review_required {
        return true;
    }
    products.iter().any(|product| {
        !product
            .format_ids
            .iter()
            .any(|id| tenant.auto_approve_formats.iter().any(|allowed| allowed == id))
    })
}

pub async fn create_media_buy(
    req: &CreateMediaBuyRequest,
    ctx: &ToolContext,
    deps: &Deps,
) -> CreateMediaBuyResponse {
    let mut packages = CreateMediaBuyResponse::packages_for(req, |i| format!("pkg_{i}"));
    let mut errors: Vec<SchemaError> = Vec::new();
    let mut products = Vec::with_capacity(req.packages.len());

    for (i, package) in req.packages.iter().enumerate() {
        match deps.catalog.get(&ctx.tenant_id, &package.product_id).await {
            Ok(Some(product)) => {
                if let Err(err) = resolve_pricing_model(i, package, &product, deps) {
                    errors.push(err.into());
                }
                products.push(product);
            }
            Ok(None) => {
                errors.push(
                    DomainError::new(
                        DomainErrorCode::ProductNotFound,
                        format!("product '{}' was not found", package.product_id),
                    )
                    .with_field(format!("packages[{i}].product_id"))
                    .into(),
                );
            }
            Err(err) => {
                tracing::warn!(tenant_id = %ctx.tenant_id, %err, "product lookup failed during create_media_buy");
                errors.push(SchemaError::new(
                    crate::schema::SchemaErrorCode::ValidationError,
                    format!("product catalog unavailable: {err}"),
                ));
            }
        }
    }

    if !errors.is_empty() {
        return CreateMediaBuyResponse {
            media_buy_id: None,
            packages,
            creative_deadline: None,
            workflow_step_id: None,
            errors,
        };
    }

    let Some(tenant) = deps.principals.find_tenant(&ctx.tenant_id).await else {
        errors.push(SchemaError::new(
            crate::schema::SchemaErrorCode::ValidationError,
            "tenant record could not be resolved for approval policy evaluation",
        ));
        return CreateMediaBuyResponse {
            media_buy_id: None,
            packages,
            creative_deadline: None,
            workflow_step_id: None,
            errors,
        };
    };

    if needs_manual_review(&tenant, &products) {
        errors.push(
            DomainError::new(
                DomainErrorCode::ManualApprovalRequired,
                "this media buy requires manual review before booking",
            )
            .warning()
            .into(),
        );
        return CreateMediaBuyResponse {
            media_buy_id: None,
            packages,
            creative_deadline: None,
            workflow_step_id: Some(uuid::Uuid::new_v4().to_string()),
            errors,
        };
    }

    match deps.adapter.create_media_buy(req, ctx).await {
        Ok(result) => {
            for (i, package_result) in packages.iter_mut().enumerate() {
                package_result.platform_line_item_id = Some(format!("{}_{i}", result.external_media_buy_id));
            }
            CreateMediaBuyResponse {
                media_buy_id: Some(result.external_media_buy_id),
                packages,
                creative_deadline: Some(to_rfc3339(req.end_time - time::Duration::days(3))),
                workflow_step_id: None,
                errors,
            }
        }
        Err(err) => {
            errors.push(SchemaError::new(
                crate::schema::SchemaErrorCode::ValidationError,
                format!("ad server adapter rejected the media buy: {err}"),
            ));
            CreateMediaBuyResponse {
                media_buy_id: None,
                packages,
                creative_deadline: None,
                workflow_step_id: None,
                errors,
            }
        }
    }
}

pub async fn update_media_buy(
    req: &UpdateMediaBuyRequest,
    ctx: &ToolContext,
    deps: &Deps,
) -> UpdateMediaBuyResponse {
    let media_buy_id = req.media_buy_ids.first().cloned().unwrap_or_default();
    let affected_packages: Vec<AffectedPackage> = req
        .packages
        .iter()
        .enumerate()
        .map(|(i, p)| AffectedPackage {
            package_id: p.buyer_ref.clone().unwrap_or_else(|| format!("pkg_{i}")),
            product_id: p.product_id.clone(),
        })
        .collect();

    match deps.adapter.update_media_buy(req, ctx).await {
        Ok(result) if result.accepted => UpdateMediaBuyResponse {
            media_buy_id,
            buyer_ref: req.buyer_ref.clone(),
            implementation_date: Some(to_rfc3339(time::OffsetDateTime::now_utc())),
            affected_packages,
            errors: Vec::new(),
        },
        Ok(_) => UpdateMediaBuyResponse {
            media_buy_id,
            buyer_ref: req.buyer_ref.clone(),
            implementation_date: None,
            affected_packages,
            errors: vec![SchemaError::new(
                crate::schema::SchemaErrorCode::ValidationError,
                "ad server adapter declined the update",
            )],
        },
        Err(err) => UpdateMediaBuyResponse {
            media_buy_id,
            buyer_ref: req.buyer_ref.clone(),
            implementation_date: None,
            affected_packages,
            errors: vec![SchemaError::new(
                crate::schema::SchemaErrorCode::ValidationError,
                format!("ad server adapter rejected the update: {err}"),
            )],
        },
    }
}

/// No delivery-reporting collaborator is in scope (billing/ad-decisioning
/// are explicit non-goals), so this returns zeroed totals for each
/// requested id rather than fabricating numbers — the contract's shape
/// exists for a future reporting integration to fill in.
pub async fn get_media_buy_delivery(
    req: &GetMediaBuyDeliveryRequest,
    _ctx: &ToolContext,
    _deps: &Deps,
) -> GetMediaBuyDeliveryResponse {
    let media_buy_deliveries: Vec<MediaBuyDelivery> = req
        .merged_media_buy_ids()
        .into_iter()
        .map(|media_buy_id| MediaBuyDelivery { media_buy_id, impressions: 0, spend: 0.0, clicks: 0 })
        .collect();

    GetMediaBuyDeliveryResponse {
        reporting_period: "to_date".to_string(),
        currency: "USD".to_string(),
        aggregated_totals: AggregatedTotals { impressions: 0, spend: 0.0 },
        media_buy_deliveries,
        errors: Vec::new(),
    }
}

pub async fn update_performance_index(
    req: &UpdatePerformanceIndexRequest,
    _ctx: &ToolContext,
    _deps: &Deps,
) -> UpdatePerformanceIndexResponse {
    if req.performance_data.is_empty() {
        return UpdatePerformanceIndexResponse {
            status: "rejected".to_string(),
            errors: vec![SchemaError::new(
                crate::schema::SchemaErrorCode::ValidationError,
                "performance_data must not be empty",
            )],
        };
    }

    UpdatePerformanceIndexResponse { status: "accepted".to_string(), errors: Vec::new() }
}
