//! Legacy skill names kept for compatibility with the original skill set.
//! None of these carry their own business logic — each re-expresses its
//! request as a canonical operation and delegates, per the component
//! design's "centralized library approach."

use crate::context::ToolContext;
use crate::schema::creative::{CreativeAction, CreativeResult};
use crate::schema::delivery::{GetMediaBuyDeliveryRequest, GetMediaBuyDeliveryResponse};
use crate::schema::media_buy::{Package, UpdateMediaBuyRequest, UpdateMediaBuyResponse};
use crate::schema::product::GetProductsRequest;

use super::deps::Deps;
use super::{media_buy, products};

/// Legacy alias for `sync_creatives`'s approval path. No creative store is
/// in scope, so this reports the requested transition without persisting
/// anything — the same placeholder contract `sync_creatives` documents.
pub fn approve_creative(creative_id: &str) -> CreativeResult {
    CreativeResult {
        creative_id: creative_id.to_string(),
        action: CreativeAction::Updated,
        platform_id: None,
        changes: Some(serde_json::json!({"review_status": "approved"})),
        errors: Vec::new(),
        warnings: Vec::new(),
        assigned_to: Vec::new(),
    }
}

/// Legacy alias of `get_media_buy_delivery`.
pub async fn get_media_buy_status(
    media_buy_id: &str,
    ctx: &ToolContext,
    deps: &Deps,
) -> GetMediaBuyDeliveryResponse {
    let req = GetMediaBuyDeliveryRequest {
        media_buy_ids: vec![media_buy_id.to_string()],
        media_buy_id: None,
    };
    media_buy::get_media_buy_delivery(&req, ctx, deps).await
}

/// Legacy alias: re-expresses an "optimize" request as a no-op
/// `update_media_buy` carrying no package changes, since no optimization
/// engine is in scope.
pub async fn optimize_media_buy(
    media_buy_id: &str,
    ctx: &ToolContext,
    deps: &Deps,
) -> UpdateMediaBuyResponse {
    let req = UpdateMediaBuyRequest {
        media_buy_ids: vec![media_buy_id.to_string()],
        buyer_ref: None,
        active: None,
        start_time: None,
        end_time: None,
        budget: None,
        packages: Vec::<Package>::new(),
    };
    media_buy::update_media_buy(&req, ctx, deps).await
}

/// Legacy alias: returns `get_products` output projected down to
/// `{product_id, pricing_options}`.
pub async fn get_pricing(req: &GetProductsRequest, ctx: &ToolContext, deps: &Deps) -> serde_json::Value {
    let response = products::get_products(req, ctx, deps).await;
    serde_json::json!({
        "products": response.products.iter().map(|p| serde_json::json!({
            "product_id": p.product_id,
            "pricing_options": p.pricing_options,
        })).collect::<Vec<_>>(),
        "errors": response.errors,
    })
}

/// Legacy alias: returns `get_products` output projected down to
/// `{product_id, format_ids}`, the closest stand-in this domain model has
/// for "targeting-relevant fields" absent a dedicated targeting schema.
pub async fn get_targeting(req: &GetProductsRequest, ctx: &ToolContext, deps: &Deps) -> serde_json::Value {
    let response = products::get_products(req, ctx, deps).await;
    serde_json::json!({
        "products": response.products.iter().map(|p| serde_json::json!({
            "product_id": p.product_id,
            "format_ids": p.format_ids,
        })).collect::<Vec<_>>(),
        "errors": response.errors,
    })
}
