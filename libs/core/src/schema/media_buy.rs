use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::budget::{Budget, BudgetInput};
use super::datetime::{self, StartTime};
use super::{SchemaError, SchemaErrorCode, Warning};

#[derive(Debug, Clone, Deserialize)]
pub struct PackageInput {
    /// Client-supplied package identifier, correlated 1:1 back onto the
    /// response's `package_id`. Synthesized only when the caller omits it.
    #[serde(default)]
    pub buyer_ref: Option<String>,
    pub product_id: String,
    #[serde(default)]
    pub pricing_model: Option<super::product::PricingModel>,
    #[serde(default)]
    pub targeting_overlay: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Package {
    pub buyer_ref: Option<String>,
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing_model: Option<super::product::PricingModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targeting_overlay: Option<serde_json::Value>,
}

impl From<PackageInput> for Package {
    fn from(p: PackageInput) -> Self {
        Package {
            buyer_ref: p.buyer_ref,
            product_id: p.product_id,
            pricing_model: p.pricing_model,
            targeting_overlay: p.targeting_overlay,
        }
    }
}

/// Raw wire shape for `create_media_buy`, before legacy `product_ids[]` has
/// been promoted to `packages[{product_id}]`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMediaBuyRequestInput {
    pub brand_manifest: serde_json::Value,
    pub buyer_ref: String,
    #[serde(default)]
    pub packages: Vec<PackageInput>,
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    /// Legacy date-only alternative to `start_time`, promoted to UTC
    /// midnight when `start_time` is absent.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Legacy date-only alternative to `end_time`.
    #[serde(default)]
    pub end_date: Option<String>,
    pub budget: BudgetInput,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub po_number: Option<String>,
    #[serde(default)]
    pub targeting_overlay: Option<serde_json::Value>,
    #[serde(default)]
    pub push_notification_config: Option<crate::webhook::PushNotificationConfigInput>,
}

#[derive(Debug, Clone)]
pub struct CreateMediaBuyRequest {
    pub brand_manifest: serde_json::Value,
    pub buyer_ref: String,
    pub packages: Vec<Package>,
    pub start_time: StartTime,
    pub end_time: OffsetDateTime,
    pub budget: Budget,
    pub po_number: Option<String>,
    pub targeting_overlay: Option<serde_json::Value>,
    pub push_notification_config: Option<crate::webhook::PushNotificationConfig>,
}

impl CreateMediaBuyRequestInput {
    /// Normalizes legacy `product_ids[]` into one-product packages,
    /// resolves the budget's currency, and rejects a non-future start or an
    /// end time at or before the start.
    pub fn normalize(self) -> Result<(CreateMediaBuyRequest, Vec<Warning>), SchemaError> {
        let mut warnings = Vec::new();

        let mut packages: Vec<Package> = self.packages.into_iter().map(Package::from).collect();
        if packages.is_empty() && !self.product_ids.is_empty() {
            warnings.push(Warning {
                field: "product_ids".into(),
                message: "legacy `product_ids[]` promoted to `packages[{product_id}]`".into(),
            });
            packages = self
                .product_ids
                .into_iter()
                .map(|product_id| Package {
                    buyer_ref: None,
                    product_id,
                    pricing_model: None,
                    targeting_overlay: None,
                })
                .collect();
        }

        if packages.is_empty() {
            return Err(SchemaError::new(
                SchemaErrorCode::ValidationError,
                "create_media_buy requires at least one package",
            )
            .with_field("packages"));
        }

        let start_time = match (&self.start_time, &self.start_date) {
            (Some(raw), _) => StartTime::parse(raw, "start_time")?,
            (None, Some(raw)) => {
                warnings.push(Warning {
                    field: "start_date".into(),
                    message: "legacy date-only `start_date` promoted to `start_time`".into(),
                });
                StartTime::At(datetime::date_only_to_utc_midnight(raw, "start_date")?)
            }
            (None, None) => {
                return Err(SchemaError::new(
                    SchemaErrorCode::ValidationError,
                    "create_media_buy requires `start_time` or `start_date`",
                )
                .with_field("start_time"))
            }
        };

        let end_time = match (&self.end_time, &self.end_date) {
            (Some(raw), _) => datetime::parse_offset_datetime(raw, "end_time")?,
            (None, Some(raw)) => {
                warnings.push(Warning {
                    field: "end_date".into(),
                    message: "legacy date-only `end_date` promoted to `end_time`".into(),
                });
                datetime::date_only_to_utc_midnight(raw, "end_date")?
            }
            (None, None) => {
                return Err(SchemaError::new(
                    SchemaErrorCode::ValidationError,
                    "create_media_buy requires `end_time` or `end_date`",
                )
                .with_field("end_time"))
            }
        };

        if let StartTime::At(start) = start_time {
            if start < OffsetDateTime::now_utc() {
                return Err(SchemaError::new(
                    SchemaErrorCode::ValidationError,
                    "start_time must not be in the past",
                )
                .with_field("start_time"));
            }
            if end_time <= start {
                return Err(SchemaError::new(
                    SchemaErrorCode::ValidationError,
                    "end_time must be after start_time",
                )
                .with_field("end_time"));
            }
        }

        let budget = self.budget.normalize(self.currency.as_deref())?;

        let push_notification_config = self
            .push_notification_config
            .map(crate::webhook::PushNotificationConfigInput::normalize)
            .transpose()?;

        Ok((
            CreateMediaBuyRequest {
                brand_manifest: self.brand_manifest,
                buyer_ref: self.buyer_ref,
                packages,
                start_time,
                end_time,
                budget,
                po_number: self.po_number,
                targeting_overlay: self.targeting_overlay,
                push_notification_config,
            },
            warnings,
        ))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageResult {
    pub package_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_line_item_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateMediaBuyResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_buy_id: Option<String>,
    pub packages: Vec<PackageResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creative_deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_step_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SchemaError>,
}

impl CreateMediaBuyResponse {
    /// Builds the packages list by zipping 1:1 against the request before
    /// any handler branch runs, so every `package_id` is populated even on a
    /// failure or manual-approval path. A package's own `buyer_ref` is
    /// echoed back as its `package_id` when the caller supplied one;
    /// `id_for` only synthesizes an id for packages that didn't.
    pub fn packages_for(request: &CreateMediaBuyRequest, id_for: impl Fn(usize) -> String) -> Vec<PackageResult> {
        request
            .packages
            .iter()
            .enumerate()
            .map(|(i, p)| PackageResult {
                package_id: p.buyer_ref.clone().unwrap_or_else(|| id_for(i)),
                platform_line_item_id: None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMediaBuyRequestInput {
    #[serde(default)]
    pub media_buy_id: Option<String>,
    #[serde(default)]
    pub media_buy_ids: Vec<String>,
    #[serde(default)]
    pub buyer_ref: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub budget: Option<BudgetInput>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub packages: Option<Vec<PackageInput>>,
    /// Legacy alias for `packages`; accepted but never forwarded to the
    /// handler once `packages` has been extracted.
    #[serde(default)]
    pub updates: Option<UpdatesLegacy>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatesLegacy {
    #[serde(default)]
    pub packages: Vec<PackageInput>,
}

#[derive(Debug, Clone)]
pub struct UpdateMediaBuyRequest {
    pub media_buy_ids: Vec<String>,
    pub buyer_ref: Option<String>,
    pub active: Option<bool>,
    pub start_time: Option<StartTime>,
    pub end_time: Option<OffsetDateTime>,
    pub budget: Option<Budget>,
    pub packages: Vec<Package>,
}

impl UpdateMediaBuyRequestInput {
    pub fn normalize(self) -> Result<(UpdateMediaBuyRequest, Vec<Warning>), SchemaError> {
        let mut warnings = Vec::new();

        let mut media_buy_ids = self.media_buy_ids;
        if media_buy_ids.is_empty() {
            if let Some(id) = self.media_buy_id {
                warnings.push(Warning {
                    field: "media_buy_id".into(),
                    message: "legacy singular `media_buy_id` promoted to `media_buy_ids[]`".into(),
                });
                media_buy_ids.push(id);
            }
        }

        if media_buy_ids.is_empty() && self.buyer_ref.is_none() {
            return Err(SchemaError::new(
                SchemaErrorCode::ValidationError,
                "update_media_buy requires `media_buy_ids` or `buyer_ref`",
            ));
        }

        let packages = match self.packages {
            Some(p) => p,
            None => match self.updates {
                Some(legacy) => {
                    warnings.push(Warning {
                        field: "updates".into(),
                        message: "legacy `updates.packages` promoted to top-level `packages`".into(),
                    });
                    legacy.packages
                }
                None => Vec::new(),
            },
        }
        .into_iter()
        .map(Package::from)
        .collect();

        let start_time = self
            .start_time
            .as_deref()
            .map(|raw| StartTime::parse(raw, "start_time"))
            .transpose()?;
        let end_time = self
            .end_time
            .as_deref()
            .map(|raw| datetime::parse_offset_datetime(raw, "end_time"))
            .transpose()?;
        let budget = self
            .budget
            .map(|b| b.normalize(self.currency.as_deref()))
            .transpose()?;

        Ok((
            UpdateMediaBuyRequest {
                media_buy_ids,
                buyer_ref: self.buyer_ref,
                active: self.active,
                start_time,
                end_time,
                budget,
                packages,
            },
            warnings,
        ))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AffectedPackage {
    pub package_id: String,
    pub product_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateMediaBuyResponse {
    pub media_buy_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation_date: Option<String>,
    pub affected_packages: Vec<AffectedPackage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SchemaError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> CreateMediaBuyRequestInput {
        CreateMediaBuyRequestInput {
            brand_manifest: serde_json::json!({"name": "Acme"}),
            buyer_ref: "buyer-1".into(),
            packages: vec![],
            product_ids: vec!["prod_1".into(), "prod_2".into()],
            start_time: Some("2027-01-01T00:00:00Z".into()),
            end_time: Some("2027-02-01T00:00:00Z".into()),
            start_date: None,
            end_date: None,
            budget: BudgetInput::Number(10_000.0),
            currency: Some("USD".into()),
            po_number: None,
            targeting_overlay: None,
            push_notification_config: None,
        }
    }

    #[test]
    fn legacy_product_ids_promoted_to_packages() {
        let (req, warnings) = base_input().normalize().unwrap();
        assert_eq!(req.packages.len(), 2);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn end_before_start_rejected() {
        let mut input = base_input();
        input.end_time = Some("2026-12-01T00:00:00Z".into());
        let err = input.normalize().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("end_time"));
    }

    #[test]
    fn past_start_time_rejected() {
        let mut input = base_input();
        input.start_time = Some("2020-01-01T00:00:00Z".into());
        let err = input.normalize().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("start_time"));
    }

    #[test]
    fn legacy_date_only_fields_are_promoted() {
        let mut input = base_input();
        input.start_time = None;
        input.end_time = None;
        input.start_date = Some("2027-01-01".into());
        input.end_date = Some("2027-02-01".into());
        let (req, warnings) = input.normalize().unwrap();
        assert!(matches!(req.start_time, StartTime::At(_)));
        // product_ids -> packages, start_date -> start_time, end_date -> end_time
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn empty_packages_rejected() {
        let mut input = base_input();
        input.product_ids = vec![];
        let err = input.normalize().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("packages"));
    }

    #[test]
    fn package_results_always_carry_package_id_even_on_forced_failure() {
        let (req, _) = base_input().normalize().unwrap();
        let results = CreateMediaBuyResponse::packages_for(&req, |i| format!("pkg_{i}"));
        assert_eq!(results.len(), req.packages.len());
        assert!(results.iter().all(|p| !p.package_id.is_empty()));
    }

    #[test]
    fn client_supplied_buyer_ref_is_echoed_as_package_id() {
        let mut input = base_input();
        input.product_ids = vec![];
        input.packages = vec![PackageInput {
            buyer_ref: Some("pkg1".into()),
            product_id: "prod_1".into(),
            pricing_model: None,
            targeting_overlay: None,
        }];
        let (req, _) = input.normalize().unwrap();
        let results = CreateMediaBuyResponse::packages_for(&req, |i| format!("pkg_{i}"));
        assert_eq!(results[0].package_id, "pkg1");
    }
}
