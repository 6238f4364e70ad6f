use serde::{Deserialize, Serialize};

use super::{SchemaError, SchemaErrorCode};
use crate::schema::properties::Property;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    Cpm,
    Cpp,
    Cpcv,
    Cpc,
    FlatRate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceGuidance {
    pub floor: f64,
    pub suggested_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingOption {
    pub pricing_model: PricingModel,
    pub is_fixed: bool,
    pub is_auction: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_guidance: Option<PriceGuidance>,
    pub currency: String,
}

/// Raw, pre-validation shape accepted on input: `properties`/`property_tags`
/// are both optional here so the `oneOf` rule can be enforced explicitly in
/// [`TryFrom`] rather than relying on serde to reject the ambiguous case.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProduct {
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub properties: Option<Vec<Property>>,
    #[serde(default)]
    pub property_tags: Option<Vec<String>>,
    #[serde(default)]
    pub pricing_options: Vec<PricingOption>,
    #[serde(default)]
    pub format_ids: Vec<String>,
    #[serde(default)]
    pub delivery_type: Option<String>,
    #[serde(default)]
    pub is_fixed_price: bool,
    #[serde(default)]
    pub is_standard: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductProperties {
    Full(Vec<Property>),
    Tags(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub properties: ProductProperties,
    pub pricing_options: Vec<PricingOption>,
    pub format_ids: Vec<String>,
    pub delivery_type: Option<String>,
    pub is_fixed_price: bool,
    pub is_standard: bool,
}

impl TryFrom<RawProduct> for Product {
    type Error = SchemaError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        let properties = match (raw.properties, raw.property_tags) {
            (Some(full), None) => ProductProperties::Full(full),
            (None, Some(tags)) => ProductProperties::Tags(tags),
            (None, None) => {
                return Err(SchemaError::new(
                    SchemaErrorCode::InvalidOneOf,
                    "product must carry exactly one of `properties` or `property_tags`",
                )
                .with_field("properties"))
            }
            (Some(_), Some(_)) => {
                return Err(SchemaError::new(
                    SchemaErrorCode::InvalidOneOf,
                    "product must carry exactly one of `properties` or `property_tags`, not both",
                )
                .with_field("properties"))
            }
        };

        Ok(Product {
            product_id: raw.product_id,
            name: raw.name,
            description: raw.description,
            properties,
            pricing_options: raw.pricing_options,
            format_ids: raw.format_ids,
            delivery_type: raw.delivery_type,
            is_fixed_price: raw.is_fixed_price,
            is_standard: raw.is_standard,
        })
    }
}

/// ANDed filter set for `get_products`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilters {
    #[serde(default)]
    pub delivery_type: Option<String>,
    #[serde(default)]
    pub is_fixed_price: Option<bool>,
    #[serde(default)]
    pub format_types: Vec<String>,
    #[serde(default)]
    pub format_ids: Vec<String>,
    #[serde(default)]
    pub standard_formats_only: bool,
}

impl ProductFilters {
    /// All configured filters must hold; an unset filter imposes no
    /// constraint.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(dt) = &self.delivery_type {
            if product.delivery_type.as_deref() != Some(dt.as_str()) {
                return false;
            }
        }
        if let Some(fixed) = self.is_fixed_price {
            if product.is_fixed_price != fixed {
                return false;
            }
        }
        if self.standard_formats_only && !product.is_standard {
            return false;
        }
        if !self.format_ids.is_empty()
            && !self
                .format_ids
                .iter()
                .any(|id| product.format_ids.contains(id))
        {
            return false;
        }
        true
    }
}

/// Case-insensitive substring match over product name/description plus
/// expanded format ids — the only ranking signal `get_products` applies
/// against a free-text brief.
pub fn matches_brief(product: &Product, brief: &str) -> bool {
    let needle = brief.to_lowercase();
    product.name.to_lowercase().contains(&needle)
        || product.description.to_lowercase().contains(&needle)
        || product
            .format_ids
            .iter()
            .any(|f| f.to_lowercase().contains(&needle))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetProductsRequest {
    #[serde(default)]
    pub brief: Option<String>,
    /// Required as of spec v2.2; `None` only when the caller omitted the
    /// field entirely, which `get_products` rejects before touching the
    /// catalog.
    #[serde(default)]
    pub brand_manifest: Option<serde_json::Value>,
    #[serde(default)]
    pub filters: ProductFilters,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetProductsResponse {
    pub products: Vec<Product>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SchemaError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(properties: Option<Vec<Property>>, property_tags: Option<Vec<String>>) -> RawProduct {
        RawProduct {
            product_id: "p1".into(),
            name: "Homepage Takeover".into(),
            description: "Premium homepage placement".into(),
            properties,
            property_tags,
            pricing_options: vec![],
            format_ids: vec![],
            delivery_type: None,
            is_fixed_price: false,
            is_standard: false,
        }
    }

    #[test]
    fn rejects_neither_properties_nor_tags() {
        let err = Product::try_from(raw(None, None)).unwrap_err();
        assert_eq!(err.code, SchemaErrorCode::InvalidOneOf);
    }

    #[test]
    fn rejects_both_properties_and_tags() {
        let err = Product::try_from(raw(Some(vec![]), Some(vec!["news".into()]))).unwrap_err();
        assert_eq!(err.code, SchemaErrorCode::InvalidOneOf);
    }

    #[test]
    fn accepts_tags_only() {
        let product = Product::try_from(raw(None, Some(vec!["sports".into()]))).unwrap();
        assert!(matches!(product.properties, ProductProperties::Tags(_)));
    }

    #[test]
    fn brief_matches_are_case_insensitive() {
        let product = Product::try_from(raw(None, Some(vec!["news".into()]))).unwrap();
        assert!(matches_brief(&product, "HOMEPAGE"));
        assert!(!matches_brief(&product, "sports car"));
    }
}
