use serde::{Deserialize, Serialize};

use super::{SchemaError, SchemaErrorCode};

/// Canonical nested shape; this is what every handler works with internally
/// and what `to_wire()` always emits, regardless of which [`BudgetInput`]
/// variant the caller sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub total: f64,
    pub currency: String,
}

/// Accepts the three shapes AdCP callers have historically sent: a bare
/// number, a `{total, currency}` object, or an already-canonical [`Budget`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BudgetInput {
    Number(f64),
    Object { total: f64, currency: Option<String> },
    Budget(Budget),
}

impl BudgetInput {
    /// Normalizes to a canonical [`Budget`], falling back to
    /// `fallback_currency` (typically a sibling `currency` field on the
    /// enclosing request) when the input carried no currency of its own.
    pub fn normalize(self, fallback_currency: Option<&str>) -> Result<Budget, SchemaError> {
        let (total, currency) = match self {
            BudgetInput::Number(total) => (total, None),
            BudgetInput::Object { total, currency } => (total, currency),
            BudgetInput::Budget(b) => (b.total, Some(b.currency)),
        };

        if total <= 0.0 {
            return Err(
                SchemaError::new(SchemaErrorCode::ValidationError, "budget total must be positive")
                    .with_field("budget.total"),
            );
        }

        let currency = currency
            .or_else(|| fallback_currency.map(ToString::to_string))
            .ok_or_else(|| {
                SchemaError::new(
                    SchemaErrorCode::ValidationError,
                    "budget currency is required and was not supplied by either the budget or a sibling field",
                )
                .with_field("budget.currency")
            })?;

        Ok(Budget { total, currency })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_number_uses_fallback_currency() {
        let budget = BudgetInput::Number(5000.0)
            .normalize(Some("USD"))
            .unwrap();
        assert_eq!(budget, Budget { total: 5000.0, currency: "USD".into() });
    }

    #[test]
    fn object_currency_overrides_fallback() {
        let budget = BudgetInput::Object { total: 1200.0, currency: Some("EUR".into()) }
            .normalize(Some("USD"))
            .unwrap();
        assert_eq!(budget.currency, "EUR");
    }

    #[test]
    fn missing_currency_without_fallback_errors() {
        let err = BudgetInput::Number(100.0).normalize(None).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("budget.currency"));
    }

    #[test]
    fn non_positive_total_rejected() {
        let err = BudgetInput::Number(0.0).normalize(Some("USD")).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("budget.total"));
    }
}
