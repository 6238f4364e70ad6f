use serde::{Deserialize, Serialize};

/// Severity of a recovered domain/schema error, surfaced alongside its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// A structured, recoverable error appended to a response's `errors[]`.
///
/// Never thrown across a handler boundary — domain and schema failures are
/// collected here instead of unwinding, so a partially-successful response
/// (e.g. some packages created, others rejected) can still be returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainError {
    pub code: DomainErrorCode,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl DomainError {
    pub fn new(code: DomainErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            severity: Severity::Error,
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for DomainError {}

/// Domain errors surface on the same response `errors[]` slots schema
/// validation failures do; this folds a [`DomainError`] into the schema
/// tier's shape rather than widening every response struct to carry two
/// error types.
impl From<DomainError> for crate::schema::SchemaError {
    fn from(err: DomainError) -> Self {
        let code = match err.code {
            DomainErrorCode::ValidationError => crate::schema::SchemaErrorCode::ValidationError,
            _ => crate::schema::SchemaErrorCode::ValidationError,
        };
        let mut schema_err = crate::schema::SchemaError::new(code, err.message);
        schema_err.severity = err.severity;
        if let Some(field) = err.field {
            schema_err = schema_err.with_field(field);
        }
        schema_err
    }
}

/// Not an exhaustive enum — implementers extend this as AdCP grows new
/// failure modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainErrorCode {
    ValidationError,
    AuthenticationError,
    AuthorizationError,
    TenantDetectionFailed,
    PrincipalNotInTenant,
    PricingModelUnsupported,
    ProductNotFound,
    FormatNotFound,
    AdapterError,
    ManualApprovalRequired,
}
