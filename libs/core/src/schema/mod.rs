//! Wire-facing domain types. Every type here distinguishes its three shapes:
//! the raw, legacy-tolerant input (`*Input`/`from_wire`), the canonical wire
//! form returned to callers (`to_wire`), and the internal persisted form
//! (`to_internal`) that carries fields the wire form must never leak.

pub mod budget;
pub mod creative;
pub mod datetime;
pub mod delivery;
pub mod formats;
pub mod media_buy;
pub mod product;
pub mod properties;
pub mod signals;

use serde::{Deserialize, Serialize};

/// A single recovered validation or normalization problem, aggregated onto a
/// response's `errors[]` rather than raised as an exception.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaError {
    pub code: SchemaErrorCode,
    pub message: String,
    pub severity: crate::error::Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl SchemaError {
    pub fn new(code: SchemaErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            severity: crate::error::Severity::Error,
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaErrorCode {
    ValidationError,
    MissingField,
    InvalidDatetime,
    InvalidOneOf,
    InvalidSnippet,
}

/// A non-fatal input normalization the caller may want surfaced (e.g. "legacy
/// field `start_date` was promoted to `start_time`").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    pub field: String,
    pub message: String,
}

pub type WireResult<T> = Result<(T, Vec<Warning>), SchemaError>;
