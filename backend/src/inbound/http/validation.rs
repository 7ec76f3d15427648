//! Shared validation helpers for inbound HTTP adapters.
//!
//! Form fields arrive as optional strings; these helpers turn them into typed
//! values or an `invalid_request` error naming the offending field.

use std::str::FromStr;

use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidNumber,
    InvalidKey,
    UnknownAction,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::InvalidKey => "invalid_key",
            ErrorCode::UnknownAction => "unknown_action",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_number_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be a finite number"))
        .with_value(ErrorCode::InvalidNumber, value)
}

pub(crate) fn invalid_key_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be a record key"))
        .with_value(ErrorCode::InvalidKey, value)
}

pub(crate) fn unknown_action_error(field: FieldName, value: &str) -> Error {
    ValidationError::new(field, format!("unsupported action: {value}"))
        .with_value(ErrorCode::UnknownAction, value)
}

/// Require a field to be present, returning its raw text.
pub(crate) fn require(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse a decimal amount. Surrounding whitespace is ignored; NaN and
/// infinities are rejected.
pub(crate) fn parse_amount(value: &str, field: FieldName) -> Result<f64, Error> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| invalid_number_error(field, value))
}

/// Parse an optional amount, treating an absent field as zero.
pub(crate) fn parse_amount_or_zero(value: Option<&str>, field: FieldName) -> Result<f64, Error> {
    value.map_or(Ok(0.0), |raw| parse_amount(raw, field))
}

/// Parse a required record key such as [`crate::domain::UserId`].
pub(crate) fn parse_key<K: FromStr>(value: Option<String>, field: FieldName) -> Result<K, Error> {
    let raw = require(value, field)?;
    raw.trim()
        .parse::<K>()
        .map_err(|_| invalid_key_error(field, &raw))
}
