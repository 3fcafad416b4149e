//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::{AppointmentId, Error, HospitalId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidField,
    InvalidTimestamp,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidField => "invalid_field",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
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

/// Validation failure carrying the offending field name.
pub(crate) fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    let article = if name.starts_with(['a', 'e', 'i', 'o', 'u']) {
        "an"
    } else {
        "a"
    };
    field_error(
        field,
        ErrorCode::MissingField,
        format!("Please add {article} {name}"),
    )
}

pub(crate) fn invalid_field_error(field: FieldName, message: impl Into<String>) -> Error {
    field_error(field, ErrorCode::InvalidField, message)
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("{name} must be an RFC 3339 timestamp")).with_details(json!({
        "field": name,
        "value": value,
        "code": ErrorCode::InvalidTimestamp.as_str(),
    }))
}

pub(crate) fn parse_rfc3339_timestamp(
    value: &str,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| invalid_timestamp_error(field, value))
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| parse_rfc3339_timestamp(raw, field))
        .transpose()
}

/// Path ids that cannot name a record are reported as missing records.
pub(crate) fn parse_hospital_id(raw: &str) -> Result<HospitalId, Error> {
    HospitalId::parse(raw).ok_or_else(|| Error::not_found(format!("No hospital with the id {raw}")))
}

pub(crate) fn parse_appointment_id(raw: &str) -> Result<AppointmentId, Error> {
    AppointmentId::parse(raw)
        .ok_or_else(|| Error::not_found(format!("No appointment with the id {raw}")))
}
