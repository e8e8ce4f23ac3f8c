//! Factories that build domain records from untyped mappings.
//!
//! A factory validates the mapping first and only then copies fields into the
//! record, so a partially populated record never escapes.

use crate::model::{AccessToken, Prisoner};
use crate::validator::{validate_properties, RawMapping};
use serde_json::Value;

/// Builds a typed record from a [`RawMapping`].
pub trait RecordFactory {
    /// Record produced by this factory.
    type Output;

    /// Validate `data` and build the record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if a required key is missing or holds a
    /// value of the wrong JSON type.
    fn create_from_mapping(&self, data: &RawMapping) -> Result<Self::Output, ValidationError>;
}

/// Factory for [`Prisoner`] records.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrisonerFactory;

impl PrisonerFactory {
    const RECORD: &'static str = "Prisoner";
    const REQUIRED: [&'static str; 3] = ["name", "cell", "block"];
}

impl RecordFactory for PrisonerFactory {
    type Output = Prisoner;

    fn create_from_mapping(&self, data: &RawMapping) -> Result<Prisoner, ValidationError> {
        check_required(Self::RECORD, &Self::REQUIRED, data)?;

        Ok(Prisoner::new(
            string_field(Self::RECORD, data, "name")?,
            string_field(Self::RECORD, data, "cell")?,
            string_field(Self::RECORD, data, "block")?,
        ))
    }
}

/// Factory for [`AccessToken`] records.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessTokenFactory;

impl AccessTokenFactory {
    const RECORD: &'static str = "AccessToken";
    const REQUIRED: [&'static str; 4] = ["access_token", "expires_in", "token_type", "scope"];
}

impl RecordFactory for AccessTokenFactory {
    type Output = AccessToken;

    fn create_from_mapping(&self, data: &RawMapping) -> Result<AccessToken, ValidationError> {
        check_required(Self::RECORD, &Self::REQUIRED, data)?;

        let expires_in = data
            .get("expires_in")
            .and_then(integer_value)
            .ok_or_else(|| ValidationError::invalid_value(Self::RECORD, "expires_in"))?;

        Ok(AccessToken::new(
            string_field(Self::RECORD, data, "access_token")?,
            expires_in,
            string_field(Self::RECORD, data, "token_type")?,
            string_field(Self::RECORD, data, "scope")?,
        ))
    }
}

/// A JSON integer, or a string holding one (`"3600"`).
fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::String(text) => text.trim().parse().ok(),
        other => other.as_i64(),
    }
}

fn check_required(
    record: &'static str,
    required: &[&str],
    data: &RawMapping,
) -> Result<(), ValidationError> {
    match validate_properties(required, data) {
        Some(reason) => Err(ValidationError { record, reason }),
        None => Ok(()),
    }
}

fn string_field(record: &'static str, data: &RawMapping, key: &str) -> Result<String, ValidationError> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ValidationError::invalid_value(record, key))
}

/// A factory was given an incomplete or mistyped mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot create {record}: {reason}")]
pub struct ValidationError {
    record: &'static str,
    reason: String,
}

impl ValidationError {
    fn invalid_value(record: &'static str, key: &str) -> Self {
        Self {
            record,
            reason: format!("Invalid value for {key}"),
        }
    }

    /// Name of the record that could not be built.
    #[must_use]
    pub fn record(&self) -> &str {
        self.record
    }

    /// Validator message without the record prefix.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}
