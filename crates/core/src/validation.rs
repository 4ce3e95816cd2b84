//! Payload schema checking.
//!
//! Every resource declares its accepted fields as a `Deserialize + Validate`
//! struct. Incoming form fields (multipart text parts or a JSON object) are
//! decoded into that struct, which drops undeclared keys, and then checked
//! with `validator`. Nothing here touches storage.

use std::borrow::Cow;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationError};

/// Raw field-name to value mapping taken from a request.
pub type FormFields = serde_json::Map<String, Value>;

/// Human-readable reasons a payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure(Vec<String>);

impl ValidationFailure {
    /// Wrap a list of messages.
    #[must_use]
    pub fn new(messages: Vec<String>) -> Self {
        Self(messages)
    }

    /// A failure with one message.
    #[must_use]
    pub fn single(message: impl Into<String>) -> Self {
        Self(vec![message.into()])
    }

    /// The individual messages.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(". "))
    }
}

impl std::error::Error for ValidationFailure {}

/// Decode `fields` into `T` and run its validation rules.
///
/// Messages are ordered by field name, one per failing field.
pub fn validate_payload<T>(fields: &FormFields) -> Result<T, ValidationFailure>
where
    T: DeserializeOwned + Validate,
{
    let payload: T = serde_json::from_value(Value::Object(fields.clone()))
        .map_err(|e| ValidationFailure::single(e.to_string()))?;

    if let Err(errors) = payload.validate() {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let messages = fields
            .into_iter()
            .filter_map(|(field, errs)| {
                errs.first().map(|err| match &err.message {
                    Some(message) => message.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        return Err(ValidationFailure::new(messages));
    }

    Ok(payload)
}

/// Accepts RFC 3339 timestamps such as `2026-03-01T10:00:00Z`.
pub fn validate_rfc3339(value: &str) -> Result<(), ValidationError> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|_| ())
        .map_err(|_| {
            ValidationError::new("rfc3339")
                .with_message(Cow::Borrowed("date must be a valid RFC 3339 date"))
        })
}

/// Trimmed copy of an optional string, `None` when blank.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
