//! Customer types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::media::MediaView;

/// A stored customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Row id.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Avatar media row.
    pub avatar_id: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Avatar media row.
    pub avatar_id: Option<i32>,
}

/// Full replacement of a customer's profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerChanges {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Contact phone.
    pub phone: Option<String>,
}

/// Accepted customer fields.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerPayload {
    /// Display name.
    #[validate(
        required(message = "name is a required field"),
        length(min = 1, message = "name is a required field")
    )]
    pub name: Option<String>,
    /// Email address.
    #[validate(
        required(message = "email is a required field"),
        email(message = "email must be a valid email")
    )]
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
}

impl CustomerPayload {
    /// Profile fields of a validated payload. Emails are stored lowercased.
    #[must_use]
    pub fn into_changes(self) -> CustomerChanges {
        CustomerChanges {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default().to_lowercase(),
            phone: crate::validation::non_blank(self.phone),
        }
    }
}

/// Customer as rendered in responses.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerView {
    /// Row id.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Avatar media row id.
    pub avatar_id: Option<i32>,
    /// Avatar with its URL.
    pub avatar: Option<MediaView>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
