//! Employee types.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use petcare_shared::Role;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::media::MediaView;

/// A stored employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    /// Row id.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// `Employee` or `Admin`.
    pub role: Role,
    /// Avatar media row.
    pub avatar_id: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Staff role.
    pub role: Role,
    /// Avatar media row.
    pub avatar_id: Option<i32>,
}

/// Full replacement of an employee's profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeChanges {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Staff role.
    pub role: Role,
}

/// Accepted employee fields.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmployeePayload {
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
    /// `employee` or `admin`.
    #[validate(custom(function = "validate_staff_role"))]
    pub role: Option<String>,
}

fn validate_staff_role(role: &str) -> Result<(), ValidationError> {
    match Role::parse(role) {
        Some(role) if role.is_staff() => Ok(()),
        _ => Err(ValidationError::new("role")
            .with_message(Cow::Borrowed("role must be one of employee, admin"))),
    }
}

impl EmployeePayload {
    /// Profile fields of a validated payload. A missing role keeps `fallback`.
    #[must_use]
    pub fn into_changes(self, fallback: Role) -> EmployeeChanges {
        EmployeeChanges {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default().to_lowercase(),
            phone: crate::validation::non_blank(self.phone),
            role: self
                .role
                .as_deref()
                .and_then(Role::parse)
                .unwrap_or(fallback),
        }
    }
}

/// Employee as rendered in responses.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeView {
    /// Row id.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Staff role.
    pub role: Role,
    /// Avatar media row id.
    pub avatar_id: Option<i32>,
    /// Avatar with its URL.
    pub avatar: Option<MediaView>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
