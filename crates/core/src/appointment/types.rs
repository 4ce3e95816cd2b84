//! Appointment types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use validator::Validate;

use crate::validation::validate_rfc3339;

/// A stored appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
    /// Row id.
    pub id: i32,
    /// The pet being seen.
    pub pet_id: i32,
    /// The customer who booked.
    pub customer_id: i32,
    /// Assigned employee.
    pub employee_id: Option<i32>,
    /// Scheduled time.
    pub date: DateTime<Utc>,
    /// Requested service, e.g. "grooming".
    pub service: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    /// The pet being seen.
    pub pet_id: i32,
    /// The customer who booked.
    pub customer_id: i32,
    /// Assigned employee.
    pub employee_id: Option<i32>,
    /// Scheduled time.
    pub date: DateTime<Utc>,
    /// Requested service.
    pub service: Option<String>,
}

/// Full replacement of an appointment's booking fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentChanges {
    /// The pet being seen.
    pub pet_id: i32,
    /// Assigned employee.
    pub employee_id: Option<i32>,
    /// Scheduled time.
    pub date: DateTime<Utc>,
    /// Requested service.
    pub service: Option<String>,
}

/// Accepted appointment fields. Ids may arrive as numbers or numeric strings.
#[serde_as]
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppointmentPayload {
    /// The pet being seen.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[validate(required(message = "pet_id is a required field"))]
    pub pet_id: Option<i32>,
    /// Scheduled time, RFC 3339.
    #[validate(
        required(message = "date is a required field"),
        custom(function = "validate_rfc3339")
    )]
    pub date: Option<String>,
    /// Requested service.
    pub service: Option<String>,
    /// Assigned employee.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub employee_id: Option<i32>,
}

/// Appointment as rendered in responses.
pub type AppointmentView = Appointment;
