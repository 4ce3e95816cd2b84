//! Appointment repository seam and service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use super::types::{
    Appointment, AppointmentChanges, AppointmentPayload, AppointmentView, NewAppointment,
};
use crate::pet::PetRepository;
use crate::resource::{ListParams, ListQuery, OwnerContext, RepositoryError, ResourceError};
use crate::validation::{FormFields, ValidationFailure, non_blank, validate_payload};

/// Repository trait for appointment persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Insert an appointment.
    async fn create(&self, input: NewAppointment) -> Result<Appointment, RepositoryError>;

    /// Find an appointment.
    async fn find_by_id(&self, id: i32) -> Result<Option<Appointment>, RepositoryError>;

    /// One page of appointments. The owner filter matches `customer_id`.
    async fn list(&self, params: &ListParams) -> Result<Vec<Appointment>, RepositoryError>;

    /// Replace the booking fields. `None` if the row is gone.
    async fn update(
        &self,
        id: i32,
        changes: AppointmentChanges,
    ) -> Result<Option<Appointment>, RepositoryError>;

    /// Delete an appointment. Returns `false` if it did not exist.
    async fn delete(&self, id: i32) -> Result<bool, RepositoryError>;
}

/// Appointment operations.
pub struct AppointmentService {
    appointments: Arc<dyn AppointmentRepository>,
    pets: Arc<dyn PetRepository>,
}

impl AppointmentService {
    /// Create an appointment service.
    #[must_use]
    pub fn new(appointments: Arc<dyn AppointmentRepository>, pets: Arc<dyn PetRepository>) -> Self {
        Self { appointments, pets }
    }

    /// Book an appointment for one of `owner`'s pets.
    pub async fn create(
        &self,
        owner: OwnerContext,
        fields: &FormFields,
    ) -> Result<AppointmentView, ResourceError> {
        let changes = self.checked(owner, fields).await?;

        let appointment = self
            .appointments
            .create(NewAppointment {
                pet_id: changes.pet_id,
                customer_id: owner.owner_id(),
                employee_id: changes.employee_id,
                date: changes.date,
                service: changes.service,
            })
            .await?;

        info!(
            appointment_id = appointment.id,
            pet_id = appointment.pet_id,
            customer_id = owner.owner_id(),
            "Appointment created"
        );
        Ok(appointment)
    }

    /// One page of appointments, optionally for one customer.
    pub async fn list(&self, query: ListQuery) -> Result<Vec<AppointmentView>, ResourceError> {
        let params = query.into_params()?;
        Ok(self.appointments.list(&params).await?)
    }

    /// Reschedule an appointment `owner` booked.
    pub async fn update(
        &self,
        owner: OwnerContext,
        id: i32,
        fields: &FormFields,
    ) -> Result<AppointmentView, ResourceError> {
        let changes = self.checked(owner, fields).await?;
        self.owned(owner, id).await?;

        let appointment = self
            .appointments
            .update(id, changes)
            .await?
            .ok_or(ResourceError::NotFound("Appointment"))?;

        info!(appointment_id = id, customer_id = owner.owner_id(), "Appointment updated");
        Ok(appointment)
    }

    /// Cancel an appointment `owner` booked.
    pub async fn delete(&self, owner: OwnerContext, id: i32) -> Result<(), ResourceError> {
        self.owned(owner, id).await?;

        if !self.appointments.delete(id).await? {
            return Err(ResourceError::NotFound("Appointment"));
        }

        info!(appointment_id = id, customer_id = owner.owner_id(), "Appointment deleted");
        Ok(())
    }

    async fn owned(&self, owner: OwnerContext, id: i32) -> Result<Appointment, ResourceError> {
        self.appointments
            .find_by_id(id)
            .await?
            .filter(|a| owner.owns(a.customer_id))
            .ok_or(ResourceError::NotFound("Appointment"))
    }

    /// Validate the payload, the date and the pet's ownership.
    async fn checked(
        &self,
        owner: OwnerContext,
        fields: &FormFields,
    ) -> Result<AppointmentChanges, ResourceError> {
        let payload: AppointmentPayload = validate_payload(fields)?;
        let date = parse_date(payload.date.as_deref().unwrap_or_default())?;
        if date < Utc::now() {
            return Err(ValidationFailure::single("date must not be in the past").into());
        }

        let pet_id = payload.pet_id.unwrap_or_default();
        self.pets
            .find_with_avatar(pet_id)
            .await?
            .filter(|p| owner.owns(p.item.owner_id))
            .ok_or(ResourceError::NotFound("Pet"))?;

        Ok(AppointmentChanges {
            pet_id,
            employee_id: payload.employee_id,
            date,
            service: non_blank(payload.service),
        })
    }
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, ResourceError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| ValidationFailure::single("date must be a valid RFC 3339 date").into())
}
