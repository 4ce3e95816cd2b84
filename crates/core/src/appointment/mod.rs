//! Appointments booked by customers for their pets.

mod service;
mod types;

#[cfg(test)]
mod tests;

#[cfg(test)]
pub use service::MockAppointmentRepository;
pub use service::{AppointmentRepository, AppointmentService};
pub use types::{
    Appointment, AppointmentChanges, AppointmentPayload, AppointmentView, NewAppointment,
};
