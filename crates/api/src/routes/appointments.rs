//! Appointment routes.
//!
//! The owner of an appointment is the customer who booked it, taken from
//! `?c=` or the `user_id` header in both areas.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, post, put},
};
use petcare_core::appointment::AppointmentView;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonFields, Listing, OwnerId, ResourceId};

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/customer/appointment?c={customer_id}`
/// JSON `{pet_id, date, service?, employee_id?}`.
async fn create_appointment(
    State(state): State<AppState>,
    owner: OwnerId,
    JsonFields(fields): JsonFields,
) -> Result<Json<AppointmentView>, ApiError> {
    let appointment = state.appointments.create(owner.require()?, &fields).await?;
    Ok(Json(appointment))
}

/// GET `/customer/appointment?page=&order=&owner=`
async fn list_appointments(
    State(state): State<AppState>,
    Listing(query): Listing,
) -> Result<Json<Vec<AppointmentView>>, ApiError> {
    Ok(Json(state.appointments.list(query).await?))
}

/// PUT `/company/appointment/{id}`
async fn update_appointment(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    owner: OwnerId,
    JsonFields(fields): JsonFields,
) -> Result<Json<AppointmentView>, ApiError> {
    let appointment = state
        .appointments
        .update(owner.require()?, id, &fields)
        .await?;
    Ok(Json(appointment))
}

/// DELETE `/customer/appointment/{id}`
async fn delete_appointment(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    owner: OwnerId,
) -> Result<StatusCode, ApiError> {
    state.appointments.delete(owner.require()?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Router
// ============================================================================

/// Booking and cancelling for customers.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/customer/appointment",
            post(create_appointment).get(list_appointments),
        )
        .route("/customer/appointment/{id}", delete(delete_appointment))
}

/// Appointment management for company staff.
pub fn company_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/company/appointment",
            post(create_appointment).get(list_appointments),
        )
        .route(
            "/company/appointment/{id}",
            put(update_appointment).delete(delete_appointment),
        )
}
