//! Customer profile and customer management routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use petcare_core::customer::CustomerView;
use petcare_shared::{AppError, Role};

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::{Avatar, JsonFields, Listing, ResourceId, UploadForm};
use crate::middleware::AuthUser;

/// The customer id of a customer-role token.
fn customer_subject(auth: &AuthUser) -> Result<i32, ApiError> {
    if auth.role() == Role::Customer {
        Ok(auth.user_id())
    } else {
        Err(AppError::Forbidden("Customer account required".to_string()).into())
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/customer`
/// Multipart `name`, `email`, `phone?` and an optional `avatar` file.
async fn register_customer(
    State(state): State<AppState>,
    UploadForm(submission, _): UploadForm<Avatar>,
) -> Result<Json<CustomerView>, ApiError> {
    Ok(Json(state.customers.register(submission).await?))
}

/// GET `/customer/me`
async fn current_customer(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CustomerView>, ApiError> {
    let id = customer_subject(&auth)?;
    Ok(Json(state.customers.show(id).await?))
}

/// PUT `/customer`
async fn update_current_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonFields(fields): JsonFields,
) -> Result<Json<CustomerView>, ApiError> {
    let id = customer_subject(&auth)?;
    Ok(Json(state.customers.update(id, &fields).await?))
}

/// GET `/company/customer?page=&order=`
async fn list_customers(
    State(state): State<AppState>,
    Listing(query): Listing,
) -> Result<Json<Vec<CustomerView>>, ApiError> {
    Ok(Json(state.customers.list(query).await?))
}

/// GET `/company/customer/{id}`
async fn show_customer(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<CustomerView>, ApiError> {
    Ok(Json(state.customers.show(id).await?))
}

/// PUT `/company/customer/{id}`
async fn update_customer(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    JsonFields(fields): JsonFields,
) -> Result<Json<CustomerView>, ApiError> {
    Ok(Json(state.customers.update(id, &fields).await?))
}

/// DELETE `/company/customer/{id}`
async fn delete_customer(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    state.customers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Router
// ============================================================================

/// Sign-up, open to everyone.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/customer", post(register_customer))
}

/// The signed-in customer's own profile.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/customer", put(update_current_customer))
        .route("/customer/me", get(current_customer))
}

/// Customer management for company staff.
pub fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/company/customer", get(list_customers))
        .route(
            "/company/customer/{id}",
            get(show_customer).put(update_customer).delete(delete_customer),
        )
}
