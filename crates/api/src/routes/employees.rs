//! Employee routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use petcare_core::employee::EmployeeView;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::{Avatar, JsonFields, Listing, ResourceId, UploadForm};
use crate::middleware::AuthUser;

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/employee/me`
async fn current_employee(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<EmployeeView>, ApiError> {
    Ok(Json(state.employees.show(auth.user_id()).await?))
}

/// POST `/employee`
/// Multipart `name`, `email`, `phone?`, `role?` and an optional `avatar` file.
async fn create_employee(
    State(state): State<AppState>,
    UploadForm(submission, _): UploadForm<Avatar>,
) -> Result<Json<EmployeeView>, ApiError> {
    Ok(Json(state.employees.create(submission).await?))
}

/// GET `/employee?page=&order=`
async fn list_employees(
    State(state): State<AppState>,
    Listing(query): Listing,
) -> Result<Json<Vec<EmployeeView>>, ApiError> {
    Ok(Json(state.employees.list(query).await?))
}

/// GET `/employee/{id}`
async fn show_employee(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<EmployeeView>, ApiError> {
    Ok(Json(state.employees.show(id).await?))
}

/// PUT `/employee/{id}`
async fn update_employee(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    JsonFields(fields): JsonFields,
) -> Result<Json<EmployeeView>, ApiError> {
    Ok(Json(state.employees.update(id, &fields).await?))
}

/// DELETE `/employee/{id}`
async fn delete_employee(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    state.employees.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Router
// ============================================================================

/// The signed-in employee's own profile.
pub fn staff_routes() -> Router<AppState> {
    Router::new().route("/employee/me", get(current_employee))
}

/// Employee management for admins.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/employee", post(create_employee).get(list_employees))
        .route(
            "/employee/{id}",
            get(show_employee).put(update_employee).delete(delete_employee),
        )
}
