//! Pet routes, mounted under both the customer and the company area.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use petcare_core::pet::PetView;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::{Avatar, JsonFields, Listing, OwnerId, ResourceId, UploadForm};

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/customer/pet?c={owner_id}`
/// Multipart `name`, `type`, `sex`, `breed` and an optional `avatar` file.
async fn create_pet(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
    UploadForm(submission, _): UploadForm<Avatar>,
) -> Result<Json<PetView>, ApiError> {
    let pet = state.pets.create(owner, submission).await?;
    Ok(Json(pet))
}

/// GET `/customer/pet?page=&order=&owner=`
async fn list_pets(
    State(state): State<AppState>,
    Listing(query): Listing,
) -> Result<Json<Vec<PetView>>, ApiError> {
    Ok(Json(state.pets.list(query).await?))
}

/// GET `/customer/pet/{id}`
async fn show_pet(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<PetView>, ApiError> {
    Ok(Json(state.pets.show(id).await?))
}

/// PUT `/customer/pet/{id}` with the owner in `user_id`.
async fn update_pet(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    owner: OwnerId,
    JsonFields(fields): JsonFields,
) -> Result<Json<PetView>, ApiError> {
    let pet = state.pets.update(owner.require()?, id, &fields).await?;
    Ok(Json(pet))
}

/// DELETE `/customer/pet/{id}` with the owner in `user_id`.
async fn delete_pet(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    owner: OwnerId,
) -> Result<StatusCode, ApiError> {
    state.pets.delete(owner.require()?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Router
// ============================================================================

fn pet_routes(base: &str) -> Router<AppState> {
    Router::new()
        .route(base, post(create_pet).get(list_pets))
        .route(
            &format!("{base}/{{id}}"),
            get(show_pet).put(update_pet).delete(delete_pet),
        )
}

/// Pet routes for customers.
pub fn customer_routes() -> Router<AppState> {
    pet_routes("/customer/pet")
}

/// Pet routes for company staff.
pub fn company_routes() -> Router<AppState> {
    pet_routes("/company/pet")
}
