//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for the customer, company and admin areas
//! - Authentication and role middleware
//! - Request extractors (owner id, uploads, ids)
//! - Error to response mapping

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, http::header::AUTHORIZATION};
use petcare_core::appointment::{AppointmentRepository, AppointmentService};
use petcare_core::customer::{CustomerRepository, CustomerService};
use petcare_core::employee::{EmployeeRepository, EmployeeService};
use petcare_core::media::MediaRepository;
use petcare_core::pet::{PetRepository, PetService};
use petcare_core::post::{PostRepository, PostService};
use petcare_core::{JunkCleanup, MediaSaga, MediaStore, StorageService};
use petcare_shared::JwtService;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

/// Multipart framing allowance on top of the largest accepted file.
const BODY_OVERHEAD: u64 = 1024 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Upload storage.
    pub storage: Arc<StorageService>,
    /// Removes staged uploads that never got a media row.
    pub cleanup: Arc<JunkCleanup>,
    /// Pet operations.
    pub pets: Arc<PetService>,
    /// Post operations.
    pub posts: Arc<PostService>,
    /// Appointment operations.
    pub appointments: Arc<AppointmentService>,
    /// Customer operations.
    pub customers: Arc<CustomerService>,
    /// Employee operations.
    pub employees: Arc<EmployeeService>,
}

/// Repository implementations the services are built over.
#[derive(Clone)]
pub struct Repositories {
    /// Media rows.
    pub media: Arc<dyn MediaRepository>,
    /// Pets.
    pub pets: Arc<dyn PetRepository>,
    /// Posts.
    pub posts: Arc<dyn PostRepository>,
    /// Appointments.
    pub appointments: Arc<dyn AppointmentRepository>,
    /// Customers.
    pub customers: Arc<dyn CustomerRepository>,
    /// Employees.
    pub employees: Arc<dyn EmployeeRepository>,
}

impl Repositories {
    /// Postgres-backed repositories over one connection pool.
    #[must_use]
    pub fn postgres(db: &DatabaseConnection) -> Self {
        Self {
            media: Arc::new(petcare_db::MediaRepository::new(db.clone())),
            pets: Arc::new(petcare_db::PetRepository::new(db.clone())),
            posts: Arc::new(petcare_db::PostRepository::new(db.clone())),
            appointments: Arc::new(petcare_db::AppointmentRepository::new(db.clone())),
            customers: Arc::new(petcare_db::CustomerRepository::new(db.clone())),
            employees: Arc::new(petcare_db::EmployeeRepository::new(db.clone())),
        }
    }
}

impl AppState {
    /// Wire services over `repos`. Media URLs are `base_url` + stored path.
    #[must_use]
    pub fn new(
        jwt_service: Arc<JwtService>,
        storage: Arc<StorageService>,
        repos: Repositories,
        base_url: impl Into<String>,
    ) -> Self {
        let store = Arc::new(MediaStore::new(repos.media.clone(), base_url));
        let cleanup = Arc::new(JunkCleanup::new(storage.clone(), repos.media));
        let saga = MediaSaga::new(store, cleanup.clone());

        Self {
            jwt_service,
            storage,
            cleanup,
            pets: Arc::new(PetService::new(repos.pets.clone(), saga.clone())),
            posts: Arc::new(PostService::new(repos.posts.clone(), saga.clone())),
            appointments: Arc::new(AppointmentService::new(
                repos.appointments,
                repos.pets.clone(),
            )),
            customers: Arc::new(CustomerService::new(
                repos.customers,
                repos.pets,
                saga.clone(),
            )),
            employees: Arc::new(EmployeeService::new(repos.employees, repos.posts, saga)),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit =
        usize::try_from(state.storage.config().max_file_size + BODY_OVERHEAD).unwrap_or(usize::MAX);

    Router::new()
        .merge(routes::api_routes_with_state(state.clone()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(SetSensitiveRequestHeadersLayer::new([AUTHORIZATION]))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
