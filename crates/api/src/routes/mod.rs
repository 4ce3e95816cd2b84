//! API route definitions.

use axum::{Router, middleware};

use crate::{
    AppState,
    middleware::{auth_middleware, require_admin, require_staff},
};

pub mod appointments;
pub mod customers;
pub mod employees;
pub mod files;
pub mod health;
pub mod pets;
pub mod posts;

/// Routes that need no token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(files::routes())
        .merge(customers::public_routes())
}

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let authenticated = middleware::from_fn_with_state(state.clone(), auth_middleware);

    // Any signed-in account
    let customer_area = Router::new()
        .merge(pets::customer_routes())
        .merge(appointments::customer_routes())
        .merge(customers::profile_routes())
        .merge(posts::feed_routes())
        .layer(authenticated.clone());

    // Employees and admins
    let company_area = Router::new()
        .merge(pets::company_routes())
        .merge(appointments::company_routes())
        .merge(customers::company_routes())
        .merge(posts::company_routes())
        .merge(employees::staff_routes())
        .layer(middleware::from_fn(require_staff))
        .layer(authenticated.clone());

    // Admins only
    let admin_area = Router::new()
        .merge(employees::admin_routes())
        .layer(middleware::from_fn(require_admin))
        .layer(authenticated);

    Router::new()
        .merge(public_routes())
        .merge(customer_area)
        .merge(company_area)
        .merge(admin_area)
}
