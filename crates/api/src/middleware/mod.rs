//! Request middleware.

pub mod auth;
pub mod roles;

pub use auth::{AuthUser, auth_middleware};
pub use roles::{require_admin, require_staff};
