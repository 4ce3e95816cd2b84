//! Shared types, errors, and configuration for Petcare.
//!
//! This crate provides common types used across all other crates:
//! - Token claims and roles for the bearer-token guard
//! - JWT validation (issuance lives with the external session service)
//! - Pagination and ordering types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;


pub use auth::{Claims, Role};
pub use config::AppConfig;
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};
