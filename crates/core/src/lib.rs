//! Core business logic for Petcare.
//!
//! This crate contains the resource services and their repository seams with
//! ZERO web or database dependencies. The db crate implements the repository
//! traits and the api crate drives the services.
//!
//! # Modules
//!
//! - `storage` - Upload validation and file storage via OpenDAL
//! - `media` - Media rows and their public URLs
//! - `cleanup` - Reclaiming orphaned uploads
//! - `validation` - Payload schemas
//! - `resource` - Owner context, intake, listing and the media saga
//! - `pet`, `post`, `appointment`, `customer`, `employee` - Resource services

pub mod appointment;
pub mod cleanup;
pub mod customer;
pub mod employee;
pub mod media;
pub mod pet;
pub mod post;
pub mod resource;
pub mod storage;
pub mod validation;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cleanup::JunkCleanup;
pub use media::MediaStore;
pub use resource::{MediaSaga, OwnerContext, ResourceError};
pub use storage::StorageService;
