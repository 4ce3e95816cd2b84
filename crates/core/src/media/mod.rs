//! Media rows for uploaded files.
//!
//! A media row records the client filename and the generated storage key of
//! one stored file. Its public URL is derived from the configured base URL and
//! never persisted.

mod error;
mod service;
mod types;

pub use error::MediaError;
#[cfg(test)]
pub use service::MockMediaRepository;
pub use service::{MediaRepository, MediaStore};
pub use types::{Media, MediaView, NewMedia};
