//! Media error types.

use thiserror::Error;

use crate::resource::RepositoryError;

/// Media row errors.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The media row could not be written or read.
    #[error("media persistence failed: {0}")]
    Persistence(#[from] RepositoryError),
}
