//! Resource error taxonomy.

use thiserror::Error;

use crate::media::MediaError;
use crate::validation::ValidationFailure;

/// Failure reported by a repository implementation.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct RepositoryError(pub String);

impl RepositoryError {
    /// Create a repository error.
    #[must_use]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Errors a resource operation can end in.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Owner identifier absent from query and headers.
    #[error("User id not provided.")]
    OwnerMissing,

    /// Path identifier absent or not numeric.
    #[error("Id not provided.")]
    InvalidId,

    /// Upload endpoint called without a multipart body.
    #[error("Content type must be multipart/form-data")]
    ContentType,

    /// Payload rejected by its schema.
    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    /// Nothing to store (a post with neither title nor media).
    #[error("No content provided")]
    NoContent,

    /// Unknown `order` value.
    #[error("Invalid order value.")]
    InvalidOrder,

    /// Missing, or owned by someone else.
    #[error("{0} not found.")]
    NotFound(&'static str),

    /// Database or storage failure. The detail is for logs only.
    #[error("Internal error.")]
    Persistence(String),
}

impl ResourceError {
    /// Create a persistence error.
    #[must_use]
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::OwnerMissing
            | Self::InvalidId
            | Self::ContentType
            | Self::Validation(_)
            | Self::NoContent
            | Self::InvalidOrder => 400,
            Self::NotFound(_) => 404,
            Self::Persistence(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::OwnerMissing => "owner_missing",
            Self::InvalidId => "invalid_id",
            Self::ContentType => "content_type",
            Self::Validation(_) => "validation_error",
            Self::NoContent => "no_content",
            Self::InvalidOrder => "invalid_order",
            Self::NotFound(_) => "not_found",
            Self::Persistence(_) => "internal_error",
        }
    }
}

impl From<RepositoryError> for ResourceError {
    fn from(err: RepositoryError) -> Self {
        Self::Persistence(err.0)
    }
}

impl From<MediaError> for ResourceError {
    fn from(err: MediaError) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ResourceError::OwnerMissing, 400, "User id not provided.")]
    #[case(ResourceError::InvalidId, 400, "Id not provided.")]
    #[case(ResourceError::ContentType, 400, "Content type must be multipart/form-data")]
    #[case(ResourceError::NoContent, 400, "No content provided")]
    #[case(ResourceError::InvalidOrder, 400, "Invalid order value.")]
    #[case(ResourceError::NotFound("Pet"), 404, "Pet not found.")]
    #[case(ResourceError::persistence("connection reset"), 500, "Internal error.")]
    fn test_status_and_message(
        #[case] err: ResourceError,
        #[case] status: u16,
        #[case] message: &str,
    ) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn test_validation_message_is_joined() {
        let err = ResourceError::from(ValidationFailure::new(vec![
            "breed is a required field".into(),
            "name is a required field".into(),
        ]));
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_string(),
            "breed is a required field. name is a required field"
        );
    }

    #[test]
    fn test_repository_detail_is_hidden() {
        let err = ResourceError::from(RepositoryError::new("duplicate key value"));
        assert_eq!(err.to_string(), "Internal error.");
        assert!(matches!(err, ResourceError::Persistence(detail) if detail == "duplicate key value"));
    }
}
