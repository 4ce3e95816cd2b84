//! Mapping of domain errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use petcare_core::ResourceError;
use petcare_core::storage::StorageError;
use petcare_shared::AppError;
use serde_json::json;
use tracing::error;

/// Error returned by handlers and extractors.
#[derive(Debug)]
pub enum ApiError {
    /// Resource operation failed.
    Resource(ResourceError),
    /// Token, role or request decoding failure.
    App(AppError),
    /// Upload rejected or storage unreachable.
    Storage(StorageError),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            Self::Resource(e) => (status(e.status_code()), e.error_code(), e.to_string()),
            Self::App(e) => (status(e.status_code()), e.error_code(), e.public_message()),
            Self::Storage(e) => match e {
                StorageError::FileTooLarge { .. } => {
                    (StatusCode::BAD_REQUEST, "file_too_large", e.to_string())
                }
                StorageError::InvalidMimeType { .. } => {
                    (StatusCode::BAD_REQUEST, "unsupported_media_type", e.to_string())
                }
                StorageError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "not_found", "File not found.".to_string())
                }
                StorageError::Configuration(_) | StorageError::Operation(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal error.".to_string(),
                ),
            },
        }
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            match &self {
                Self::Resource(ResourceError::Persistence(detail)) => {
                    error!(error = %detail, "Request failed");
                }
                other => error!(error = ?other, "Request failed"),
            }
        }

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}

impl From<ResourceError> for ApiError {
    fn from(err: ResourceError) -> Self {
        Self::Resource(err)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use petcare_core::validation::ValidationFailure;
    use rstest::rstest;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[rstest]
    #[case(ApiError::from(ResourceError::OwnerMissing), 400, "owner_missing", "User id not provided.")]
    #[case(ApiError::from(ResourceError::NotFound("Pet")), 404, "not_found", "Pet not found.")]
    #[case(
        ApiError::from(ResourceError::persistence("relation \"pets\" does not exist")),
        500,
        "internal_error",
        "Internal error."
    )]
    #[case(
        ApiError::from(AppError::Forbidden("Staff role required".into())),
        403,
        "forbidden",
        "Staff role required"
    )]
    #[case(
        ApiError::from(StorageError::invalid_mime_type("text/html")),
        400,
        "unsupported_media_type",
        "MIME type 'text/html' is not allowed"
    )]
    #[case(
        ApiError::from(StorageError::Operation("disk full".into())),
        500,
        "internal_error",
        "Internal error."
    )]
    #[tokio::test]
    async fn test_error_bodies(
        #[case] err: ApiError,
        #[case] expected_status: u16,
        #[case] expected_code: &str,
        #[case] expected_message: &str,
    ) {
        let (status, body) = body_of(err).await;
        assert_eq!(status.as_u16(), expected_status);
        assert_eq!(body["error"], expected_code);
        assert_eq!(body["message"], expected_message);
    }

    #[tokio::test]
    async fn test_validation_messages_are_joined() {
        let failure = ValidationFailure::new(vec![
            "name is required".to_string(),
            "type is required".to_string(),
        ]);
        let (status, body) = body_of(ResourceError::from(failure).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "name is required. type is required");
    }
}
