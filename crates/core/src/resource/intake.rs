//! Intake of a submitted form: content type and payload checks.

use serde::de::DeserializeOwned;
use validator::Validate;

use super::context::is_multipart_form;
use super::error::ResourceError;
use crate::cleanup::JunkCleanup;
use crate::storage::StagedFile;
use crate::validation::{FormFields, validate_payload};

/// A form as received: its declared content type, text fields and the file
/// that was already written to storage, if any.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    /// The request's `Content-Type` header.
    pub content_type: Option<String>,
    /// Text fields.
    pub fields: FormFields,
    /// Staged upload.
    pub file: Option<StagedFile>,
}

/// A submission whose payload passed its schema.
#[derive(Debug, Clone)]
pub struct Admitted<T> {
    /// Typed payload.
    pub payload: T,
    /// Staged upload, still without a media row.
    pub file: Option<StagedFile>,
}

impl Submission {
    /// A multipart submission.
    #[must_use]
    pub fn multipart(fields: FormFields, file: Option<StagedFile>) -> Self {
        Self {
            content_type: Some("multipart/form-data".to_string()),
            fields,
            file,
        }
    }

    /// Check content type and payload. On rejection the staged file is
    /// discarded before the error is returned.
    pub async fn admit<T>(self, cleanup: &JunkCleanup) -> Result<Admitted<T>, ResourceError>
    where
        T: DeserializeOwned + Validate,
    {
        if !is_multipart_form(self.content_type.as_deref()) {
            return Err(self.reject(cleanup, ResourceError::ContentType).await);
        }

        match validate_payload::<T>(&self.fields) {
            Ok(payload) => Ok(Admitted {
                payload,
                file: self.file,
            }),
            Err(failure) => Err(self.reject(cleanup, failure.into()).await),
        }
    }

    /// Discard the staged file and hand back `err`.
    pub async fn reject(self, cleanup: &JunkCleanup, err: ResourceError) -> ResourceError {
        cleanup.discard(self.file.as_ref()).await;
        err
    }
}

impl<T> Admitted<T> {
    /// Discard the staged file and hand back `err`.
    pub async fn reject(self, cleanup: &JunkCleanup, err: ResourceError) -> ResourceError {
        cleanup.discard(self.file.as_ref()).await;
        err
    }
}
