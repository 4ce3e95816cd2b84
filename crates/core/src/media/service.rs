//! Media repository seam and store.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::MediaError;
use super::types::{Media, MediaView, NewMedia};
use crate::resource::RepositoryError;
use crate::storage::StagedFile;

/// Repository trait for media persistence.
///
/// Implemented by the db crate over the `files` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Insert a media row.
    async fn create(&self, input: NewMedia) -> Result<Media, RepositoryError>;

    /// Delete a media row. Returns `false` if it did not exist.
    async fn delete(&self, id: i32) -> Result<bool, RepositoryError>;
}

/// Turns staged uploads into media rows and renders their URLs.
pub struct MediaStore {
    repo: Arc<dyn MediaRepository>,
    base_url: String,
}

impl MediaStore {
    /// Create a media store. `base_url` is prefixed verbatim to stored paths.
    #[must_use]
    pub fn new(repo: Arc<dyn MediaRepository>, base_url: impl Into<String>) -> Self {
        Self {
            repo,
            base_url: base_url.into(),
        }
    }

    /// Record a staged file as exactly one new media row.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Persistence` if the row cannot be written.
    pub async fn attach(&self, file: &StagedFile) -> Result<Media, MediaError> {
        let media = self
            .repo
            .create(NewMedia {
                name: file.original_name.clone(),
                path: file.stored_path.clone(),
            })
            .await?;
        Ok(media)
    }

    /// Public URL of a media row.
    #[must_use]
    pub fn url_for(&self, media: &Media) -> String {
        format!("{}{}", self.base_url, media.path)
    }

    /// Response shape of a media row.
    #[must_use]
    pub fn view(&self, media: &Media) -> MediaView {
        MediaView {
            id: media.id,
            path: media.path.clone(),
            url: self.url_for(media),
        }
    }

    /// Optional variant of [`MediaStore::view`].
    #[must_use]
    pub fn view_opt(&self, media: Option<&Media>) -> Option<MediaView> {
        media.map(|m| self.view(m))
    }
}
