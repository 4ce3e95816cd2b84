//! Media saga: attach a staged file, write the entity, compensate on failure.

use std::future::Future;
use std::sync::Arc;

use tracing::error;

use super::error::ResourceError;
use crate::cleanup::JunkCleanup;
use crate::media::{Media, MediaStore};
use crate::storage::StagedFile;

/// Media store and cleanup, shared by every resource service.
#[derive(Clone)]
pub struct MediaSaga {
    store: Arc<MediaStore>,
    cleanup: Arc<JunkCleanup>,
}

impl MediaSaga {
    /// Create a saga runner.
    #[must_use]
    pub fn new(store: Arc<MediaStore>, cleanup: Arc<JunkCleanup>) -> Self {
        Self { store, cleanup }
    }

    /// The media store.
    #[must_use]
    pub fn store(&self) -> &MediaStore {
        &self.store
    }

    /// The cleanup handle.
    #[must_use]
    pub fn cleanup(&self) -> &JunkCleanup {
        &self.cleanup
    }

    /// Attach `file` (if any), then run `write` with the new media id.
    ///
    /// If attaching fails the staged file is removed. If `write` fails the
    /// media row and file are removed. Either way nothing is left behind.
    pub async fn run<T, F, Fut>(
        &self,
        file: Option<StagedFile>,
        write: F,
    ) -> Result<(T, Option<Media>), ResourceError>
    where
        F: FnOnce(Option<i32>) -> Fut,
        Fut: Future<Output = Result<T, ResourceError>>,
    {
        let media = self.attach(file).await?;

        match write(media.as_ref().map(|m| m.id)).await {
            Ok(value) => Ok((value, media)),
            Err(e) => {
                if let Some(media) = &media {
                    error!(media_id = media.id, error = ?e, "Entity write failed, reclaiming media");
                    self.cleanup.reclaim_media(media).await;
                }
                Err(e)
            }
        }
    }

    /// Like [`MediaSaga::run`] for updates that may swap media.
    ///
    /// After a successful write the `previous` media is reclaimed when a new
    /// one replaced it.
    pub async fn replace<T, F, Fut>(
        &self,
        file: Option<StagedFile>,
        previous: Option<&Media>,
        write: F,
    ) -> Result<T, ResourceError>
    where
        F: FnOnce(Option<i32>) -> Fut,
        Fut: Future<Output = Result<T, ResourceError>>,
    {
        let (value, media) = self.run(file, write).await?;
        if media.is_some() {
            if let Some(previous) = previous {
                self.cleanup.reclaim_media(previous).await;
            }
        }
        Ok(value)
    }

    async fn attach(&self, file: Option<StagedFile>) -> Result<Option<Media>, ResourceError> {
        let Some(file) = file else {
            return Ok(None);
        };

        match self.store.attach(&file).await {
            Ok(media) => Ok(Some(media)),
            Err(e) => {
                error!(path = %file.stored_path, error = %e, "Failed to attach media");
                self.cleanup.discard(Some(&file)).await;
                Err(e.into())
            }
        }
    }
}
