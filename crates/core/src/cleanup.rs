//! Junk cleanup: removal of orphaned uploads and their media rows.
//!
//! Every path that accepts an upload hands its leftovers here when the
//! operation is rejected or fails, and delete paths hand over the media of the
//! removed entity. Reclaiming is best-effort: failures are logged with
//! `warn!` and never reach the caller.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::media::{Media, MediaRepository};
use crate::storage::{StagedFile, StorageService};

/// What a reclaim actually removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reclaimed {
    /// The stored file was deleted.
    pub file_removed: bool,
    /// The media row was deleted.
    pub record_removed: bool,
}

/// Compensating deletes for stored files and media rows.
pub struct JunkCleanup {
    storage: Arc<StorageService>,
    media: Arc<dyn MediaRepository>,
}

impl JunkCleanup {
    /// Create a cleanup handle.
    #[must_use]
    pub fn new(storage: Arc<StorageService>, media: Arc<dyn MediaRepository>) -> Self {
        Self { storage, media }
    }

    /// Delete the file at `stored_path` and, when given, the media row `media_id`.
    pub async fn reclaim(&self, stored_path: &str, media_id: Option<i32>) -> Reclaimed {
        let mut reclaimed = Reclaimed::default();

        if self.storage.exists(stored_path).await {
            match self.storage.delete(stored_path).await {
                Ok(()) => reclaimed.file_removed = true,
                Err(e) => warn!(path = %stored_path, error = %e, "Failed to delete stored file"),
            }
        } else {
            warn!(path = %stored_path, "Stored file already absent");
        }

        if let Some(id) = media_id {
            match self.media.delete(id).await {
                Ok(true) => reclaimed.record_removed = true,
                Ok(false) => warn!(media_id = id, "Media row already absent"),
                Err(e) => warn!(media_id = id, error = %e, "Failed to delete media row"),
            }
        }

        debug!(
            path = %stored_path,
            file_removed = reclaimed.file_removed,
            record_removed = reclaimed.record_removed,
            "Reclaimed upload"
        );
        reclaimed
    }

    /// Remove a staged file that never got a media row.
    pub async fn discard(&self, file: Option<&StagedFile>) {
        if let Some(file) = file {
            self.reclaim(&file.stored_path, None).await;
        }
    }

    /// Remove a media row together with its file.
    pub async fn reclaim_media(&self, media: &Media) -> Reclaimed {
        self.reclaim(&media.path, Some(media.id)).await
    }

    /// Remove every media in `media`, skipping `None`s.
    pub async fn reclaim_all(&self, media: &[Option<&Media>]) {
        for media in media.iter().flatten() {
            self.reclaim_media(media).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MockMediaRepository;
    use crate::resource::RepositoryError;
    use crate::storage::{StorageConfig, StorageProvider};
    use bytes::Bytes;
    use mockall::predicate::eq;

    fn storage() -> Arc<StorageService> {
        Arc::new(
            StorageService::from_config(StorageConfig::new(StorageProvider::Memory))
                .expect("memory storage"),
        )
    }

    async fn stage(storage: &StorageService) -> StagedFile {
        storage
            .stage_upload("rex.png", "image/png", Bytes::from_static(b"\x89PNG"))
            .await
            .expect("stage upload")
    }

    #[tokio::test]
    async fn test_reclaim_removes_file_and_row() {
        let storage = storage();
        let file = stage(&storage).await;

        let mut media = MockMediaRepository::new();
        media.expect_delete().with(eq(3)).times(1).returning(|_| Ok(true));

        let cleanup = JunkCleanup::new(storage.clone(), Arc::new(media));
        let reclaimed = cleanup.reclaim(&file.stored_path, Some(3)).await;

        assert_eq!(
            reclaimed,
            Reclaimed {
                file_removed: true,
                record_removed: true
            }
        );
        assert!(!storage.exists(&file.stored_path).await);
    }

    #[tokio::test]
    async fn test_discard_leaves_media_rows_alone() {
        let storage = storage();
        let file = stage(&storage).await;

        let mut media = MockMediaRepository::new();
        media.expect_delete().never();

        let cleanup = JunkCleanup::new(storage.clone(), Arc::new(media));
        cleanup.discard(Some(&file)).await;
        cleanup.discard(None).await;

        assert!(!storage.exists(&file.stored_path).await);
    }

    #[tokio::test]
    async fn test_reclaim_tolerates_missing_file_and_failing_repo() {
        let mut media = MockMediaRepository::new();
        media
            .expect_delete()
            .returning(|_| Err(RepositoryError::new("connection refused")));

        let cleanup = JunkCleanup::new(storage(), Arc::new(media));
        let reclaimed = cleanup.reclaim("never-stored.png", Some(1)).await;

        assert_eq!(reclaimed, Reclaimed::default());
    }

    #[tokio::test]
    async fn test_reclaim_all_skips_none() {
        let storage = storage();
        let file = stage(&storage).await;
        let attached = Media {
            id: 5,
            name: file.original_name.clone(),
            path: file.stored_path.clone(),
        };

        let mut media = MockMediaRepository::new();
        media.expect_delete().with(eq(5)).times(1).returning(|_| Ok(true));

        let cleanup = JunkCleanup::new(storage.clone(), Arc::new(media));
        cleanup.reclaim_all(&[None, Some(&attached), None]).await;

        assert!(!storage.exists(&file.stored_path).await);
    }
}
