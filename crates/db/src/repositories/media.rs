//! Media repository over the `files` table.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use super::{db_err, now, to_media};
use crate::entities::files;
use petcare_core::media::{Media, MediaRepository as MediaRepoTrait, NewMedia};
use petcare_core::resource::RepositoryError;

/// Media repository implementation.
#[derive(Debug, Clone)]
pub struct MediaRepository {
    db: DatabaseConnection,
}

impl MediaRepository {
    /// Create a new media repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MediaRepoTrait for MediaRepository {
    async fn create(&self, input: NewMedia) -> Result<Media, RepositoryError> {
        let now = now();
        let model = files::ActiveModel {
            name: Set(input.name),
            path: Set(input.path),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(to_media(model))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let result = files::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }
}
