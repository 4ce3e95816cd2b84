//! Pet repository for database operations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::{db_err, direction, now, to_media, updated};
use crate::entities::{files, pets};
use petcare_core::pet::{NewPet, Pet, PetChanges, PetRepository as PetRepoTrait};
use petcare_core::resource::{ListParams, RepositoryError, WithMedia};

/// Pet repository implementation.
#[derive(Debug, Clone)]
pub struct PetRepository {
    db: DatabaseConnection,
}

impl PetRepository {
    /// Create a new pet repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PetRepoTrait for PetRepository {
    async fn create(&self, input: NewPet) -> Result<Pet, RepositoryError> {
        let now = now();
        let model = pets::ActiveModel {
            name: Set(input.name),
            kind: Set(input.kind),
            sex: Set(input.sex),
            breed: Set(input.breed),
            owner_id: Set(input.owner_id),
            avatar_id: Set(input.avatar_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(to_domain(model))
    }

    async fn find_with_avatar(&self, id: i32) -> Result<Option<WithMedia<Pet>>, RepositoryError> {
        let row = pets::Entity::find_by_id(id)
            .find_also_related(files::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(row.map(with_avatar))
    }

    async fn list(&self, params: &ListParams) -> Result<Vec<WithMedia<Pet>>, RepositoryError> {
        let mut query = pets::Entity::find();
        if let Some(owner) = params.owner {
            query = query.filter(pets::Column::OwnerId.eq(owner));
        }

        let rows = query
            .find_also_related(files::Entity)
            .order_by(pets::Column::CreatedAt, direction(params.order))
            .order_by(pets::Column::Id, direction(params.order))
            .offset(params.page.offset())
            .limit(params.page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows.into_iter().map(with_avatar).collect())
    }

    async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<WithMedia<Pet>>, RepositoryError> {
        let rows = pets::Entity::find()
            .filter(pets::Column::OwnerId.eq(owner_id))
            .find_also_related(files::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows.into_iter().map(with_avatar).collect())
    }

    async fn update(&self, id: i32, changes: PetChanges) -> Result<Option<Pet>, RepositoryError> {
        let result = pets::ActiveModel {
            id: Unchanged(id),
            name: Set(changes.name),
            kind: Set(changes.kind),
            sex: Set(changes.sex),
            breed: Set(changes.breed),
            updated_at: Set(now()),
            ..Default::default()
        }
        .update(&self.db)
        .await;

        Ok(updated(result)?.map(to_domain))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let result = pets::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }
}

fn with_avatar((pet, avatar): (pets::Model, Option<files::Model>)) -> WithMedia<Pet> {
    WithMedia::new(to_domain(pet), avatar.map(to_media))
}

/// Convert database model to domain model.
fn to_domain(model: pets::Model) -> Pet {
    Pet {
        id: model.id,
        name: model.name,
        kind: model.kind,
        sex: model.sex,
        breed: model.breed,
        owner_id: model.owner_id,
        avatar_id: model.avatar_id,
        created_at: model.created_at.with_timezone(&chrono::Utc),
        updated_at: model.updated_at.with_timezone(&chrono::Utc),
    }
}
