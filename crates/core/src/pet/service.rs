//! Pet repository seam and service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::types::{NewPet, Pet, PetChanges, PetPayload, PetView};
use crate::resource::{
    ListParams, ListQuery, MediaSaga, OwnerContext, RepositoryError, ResourceError, Submission,
    WithMedia,
};
use crate::validation::{FormFields, validate_payload};

/// Repository trait for pet persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Insert a pet.
    async fn create(&self, input: NewPet) -> Result<Pet, RepositoryError>;

    /// Find a pet with its avatar.
    async fn find_with_avatar(&self, id: i32) -> Result<Option<WithMedia<Pet>>, RepositoryError>;

    /// One page of pets with their avatars.
    async fn list(&self, params: &ListParams) -> Result<Vec<WithMedia<Pet>>, RepositoryError>;

    /// Every pet of one owner, with avatars.
    async fn list_by_owner(&self, owner_id: i32)
    -> Result<Vec<WithMedia<Pet>>, RepositoryError>;

    /// Replace a pet's descriptive fields. `None` if the row is gone.
    async fn update(&self, id: i32, changes: PetChanges) -> Result<Option<Pet>, RepositoryError>;

    /// Delete a pet. Returns `false` if it did not exist.
    async fn delete(&self, id: i32) -> Result<bool, RepositoryError>;
}

/// Pet operations.
pub struct PetService {
    pets: Arc<dyn PetRepository>,
    saga: MediaSaga,
}

impl PetService {
    /// Create a pet service.
    #[must_use]
    pub fn new(pets: Arc<dyn PetRepository>, saga: MediaSaga) -> Self {
        Self { pets, saga }
    }

    /// Create a pet for `owner`, attaching the uploaded avatar if present.
    pub async fn create(
        &self,
        owner: Option<OwnerContext>,
        submission: Submission,
    ) -> Result<PetView, ResourceError> {
        let cleanup = self.saga.cleanup();
        let Some(owner) = owner else {
            return Err(submission.reject(cleanup, ResourceError::OwnerMissing).await);
        };
        let admitted = submission.admit::<PetPayload>(cleanup).await?;
        let changes = admitted.payload.into_changes();

        let (pet, _) = self
            .saga
            .run(admitted.file, move |avatar_id| async move {
                let pet = self
                    .pets
                    .create(NewPet {
                        name: changes.name,
                        kind: changes.kind,
                        sex: changes.sex,
                        breed: changes.breed,
                        owner_id: owner.owner_id(),
                        avatar_id,
                    })
                    .await?;
                Ok(pet)
            })
            .await?;

        info!(pet_id = pet.id, owner_id = owner.owner_id(), "Pet created");
        self.show(pet.id).await
    }

    /// One page of pets.
    pub async fn list(&self, query: ListQuery) -> Result<Vec<PetView>, ResourceError> {
        let params = query.into_params()?;
        let pets = self.pets.list(&params).await?;
        Ok(pets.into_iter().map(|p| self.view(p)).collect())
    }

    /// A single pet.
    pub async fn show(&self, id: i32) -> Result<PetView, ResourceError> {
        let pet = self
            .pets
            .find_with_avatar(id)
            .await?
            .ok_or(ResourceError::NotFound("Pet"))?;
        Ok(self.view(pet))
    }

    /// Replace the descriptive fields of a pet `owner` owns.
    pub async fn update(
        &self,
        owner: OwnerContext,
        id: i32,
        fields: &FormFields,
    ) -> Result<PetView, ResourceError> {
        let payload: PetPayload = validate_payload(fields)?;
        self.owned(owner, id).await?;

        self.pets
            .update(id, payload.into_changes())
            .await?
            .ok_or(ResourceError::NotFound("Pet"))?;

        info!(pet_id = id, owner_id = owner.owner_id(), "Pet updated");
        self.show(id).await
    }

    /// Delete a pet `owner` owns, reclaiming its avatar.
    pub async fn delete(&self, owner: OwnerContext, id: i32) -> Result<(), ResourceError> {
        let pet = self.owned(owner, id).await?;

        if !self.pets.delete(id).await? {
            return Err(ResourceError::NotFound("Pet"));
        }
        self.saga.cleanup().reclaim_all(&[pet.media.as_ref()]).await;

        info!(pet_id = id, owner_id = owner.owner_id(), "Pet deleted");
        Ok(())
    }

    /// Load a pet, treating pets of other owners as missing.
    pub async fn owned(
        &self,
        owner: OwnerContext,
        id: i32,
    ) -> Result<WithMedia<Pet>, ResourceError> {
        self.pets
            .find_with_avatar(id)
            .await?
            .filter(|p| owner.owns(p.item.owner_id))
            .ok_or(ResourceError::NotFound("Pet"))
    }

    fn view(&self, record: WithMedia<Pet>) -> PetView {
        let avatar = self.saga.store().view_opt(record.media.as_ref());
        let pet = record.item;
        PetView {
            id: pet.id,
            name: pet.name,
            kind: pet.kind,
            sex: pet.sex,
            breed: pet.breed,
            owner_id: pet.owner_id,
            avatar_id: pet.avatar_id,
            avatar,
            created_at: pet.created_at,
            updated_at: pet.updated_at,
        }
    }
}
